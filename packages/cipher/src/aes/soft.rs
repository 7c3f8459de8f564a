//! Portable AES
//!
//! Straightforward FIPS-197 rounds over a column-major 16 byte state.

use super::tables::{INV_SBOX, RCON, SBOX};
use super::{AesKeySize, Backend, Block, BlockCipher, BLOCK_SIZE};
use zeroize::Zeroize;

const MAX_ROUND_KEYS: usize = 15;

pub(super) struct SoftAes {
    size: AesKeySize,
    round_keys: [Block; MAX_ROUND_KEYS],
}

impl SoftAes {
    /// `key` must be exactly `size.key_len()` bytes.
    pub(super) fn new(size: AesKeySize, key: &[u8]) -> Self {
        Self {
            size,
            round_keys: expand_key(size, key),
        }
    }
}

fn sub_word(word: [u8; 4]) -> [u8; 4] {
    word.map(|b| SBOX[usize::from(b)])
}

fn expand_key(size: AesKeySize, key: &[u8]) -> [Block; MAX_ROUND_KEYS] {
    let nk = size.key_len() / 4;
    let total_words = 4 * size.round_keys();
    let mut words = [[0u8; 4]; 4 * MAX_ROUND_KEYS];

    for (word, bytes) in words.iter_mut().zip(key.chunks_exact(4)) {
        word.copy_from_slice(bytes);
    }

    for i in nk..total_words {
        let mut temp = words[i - 1];
        if i % nk == 0 {
            temp.rotate_left(1);
            temp = sub_word(temp);
            temp[0] ^= RCON[i / nk - 1];
        } else if nk > 6 && i % nk == 4 {
            temp = sub_word(temp);
        }
        for (t, prev) in temp.iter_mut().zip(words[i - nk]) {
            *t ^= prev;
        }
        words[i] = temp;
    }

    let mut round_keys = [[0u8; BLOCK_SIZE]; MAX_ROUND_KEYS];
    for (round_key, chunk) in round_keys.iter_mut().zip(words.chunks_exact(4)) {
        for (dst, word) in round_key.chunks_exact_mut(4).zip(chunk) {
            dst.copy_from_slice(word);
        }
    }
    words.zeroize();
    round_keys
}

#[inline]
fn xtime(b: u8) -> u8 {
    (b << 1) ^ (((b >> 7) & 1) * 0x1b)
}

#[inline]
fn gmul(mut a: u8, mut b: u8) -> u8 {
    let mut product = 0u8;
    while b != 0 {
        if b & 1 != 0 {
            product ^= a;
        }
        a = xtime(a);
        b >>= 1;
    }
    product
}

#[inline]
fn add_round_key(state: &mut Block, round_key: &Block) {
    for (s, k) in state.iter_mut().zip(round_key) {
        *s ^= k;
    }
}

#[inline]
fn sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = SBOX[usize::from(*b)];
    }
}

#[inline]
fn inv_sub_bytes(state: &mut Block) {
    for b in state.iter_mut() {
        *b = INV_SBOX[usize::from(*b)];
    }
}

// state[row + 4 * col]; row r rotates left by r
#[inline]
fn shift_rows(state: &mut Block) {
    let old = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[row + 4 * col] = old[row + 4 * ((col + row) % 4)];
        }
    }
}

#[inline]
fn inv_shift_rows(state: &mut Block) {
    let old = *state;
    for row in 1..4 {
        for col in 0..4 {
            state[row + 4 * ((col + row) % 4)] = old[row + 4 * col];
        }
    }
}

#[inline]
fn mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        let all = a0 ^ a1 ^ a2 ^ a3;
        col[0] ^= all ^ xtime(a0 ^ a1);
        col[1] ^= all ^ xtime(a1 ^ a2);
        col[2] ^= all ^ xtime(a2 ^ a3);
        col[3] ^= all ^ xtime(a3 ^ a0);
    }
}

#[inline]
fn inv_mix_columns(state: &mut Block) {
    for col in state.chunks_exact_mut(4) {
        let [a0, a1, a2, a3] = [col[0], col[1], col[2], col[3]];
        col[0] = gmul(a0, 14) ^ gmul(a1, 11) ^ gmul(a2, 13) ^ gmul(a3, 9);
        col[1] = gmul(a0, 9) ^ gmul(a1, 14) ^ gmul(a2, 11) ^ gmul(a3, 13);
        col[2] = gmul(a0, 13) ^ gmul(a1, 9) ^ gmul(a2, 14) ^ gmul(a3, 11);
        col[3] = gmul(a0, 11) ^ gmul(a1, 13) ^ gmul(a2, 9) ^ gmul(a3, 14);
    }
}

impl BlockCipher for SoftAes {
    fn key_size(&self) -> AesKeySize {
        self.size
    }

    fn backend(&self) -> Backend {
        Backend::Portable
    }

    fn encrypt_block(&self, block: &mut Block) {
        let rounds = self.size.rounds();
        add_round_key(block, &self.round_keys[0]);
        for round_key in &self.round_keys[1..rounds] {
            sub_bytes(block);
            shift_rows(block);
            mix_columns(block);
            add_round_key(block, round_key);
        }
        sub_bytes(block);
        shift_rows(block);
        add_round_key(block, &self.round_keys[rounds]);
    }

    fn decrypt_block(&self, block: &mut Block) {
        let rounds = self.size.rounds();
        add_round_key(block, &self.round_keys[rounds]);
        for round_key in self.round_keys[1..rounds].iter().rev() {
            inv_shift_rows(block);
            inv_sub_bytes(block);
            add_round_key(block, round_key);
            inv_mix_columns(block);
        }
        inv_shift_rows(block);
        inv_sub_bytes(block);
        add_round_key(block, &self.round_keys[0]);
    }
}

impl Drop for SoftAes {
    fn drop(&mut self) {
        self.round_keys.zeroize();
    }
}
