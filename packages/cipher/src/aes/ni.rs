//! AES-NI implementation for x86_64
//!
//! Key expansion follows Intel's "AES New Instructions Set" white paper.
//! Instances are only constructed after the CPU has reported `aes` and
//! `sse2`, which is what makes the `unsafe` calls below sound.

#![allow(unsafe_code)]

use super::{AesKeySize, Backend, Block, BlockCipher, BLOCK_SIZE};
use core::arch::x86_64::{
    __m128i, _mm_aesdec_si128, _mm_aesdeclast_si128, _mm_aesenc_si128, _mm_aesenclast_si128,
    _mm_aesimc_si128, _mm_aeskeygenassist_si128, _mm_castpd_si128, _mm_castsi128_pd,
    _mm_loadl_epi64, _mm_loadu_si128, _mm_setzero_si128, _mm_shuffle_epi32, _mm_shuffle_pd,
    _mm_slli_si128, _mm_storeu_si128, _mm_xor_si128,
};
use std::sync::atomic::{compiler_fence, Ordering};

const MAX_ROUND_KEYS: usize = 15;

type Schedule = [__m128i; MAX_ROUND_KEYS];

pub(super) fn is_supported() -> bool {
    std::arch::is_x86_feature_detected!("aes") && std::arch::is_x86_feature_detected!("sse2")
}

pub(super) struct NiAes {
    size: AesKeySize,
    encrypt_keys: Schedule,
    decrypt_keys: Schedule,
}

impl NiAes {
    /// `None` when the CPU lacks AES-NI. `key` must be `size.key_len()` bytes.
    pub(super) fn new(size: AesKeySize, key: &[u8]) -> Option<Self> {
        if !is_supported() || key.len() != size.key_len() {
            return None;
        }
        // SAFETY: feature support was checked above and the key length
        // matches the expansion routine.
        let (encrypt_keys, decrypt_keys) = unsafe {
            let encrypt_keys = match size {
                AesKeySize::Aes128 => expand_128(key),
                AesKeySize::Aes192 => expand_192(key),
                AesKeySize::Aes256 => expand_256(key),
            };
            let decrypt_keys = invert_schedule(&encrypt_keys, size.rounds());
            (encrypt_keys, decrypt_keys)
        };
        Some(Self {
            size,
            encrypt_keys,
            decrypt_keys,
        })
    }
}

// k ^ (k << 32) ^ (k << 64) ^ (k << 96)
macro_rules! prefix_xor {
    ($k:expr) => {{
        let mut k = $k;
        let mut t = _mm_slli_si128::<4>(k);
        k = _mm_xor_si128(k, t);
        t = _mm_slli_si128::<4>(t);
        k = _mm_xor_si128(k, t);
        t = _mm_slli_si128::<4>(t);
        _mm_xor_si128(k, t)
    }};
}

#[target_feature(enable = "aes,sse2")]
unsafe fn expand_128(key: &[u8]) -> Schedule {
    let mut keys = [_mm_setzero_si128(); MAX_ROUND_KEYS];
    let mut k = _mm_loadu_si128(key.as_ptr().cast());
    keys[0] = k;

    macro_rules! round {
        ($i:expr, $rcon:expr) => {{
            let assist = _mm_shuffle_epi32::<0xff>(_mm_aeskeygenassist_si128::<{ $rcon }>(k));
            k = _mm_xor_si128(prefix_xor!(k), assist);
            keys[$i] = k;
        }};
    }

    round!(1, 0x01);
    round!(2, 0x02);
    round!(3, 0x04);
    round!(4, 0x08);
    round!(5, 0x10);
    round!(6, 0x20);
    round!(7, 0x40);
    round!(8, 0x80);
    round!(9, 0x1b);
    round!(10, 0x36);
    keys
}

#[target_feature(enable = "aes,sse2")]
unsafe fn expand_192(key: &[u8]) -> Schedule {
    let mut keys = [_mm_setzero_si128(); MAX_ROUND_KEYS];
    let mut t1 = _mm_loadu_si128(key.as_ptr().cast());
    // Only the upper 8 key bytes; the high lane stays zero.
    let mut t3 = _mm_loadl_epi64(key[16..].as_ptr().cast());
    keys[0] = t1;
    keys[1] = t3;

    macro_rules! assist {
        ($rcon:expr) => {{
            let t2 = _mm_shuffle_epi32::<0x55>(_mm_aeskeygenassist_si128::<{ $rcon }>(t3));
            t1 = _mm_xor_si128(prefix_xor!(t1), t2);
            let t2 = _mm_shuffle_epi32::<0xff>(t1);
            t3 = _mm_xor_si128(_mm_xor_si128(t3, _mm_slli_si128::<4>(t3)), t2);
        }};
    }

    // Each 192-bit step straddles two round keys.
    macro_rules! merge {
        ($lo:expr, $hi:expr) => {
            _mm_castpd_si128(_mm_shuffle_pd::<0>(
                _mm_castsi128_pd($lo),
                _mm_castsi128_pd($hi),
            ))
        };
    }
    macro_rules! split {
        ($lo:expr, $hi:expr) => {
            _mm_castpd_si128(_mm_shuffle_pd::<1>(
                _mm_castsi128_pd($lo),
                _mm_castsi128_pd($hi),
            ))
        };
    }

    assist!(0x01);
    keys[1] = merge!(keys[1], t1);
    keys[2] = split!(t1, t3);
    assist!(0x02);
    keys[3] = t1;
    keys[4] = t3;
    assist!(0x04);
    keys[4] = merge!(keys[4], t1);
    keys[5] = split!(t1, t3);
    assist!(0x08);
    keys[6] = t1;
    keys[7] = t3;
    assist!(0x10);
    keys[7] = merge!(keys[7], t1);
    keys[8] = split!(t1, t3);
    assist!(0x20);
    keys[9] = t1;
    keys[10] = t3;
    assist!(0x40);
    keys[10] = merge!(keys[10], t1);
    keys[11] = split!(t1, t3);
    assist!(0x80);
    keys[12] = t1;
    keys
}

#[target_feature(enable = "aes,sse2")]
unsafe fn expand_256(key: &[u8]) -> Schedule {
    let mut keys = [_mm_setzero_si128(); MAX_ROUND_KEYS];
    let mut t1 = _mm_loadu_si128(key.as_ptr().cast());
    let mut t3 = _mm_loadu_si128(key[16..].as_ptr().cast());
    keys[0] = t1;
    keys[1] = t3;

    macro_rules! even {
        ($i:expr, $rcon:expr) => {{
            let t2 = _mm_shuffle_epi32::<0xff>(_mm_aeskeygenassist_si128::<{ $rcon }>(t3));
            t1 = _mm_xor_si128(prefix_xor!(t1), t2);
            keys[$i] = t1;
        }};
    }
    macro_rules! odd {
        ($i:expr) => {{
            let t2 = _mm_shuffle_epi32::<0xaa>(_mm_aeskeygenassist_si128::<0x00>(t1));
            t3 = _mm_xor_si128(prefix_xor!(t3), t2);
            keys[$i] = t3;
        }};
    }

    even!(2, 0x01);
    odd!(3);
    even!(4, 0x02);
    odd!(5);
    even!(6, 0x04);
    odd!(7);
    even!(8, 0x08);
    odd!(9);
    even!(10, 0x10);
    odd!(11);
    even!(12, 0x20);
    odd!(13);
    even!(14, 0x40);
    keys
}

#[target_feature(enable = "aes,sse2")]
unsafe fn invert_schedule(encrypt_keys: &Schedule, rounds: usize) -> Schedule {
    let mut keys = [_mm_setzero_si128(); MAX_ROUND_KEYS];
    keys[0] = encrypt_keys[rounds];
    for i in 1..rounds {
        keys[i] = _mm_aesimc_si128(encrypt_keys[rounds - i]);
    }
    keys[rounds] = encrypt_keys[0];
    keys
}

#[target_feature(enable = "aes,sse2")]
unsafe fn encrypt_one(keys: &Schedule, rounds: usize, block: &mut Block) {
    let mut b = _mm_xor_si128(_mm_loadu_si128(block.as_ptr().cast()), keys[0]);
    for key in &keys[1..rounds] {
        b = _mm_aesenc_si128(b, *key);
    }
    b = _mm_aesenclast_si128(b, keys[rounds]);
    _mm_storeu_si128(block.as_mut_ptr().cast(), b);
}

#[target_feature(enable = "aes,sse2")]
unsafe fn decrypt_one(keys: &Schedule, rounds: usize, block: &mut Block) {
    let mut b = _mm_xor_si128(_mm_loadu_si128(block.as_ptr().cast()), keys[0]);
    for key in &keys[1..rounds] {
        b = _mm_aesdec_si128(b, *key);
    }
    b = _mm_aesdeclast_si128(b, keys[rounds]);
    _mm_storeu_si128(block.as_mut_ptr().cast(), b);
}

const LANES: usize = 4;

// Four independent blocks per iteration keep the AES units busy.
#[target_feature(enable = "aes,sse2")]
unsafe fn decrypt_wide(keys: &Schedule, rounds: usize, data: &mut [u8]) {
    let mut chunks = data.chunks_exact_mut(BLOCK_SIZE * LANES);
    for chunk in &mut chunks {
        let ptr = chunk.as_mut_ptr();
        let mut b = [_mm_setzero_si128(); LANES];
        for (lane, value) in b.iter_mut().enumerate() {
            *value = _mm_xor_si128(
                _mm_loadu_si128(ptr.add(lane * BLOCK_SIZE).cast()),
                keys[0],
            );
        }
        for key in &keys[1..rounds] {
            for value in &mut b {
                *value = _mm_aesdec_si128(*value, *key);
            }
        }
        for (lane, value) in b.iter().enumerate() {
            _mm_storeu_si128(
                ptr.add(lane * BLOCK_SIZE).cast(),
                _mm_aesdeclast_si128(*value, keys[rounds]),
            );
        }
    }
    for chunk in chunks.into_remainder().chunks_exact_mut(BLOCK_SIZE) {
        if let Ok(block) = <&mut Block>::try_from(chunk) {
            decrypt_one(keys, rounds, block);
        }
    }
}

impl BlockCipher for NiAes {
    fn key_size(&self) -> AesKeySize {
        self.size
    }

    fn backend(&self) -> Backend {
        Backend::AesNi
    }

    fn encrypt_block(&self, block: &mut Block) {
        // SAFETY: construction verified CPU support.
        unsafe { encrypt_one(&self.encrypt_keys, self.size.rounds(), block) }
    }

    fn decrypt_block(&self, block: &mut Block) {
        // SAFETY: construction verified CPU support.
        unsafe { decrypt_one(&self.decrypt_keys, self.size.rounds(), block) }
    }

    fn decrypt_blocks(&self, data: &mut [u8]) {
        // SAFETY: construction verified CPU support.
        unsafe { decrypt_wide(&self.decrypt_keys, self.size.rounds(), data) }
    }
}

impl Drop for NiAes {
    fn drop(&mut self) {
        for key in self
            .encrypt_keys
            .iter_mut()
            .chain(self.decrypt_keys.iter_mut())
        {
            // SAFETY: `key` is a valid, aligned, exclusively borrowed slot;
            // SSE2 is part of the x86_64 baseline.
            unsafe { core::ptr::write_volatile(key, _mm_setzero_si128()) };
        }
        compiler_fence(Ordering::SeqCst);
    }
}
