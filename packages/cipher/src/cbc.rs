//! CBC mode with PKCS#7 padding over any [`BlockCipher`]

use crate::aes::{Block, BlockCipher, BLOCK_SIZE};
use crate::error::{CipherError, Result};
use zeroize::Zeroize;

/// Ciphertext length for `len` plaintext bytes (always at least one block)
#[inline]
#[must_use]
pub const fn padded_len(len: usize) -> usize {
    len - len % BLOCK_SIZE + BLOCK_SIZE
}

#[inline]
fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

/// Encrypt `plaintext` into `ciphertext`, returning the bytes written
///
/// The final partial block is padded in a local copy; `plaintext` is never
/// modified.
///
/// # Errors
///
/// Returns [`CipherError::DestinationTooSmall`] when `ciphertext` is shorter
/// than [`padded_len`].
pub fn encrypt(
    cipher: &dyn BlockCipher,
    iv: &Block,
    plaintext: &[u8],
    ciphertext: &mut [u8],
) -> Result<usize> {
    let required = padded_len(plaintext.len());
    if ciphertext.len() < required {
        return Err(CipherError::DestinationTooSmall {
            required,
            actual: ciphertext.len(),
        });
    }

    let full = plaintext.len() - plaintext.len() % BLOCK_SIZE;
    let mut chain = *iv;
    for (src, dst) in plaintext[..full]
        .chunks_exact(BLOCK_SIZE)
        .zip(ciphertext.chunks_exact_mut(BLOCK_SIZE))
    {
        xor_into(&mut chain, src);
        cipher.encrypt_block(&mut chain);
        dst.copy_from_slice(&chain);
    }

    let rest = &plaintext[full..];
    #[allow(clippy::cast_possible_truncation)]
    let pad = (BLOCK_SIZE - rest.len()) as u8;
    let mut last = [pad; BLOCK_SIZE];
    last[..rest.len()].copy_from_slice(rest);
    xor_into(&mut chain, &last);
    cipher.encrypt_block(&mut chain);
    ciphertext[full..required].copy_from_slice(&chain);
    last.zeroize();

    Ok(required)
}

/// Decrypt `ciphertext` into `plaintext`, returning the unpadded length
///
/// The last block is decrypted first so the padding length is known before
/// anything is written to `plaintext`.
///
/// # Errors
///
/// * [`CipherError::InvalidCiphertextLength`] for empty or partial-block input
/// * [`CipherError::InvalidPadding`] for malformed padding
/// * [`CipherError::DestinationTooSmall`] when `plaintext` cannot hold the result
pub fn decrypt(
    cipher: &dyn BlockCipher,
    iv: &Block,
    ciphertext: &[u8],
    plaintext: &mut [u8],
) -> Result<usize> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidCiphertextLength(ciphertext.len()));
    }

    let last_start = ciphertext.len() - BLOCK_SIZE;
    let mut last: Block = [0u8; BLOCK_SIZE];
    last.copy_from_slice(&ciphertext[last_start..]);
    cipher.decrypt_block(&mut last);
    if last_start == 0 {
        xor_into(&mut last, iv);
    } else {
        xor_into(&mut last, &ciphertext[last_start - BLOCK_SIZE..last_start]);
    }

    let pad = usize::from(last[BLOCK_SIZE - 1]);
    let mut bad = pad == 0 || pad > BLOCK_SIZE;
    if !bad {
        bad = last[BLOCK_SIZE - pad..]
            .iter()
            .fold(false, |acc, &b| acc | (usize::from(b) != pad));
    }
    if bad {
        last.zeroize();
        return Err(CipherError::InvalidPadding);
    }

    let out_len = ciphertext.len() - pad;
    if plaintext.len() < out_len {
        last.zeroize();
        return Err(CipherError::DestinationTooSmall {
            required: out_len,
            actual: plaintext.len(),
        });
    }

    let body = &mut plaintext[..last_start];
    body.copy_from_slice(&ciphertext[..last_start]);
    cipher.decrypt_blocks(body);
    for (i, block) in body.chunks_exact_mut(BLOCK_SIZE).enumerate() {
        if i == 0 {
            xor_into(block, iv);
        } else {
            xor_into(block, &ciphertext[(i - 1) * BLOCK_SIZE..i * BLOCK_SIZE]);
        }
    }
    plaintext[last_start..out_len].copy_from_slice(&last[..BLOCK_SIZE - pad]);
    last.zeroize();

    Ok(out_len)
}
