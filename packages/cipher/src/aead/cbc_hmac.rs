//! AES-CBC with HMAC-SHA-2 (RFC 7518 §5.2)
//!
//! The key is split in half: the first half keys the MAC, the second half
//! keys AES. The tag is the truncated HMAC over
//! `AAD || IV || ciphertext || AL`, where `AL` is the AAD length in bits as a
//! 64-bit big-endian integer.

use super::AuthenticatedEncryptor;
use crate::aes::{Aes, Block, BlockCipher, BLOCK_SIZE};
use crate::algorithm::EncryptionAlgorithm;
use crate::cbc;
use crate::error::{CipherError, Result};
use jwx_hashing::{Hmac, HmacContext, HmacSha256, HmacSha384, HmacSha512, Sha2};

enum TagMac {
    Sha256(HmacSha256),
    Sha384(HmacSha384),
    Sha512(HmacSha512),
}

fn authenticate<'a, H: Sha2>(
    mac: &'a Hmac<H>,
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> HmacContext<'a, H> {
    let al = (aad.len() as u64).wrapping_mul(8).to_be_bytes();
    let mut ctx = mac.start();
    ctx.update(aad);
    ctx.update(iv);
    ctx.update(ciphertext);
    ctx.update(&al);
    ctx
}

impl TagMac {
    fn compute(&self, aad: &[u8], iv: &[u8], ciphertext: &[u8], tag: &mut [u8]) -> Result<()> {
        let finished = match self {
            Self::Sha256(mac) => authenticate(mac, aad, iv, ciphertext).finalize_into(tag),
            Self::Sha384(mac) => authenticate(mac, aad, iv, ciphertext).finalize_into(tag),
            Self::Sha512(mac) => authenticate(mac, aad, iv, ciphertext).finalize_into(tag),
        };
        finished.map_err(|e| CipherError::EncryptionFailed(e.to_string()))
    }

    fn verify(&self, aad: &[u8], iv: &[u8], ciphertext: &[u8], tag: &[u8]) -> bool {
        match self {
            Self::Sha256(mac) => authenticate(mac, aad, iv, ciphertext).verify(tag),
            Self::Sha384(mac) => authenticate(mac, aad, iv, ciphertext).verify(tag),
            Self::Sha512(mac) => authenticate(mac, aad, iv, ciphertext).verify(tag),
        }
    }
}

/// `A128CBC-HS256`, `A192CBC-HS384` and `A256CBC-HS512`
pub struct CbcHmacEncryptor {
    algorithm: EncryptionAlgorithm,
    cipher: Box<dyn BlockCipher>,
    mac: TagMac,
    tag_size: usize,
}

impl CbcHmacEncryptor {
    /// Key a CBC-HMAC encryptor
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] when `key` is not exactly
    /// [`EncryptionAlgorithm::key_size`] bytes and
    /// [`CipherError::UnsupportedAlgorithm`] for a GCM algorithm.
    pub fn new(key: &[u8], algorithm: EncryptionAlgorithm) -> Result<Self> {
        let expected = algorithm.key_size();
        if key.len() != expected {
            return Err(CipherError::InvalidKeyLength {
                expected,
                actual: key.len(),
            });
        }

        let half = expected / 2;
        let (mac_key, enc_key) = key.split_at(half);
        let mac = match algorithm {
            EncryptionAlgorithm::Aes128CbcHmacSha256 => TagMac::Sha256(Hmac::new(mac_key)),
            EncryptionAlgorithm::Aes192CbcHmacSha384 => TagMac::Sha384(Hmac::new(mac_key)),
            EncryptionAlgorithm::Aes256CbcHmacSha512 => TagMac::Sha512(Hmac::new(mac_key)),
            other => return Err(CipherError::UnsupportedAlgorithm(other.name().to_string())),
        };

        Ok(Self {
            algorithm,
            cipher: Aes::new(enc_key)?,
            mac,
            tag_size: half,
        })
    }

    fn iv(nonce: &[u8]) -> Result<Block> {
        <Block>::try_from(nonce).map_err(|_| CipherError::InvalidNonceLength {
            expected: BLOCK_SIZE,
            actual: nonce.len(),
        })
    }
}

impl AuthenticatedEncryptor for CbcHmacEncryptor {
    fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    fn ciphertext_size(&self, plaintext_len: usize) -> usize {
        cbc::padded_len(plaintext_len)
    }

    fn nonce_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn tag_size(&self) -> usize {
        self.tag_size
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> Result<usize> {
        let iv = Self::iv(nonce)?;
        if tag.len() < self.tag_size {
            return Err(CipherError::DestinationTooSmall {
                required: self.tag_size,
                actual: tag.len(),
            });
        }

        let written = cbc::encrypt(self.cipher.as_ref(), &iv, plaintext, ciphertext)?;
        self.mac.compute(
            associated_data,
            &iv,
            &ciphertext[..written],
            &mut tag[..self.tag_size],
        )?;
        Ok(written)
    }

    fn try_decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
        nonce: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> Result<usize> {
        let iv = Self::iv(nonce)?;
        if tag.len() != self.tag_size {
            return Err(CipherError::InvalidTagLength {
                expected: self.tag_size,
                actual: tag.len(),
            });
        }

        // Never touch unauthenticated ciphertext.
        if !self.mac.verify(associated_data, &iv, ciphertext, tag) {
            return Err(CipherError::AuthenticationFailed);
        }

        cbc::decrypt(self.cipher.as_ref(), &iv, ciphertext, plaintext)
    }
}
