//! AES-GCM, delegated to the `aes-gcm` crate
//!
//! This layer only enforces the JOSE sizes (96-bit nonce, 128-bit tag) and
//! the key size before handing off.

use super::AuthenticatedEncryptor;
use crate::algorithm::EncryptionAlgorithm;
use crate::error::{CipherError, Result};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use zeroize::Zeroizing;

/// GCM nonce length in bytes
pub const GCM_NONCE_SIZE: usize = 12;

/// GCM tag length in bytes
pub const GCM_TAG_SIZE: usize = 16;

type Aes192Gcm = AesGcm<::aes::Aes192, U12>;

enum GcmCipher {
    Aes128(Box<Aes128Gcm>),
    Aes192(Box<Aes192Gcm>),
    Aes256(Box<Aes256Gcm>),
}

fn seal<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &mut [u8],
) -> Result<()> {
    let computed = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce), aad, buffer)
        .map_err(|_| CipherError::EncryptionFailed("AES-GCM seal".to_string()))?;
    tag[..GCM_TAG_SIZE].copy_from_slice(&computed);
    Ok(())
}

fn open<C: AeadInPlace>(
    cipher: &C,
    nonce: &[u8],
    aad: &[u8],
    buffer: &mut [u8],
    tag: &[u8],
) -> Result<()> {
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce),
            aad,
            buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| CipherError::AuthenticationFailed)
}

fn keyed<C: KeyInit>(key: &[u8]) -> Result<Box<C>> {
    C::new_from_slice(key)
        .map(Box::new)
        .map_err(|_| CipherError::InvalidKeyLength {
            expected: C::key_size(),
            actual: key.len(),
        })
}

/// `A128GCM`, `A192GCM` and `A256GCM`
pub struct GcmEncryptor {
    algorithm: EncryptionAlgorithm,
    cipher: GcmCipher,
}

impl GcmEncryptor {
    /// Key a GCM encryptor
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] when `key` does not match the
    /// algorithm and [`CipherError::UnsupportedAlgorithm`] for a CBC algorithm.
    pub fn new(key: &[u8], algorithm: EncryptionAlgorithm) -> Result<Self> {
        let expected = algorithm.key_size();
        if key.len() != expected {
            return Err(CipherError::InvalidKeyLength {
                expected,
                actual: key.len(),
            });
        }

        let cipher = match algorithm {
            EncryptionAlgorithm::Aes128Gcm => GcmCipher::Aes128(keyed(key)?),
            EncryptionAlgorithm::Aes192Gcm => GcmCipher::Aes192(keyed(key)?),
            EncryptionAlgorithm::Aes256Gcm => GcmCipher::Aes256(keyed(key)?),
            other => return Err(CipherError::UnsupportedAlgorithm(other.name().to_string())),
        };
        Ok(Self { algorithm, cipher })
    }

    fn check_nonce(nonce: &[u8]) -> Result<()> {
        if nonce.len() == GCM_NONCE_SIZE {
            Ok(())
        } else {
            Err(CipherError::InvalidNonceLength {
                expected: GCM_NONCE_SIZE,
                actual: nonce.len(),
            })
        }
    }
}

impl AuthenticatedEncryptor for GcmEncryptor {
    fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    fn ciphertext_size(&self, plaintext_len: usize) -> usize {
        plaintext_len
    }

    fn nonce_size(&self) -> usize {
        GCM_NONCE_SIZE
    }

    fn tag_size(&self) -> usize {
        GCM_TAG_SIZE
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> Result<usize> {
        Self::check_nonce(nonce)?;
        if ciphertext.len() < plaintext.len() {
            return Err(CipherError::DestinationTooSmall {
                required: plaintext.len(),
                actual: ciphertext.len(),
            });
        }
        if tag.len() < GCM_TAG_SIZE {
            return Err(CipherError::DestinationTooSmall {
                required: GCM_TAG_SIZE,
                actual: tag.len(),
            });
        }

        let buffer = &mut ciphertext[..plaintext.len()];
        buffer.copy_from_slice(plaintext);
        match &self.cipher {
            GcmCipher::Aes128(c) => seal(c.as_ref(), nonce, associated_data, buffer, tag)?,
            GcmCipher::Aes192(c) => seal(c.as_ref(), nonce, associated_data, buffer, tag)?,
            GcmCipher::Aes256(c) => seal(c.as_ref(), nonce, associated_data, buffer, tag)?,
        }
        Ok(plaintext.len())
    }

    fn try_decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
        nonce: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> Result<usize> {
        Self::check_nonce(nonce)?;
        if tag.len() != GCM_TAG_SIZE {
            return Err(CipherError::InvalidTagLength {
                expected: GCM_TAG_SIZE,
                actual: tag.len(),
            });
        }
        if plaintext.len() < ciphertext.len() {
            return Err(CipherError::DestinationTooSmall {
                required: ciphertext.len(),
                actual: plaintext.len(),
            });
        }

        // Decrypt into scratch space so a failed tag check leaves the
        // destination untouched.
        let mut scratch = Zeroizing::new(ciphertext.to_vec());
        match &self.cipher {
            GcmCipher::Aes128(c) => open(c.as_ref(), nonce, associated_data, &mut scratch, tag)?,
            GcmCipher::Aes192(c) => open(c.as_ref(), nonce, associated_data, &mut scratch, tag)?,
            GcmCipher::Aes256(c) => open(c.as_ref(), nonce, associated_data, &mut scratch, tag)?,
        }
        plaintext[..ciphertext.len()].copy_from_slice(&scratch);
        Ok(ciphertext.len())
    }
}
