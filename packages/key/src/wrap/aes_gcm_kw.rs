//! AES-GCM key wrap (`A128GCMKW`, `A192GCMKW`, `A256GCMKW`)

use super::{check_kek, content_key, KeyWrapper, UnwrapParameters, WrappedKey};
use crate::algorithm::KeyManagementAlgorithm;
use crate::error::{KeyError, Result};
use jwx_cipher::{AuthenticatedEncryptor, CipherError, EncryptionAlgorithm, GcmEncryptor};
use rand::RngCore;

/// Seals the content key with AES-GCM under a fresh IV
///
/// The IV and tag travel in the JWE header as `iv` and `tag`.
pub struct AesGcmKeyWrapper {
    algorithm: KeyManagementAlgorithm,
    encryption: EncryptionAlgorithm,
    sealer: GcmEncryptor,
}

impl AesGcmKeyWrapper {
    /// Key a wrapper with the key-encryption key
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeySize`] when `kek` does not match `alg`
    /// and [`KeyError::UnsupportedCombination`] when `alg` is not a GCM
    /// key wrap.
    pub fn new(
        kek: &[u8],
        alg: KeyManagementAlgorithm,
        enc: EncryptionAlgorithm,
    ) -> Result<Self> {
        check_kek(kek, alg, enc)?;
        let sealing = match alg {
            KeyManagementAlgorithm::Aes128GcmKw => EncryptionAlgorithm::Aes128Gcm,
            KeyManagementAlgorithm::Aes192GcmKw => EncryptionAlgorithm::Aes192Gcm,
            KeyManagementAlgorithm::Aes256GcmKw => EncryptionAlgorithm::Aes256Gcm,
            other => {
                return Err(KeyError::UnsupportedCombination {
                    alg: other.name().to_string(),
                    enc: enc.name().to_string(),
                })
            }
        };
        Ok(Self {
            algorithm: alg,
            encryption: enc,
            sealer: GcmEncryptor::new(kek, sealing)?,
        })
    }
}

impl KeyWrapper for AesGcmKeyWrapper {
    fn algorithm(&self) -> KeyManagementAlgorithm {
        self.algorithm
    }

    fn encryption_algorithm(&self) -> EncryptionAlgorithm {
        self.encryption
    }

    fn key_wrap_size(&self) -> usize {
        self.encryption.key_size()
    }

    fn key_unwrap_size(&self, wrapped_len: usize) -> usize {
        wrapped_len
    }

    fn wrap_key(&self, static_key: Option<&[u8]>) -> Result<WrappedKey> {
        let cek = content_key(self.encryption, static_key)?;

        let mut iv = vec![0u8; self.sealer.nonce_size()];
        rand::rng().fill_bytes(&mut iv);
        let mut encrypted_key = vec![0u8; cek.len()];
        let mut tag = vec![0u8; self.sealer.tag_size()];
        self.sealer
            .encrypt(&cek, &iv, &[], &mut encrypted_key, &mut tag)?;

        Ok(WrappedKey {
            cek,
            encrypted_key,
            iv: Some(iv),
            tag: Some(tag),
        })
    }

    fn try_unwrap_key(
        &self,
        wrapped: &[u8],
        params: &UnwrapParameters<'_>,
        destination: &mut [u8],
    ) -> Result<usize> {
        let iv = params.iv.ok_or(KeyError::MissingParameter("iv"))?;
        let tag = params.tag.ok_or(KeyError::MissingParameter("tag"))?;
        match self.sealer.try_decrypt(wrapped, &[], iv, tag, destination) {
            Ok(len) => Ok(len),
            Err(CipherError::DestinationTooSmall { required, actual }) => {
                Err(KeyError::DestinationTooSmall { required, actual })
            }
            Err(_) => Err(KeyError::UnwrapFailed),
        }
    }
}
