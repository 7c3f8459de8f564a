//! Direct key agreement (`dir`)

use super::{KeyWrapper, UnwrapParameters, WrappedKey};
use crate::algorithm::KeyManagementAlgorithm;
use crate::error::{KeyError, Result};
use jwx_cipher::EncryptionAlgorithm;
use zeroize::Zeroizing;

/// The shared key is used as the content encryption key
pub struct DirectKeyWrapper {
    encryption: EncryptionAlgorithm,
    key: Zeroizing<Vec<u8>>,
}

impl DirectKeyWrapper {
    /// Bind `key` to `enc`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeySize`] when `key` is not exactly the
    /// content key size of `enc`.
    pub fn new(key: &[u8], enc: EncryptionAlgorithm) -> Result<Self> {
        if key.len() != enc.key_size() {
            return Err(KeyError::InvalidKeySize {
                expected: enc.key_size(),
                actual: key.len(),
            });
        }
        Ok(Self {
            encryption: enc,
            key: Zeroizing::new(key.to_vec()),
        })
    }
}

impl KeyWrapper for DirectKeyWrapper {
    fn algorithm(&self) -> KeyManagementAlgorithm {
        KeyManagementAlgorithm::Direct
    }

    fn encryption_algorithm(&self) -> EncryptionAlgorithm {
        self.encryption
    }

    fn key_wrap_size(&self) -> usize {
        0
    }

    fn key_unwrap_size(&self, _wrapped_len: usize) -> usize {
        self.key.len()
    }

    fn wrap_key(&self, static_key: Option<&[u8]>) -> Result<WrappedKey> {
        if static_key.is_some() {
            return Err(KeyError::StaticKeyNotSupported);
        }
        Ok(WrappedKey {
            cek: self.key.clone(),
            encrypted_key: Vec::new(),
            iv: None,
            tag: None,
        })
    }

    fn try_unwrap_key(
        &self,
        wrapped: &[u8],
        _params: &UnwrapParameters<'_>,
        destination: &mut [u8],
    ) -> Result<usize> {
        if !wrapped.is_empty() {
            return Err(KeyError::UnwrapFailed);
        }
        let len = self.key.len();
        if destination.len() < len {
            return Err(KeyError::DestinationTooSmall {
                required: len,
                actual: destination.len(),
            });
        }
        destination[..len].copy_from_slice(&self.key);
        Ok(len)
    }
}
