//! AES Key Wrap (RFC 3394)

use super::{check_kek, content_key, KeyWrapper, UnwrapParameters, WrappedKey};
use crate::algorithm::KeyManagementAlgorithm;
use crate::error::{KeyError, Result};
use jwx_cipher::{Aes, Block, BlockCipher, EncryptionAlgorithm};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

/// Default initial value from RFC 3394 §2.2.3.1
pub const KW_IV: [u8; 8] = [0xA6; 8];

const HALF_BLOCK: usize = 8;
const ROUNDS: usize = 6;

/// `A128KW`, `A192KW` and `A256KW`
pub struct AesKeyWrapper {
    algorithm: KeyManagementAlgorithm,
    encryption: EncryptionAlgorithm,
    cipher: Box<dyn BlockCipher>,
}

impl AesKeyWrapper {
    /// Key a wrapper with the key-encryption key
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeySize`] when `kek` does not match `alg`.
    pub fn new(
        kek: &[u8],
        alg: KeyManagementAlgorithm,
        enc: EncryptionAlgorithm,
    ) -> Result<Self> {
        check_kek(kek, alg, enc)?;
        Ok(Self {
            algorithm: alg,
            encryption: enc,
            cipher: Aes::new(kek)?,
        })
    }

    /// Wrap arbitrary key data into `out`, returning `key_data.len() + 8`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidWrapInput`] unless `key_data` is a multiple
    /// of 8 bytes and at least 16, and [`KeyError::DestinationTooSmall`] when
    /// `out` cannot hold the result.
    pub fn wrap(&self, key_data: &[u8], out: &mut [u8]) -> Result<usize> {
        let len = key_data.len();
        if len % HALF_BLOCK != 0 || len < 2 * HALF_BLOCK {
            return Err(KeyError::InvalidWrapInput(len));
        }
        let required = len + HALF_BLOCK;
        if out.len() < required {
            return Err(KeyError::DestinationTooSmall {
                required,
                actual: out.len(),
            });
        }

        let n = len / HALF_BLOCK;
        let out = &mut out[..required];
        out[..HALF_BLOCK].copy_from_slice(&KW_IV);
        out[HALF_BLOCK..].copy_from_slice(key_data);

        let mut block: Zeroizing<Block> = Zeroizing::new([0u8; 16]);
        for j in 0..ROUNDS {
            for i in 1..=n {
                let r = i * HALF_BLOCK;
                block[..HALF_BLOCK].copy_from_slice(&out[..HALF_BLOCK]);
                block[HALF_BLOCK..].copy_from_slice(&out[r..r + HALF_BLOCK]);
                self.cipher.encrypt_block(&mut block);

                let t = ((n * j + i) as u64).to_be_bytes();
                for (a, (b, t)) in out[..HALF_BLOCK].iter_mut().zip(block.iter().zip(t)) {
                    *a = b ^ t;
                }
                out[r..r + HALF_BLOCK].copy_from_slice(&block[HALF_BLOCK..]);
            }
        }
        Ok(required)
    }

    /// Unwrap into `out`, returning `wrapped.len() - 8`
    ///
    /// The integrity check value is compared in constant time and nothing is
    /// written to `out` unless it matches.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnwrapFailed`] for malformed input or a failed
    /// integrity check, and [`KeyError::DestinationTooSmall`] when `out`
    /// cannot hold the key.
    pub fn unwrap(&self, wrapped: &[u8], out: &mut [u8]) -> Result<usize> {
        let len = wrapped.len();
        if len % HALF_BLOCK != 0 || len < 3 * HALF_BLOCK {
            return Err(KeyError::UnwrapFailed);
        }
        let produced = len - HALF_BLOCK;
        if out.len() < produced {
            return Err(KeyError::DestinationTooSmall {
                required: produced,
                actual: out.len(),
            });
        }

        let n = produced / HALF_BLOCK;
        let mut work = Zeroizing::new(wrapped.to_vec());
        let mut block: Zeroizing<Block> = Zeroizing::new([0u8; 16]);
        for j in (0..ROUNDS).rev() {
            for i in (1..=n).rev() {
                let r = i * HALF_BLOCK;
                let t = ((n * j + i) as u64).to_be_bytes();
                for (b, (a, t)) in block.iter_mut().zip(work[..HALF_BLOCK].iter().zip(t)) {
                    *b = a ^ t;
                }
                block[HALF_BLOCK..].copy_from_slice(&work[r..r + HALF_BLOCK]);
                self.cipher.decrypt_block(&mut block);

                work[..HALF_BLOCK].copy_from_slice(&block[..HALF_BLOCK]);
                work[r..r + HALF_BLOCK].copy_from_slice(&block[HALF_BLOCK..]);
            }
        }

        if !bool::from(work[..HALF_BLOCK].ct_eq(&KW_IV)) {
            return Err(KeyError::UnwrapFailed);
        }
        out[..produced].copy_from_slice(&work[HALF_BLOCK..]);
        Ok(produced)
    }
}

impl KeyWrapper for AesKeyWrapper {
    fn algorithm(&self) -> KeyManagementAlgorithm {
        self.algorithm
    }

    fn encryption_algorithm(&self) -> EncryptionAlgorithm {
        self.encryption
    }

    fn key_wrap_size(&self) -> usize {
        self.encryption.key_size() + HALF_BLOCK
    }

    fn key_unwrap_size(&self, wrapped_len: usize) -> usize {
        wrapped_len.saturating_sub(HALF_BLOCK)
    }

    fn wrap_key(&self, static_key: Option<&[u8]>) -> Result<WrappedKey> {
        let cek = content_key(self.encryption, static_key)?;
        let mut encrypted_key = vec![0u8; self.key_wrap_size()];
        self.wrap(&cek, &mut encrypted_key)?;
        Ok(WrappedKey {
            cek,
            encrypted_key,
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
        self.unwrap(wrapped, destination)
    }
}
