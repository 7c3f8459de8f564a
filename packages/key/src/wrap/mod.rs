//! Key management layer
//!
//! A [`KeyWrapper`] produces the content encryption key (CEK) for one JWE
//! and recovers it again on the reading side. Wrappers are keyed with the
//! key-encryption key and bound to a content encryption algorithm.

mod aes_gcm_kw;
mod aes_kw;
mod direct;

pub use aes_gcm_kw::AesGcmKeyWrapper;
pub use aes_kw::{AesKeyWrapper, KW_IV};
pub use direct::DirectKeyWrapper;

use crate::algorithm::{KeyManagementAlgorithm, KeyManagementFamily};
use crate::error::{KeyError, Result};
use jwx_cipher::EncryptionAlgorithm;
use rand::RngCore;
use zeroize::Zeroizing;

/// Output of [`KeyWrapper::wrap_key`]
pub struct WrappedKey {
    cek: Zeroizing<Vec<u8>>,
    encrypted_key: Vec<u8>,
    iv: Option<Vec<u8>>,
    tag: Option<Vec<u8>>,
}

impl WrappedKey {
    /// The content encryption key in the clear
    #[must_use]
    pub fn cek(&self) -> &[u8] {
        &self.cek
    }

    /// Bytes for the JWE encrypted-key segment; empty for `dir`
    #[must_use]
    pub fn encrypted_key(&self) -> &[u8] {
        &self.encrypted_key
    }

    /// `iv` header parameter (AES-GCM key wrap only)
    #[must_use]
    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }

    /// `tag` header parameter (AES-GCM key wrap only)
    #[must_use]
    pub fn tag(&self) -> Option<&[u8]> {
        self.tag.as_deref()
    }
}

impl std::fmt::Debug for WrappedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WrappedKey")
            .field("cek", &"[REDACTED]")
            .field("encrypted_key_len", &self.encrypted_key.len())
            .field("iv", &self.iv.is_some())
            .field("tag", &self.tag.is_some())
            .finish()
    }
}

/// Header parameters some algorithms need to unwrap
#[derive(Debug, Clone, Copy, Default)]
pub struct UnwrapParameters<'a> {
    /// Decoded `iv` header parameter
    pub iv: Option<&'a [u8]>,
    /// Decoded `tag` header parameter
    pub tag: Option<&'a [u8]>,
}

/// Produces and recovers content encryption keys
pub trait KeyWrapper: Send + Sync {
    /// Key management algorithm implemented
    fn algorithm(&self) -> KeyManagementAlgorithm;

    /// Content encryption algorithm the CEK is generated for
    fn encryption_algorithm(&self) -> EncryptionAlgorithm;

    /// Length of the encrypted-key segment produced by [`wrap_key`](Self::wrap_key)
    fn key_wrap_size(&self) -> usize;

    /// Length of the CEK recovered from a `wrapped_len`-byte encrypted key
    fn key_unwrap_size(&self, wrapped_len: usize) -> usize;

    /// Generate (or take) a CEK and wrap it
    ///
    /// # Errors
    ///
    /// Fails when `static_key` is given to `dir` or has the wrong length.
    fn wrap_key(&self, static_key: Option<&[u8]>) -> Result<WrappedKey>;

    /// Recover the CEK into `destination`, returning its length
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnwrapFailed`] for any integrity failure and
    /// writes nothing in that case.
    fn try_unwrap_key(
        &self,
        wrapped: &[u8],
        params: &UnwrapParameters<'_>,
        destination: &mut [u8],
    ) -> Result<usize>;
}

/// Build the wrapper for `alg` keyed with `key`, producing CEKs for `enc`
///
/// # Errors
///
/// Fails when the key length does not suit `alg`, or for `dir` when it does
/// not equal the content key size of `enc`.
pub fn create_key_wrapper(
    key: &[u8],
    enc: EncryptionAlgorithm,
    alg: KeyManagementAlgorithm,
) -> Result<Box<dyn KeyWrapper>> {
    Ok(match alg.family() {
        KeyManagementFamily::Direct => Box::new(DirectKeyWrapper::new(key, enc)?),
        KeyManagementFamily::AesKw => Box::new(AesKeyWrapper::new(key, alg, enc)?),
        KeyManagementFamily::AesGcmKw => Box::new(AesGcmKeyWrapper::new(key, alg, enc)?),
    })
}

/// The CEK to wrap: `static_key` when given, random bytes otherwise
fn content_key(enc: EncryptionAlgorithm, static_key: Option<&[u8]>) -> Result<Zeroizing<Vec<u8>>> {
    let expected = enc.key_size();
    match static_key {
        Some(key) if key.len() != expected => Err(KeyError::InvalidKeySize {
            expected,
            actual: key.len(),
        }),
        Some(key) => Ok(Zeroizing::new(key.to_vec())),
        None => {
            let mut cek = Zeroizing::new(vec![0u8; expected]);
            rand::rng().fill_bytes(&mut cek);
            Ok(cek)
        }
    }
}

fn check_kek(key: &[u8], alg: KeyManagementAlgorithm, enc: EncryptionAlgorithm) -> Result<()> {
    match alg.key_size() {
        Some(expected) if expected == key.len() => Ok(()),
        Some(expected) => Err(KeyError::InvalidKeySize {
            expected,
            actual: key.len(),
        }),
        None => Err(KeyError::UnsupportedCombination {
            alg: alg.name().to_string(),
            enc: enc.name().to_string(),
        }),
    }
}
