//! Authenticated encryption layer
//!
//! Every content encryption algorithm is exposed through
//! [`AuthenticatedEncryptor`]. Instances are immutable after construction
//! and safe to share between threads.

mod cbc_hmac;
mod gcm;

pub use cbc_hmac::CbcHmacEncryptor;
pub use gcm::GcmEncryptor;

use crate::algorithm::{EncryptionAlgorithm, EncryptionFamily};
use crate::error::Result;

/// A keyed AEAD primitive bound to one algorithm
pub trait AuthenticatedEncryptor: Send + Sync {
    /// Algorithm this instance implements
    fn algorithm(&self) -> EncryptionAlgorithm;

    /// Ciphertext length produced for `plaintext_len` input bytes
    fn ciphertext_size(&self, plaintext_len: usize) -> usize;

    /// Required nonce (IV) length
    fn nonce_size(&self) -> usize;

    /// Authentication tag length
    fn tag_size(&self) -> usize;

    /// Encrypt and authenticate, returning the ciphertext length
    ///
    /// # Errors
    ///
    /// Fails on a wrong nonce length or when `ciphertext` / `tag` are too
    /// small for the output.
    fn encrypt(
        &self,
        plaintext: &[u8],
        nonce: &[u8],
        associated_data: &[u8],
        ciphertext: &mut [u8],
        tag: &mut [u8],
    ) -> Result<usize>;

    /// Verify and decrypt, returning the plaintext length
    ///
    /// On [`CipherError::AuthenticationFailed`](crate::CipherError::AuthenticationFailed)
    /// nothing has been written to `plaintext`.
    ///
    /// # Errors
    ///
    /// Fails on tag mismatch, malformed input sizes, or a destination too
    /// small for the plaintext.
    fn try_decrypt(
        &self,
        ciphertext: &[u8],
        associated_data: &[u8],
        nonce: &[u8],
        tag: &[u8],
        plaintext: &mut [u8],
    ) -> Result<usize>;
}

/// Build the encryptor for `algorithm` keyed with `key`
///
/// # Errors
///
/// Returns [`CipherError::InvalidKeyLength`](crate::CipherError::InvalidKeyLength)
/// when `key` is not [`EncryptionAlgorithm::key_size`] bytes.
pub fn create_encryptor(
    key: &[u8],
    algorithm: EncryptionAlgorithm,
) -> Result<Box<dyn AuthenticatedEncryptor>> {
    Ok(match algorithm.family() {
        EncryptionFamily::CbcHmac => Box::new(CbcHmacEncryptor::new(key, algorithm)?),
        EncryptionFamily::Gcm => Box::new(GcmEncryptor::new(key, algorithm)?),
    })
}
