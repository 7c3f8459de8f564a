//! SHA-2 family
//!
//! All three digests share the [`Sha2`] trait so HMAC can be written once.
//! Internal state and buffered input are zeroed when a hasher is dropped.

mod sha256;
mod sha512;

pub use sha256::Sha256;
pub use sha512::{Sha384, Sha512};

use crate::error::{HashError, Result};

/// Largest block size in the family (SHA-384/512)
pub const MAX_BLOCK_SIZE: usize = 128;

/// Largest digest size in the family (SHA-512)
pub const MAX_HASH_SIZE: usize = 64;

/// Common interface over the SHA-2 hashers
pub trait Sha2: Clone + Default + Send + Sync + 'static {
    /// Compression function input size in bytes
    const BLOCK_SIZE: usize;
    /// Digest size in bytes
    const HASH_SIZE: usize;
    /// Algorithm name as used in diagnostics
    const NAME: &'static str;

    /// Absorb more input
    fn update(&mut self, data: &[u8]);

    /// Pad, finish and write the digest into the first `HASH_SIZE` bytes
    fn finalize_fixed(self, output: &mut [u8; MAX_HASH_SIZE]);

    /// Pad, finish and write the digest into `output`
    ///
    /// # Errors
    ///
    /// Returns [`HashError::OutputTooSmall`] when `output` is shorter than
    /// `HASH_SIZE`.
    fn finalize_into(self, output: &mut [u8]) -> Result<()> {
        if output.len() < Self::HASH_SIZE {
            return Err(HashError::OutputTooSmall {
                required: Self::HASH_SIZE,
                actual: output.len(),
            });
        }
        let mut digest = [0u8; MAX_HASH_SIZE];
        self.finalize_fixed(&mut digest);
        output[..Self::HASH_SIZE].copy_from_slice(&digest[..Self::HASH_SIZE]);
        Ok(())
    }

    /// One-shot digest
    #[must_use]
    fn digest(data: &[u8]) -> Vec<u8> {
        let mut hasher = Self::default();
        hasher.update(data);
        let mut digest = [0u8; MAX_HASH_SIZE];
        hasher.finalize_fixed(&mut digest);
        digest[..Self::HASH_SIZE].to_vec()
    }
}
