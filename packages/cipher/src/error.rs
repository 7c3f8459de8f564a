//! Error handling for the cipher crate

use thiserror::Error;

/// Cipher-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// Invalid key length provided
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Invalid nonce length provided
    #[error("Invalid nonce length: expected {expected}, got {actual}")]
    InvalidNonceLength {
        /// Expected nonce length in bytes
        expected: usize,
        /// Actual nonce length in bytes
        actual: usize,
    },

    /// Invalid authentication tag length provided
    #[error("Invalid tag length: expected {expected}, got {actual}")]
    InvalidTagLength {
        /// Expected tag length in bytes
        expected: usize,
        /// Actual tag length in bytes
        actual: usize,
    },

    /// Ciphertext is empty or not a whole number of blocks
    #[error("Invalid ciphertext length: {0}")]
    InvalidCiphertextLength(usize),

    /// Output buffer cannot hold the result
    #[error("Destination too small: required {required}, got {actual}")]
    DestinationTooSmall {
        /// Bytes the operation needs to write
        required: usize,
        /// Bytes the caller provided
        actual: usize,
    },

    /// Tag mismatch; nothing was written to the destination
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Authenticated plaintext carried malformed block padding
    #[error("Invalid padding")]
    InvalidPadding,

    /// Unsupported cryptographic algorithm
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Encryption operation failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Result type for cipher operations
pub type Result<T> = std::result::Result<T, CipherError>;
