//! Error handling for the hashing crate

use thiserror::Error;

/// Hashing-specific errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HashError {
    /// Destination buffer cannot hold the digest
    #[error("Output buffer too small: required {required}, got {actual}")]
    OutputTooSmall {
        /// Bytes the digest needs
        required: usize,
        /// Bytes the caller provided
        actual: usize,
    },

    /// Requested truncated length is zero or longer than the digest
    #[error("Invalid truncation length: maximum {max}, got {actual}")]
    InvalidTruncation {
        /// Full digest size in bytes
        max: usize,
        /// Requested size in bytes
        actual: usize,
    },
}

/// Result type for hashing operations
pub type Result<T> = std::result::Result<T, HashError>;
