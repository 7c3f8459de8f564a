//! Error types for token operations
//!
//! Validation outcomes are reported as [`ValidationError`] values. [`JwtError`]
//! covers programmer errors: bad configuration, unusable keys and failures
//! while writing tokens.

use crate::result::ValidationError;
use jwx_cipher::CipherError;
use jwx_key::KeyError;
use thiserror::Error;

/// Token operation result type
pub type Result<T> = std::result::Result<T, JwtError>;

/// Errors raised while configuring, writing or asynchronously reading tokens
#[derive(Debug, Error)]
pub enum JwtError {
    /// A configuration value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A signing or encryption key is required but was not supplied
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// Algorithm not supported for this operation
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Key management failed
    #[error("Key error: {0}")]
    Key(#[from] KeyError),

    /// Content encryption failed
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Claims or header could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// DEFLATE compression failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// A key set document could not be retrieved
    #[error("Key set retrieval failed: {0}")]
    Retrieval(String),

    /// Token was read but did not validate
    #[error("Token validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Background task failed or no runtime was available
    #[error("Background task failed")]
    TaskFailed,
}
