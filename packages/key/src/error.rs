//! Error handling for key management

use jwx_cipher::CipherError;
use thiserror::Error;

/// Key-specific errors
#[derive(Debug, Error)]
pub enum KeyError {
    /// Key length does not match what the algorithm requires
    #[error("Invalid key size: expected {expected}, got {actual}")]
    InvalidKeySize {
        /// Expected key size in bytes
        expected: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// Key is shorter than the algorithm allows
    #[error("Key too short: minimum {minimum} bytes, got {actual}")]
    KeyTooShort {
        /// Minimum key size in bytes
        minimum: usize,
        /// Actual key size in bytes
        actual: usize,
    },

    /// Invalid key format provided
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// JWK `kty` other than `oct`
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// Algorithm name not recognized
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The key cannot serve this algorithm
    #[error("Unsupported algorithm combination: alg={alg}, enc={enc}")]
    UnsupportedCombination {
        /// Key management algorithm
        alg: String,
        /// Content encryption algorithm
        enc: String,
    },

    /// Direct key agreement was given a caller-chosen content key
    #[error("Direct key agreement does not accept a static content key")]
    StaticKeyNotSupported,

    /// Key data to wrap must be a multiple of 8 bytes and at least 16
    #[error("Invalid key data length for wrapping: {0}")]
    InvalidWrapInput(usize),

    /// Unwrapping failed; the cause is deliberately not distinguished
    #[error("Key unwrap failed")]
    UnwrapFailed,

    /// A header parameter required for unwrapping is absent
    #[error("Missing key management parameter: {0}")]
    MissingParameter(&'static str),

    /// Output buffer cannot hold the result
    #[error("Destination too small: required {required}, got {actual}")]
    DestinationTooSmall {
        /// Bytes the operation needs to write
        required: usize,
        /// Bytes the caller provided
        actual: usize,
    },

    /// Underlying cipher error
    #[error("Cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// JWK or JWKS document could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for key operations
pub type Result<T> = std::result::Result<T, KeyError>;
