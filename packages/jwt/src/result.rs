//! Outcome of reading a token

use crate::token::Jwt;
use thiserror::Error;

/// Why a token was rejected
///
/// Decryption and signature failures carry no per-key detail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Structure, size, alphabet or encoding is invalid
    #[error("Malformed token")]
    MalformedToken,

    /// JWE header without `enc`
    #[error("Missing encryption algorithm")]
    MissingEncryptionAlgorithm,

    /// No candidate key could decrypt the token
    #[error("Decryption failed")]
    DecryptionFailed,

    /// `zip` payload could not be inflated within the size limit
    #[error("Decompression failed")]
    DecompressionFailed,

    /// A required claim is absent
    #[error("Missing claim: {0}")]
    MissingClaim(String),

    /// A claim has an unexpected value
    #[error("Invalid claim: {0}")]
    InvalidClaim(String),

    /// Signature missing or not verifiable with any candidate key
    #[error("Signature validation failed")]
    SignatureFailed,

    /// `exp` is in the past
    #[error("Token expired")]
    Expired,

    /// `nbf` is in the future
    #[error("Token not yet valid")]
    NotYetValid,
}

/// Result of [`JwtReader::try_read_token`](crate::JwtReader::try_read_token)
pub type TokenValidationResult = Result<Jwt, ValidationError>;
