//! Raw DEFLATE for the `zip: "DEF"` header

use crate::error::{JwtError, Result};
use crate::result::ValidationError;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compress a JWE plaintext
///
/// # Errors
///
/// Returns [`JwtError::Compression`] if the encoder fails.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| JwtError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| JwtError::Compression(e.to_string()))
}

/// Inflate a decrypted plaintext, refusing output larger than `limit`
///
/// # Errors
///
/// Returns [`ValidationError::DecompressionFailed`] for corrupt input or
/// output beyond `limit`.
pub fn inflate(data: &[u8], limit: usize) -> std::result::Result<Vec<u8>, ValidationError> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    DeflateDecoder::new(data)
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|_| ValidationError::DecompressionFailed)?;
    if out.len() > limit {
        return Err(ValidationError::DecompressionFailed);
    }
    Ok(out)
}
