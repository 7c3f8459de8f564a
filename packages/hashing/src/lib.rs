//! SHA-2 and HMAC primitives
//!
//! Pure Rust implementations of SHA-256, SHA-384 and SHA-512 with an HMAC
//! construction on top. These back the CBC-HMAC content encryption and the
//! `HS*` signatures of the token engine.

#![forbid(unsafe_code)]

pub mod error;
pub mod hmac;
pub mod sha;

pub use error::{HashError, Result};
pub use hmac::{Hmac, HmacContext, HmacSha256, HmacSha384, HmacSha512};
pub use sha::{Sha2, Sha256, Sha384, Sha512, MAX_BLOCK_SIZE, MAX_HASH_SIZE};
