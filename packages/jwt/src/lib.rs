//! Compact JWS and JWE tokens with symmetric keys
//!
//! This crate provides:
//! - A [`JwtReader`] for 3-segment JWS and 5-segment JWE tokens, including
//!   nested (sign-then-encrypt) tokens
//! - A [`TokenValidationPolicy`] built from composable validators
//! - Descriptors for writing tokens ([`JwsDescriptor`], [`JweDescriptor`],
//!   [`BinaryJweDescriptor`])
//! - Key providers backed by fixed key sets or a remote JWKS document
//!
//! ```
//! use jwx_cipher::EncryptionAlgorithm;
//! use jwx_jwt::{JwePayload, JweDescriptor, JwtReader, TokenValidationPolicy};
//! use jwx_key::{KeyManagementAlgorithm, KeySet, SymmetricKey};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let key = Arc::new(SymmetricKey::generate(256)?);
//! let mut claims = serde_json::Map::new();
//! claims.insert("sub".into(), "alice".into());
//!
//! let token = JweDescriptor::new(
//!     JwePayload::Claims(claims),
//!     Arc::clone(&key),
//!     KeyManagementAlgorithm::Direct,
//!     EncryptionAlgorithm::Aes128CbcHmacSha256,
//! )
//! .encode()?;
//!
//! let provider = jwx_jwt::StaticKeyProvider::new(KeySet::new(vec![key]));
//! let reader = JwtReader::new().with_provider(Arc::new(provider));
//! let jwt = reader.try_read_token(&token, &TokenValidationPolicy::no_validation())?;
//! assert_eq!(jwt.subject(), Some("alice"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod base64url;
mod clock;
mod compression;
mod config;
mod constants;
mod error;
mod futures;
mod header;
mod jws;
mod policy;
mod provider;
mod reader;
mod result;
mod token;
pub mod validators;
mod writer;

pub use clock::{Clock, SystemClock};
pub use config::{
    JwtConfig, MINIMUM_AUTOMATIC_REFRESH_INTERVAL_SECONDS, MINIMUM_REFRESH_INTERVAL_SECONDS,
};
pub use constants::{
    claims, COMPRESSION_DEFLATE, CONTENT_TYPE_JWT, DEFAULT_MAX_TOKEN_SIZE_IN_BYTES,
    MAX_NESTING_DEPTH,
};
pub use error::{JwtError, Result};
pub use futures::ReadTokenFuture;
pub use header::JwtHeader;
pub use policy::{TokenValidationPolicy, TokenValidationPolicyBuilder};
pub use provider::{DocumentRetriever, JwksKeyProvider, KeyProvider, StaticKeyProvider};
pub use reader::JwtReader;
pub use result::{TokenValidationResult, ValidationError};
pub use token::Jwt;
pub use writer::{BinaryJweDescriptor, JweDescriptor, JwePayload, JwsDescriptor};
