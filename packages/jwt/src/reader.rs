//! Compact serialization reader
//!
//! Reading is a short pipeline: byte-level checks, segment scan, then JWS
//! parsing or JWE decryption. A JWE plaintext that is itself a compact token
//! is read recursively, up to [`MAX_NESTING_DEPTH`] tokens deep. A plaintext
//! that is a JSON object is a claim set and goes through the policy; any
//! other plaintext is returned as opaque bytes.

use crate::base64url;
use crate::compression;
use crate::constants::{
    COMPRESSION_DEFLATE, CONTENT_TYPE_JWT, JWS_SEGMENT_COUNT, MAX_NESTING_DEPTH, MAX_SEGMENT_COUNT,
};
use crate::error::JwtError;
use crate::futures::ReadTokenFuture;
use crate::header::JwtHeader;
use crate::policy::TokenValidationPolicy;
use crate::provider::{KeyProvider, StaticKeyProvider};
use crate::result::{TokenValidationResult, ValidationError};
use crate::token::Jwt;
use jwx_cipher::{create_encryptor, AuthenticatedEncryptor, EncryptionAlgorithm};
use jwx_common::LoggingTransformer;
use jwx_key::{KeyManagementAlgorithm, SymmetricKey, UnwrapParameters};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use zeroize::Zeroizing;

struct Segments<'a> {
    parts: [&'a [u8]; MAX_SEGMENT_COUNT],
    count: usize,
}

/// Byte-level checks and segment scan; nothing is decoded
fn split(token: &[u8], maximum_size: usize) -> Result<Segments<'_>, ValidationError> {
    if token.iter().all(u8::is_ascii_whitespace)
        || token.len() > maximum_size
        || !token.iter().copied().all(base64url::is_token_byte)
    {
        return Err(ValidationError::MalformedToken);
    }

    let mut parts = [&token[..0]; MAX_SEGMENT_COUNT];
    let mut count = 0;
    let mut start = 0;
    for (i, &byte) in token.iter().enumerate() {
        if byte == b'.' {
            if count == MAX_SEGMENT_COUNT - 1 {
                return Err(ValidationError::MalformedToken);
            }
            parts[count] = &token[start..i];
            count += 1;
            start = i + 1;
        }
    }
    parts[count] = &token[start..];
    count += 1;

    if count == JWS_SEGMENT_COUNT || count == MAX_SEGMENT_COUNT {
        Ok(Segments { parts, count })
    } else {
        Err(ValidationError::MalformedToken)
    }
}

fn decode(segment: &[u8]) -> Result<Vec<u8>, ValidationError> {
    base64url::decode(segment).ok_or(ValidationError::MalformedToken)
}

fn ascii(segment: &[u8]) -> Result<&str, ValidationError> {
    std::str::from_utf8(segment).map_err(|_| ValidationError::MalformedToken)
}

/// Decoded JWE segments plus key management header parameters
struct JweParts<'a> {
    header_segment: &'a [u8],
    encrypted_key: Vec<u8>,
    iv: Vec<u8>,
    ciphertext: Vec<u8>,
    tag: Vec<u8>,
    wrap_iv: Option<Vec<u8>>,
    wrap_tag: Option<Vec<u8>>,
}

impl JweParts<'_> {
    /// Try one key; `None` on any failure
    fn decrypt(
        &self,
        key: &SymmetricKey,
        enc: EncryptionAlgorithm,
        alg: KeyManagementAlgorithm,
    ) -> Option<Vec<u8>> {
        let encryptor: Arc<dyn AuthenticatedEncryptor> = if alg == KeyManagementAlgorithm::Direct {
            if !self.encrypted_key.is_empty() {
                return None;
            }
            key.authenticated_encryptor(enc).ok()?
        } else {
            let wrapper = key.key_wrapper(enc, alg).ok()?;
            let params = UnwrapParameters {
                iv: self.wrap_iv.as_deref(),
                tag: self.wrap_tag.as_deref(),
            };
            let cek_size = wrapper.key_unwrap_size(self.encrypted_key.len());
            let mut cek = Zeroizing::new(vec![0u8; cek_size]);
            let len = wrapper
                .try_unwrap_key(&self.encrypted_key, &params, &mut cek)
                .ok()?;
            Arc::from(create_encryptor(&cek[..len], enc).ok()?)
        };

        let mut plaintext = vec![0u8; self.ciphertext.len()];
        let len = encryptor
            .try_decrypt(
                &self.ciphertext,
                self.header_segment,
                &self.iv,
                &self.tag,
                &mut plaintext,
            )
            .ok()?;
        plaintext.truncate(len);
        Some(plaintext)
    }
}

/// Reads compact JWS and JWE tokens
///
/// Keys for decryption come from the registered providers, consulted in
/// registration order.
#[derive(Default)]
pub struct JwtReader {
    providers: Vec<Arc<dyn KeyProvider>>,
}

impl JwtReader {
    /// Reader without key providers; it can read JWS only
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key provider
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn KeyProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Register a fixed list of decryption keys
    #[must_use]
    pub fn with_keys(self, keys: impl IntoIterator<Item = SymmetricKey>) -> Self {
        self.with_provider(Arc::new(StaticKeyProvider::from_keys(keys)))
    }

    /// Read, decrypt and validate a token
    ///
    /// Validation outcomes are returned as [`ValidationError`] values.
    pub fn try_read_token(
        &self,
        token: &str,
        policy: &TokenValidationPolicy,
    ) -> TokenValidationResult {
        self.try_read_token_bytes(token.as_bytes(), policy)
    }

    /// Byte form of [`try_read_token`](Self::try_read_token)
    pub fn try_read_token_bytes(
        &self,
        token: &[u8],
        policy: &TokenValidationPolicy,
    ) -> TokenValidationResult {
        let started = Instant::now();
        let result = self.read(token, policy, 1);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => LoggingTransformer::log_token_outcome("read", token.len(), "valid"),
            Err(e) => LoggingTransformer::log_token_outcome("read", token.len(), &e.to_string()),
        }
        LoggingTransformer::log_performance_metric("read_token", elapsed_ms, result.is_ok());
        result
    }

    /// Read on tokio's blocking pool
    ///
    /// Dropping the returned future before the read starts cancels it.
    /// Without a tokio runtime the future resolves to
    /// [`JwtError::TaskFailed`].
    pub fn read_token_async(
        self: Arc<Self>,
        token: impl Into<String>,
        policy: Arc<TokenValidationPolicy>,
    ) -> ReadTokenFuture {
        let (tx, rx) = oneshot::channel();
        let token = token.into();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    if tx.is_closed() {
                        return;
                    }
                    let result = self
                        .try_read_token(&token, &policy)
                        .map_err(JwtError::from);
                    let _ = tx.send(result);
                });
            }
            Err(_) => {
                let _ = tx.send(Err(JwtError::TaskFailed));
            }
        }
        ReadTokenFuture::new(rx)
    }

    fn read(
        &self,
        token: &[u8],
        policy: &TokenValidationPolicy,
        depth: usize,
    ) -> TokenValidationResult {
        if depth > MAX_NESTING_DEPTH {
            return Err(ValidationError::MalformedToken);
        }
        let segments = split(token, policy.maximum_token_size_in_bytes())?;
        if segments.count == JWS_SEGMENT_COUNT {
            Self::read_jws(&segments, policy)
        } else {
            self.read_jwe(&segments, policy, depth)
        }
    }

    fn read_jws(segments: &Segments<'_>, policy: &TokenValidationPolicy) -> TokenValidationResult {
        let [header_segment, payload_segment, signature_segment, ..] = segments.parts;
        let header =
            JwtHeader::from_segment(header_segment).ok_or(ValidationError::MalformedToken)?;
        let payload: Map<String, Value> = serde_json::from_slice(&decode(payload_segment)?)
            .map_err(|_| ValidationError::MalformedToken)?;

        let mut jwt = Jwt::new(header);
        jwt.payload = Some(payload);
        jwt.signature = decode(signature_segment)?;
        jwt.signing_input = Some(format!("{}.{}", ascii(header_segment)?, ascii(payload_segment)?));

        policy.try_validate(&jwt)?;
        Ok(jwt)
    }

    fn read_jwe(
        &self,
        segments: &Segments<'_>,
        policy: &TokenValidationPolicy,
        depth: usize,
    ) -> TokenValidationResult {
        let [header_segment, key_segment, iv_segment, ciphertext_segment, tag_segment] =
            segments.parts;
        let header =
            JwtHeader::from_segment(header_segment).ok_or(ValidationError::MalformedToken)?;
        let enc = header
            .enc
            .as_deref()
            .ok_or(ValidationError::MissingEncryptionAlgorithm)?;
        let alg = header.alg.as_deref().ok_or(ValidationError::MalformedToken)?;
        let (Ok(enc), Ok(alg)) = (
            enc.parse::<EncryptionAlgorithm>(),
            alg.parse::<KeyManagementAlgorithm>(),
        ) else {
            tracing::debug!(enc, alg, "unsupported algorithm pair");
            return Err(ValidationError::DecryptionFailed);
        };

        let parts = JweParts {
            header_segment,
            encrypted_key: decode(key_segment)?,
            iv: decode(iv_segment)?,
            ciphertext: decode(ciphertext_segment)?,
            tag: decode(tag_segment)?,
            wrap_iv: header.iv.as_deref().map(|v| decode(v.as_bytes())).transpose()?,
            wrap_tag: header.tag.as_deref().map(|v| decode(v.as_bytes())).transpose()?,
        };

        let mut attempts = 0usize;
        let decrypted = self
            .providers
            .iter()
            .flat_map(|provider| provider.get_keys(&header))
            .filter(|key| key.is_suitable_for_encryption() && key.kid() == header.kid.as_deref())
            .find_map(|key| {
                attempts += 1;
                parts.decrypt(&key, enc, alg).map(|plaintext| (key, plaintext))
            });
        let Some((key, mut plaintext)) = decrypted else {
            tracing::trace!(attempts, "no candidate key decrypted the token");
            return Err(ValidationError::DecryptionFailed);
        };
        LoggingTransformer::log_key_event("jwe_decrypted", key.kid());

        if let Some(zip) = header.zip.as_deref() {
            if zip != COMPRESSION_DEFLATE {
                return Err(ValidationError::DecompressionFailed);
            }
            plaintext = compression::inflate(&plaintext, policy.maximum_token_size_in_bytes())?;
        }

        let nested_content = header
            .cty
            .as_deref()
            .is_none_or(|cty| cty.eq_ignore_ascii_case(CONTENT_TYPE_JWT));

        let mut jwt = Jwt::new(header);
        jwt.encryption_key = Some(key);
        if nested_content && split(&plaintext, policy.maximum_token_size_in_bytes()).is_ok() {
            jwt.nested = Some(Box::new(self.read(&plaintext, policy, depth + 1)?));
        } else {
            jwt.payload = serde_json::from_slice(&plaintext).ok();
            jwt.binary = Some(plaintext);
            if jwt.payload.is_some() {
                policy.try_validate(&jwt)?;
            }
        }
        Ok(jwt)
    }
}

impl std::fmt::Debug for JwtReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtReader")
            .field("providers", &self.providers.len())
            .finish()
    }
}
