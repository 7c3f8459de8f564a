//! Token writer: compact JWS and JWE

use crate::base64url;
use crate::compression;
use crate::constants::{claims, COMPRESSION_DEFLATE, CONTENT_TYPE_JWT};
use crate::error::{JwtError, Result};
use chrono::{DateTime, Utc};
use jwx_cipher::{create_encryptor, AuthenticatedEncryptor, EncryptionAlgorithm};
use jwx_key::{KeyManagementAlgorithm, SignatureAlgorithm, SymmetricKey};
use rand::RngCore;
use serde_json::{Map, Value};
use std::sync::Arc;

fn encode_json(value: &Map<String, Value>) -> Result<String> {
    Ok(base64url::encode(&serde_json::to_vec(value)?))
}

/// Describes a JWS to be signed
#[derive(Debug, Clone)]
pub struct JwsDescriptor {
    alg: SignatureAlgorithm,
    key: Option<Arc<SymmetricKey>>,
    header: Map<String, Value>,
    payload: Map<String, Value>,
}

impl JwsDescriptor {
    /// Empty payload signed with `alg`
    #[must_use]
    pub fn new(alg: SignatureAlgorithm) -> Self {
        Self {
            alg,
            key: None,
            header: Map::new(),
            payload: Map::new(),
        }
    }

    /// Signing key; its `kid` is copied to the header
    #[must_use]
    pub fn with_key(mut self, key: Arc<SymmetricKey>) -> Self {
        self.key = Some(key);
        self
    }

    /// Add a header member
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.header.insert(name.into(), value.into());
        self
    }

    /// Add a claim
    #[must_use]
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(name.into(), value.into());
        self
    }

    /// Replace the whole claim set
    #[must_use]
    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = payload;
        self
    }

    /// `iss`
    #[must_use]
    pub fn with_issuer(self, issuer: impl Into<String>) -> Self {
        self.with_claim(claims::ISS, issuer.into())
    }

    /// `aud`
    #[must_use]
    pub fn with_audience(self, audience: impl Into<String>) -> Self {
        self.with_claim(claims::AUD, audience.into())
    }

    /// `exp`
    #[must_use]
    pub fn with_expiration_time(self, at: DateTime<Utc>) -> Self {
        self.with_claim(claims::EXP, at.timestamp())
    }

    /// `nbf`
    #[must_use]
    pub fn with_not_before(self, at: DateTime<Utc>) -> Self {
        self.with_claim(claims::NBF, at.timestamp())
    }

    /// `iat`
    #[must_use]
    pub fn with_issued_at(self, at: DateTime<Utc>) -> Self {
        self.with_claim(claims::IAT, at.timestamp())
    }

    /// Claims to be signed
    #[must_use]
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    /// Serialize and sign
    ///
    /// # Errors
    ///
    /// Fails when an HMAC algorithm has no key or the key is too short.
    pub fn encode(&self) -> Result<String> {
        let mut header = self.header.clone();
        header.insert("alg".into(), self.alg.name().into());
        if let Some(kid) = self.key.as_ref().and_then(|key| key.kid()) {
            header.insert("kid".into(), kid.into());
        }

        let mut token = format!("{}.{}", encode_json(&header)?, encode_json(&self.payload)?);
        let signature = match self.alg {
            SignatureAlgorithm::None => Vec::new(),
            alg => {
                let key = self
                    .key
                    .as_ref()
                    .ok_or_else(|| JwtError::MissingKey(format!("{alg} requires a signing key")))?;
                key.signer(alg)?.sign(token.as_bytes())
            }
        };
        token.push('.');
        token.push_str(&base64url::encode(&signature));
        Ok(token)
    }
}

/// Key, algorithms and header options shared by the JWE descriptors
#[derive(Debug, Clone)]
struct EncryptionSettings {
    key: Arc<SymmetricKey>,
    alg: KeyManagementAlgorithm,
    enc: EncryptionAlgorithm,
    compress: bool,
    cty: Option<String>,
    header: Map<String, Value>,
}

impl EncryptionSettings {
    fn new(key: Arc<SymmetricKey>, alg: KeyManagementAlgorithm, enc: EncryptionAlgorithm) -> Self {
        Self {
            key,
            alg,
            enc,
            compress: false,
            cty: None,
            header: Map::new(),
        }
    }

    fn seal(&self, plaintext: &[u8], default_cty: Option<&str>) -> Result<String> {
        let wrapped = self.key.key_wrapper(self.enc, self.alg)?.wrap_key(None)?;

        let mut header = self.header.clone();
        header.insert("alg".into(), self.alg.name().into());
        header.insert("enc".into(), self.enc.name().into());
        if let Some(kid) = self.key.kid() {
            header.insert("kid".into(), kid.into());
        }
        if let Some(cty) = self.cty.as_deref().or(default_cty) {
            header.insert("cty".into(), cty.into());
        }
        if self.compress {
            header.insert("zip".into(), COMPRESSION_DEFLATE.into());
        }
        if let Some(iv) = wrapped.iv() {
            header.insert("iv".into(), base64url::encode(iv).into());
        }
        if let Some(tag) = wrapped.tag() {
            header.insert("tag".into(), base64url::encode(tag).into());
        }
        let header_segment = encode_json(&header)?;

        let encryptor: Arc<dyn AuthenticatedEncryptor> =
            if self.alg == KeyManagementAlgorithm::Direct {
                self.key.authenticated_encryptor(self.enc)?
            } else {
                Arc::from(create_encryptor(wrapped.cek(), self.enc)?)
            };

        let compressed;
        let plaintext = if self.compress {
            compressed = compression::deflate(plaintext)?;
            compressed.as_slice()
        } else {
            plaintext
        };

        let mut iv = vec![0u8; encryptor.nonce_size()];
        rand::rng().fill_bytes(&mut iv);
        let mut ciphertext = vec![0u8; encryptor.ciphertext_size(plaintext.len())];
        let mut tag = vec![0u8; encryptor.tag_size()];
        let len = encryptor.encrypt(
            plaintext,
            &iv,
            header_segment.as_bytes(),
            &mut ciphertext,
            &mut tag,
        )?;
        ciphertext.truncate(len);

        Ok(format!(
            "{header_segment}.{}.{}.{}.{}",
            base64url::encode(wrapped.encrypted_key()),
            base64url::encode(&iv),
            base64url::encode(&ciphertext),
            base64url::encode(&tag),
        ))
    }
}

/// Plaintext of a [`JweDescriptor`]
#[derive(Debug, Clone)]
pub enum JwePayload {
    /// A JWS, signed first and then encrypted (`cty: JWT`)
    Token(JwsDescriptor),
    /// A bare claim set
    Claims(Map<String, Value>),
}

/// Describes a JWE carrying a token or a claim set
#[derive(Debug, Clone)]
pub struct JweDescriptor {
    payload: JwePayload,
    settings: EncryptionSettings,
}

impl JweDescriptor {
    /// Encrypt `payload` for `key` using `alg` and `enc`
    #[must_use]
    pub fn new(
        payload: JwePayload,
        key: Arc<SymmetricKey>,
        alg: KeyManagementAlgorithm,
        enc: EncryptionAlgorithm,
    ) -> Self {
        Self {
            payload,
            settings: EncryptionSettings::new(key, alg, enc),
        }
    }

    /// DEFLATE the plaintext before encryption
    #[must_use]
    pub fn with_compression(mut self) -> Self {
        self.settings.compress = true;
        self
    }

    /// Override `cty`
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.settings.cty = Some(cty.into());
        self
    }

    /// Add a header member
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.header.insert(name.into(), value.into());
        self
    }

    /// Sign (for a nested JWS), serialize and encrypt
    ///
    /// # Errors
    ///
    /// Fails when the key cannot serve the algorithms or signing fails.
    pub fn encode(&self) -> Result<String> {
        match &self.payload {
            JwePayload::Token(jws) => {
                let token = jws.encode()?;
                self.settings.seal(token.as_bytes(), Some(CONTENT_TYPE_JWT))
            }
            JwePayload::Claims(claims) => {
                let json = serde_json::to_vec(claims)?;
                self.settings.seal(&json, None)
            }
        }
    }
}

/// Describes a JWE carrying arbitrary bytes
#[derive(Debug, Clone)]
pub struct BinaryJweDescriptor {
    payload: Vec<u8>,
    settings: EncryptionSettings,
}

impl BinaryJweDescriptor {
    /// Encrypt `payload` for `key` using `alg` and `enc`
    #[must_use]
    pub fn new(
        payload: impl Into<Vec<u8>>,
        key: Arc<SymmetricKey>,
        alg: KeyManagementAlgorithm,
        enc: EncryptionAlgorithm,
    ) -> Self {
        Self {
            payload: payload.into(),
            settings: EncryptionSettings::new(key, alg, enc),
        }
    }

    /// DEFLATE the plaintext before encryption
    #[must_use]
    pub fn with_compression(mut self) -> Self {
        self.settings.compress = true;
        self
    }

    /// Set `cty`
    #[must_use]
    pub fn with_content_type(mut self, cty: impl Into<String>) -> Self {
        self.settings.cty = Some(cty.into());
        self
    }

    /// Encrypt the payload
    ///
    /// # Errors
    ///
    /// Fails when the key cannot serve the algorithms.
    pub fn encode(&self) -> Result<String> {
        self.settings.seal(&self.payload, None)
    }
}
