//! Symmetric JSON Web Keys and key sets

use crate::algorithm::KeyManagementAlgorithm;
use crate::error::{KeyError, Result};
use crate::signer::{HmacSigner, SignatureAlgorithm};
use crate::store::CryptographicStore;
use crate::wrap::{create_key_wrapper, KeyWrapper};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jwx_cipher::{create_encryptor, AuthenticatedEncryptor, EncryptionAlgorithm};
use jwx_common::LoggingTransformer;
use rand::RngCore;
use serde::Deserialize;
use std::sync::Arc;
use zeroize::Zeroizing;

/// `use` value that marks a key for encryption
pub const USE_ENCRYPTION: &str = "enc";

/// `use` value that marks a key for signatures
pub const USE_SIGNATURE: &str = "sig";

#[derive(Deserialize)]
struct JwkDocument {
    kty: String,
    k: Option<String>,
    kid: Option<String>,
    #[serde(rename = "use")]
    key_use: Option<String>,
    alg: Option<String>,
}

#[derive(Deserialize)]
struct JwksDocument {
    keys: Vec<serde_json::Value>,
}

/// An `oct` JWK
///
/// The secret is zeroed on drop. Providers derived from the key are created
/// on first use and cached for the lifetime of the key.
pub struct SymmetricKey {
    k: Zeroizing<Vec<u8>>,
    kid: Option<String>,
    key_use: Option<String>,
    alg: Option<String>,
    encryptors: CryptographicStore<dyn AuthenticatedEncryptor>,
    wrappers: CryptographicStore<dyn KeyWrapper>,
    signers: CryptographicStore<HmacSigner>,
}

impl SymmetricKey {
    /// Wrap raw key bytes
    #[must_use]
    pub fn new(k: &[u8]) -> Self {
        Self {
            k: Zeroizing::new(k.to_vec()),
            kid: None,
            key_use: None,
            alg: None,
            encryptors: CryptographicStore::new(),
            wrappers: CryptographicStore::new(),
            signers: CryptographicStore::new(),
        }
    }

    /// Decode a base64url (unpadded) secret
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeyFormat`] when `k` is not base64url.
    pub fn from_base64url(k: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            URL_SAFE_NO_PAD
                .decode(k)
                .map_err(|e| KeyError::InvalidKeyFormat(e.to_string()))?,
        );
        Ok(Self::new(&bytes))
    }

    /// Fresh random key of `size_in_bits`
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidKeyFormat`] unless the size is a positive
    /// multiple of 8.
    pub fn generate(size_in_bits: usize) -> Result<Self> {
        if size_in_bits == 0 || size_in_bits % 8 != 0 {
            return Err(KeyError::InvalidKeyFormat(format!(
                "key size must be a positive multiple of 8 bits, got {size_in_bits}"
            )));
        }
        let mut bytes = Zeroizing::new(vec![0u8; size_in_bits / 8]);
        rand::rng().fill_bytes(&mut bytes);
        Ok(Self::new(&bytes))
    }

    /// Parse one JWK object
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, a `kty` other than `oct`, or a missing or
    /// undecodable `k`.
    pub fn from_jwk_json(json: &str) -> Result<Self> {
        let doc: JwkDocument = serde_json::from_str(json)?;
        Self::from_document(doc)
    }

    fn from_document(doc: JwkDocument) -> Result<Self> {
        if doc.kty != "oct" {
            return Err(KeyError::UnsupportedKeyType(doc.kty));
        }
        let k = doc
            .k
            .ok_or_else(|| KeyError::InvalidKeyFormat("missing 'k'".to_string()))?;
        let mut key = Self::from_base64url(&k)?;
        key.kid = doc.kid;
        key.key_use = doc.key_use;
        key.alg = doc.alg;
        Ok(key)
    }

    /// Set the key id
    #[must_use]
    pub fn with_kid(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Set the intended use (`enc` or `sig`)
    #[must_use]
    pub fn with_use(mut self, key_use: impl Into<String>) -> Self {
        self.key_use = Some(key_use.into());
        self
    }

    /// Set the intended algorithm
    #[must_use]
    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// Key id
    #[must_use]
    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Intended use
    #[must_use]
    pub fn key_use(&self) -> Option<&str> {
        self.key_use.as_deref()
    }

    /// Intended algorithm
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    /// The raw secret
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.k
    }

    /// Key size in bits
    #[must_use]
    pub fn key_size_in_bits(&self) -> usize {
        self.k.len() * 8
    }

    /// Whether the key may decrypt: `use` absent, empty, or `enc`
    #[must_use]
    pub fn is_suitable_for_encryption(&self) -> bool {
        matches!(self.key_use.as_deref(), None | Some("" | USE_ENCRYPTION))
    }

    /// Whether the key may verify signatures: `use` absent, empty, or `sig`
    #[must_use]
    pub fn is_suitable_for_signature(&self) -> bool {
        matches!(self.key_use.as_deref(), None | Some("" | USE_SIGNATURE))
    }

    /// Cached content encryptor for `enc`
    ///
    /// # Errors
    ///
    /// Fails when the key length does not match `enc`.
    pub fn authenticated_encryptor(
        &self,
        enc: EncryptionAlgorithm,
    ) -> Result<Arc<dyn AuthenticatedEncryptor>> {
        self.encryptors.get_or_insert_with::<KeyError, _>(u32::from(enc.id()), || {
            let encryptor = create_encryptor(&self.k, enc)?;
            LoggingTransformer::log_key_event("encryptor_created", self.kid());
            Ok(Arc::from(encryptor))
        })
    }

    /// Cached key wrapper for the `(enc, alg)` pair
    ///
    /// # Errors
    ///
    /// Fails when the key cannot serve `alg` with `enc`.
    pub fn key_wrapper(
        &self,
        enc: EncryptionAlgorithm,
        alg: KeyManagementAlgorithm,
    ) -> Result<Arc<dyn KeyWrapper>> {
        self.wrappers.get_or_insert_with::<KeyError, _>(alg.composite_id(enc), || {
            let wrapper = create_key_wrapper(&self.k, enc, alg)?;
            LoggingTransformer::log_key_event("key_wrapper_created", self.kid());
            Ok(Arc::from(wrapper))
        })
    }

    /// Cached HMAC signer for `alg`
    ///
    /// # Errors
    ///
    /// Fails for `none` or keys shorter than the hash output.
    pub fn signer(&self, alg: SignatureAlgorithm) -> Result<Arc<HmacSigner>> {
        self.signers
            .get_or_insert_with(u32::from(alg.id()), || HmacSigner::new(&self.k, alg).map(Arc::new))
    }

    /// Number of providers currently cached for this key
    #[must_use]
    pub fn cached_provider_count(&self) -> usize {
        self.encryptors.count() + self.wrappers.count() + self.signers.count()
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("k", &"[REDACTED]")
            .field("bits", &self.key_size_in_bits())
            .field("kid", &self.kid)
            .field("use", &self.key_use)
            .field("alg", &self.alg)
            .finish()
    }
}

/// A JWK set restricted to symmetric keys
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: Vec<Arc<SymmetricKey>>,
}

impl KeySet {
    /// Build from already parsed keys
    #[must_use]
    pub fn new(keys: Vec<Arc<SymmetricKey>>) -> Self {
        Self { keys }
    }

    /// Parse a JWKS document (`{"keys": [...]}`)
    ///
    /// Keys whose `kty` is not `oct` are skipped.
    ///
    /// # Errors
    ///
    /// Fails when the document is not a JWKS or an `oct` key is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: JwksDocument = serde_json::from_str(json)?;
        let mut keys = Vec::with_capacity(doc.keys.len());
        for value in doc.keys {
            let jwk: JwkDocument = serde_json::from_value(value)?;
            if jwk.kty != "oct" {
                tracing::debug!(kty = %jwk.kty, "skipping non-symmetric key");
                continue;
            }
            keys.push(Arc::new(SymmetricKey::from_document(jwk)?));
        }
        Ok(Self { keys })
    }

    /// All keys, in document order
    #[must_use]
    pub fn keys(&self) -> &[Arc<SymmetricKey>] {
        &self.keys
    }

    /// Number of keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set has no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// First key with the given `kid`
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&Arc<SymmetricKey>> {
        self.keys.iter().find(|key| key.kid() == Some(kid))
    }
}
