//! The parsed token

use crate::constants::claims;
use crate::header::JwtHeader;
use chrono::{DateTime, Utc};
use jwx_key::SymmetricKey;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A parsed (and, for JWE, decrypted) compact token
#[derive(Debug, Clone)]
pub struct Jwt {
    pub(crate) header: JwtHeader,
    pub(crate) payload: Option<Map<String, Value>>,
    pub(crate) nested: Option<Box<Jwt>>,
    pub(crate) binary: Option<Vec<u8>>,
    pub(crate) signing_input: Option<String>,
    pub(crate) signature: Vec<u8>,
    pub(crate) encryption_key: Option<Arc<SymmetricKey>>,
}

impl Jwt {
    pub(crate) fn new(header: JwtHeader) -> Self {
        Self {
            header,
            payload: None,
            nested: None,
            binary: None,
            signing_input: None,
            signature: Vec::new(),
            encryption_key: None,
        }
    }

    /// JOSE header of this token
    #[must_use]
    pub fn header(&self) -> &JwtHeader {
        &self.header
    }

    /// Claims, taken from the nested token when there is one
    #[must_use]
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match &self.nested {
            Some(nested) => nested.payload(),
            None => self.payload.as_ref(),
        }
    }

    /// Token carried as the plaintext of this JWE
    #[must_use]
    pub fn nested(&self) -> Option<&Jwt> {
        self.nested.as_deref()
    }

    /// Decrypted bytes when the plaintext was not a token
    #[must_use]
    pub fn binary(&self) -> Option<&[u8]> {
        self.binary.as_deref()
    }

    /// Decrypted plaintext as UTF-8, when it is
    #[must_use]
    pub fn plaintext(&self) -> Option<&str> {
        self.binary().and_then(|b| std::str::from_utf8(b).ok())
    }

    /// `header.payload` of a JWS, the input its signature covers
    #[must_use]
    pub fn signing_input(&self) -> Option<&str> {
        self.signing_input.as_deref()
    }

    /// Raw JWS signature; empty for JWE and unsecured JWS
    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Key that decrypted this JWE
    #[must_use]
    pub fn encryption_key(&self) -> Option<&Arc<SymmetricKey>> {
        self.encryption_key.as_ref()
    }

    /// Whether this token is a JWE
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.header.is_encrypted()
    }

    /// Any claim by name
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.payload()?.get(name)
    }

    fn string_claim(&self, name: &str) -> Option<&str> {
        self.claim(name)?.as_str()
    }

    fn time_claim(&self, name: &str) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claim(name)?.as_i64()?, 0)
    }

    /// `aud`, which may be a single string or an array
    #[must_use]
    pub fn audiences(&self) -> Vec<&str> {
        match self.claim(claims::AUD) {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// `iss`
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.string_claim(claims::ISS)
    }

    /// `sub`
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.string_claim(claims::SUB)
    }

    /// `jti`
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.string_claim(claims::JTI)
    }

    /// `exp`
    #[must_use]
    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.time_claim(claims::EXP)
    }

    /// `nbf`
    #[must_use]
    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.time_claim(claims::NBF)
    }

    /// `iat`
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.time_claim(claims::IAT)
    }
}
