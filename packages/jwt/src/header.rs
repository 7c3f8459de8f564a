//! JOSE header

use crate::base64url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Parsed JOSE header
///
/// Registered members used by the engine get their own fields; everything
/// else is kept in [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Signature or key management algorithm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Content encryption algorithm (JWE only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enc: Option<String>,
    /// Key id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// Media type of the whole token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Media type of the payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cty: Option<String>,
    /// Payload compression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// AES-GCM key wrap IV, base64url
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    /// AES-GCM key wrap tag, base64url
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Unregistered members
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JwtHeader {
    /// Decode a header segment; `None` unless it is a base64url JSON object
    #[must_use]
    pub fn from_segment(segment: &[u8]) -> Option<Self> {
        let json = base64url::decode(segment)?;
        let object: Map<String, Value> = serde_json::from_slice(&json).ok()?;
        serde_json::from_value(Value::Object(object)).ok()
    }

    /// Look up any member by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        let registered = match name {
            "alg" => &self.alg,
            "enc" => &self.enc,
            "kid" => &self.kid,
            "typ" => &self.typ,
            "cty" => &self.cty,
            "zip" => &self.zip,
            "iv" => &self.iv,
            "tag" => &self.tag,
            _ => return self.extra.get(name).cloned(),
        };
        registered.clone().map(Value::String)
    }

    /// Whether the header describes a JWE
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.enc.is_some()
    }
}
