//! HMAC signatures for JWS (`HS256`, `HS384`, `HS512`)

use crate::error::{KeyError, Result};
use jwx_hashing::{HmacSha256, HmacSha384, HmacSha512};
use std::fmt;
use std::str::FromStr;

/// JWS `alg` values understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// `none`: unsecured JWS with an empty signature
    None,
    /// `HS256`
    Hs256,
    /// `HS384`
    Hs384,
    /// `HS512`
    Hs512,
}

impl SignatureAlgorithm {
    /// Every supported algorithm
    pub const ALL: [Self; 4] = [Self::None, Self::Hs256, Self::Hs384, Self::Hs512];

    /// Stable small integer id, used as the signer cache key
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Hs256 => 1,
            Self::Hs384 => 2,
            Self::Hs512 => 3,
        }
    }

    /// Registered JOSE name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }

    /// Signature length in bytes
    #[must_use]
    pub const fn signature_size(self) -> usize {
        match self {
            Self::None => 0,
            Self::Hs256 => 32,
            Self::Hs384 => 48,
            Self::Hs512 => 64,
        }
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| KeyError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

enum SignerMac {
    Sha256(HmacSha256),
    Sha384(HmacSha384),
    Sha512(HmacSha512),
}

/// A keyed HMAC signer
pub struct HmacSigner {
    algorithm: SignatureAlgorithm,
    mac: SignerMac,
}

impl HmacSigner {
    /// Key a signer
    ///
    /// Keys shorter than the hash output are rejected (RFC 7518 §3.2).
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::KeyTooShort`] for short keys and
    /// [`KeyError::UnsupportedAlgorithm`] for `none`.
    pub fn new(key: &[u8], algorithm: SignatureAlgorithm) -> Result<Self> {
        let minimum = algorithm.signature_size();
        if key.len() < minimum {
            return Err(KeyError::KeyTooShort {
                minimum,
                actual: key.len(),
            });
        }
        let mac = match algorithm {
            SignatureAlgorithm::Hs256 => SignerMac::Sha256(HmacSha256::new(key)),
            SignatureAlgorithm::Hs384 => SignerMac::Sha384(HmacSha384::new(key)),
            SignatureAlgorithm::Hs512 => SignerMac::Sha512(HmacSha512::new(key)),
            SignatureAlgorithm::None => {
                return Err(KeyError::UnsupportedAlgorithm(algorithm.name().to_string()))
            }
        };
        Ok(Self { algorithm, mac })
    }

    /// Algorithm implemented
    #[must_use]
    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Sign `input` (the ASCII `header.payload` of a JWS)
    #[must_use]
    pub fn sign(&self, input: &[u8]) -> Vec<u8> {
        match &self.mac {
            SignerMac::Sha256(mac) => mac.compute_vec(input),
            SignerMac::Sha384(mac) => mac.compute_vec(input),
            SignerMac::Sha512(mac) => mac.compute_vec(input),
        }
    }

    /// Constant-time check of `signature` over `input`
    #[must_use]
    pub fn verify(&self, input: &[u8], signature: &[u8]) -> bool {
        if signature.len() != self.algorithm.signature_size() {
            return false;
        }
        match &self.mac {
            SignerMac::Sha256(mac) => mac.verify(input, signature),
            SignerMac::Sha384(mac) => mac.verify(input, signature),
            SignerMac::Sha512(mac) => mac.verify(input, signature),
        }
    }
}

impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
