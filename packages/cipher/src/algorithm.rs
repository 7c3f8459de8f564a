//! Content encryption algorithm identifiers (RFC 7518 §5.1)

use crate::error::CipherError;
use std::fmt;
use std::str::FromStr;

/// Algorithm family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionFamily {
    /// AES-CBC with an HMAC-SHA-2 tag
    CbcHmac,
    /// AES in Galois/Counter Mode
    Gcm,
}

/// `enc` header values this engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionAlgorithm {
    /// `A128CBC-HS256`
    Aes128CbcHmacSha256,
    /// `A192CBC-HS384`
    Aes192CbcHmacSha384,
    /// `A256CBC-HS512`
    Aes256CbcHmacSha512,
    /// `A128GCM`
    Aes128Gcm,
    /// `A192GCM`
    Aes192Gcm,
    /// `A256GCM`
    Aes256Gcm,
}

impl EncryptionAlgorithm {
    /// Every supported algorithm
    pub const ALL: [Self; 6] = [
        Self::Aes128CbcHmacSha256,
        Self::Aes192CbcHmacSha384,
        Self::Aes256CbcHmacSha512,
        Self::Aes128Gcm,
        Self::Aes192Gcm,
        Self::Aes256Gcm,
    ];

    /// Stable small identifier, used to build cache keys
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Aes128CbcHmacSha256 => 1,
            Self::Aes192CbcHmacSha384 => 2,
            Self::Aes256CbcHmacSha512 => 3,
            Self::Aes128Gcm => 4,
            Self::Aes192Gcm => 5,
            Self::Aes256Gcm => 6,
        }
    }

    /// Registered JOSE name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Aes128CbcHmacSha256 => "A128CBC-HS256",
            Self::Aes192CbcHmacSha384 => "A192CBC-HS384",
            Self::Aes256CbcHmacSha512 => "A256CBC-HS512",
            Self::Aes128Gcm => "A128GCM",
            Self::Aes192Gcm => "A192GCM",
            Self::Aes256Gcm => "A256GCM",
        }
    }

    /// Content encryption key size in bytes
    ///
    /// CBC-HMAC keys carry both the MAC and the AES key, so they are twice
    /// the AES key size.
    #[must_use]
    pub const fn key_size(self) -> usize {
        match self {
            Self::Aes128CbcHmacSha256 => 32,
            Self::Aes192CbcHmacSha384 => 48,
            Self::Aes256CbcHmacSha512 => 64,
            Self::Aes128Gcm => 16,
            Self::Aes192Gcm => 24,
            Self::Aes256Gcm => 32,
        }
    }

    /// Algorithm family
    #[must_use]
    pub const fn family(self) -> EncryptionFamily {
        match self {
            Self::Aes128CbcHmacSha256 | Self::Aes192CbcHmacSha384 | Self::Aes256CbcHmacSha512 => {
                EncryptionFamily::CbcHmac
            }
            Self::Aes128Gcm | Self::Aes192Gcm | Self::Aes256Gcm => EncryptionFamily::Gcm,
        }
    }
}

impl FromStr for EncryptionAlgorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| CipherError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
