//! Key management algorithm identifiers

use crate::error::KeyError;
use jwx_cipher::EncryptionAlgorithm;
use std::fmt;
use std::str::FromStr;

/// How a key management algorithm obtains the content encryption key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyManagementFamily {
    /// The shared key is the content key
    Direct,
    /// RFC 3394 AES Key Wrap
    AesKw,
    /// Content key sealed with AES-GCM, `iv` and `tag` in the header
    AesGcmKw,
}

/// JWE `alg` values understood by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyManagementAlgorithm {
    /// `dir`
    Direct,
    /// `A128KW`
    Aes128Kw,
    /// `A192KW`
    Aes192Kw,
    /// `A256KW`
    Aes256Kw,
    /// `A128GCMKW`
    Aes128GcmKw,
    /// `A192GCMKW`
    Aes192GcmKw,
    /// `A256GCMKW`
    Aes256GcmKw,
}

impl KeyManagementAlgorithm {
    /// Every supported algorithm
    pub const ALL: [Self; 7] = [
        Self::Direct,
        Self::Aes128Kw,
        Self::Aes192Kw,
        Self::Aes256Kw,
        Self::Aes128GcmKw,
        Self::Aes192GcmKw,
        Self::Aes256GcmKw,
    ];

    /// Stable small integer id, used in composite cache keys
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Direct => 1,
            Self::Aes128Kw => 2,
            Self::Aes192Kw => 3,
            Self::Aes256Kw => 4,
            Self::Aes128GcmKw => 5,
            Self::Aes192GcmKw => 6,
            Self::Aes256GcmKw => 7,
        }
    }

    /// Registered JOSE name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "dir",
            Self::Aes128Kw => "A128KW",
            Self::Aes192Kw => "A192KW",
            Self::Aes256Kw => "A256KW",
            Self::Aes128GcmKw => "A128GCMKW",
            Self::Aes192GcmKw => "A192GCMKW",
            Self::Aes256GcmKw => "A256GCMKW",
        }
    }

    /// Family this algorithm belongs to
    #[must_use]
    pub const fn family(self) -> KeyManagementFamily {
        match self {
            Self::Direct => KeyManagementFamily::Direct,
            Self::Aes128Kw | Self::Aes192Kw | Self::Aes256Kw => KeyManagementFamily::AesKw,
            Self::Aes128GcmKw | Self::Aes192GcmKw | Self::Aes256GcmKw => {
                KeyManagementFamily::AesGcmKw
            }
        }
    }

    /// Required key-encryption key size in bytes
    ///
    /// `None` for `dir`, where the key size follows the content encryption
    /// algorithm instead.
    #[must_use]
    pub const fn key_size(self) -> Option<usize> {
        match self {
            Self::Direct => None,
            Self::Aes128Kw | Self::Aes128GcmKw => Some(16),
            Self::Aes192Kw | Self::Aes192GcmKw => Some(24),
            Self::Aes256Kw | Self::Aes256GcmKw => Some(32),
        }
    }

    /// Composite cache id for a wrapper bound to `enc`
    #[must_use]
    pub const fn composite_id(self, enc: EncryptionAlgorithm) -> u32 {
        ((enc.id() as u32) << 8) | self.id() as u32
    }
}

impl FromStr for KeyManagementAlgorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.name() == s)
            .ok_or_else(|| KeyError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for KeyManagementAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
