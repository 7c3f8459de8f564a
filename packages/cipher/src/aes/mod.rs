//! AES block cipher core
//!
//! Two interchangeable implementations sit behind [`BlockCipher`]: a
//! portable byte-oriented one and an AES-NI one for x86_64. The backend is
//! probed once per process and every cipher built through [`Aes::new`] uses
//! it. Both must produce identical output for identical input.

mod soft;
mod tables;

#[cfg(target_arch = "x86_64")]
mod ni;

use crate::error::{CipherError, Result};
use once_cell::sync::Lazy;

/// AES block size in bytes
pub const BLOCK_SIZE: usize = 16;

/// One AES block
pub type Block = [u8; BLOCK_SIZE];

/// Supported AES key sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AesKeySize {
    /// 128-bit key, 10 rounds
    Aes128,
    /// 192-bit key, 12 rounds
    Aes192,
    /// 256-bit key, 14 rounds
    Aes256,
}

impl AesKeySize {
    /// Key size for a raw key length
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for anything but 16, 24 or 32 bytes.
    pub fn from_key_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            actual => Err(CipherError::InvalidKeyLength {
                expected: 32,
                actual,
            }),
        }
    }

    /// Key length in bytes
    #[inline]
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }

    /// Number of cipher rounds
    #[inline]
    #[must_use]
    pub const fn rounds(self) -> usize {
        match self {
            Self::Aes128 => 10,
            Self::Aes192 => 12,
            Self::Aes256 => 14,
        }
    }

    /// Number of round keys the schedule expands to (11, 13 or 15)
    #[inline]
    #[must_use]
    pub const fn round_keys(self) -> usize {
        self.rounds() + 1
    }
}

/// Implementation strategy for the block cipher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Table-driven software implementation, available everywhere
    Portable,
    /// AES-NI instructions
    AesNi,
}

static DETECTED: Lazy<Backend> = Lazy::new(|| {
    let backend = if Backend::AesNi.is_available() {
        Backend::AesNi
    } else {
        Backend::Portable
    };
    tracing::debug!(?backend, "AES backend selected");
    backend
});

impl Backend {
    /// The backend chosen for this process
    #[must_use]
    pub fn detected() -> Self {
        *DETECTED
    }

    /// Whether this backend can run on the current CPU
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            Self::Portable => true,
            #[cfg(target_arch = "x86_64")]
            Self::AesNi => ni::is_supported(),
            #[cfg(not(target_arch = "x86_64"))]
            Self::AesNi => false,
        }
    }
}

/// A keyed AES instance
///
/// Round keys are zeroed when the instance is dropped.
pub trait BlockCipher: Send + Sync {
    /// Key size this instance was built with
    fn key_size(&self) -> AesKeySize;

    /// Backend executing this instance
    fn backend(&self) -> Backend;

    /// Encrypt one block in place
    fn encrypt_block(&self, block: &mut Block);

    /// Decrypt one block in place
    fn decrypt_block(&self, block: &mut Block);

    /// Encrypt every whole block of `data` independently
    ///
    /// Trailing bytes that do not fill a block are left untouched.
    fn encrypt_blocks(&self, data: &mut [u8]) {
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            if let Ok(block) = <&mut Block>::try_from(chunk) {
                self.encrypt_block(block);
            }
        }
    }

    /// Decrypt every whole block of `data` independently
    ///
    /// Trailing bytes that do not fill a block are left untouched.
    fn decrypt_blocks(&self, data: &mut [u8]) {
        for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
            if let Ok(block) = <&mut Block>::try_from(chunk) {
                self.decrypt_block(block);
            }
        }
    }
}

/// Factory for keyed AES instances
pub struct Aes;

impl Aes {
    /// Build an AES instance on the detected backend
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] unless the key is 16, 24 or 32 bytes.
    pub fn new(key: &[u8]) -> Result<Box<dyn BlockCipher>> {
        Self::with_backend(Backend::detected(), key)
    }

    /// Build an AES instance on an explicit backend
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for bad keys and
    /// [`CipherError::UnsupportedAlgorithm`] when the backend is not
    /// available on this CPU.
    pub fn with_backend(backend: Backend, key: &[u8]) -> Result<Box<dyn BlockCipher>> {
        let size = AesKeySize::from_key_len(key.len())?;
        match backend {
            Backend::Portable => Ok(Box::new(soft::SoftAes::new(size, key))),
            #[cfg(target_arch = "x86_64")]
            Backend::AesNi => ni::NiAes::new(size, key)
                .map(|cipher| Box::new(cipher) as Box<dyn BlockCipher>)
                .ok_or_else(|| CipherError::UnsupportedAlgorithm("AES-NI".to_string())),
            #[cfg(not(target_arch = "x86_64"))]
            Backend::AesNi => Err(CipherError::UnsupportedAlgorithm("AES-NI".to_string())),
        }
    }
}
