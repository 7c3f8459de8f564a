//! # JWX Cipher
//!
//! AES block cipher core with portable and AES-NI backends, CBC mode, and
//! the authenticated encryption algorithms used for JWE content
//! encryption.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

pub mod aead;
pub mod aes;
pub mod algorithm;
pub mod cbc;
pub mod error;

pub use crate::aead::{create_encryptor, AuthenticatedEncryptor, CbcHmacEncryptor, GcmEncryptor};
pub use crate::aes::{Aes, AesKeySize, Backend, Block, BlockCipher, BLOCK_SIZE};
pub use crate::algorithm::{EncryptionAlgorithm, EncryptionFamily};
pub use crate::error::{CipherError, Result};
