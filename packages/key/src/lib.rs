//! # JWX Key
//!
//! Symmetric JSON Web Keys and the key management algorithms of JWE.
//!
//! - [`SymmetricKey`] / [`KeySet`]: `oct` keys parsed from JWK and JWKS
//!   documents, zeroed on drop
//! - [`wrap`]: AES Key Wrap (RFC 3394), direct agreement and AES-GCM key wrap
//! - [`signer`]: HMAC signatures for JWS
//! - [`store`]: the copy-on-write cache that holds per-key providers
//!
//! ```rust
//! use jwx_key::{KeyManagementAlgorithm, SymmetricKey};
//! use jwx_cipher::EncryptionAlgorithm;
//!
//! # fn main() -> jwx_key::Result<()> {
//! let kek = SymmetricKey::generate(128)?;
//! let wrapper = kek.key_wrapper(
//!     EncryptionAlgorithm::Aes128CbcHmacSha256,
//!     KeyManagementAlgorithm::Aes128Kw,
//! )?;
//! let wrapped = wrapper.wrap_key(None)?;
//! assert_eq!(wrapped.encrypted_key().len(), 40);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod algorithm;
pub mod error;
pub mod jwk;
pub mod signer;
pub mod store;
pub mod wrap;

pub use algorithm::{KeyManagementAlgorithm, KeyManagementFamily};
pub use error::{KeyError, Result};
pub use jwk::{KeySet, SymmetricKey, USE_ENCRYPTION, USE_SIGNATURE};
pub use signer::{HmacSigner, SignatureAlgorithm};
pub use store::CryptographicStore;
pub use wrap::{create_key_wrapper, KeyWrapper, UnwrapParameters, WrappedKey};
