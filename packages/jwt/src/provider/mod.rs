//! Key providers
//!
//! The reader asks every registered [`KeyProvider`] for candidate keys and
//! tries them in provider order, then in the order each provider returned
//! them.

mod jwks;
mod static_keys;

pub use jwks::{DocumentRetriever, JwksKeyProvider};
pub use static_keys::StaticKeyProvider;

use crate::header::JwtHeader;
use jwx_key::SymmetricKey;
use std::sync::Arc;

/// Source of keys for a token header
pub trait KeyProvider: Send + Sync {
    /// Keys that may apply to a token with `header`
    ///
    /// Filtering on `kid` and `use` is done by the caller.
    fn get_keys(&self, header: &JwtHeader) -> Vec<Arc<SymmetricKey>>;
}

impl<T: KeyProvider + ?Sized> KeyProvider for Arc<T> {
    fn get_keys(&self, header: &JwtHeader) -> Vec<Arc<SymmetricKey>> {
        (**self).get_keys(header)
    }
}
