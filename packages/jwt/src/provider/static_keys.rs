use super::KeyProvider;
use crate::header::JwtHeader;
use jwx_key::{KeySet, SymmetricKey};
use std::sync::Arc;

/// A fixed set of keys
#[derive(Debug, Clone, Default)]
pub struct StaticKeyProvider {
    keys: KeySet,
}

impl StaticKeyProvider {
    /// Serve every key of `keys`
    #[must_use]
    pub fn new(keys: KeySet) -> Self {
        Self { keys }
    }

    /// Serve the given keys in order
    pub fn from_keys(keys: impl IntoIterator<Item = SymmetricKey>) -> Self {
        Self::new(KeySet::new(keys.into_iter().map(Arc::new).collect()))
    }
}

impl KeyProvider for StaticKeyProvider {
    fn get_keys(&self, _header: &JwtHeader) -> Vec<Arc<SymmetricKey>> {
        self.keys.keys().to_vec()
    }
}
