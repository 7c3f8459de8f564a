//! Key set fetched from a JWKS document and refreshed periodically

use super::KeyProvider;
use crate::clock::{Clock, SystemClock};
use crate::config::JwtConfig;
use crate::error::{JwtError, Result};
use crate::header::JwtHeader;
use arc_swap::ArcSwapOption;
use chrono::Duration;
use jwx_common::LoggingTransformer;
use jwx_key::{KeySet, SymmetricKey};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, TryLockError};

/// Fetches a JWKS document
pub trait DocumentRetriever: Send + Sync {
    /// Return the document at `address`
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Retrieval`] when the document cannot be fetched.
    fn get_document(&self, address: &str) -> Result<String>;
}

/// Keys loaded from a JWKS endpoint
///
/// The set is refreshed once [`automatic_refresh_interval`] has elapsed.
/// After a failed fetch the next attempt waits for the shorter of the two
/// configured intervals. While one caller refreshes, others keep receiving
/// the previous (stale) set; callers block only when no set was ever loaded.
///
/// [`automatic_refresh_interval`]: JwtConfig::automatic_refresh_interval
pub struct JwksKeyProvider {
    address: String,
    retriever: Box<dyn DocumentRetriever>,
    clock: Arc<dyn Clock>,
    refresh_interval: Duration,
    automatic_refresh_interval: Duration,
    keys: ArcSwapOption<KeySet>,
    sync_after: AtomicI64,
    refresh_lock: Mutex<()>,
}

impl JwksKeyProvider {
    /// Provider with the default refresh intervals
    pub fn new(address: impl Into<String>, retriever: impl DocumentRetriever + 'static) -> Self {
        Self {
            address: address.into(),
            retriever: Box::new(retriever),
            clock: Arc::new(SystemClock),
            refresh_interval: JwtConfig::default().refresh_interval(),
            automatic_refresh_interval: JwtConfig::default().automatic_refresh_interval(),
            keys: ArcSwapOption::empty(),
            sync_after: AtomicI64::new(i64::MIN),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Take the refresh intervals from `config`
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::InvalidConfig`] when an interval is below its
    /// minimum.
    pub fn with_config(mut self, config: &JwtConfig) -> Result<Self> {
        config.validate()?;
        self.refresh_interval = config.refresh_interval();
        self.automatic_refresh_interval = config.automatic_refresh_interval();
        Ok(self)
    }

    /// Use `clock` instead of the system clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// JWKS address
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Current key set, refreshing it when due
    ///
    /// # Errors
    ///
    /// Fails only when no key set has ever been loaded. A failed refresh
    /// with an older set available returns that set.
    pub fn try_get_keys(&self) -> Result<Arc<KeySet>> {
        let now = self.clock.now().timestamp_millis();
        let current = self.keys.load_full();
        if let Some(keys) = &current {
            if self.sync_after.load(Ordering::Acquire) > now {
                return Ok(Arc::clone(keys));
            }
        }

        let _guard = match (&current, self.refresh_lock.try_lock()) {
            (_, Ok(guard)) => guard,
            (Some(stale), Err(TryLockError::WouldBlock)) => return Ok(Arc::clone(stale)),
            (None, Err(TryLockError::WouldBlock)) => self
                .refresh_lock
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
            (_, Err(TryLockError::Poisoned(poisoned))) => poisoned.into_inner(),
        };

        if self.sync_after.load(Ordering::Acquire) <= now {
            self.refresh(now);
        }

        self.keys.load_full().ok_or_else(|| {
            JwtError::Retrieval(format!("unable to obtain keys from '{}'", self.address))
        })
    }

    fn refresh(&self, now: i64) {
        let fetched = self
            .retriever
            .get_document(&self.address)
            .and_then(|document| KeySet::from_json(&document).map_err(JwtError::from));

        match fetched {
            Ok(set) => {
                tracing::debug!(address = %self.address, keys = set.len(), "key set refreshed");
                self.keys.store(Some(Arc::new(set)));
                self.sync_after.store(
                    now.saturating_add(self.automatic_refresh_interval.num_milliseconds()),
                    Ordering::Release,
                );
            }
            Err(e) => {
                LoggingTransformer::log_crypto_error("jwks_refresh", &e);
                let retry = self.automatic_refresh_interval.min(self.refresh_interval);
                self.sync_after
                    .store(now.saturating_add(retry.num_milliseconds()), Ordering::Release);
            }
        }
    }
}

impl KeyProvider for JwksKeyProvider {
    fn get_keys(&self, _header: &JwtHeader) -> Vec<Arc<SymmetricKey>> {
        match self.try_get_keys() {
            Ok(set) => set.keys().to_vec(),
            Err(e) => {
                tracing::warn!(error = %e, "no key set available");
                Vec::new()
            }
        }
    }
}

impl std::fmt::Debug for JwksKeyProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksKeyProvider")
            .field("address", &self.address)
            .field("refresh_interval", &self.refresh_interval)
            .field("automatic_refresh_interval", &self.automatic_refresh_interval)
            .finish_non_exhaustive()
    }
}
