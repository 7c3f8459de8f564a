//! Engine configuration

use crate::constants::DEFAULT_MAX_TOKEN_SIZE_IN_BYTES;
use crate::error::{JwtError, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Shortest allowed JWKS refresh interval after a failure
pub const MINIMUM_REFRESH_INTERVAL_SECONDS: u64 = 1;

/// Shortest allowed automatic JWKS refresh interval
pub const MINIMUM_AUTOMATIC_REFRESH_INTERVAL_SECONDS: u64 = 5 * 60;

/// Token size limit and key set refresh timing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Tokens longer than this are rejected
    #[serde(default = "default_maximum_token_size")]
    pub maximum_token_size_in_bytes: usize,
    /// Retry delay after a failed key set fetch, in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    /// Key set lifetime before it is fetched again, in seconds
    #[serde(default = "default_automatic_refresh_interval")]
    pub automatic_refresh_interval_seconds: u64,
}

fn default_maximum_token_size() -> usize {
    DEFAULT_MAX_TOKEN_SIZE_IN_BYTES
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_automatic_refresh_interval() -> u64 {
    24 * 60 * 60 // 1 day
}

fn seconds(value: u64) -> Duration {
    i64::try_from(value)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX)
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            maximum_token_size_in_bytes: default_maximum_token_size(),
            refresh_interval_seconds: default_refresh_interval(),
            automatic_refresh_interval_seconds: default_automatic_refresh_interval(),
        }
    }
}

impl JwtConfig {
    /// Parse and validate a JSON configuration; missing fields take defaults
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or values below their minimums.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value against its minimum
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.maximum_token_size_in_bytes == 0 {
            return Err(JwtError::InvalidConfig(
                "maximum_token_size_in_bytes must be positive".to_string(),
            ));
        }
        if self.refresh_interval_seconds < MINIMUM_REFRESH_INTERVAL_SECONDS {
            return Err(JwtError::InvalidConfig(format!(
                "refresh_interval_seconds must be at least {MINIMUM_REFRESH_INTERVAL_SECONDS}"
            )));
        }
        if self.automatic_refresh_interval_seconds < MINIMUM_AUTOMATIC_REFRESH_INTERVAL_SECONDS {
            return Err(JwtError::InvalidConfig(format!(
                "automatic_refresh_interval_seconds must be at least {MINIMUM_AUTOMATIC_REFRESH_INTERVAL_SECONDS}"
            )));
        }
        Ok(())
    }

    /// Retry delay after a failed fetch
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        seconds(self.refresh_interval_seconds)
    }

    /// Key set lifetime
    #[must_use]
    pub fn automatic_refresh_interval(&self) -> Duration {
        seconds(self.automatic_refresh_interval_seconds)
    }
}
