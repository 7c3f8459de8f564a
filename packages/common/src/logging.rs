//! Structured logging infrastructure
//!
//! Provides env_logger-based logging with secure handling of key identifiers
//! and proper integration with the standard log crate.

use log::{debug, error, info};
use sha2::{Digest, Sha256};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Logging infrastructure using `env_logger`
pub struct LoggingTransformer;

impl LoggingTransformer {
    /// Initialize logging system (should be called once at application startup)
    ///
    /// Configure logging levels via `RUST_LOG` environment variable:
    /// - `RUST_LOG=debug` - Enable all debug logs
    /// - `RUST_LOG=info` - Enable info and above
    /// - `RUST_LOG=jwx_jwt=trace,jwx_key=debug` - Module-specific levels
    pub fn init() {
        INIT_LOGGER.call_once(|| {
            env_logger::Builder::from_default_env()
                .format_timestamp_micros()
                .init();

            info!("Structured logging initialized");
        });
    }

    /// Initialize logging for test environments
    ///
    /// Use this in test modules to avoid initialization conflicts
    pub fn init_test() {
        let _ = env_logger::Builder::from_default_env()
            .is_test(true)
            .try_init();
    }

    /// Secure logging of cryptographic errors
    ///
    /// Logs error types without exposing sensitive data
    pub fn log_crypto_error(operation: &str, error: &dyn std::error::Error) {
        error!(
            "Cryptographic operation failed: {} (error_type: {})",
            operation,
            std::any::type_name_of_val(error)
        );
    }

    /// Log key usage with the key identifier hashed
    pub fn log_key_event(event: &str, kid: Option<&str>) {
        let kid_hash = kid.map_or_else(|| "none".to_string(), Self::secure_hash_key);
        debug!("Key event: {event} (kid_hash: {kid_hash})");
    }

    /// Log a token read outcome without any token content
    pub fn log_token_outcome(operation: &str, token_len: usize, outcome: &str) {
        debug!("Token {operation}: {outcome} (token_len: {token_len})");
    }

    /// Log performance metrics and timing information
    ///
    /// Failures are logged at debug level as well.
    pub fn log_performance_metric(operation: &str, duration_ms: u64, success: bool) {
        if success {
            debug!("Performance: {operation} completed in {duration_ms}ms");
        } else {
            debug!("Performance: {operation} failed after {duration_ms}ms");
        }
    }

    /// Hash an identifier for logging
    ///
    /// Returns `#` followed by the first 12 hex characters of its SHA-256.
    #[must_use]
    pub fn secure_hash_key(key: &str) -> String {
        let hash = Sha256::digest(key.as_bytes());
        let hex_hash: String = hash.iter().take(6).map(|b| format!("{b:02x}")).collect();
        format!("#{hex_hash}")
    }
}
