use super::Validator;
use crate::clock::{Clock, SystemClock};
use crate::constants::claims;
use crate::result::ValidationError;
use crate::token::Jwt;
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;

/// Checks `exp` and `nbf` against the clock, allowing for skew
#[derive(Clone)]
pub struct LifetimeValidator {
    require_expiration: bool,
    clock_skew: Duration,
    clock: Arc<dyn Clock>,
}

impl LifetimeValidator {
    /// Validate against the system clock
    #[must_use]
    pub fn new(require_expiration: bool, clock_skew: Duration) -> Self {
        Self::with_clock(require_expiration, clock_skew, Arc::new(SystemClock))
    }

    /// Validate against an explicit clock
    #[must_use]
    pub fn with_clock(
        require_expiration: bool,
        clock_skew: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            require_expiration,
            clock_skew,
            clock,
        }
    }
}

fn numeric_date(value: &Value, claim: &str) -> Result<i64, ValidationError> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .ok_or_else(|| ValidationError::InvalidClaim(claim.to_string()))
}

impl Validator for LifetimeValidator {
    fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError> {
        let payload = jwt.payload().ok_or(ValidationError::MalformedToken)?;
        let now = self.clock.now().timestamp();
        let skew = self.clock_skew.num_seconds();

        match payload.get(claims::EXP) {
            Some(exp) => {
                if now - skew >= numeric_date(exp, claims::EXP)? {
                    return Err(ValidationError::Expired);
                }
            }
            None if self.require_expiration => {
                return Err(ValidationError::MissingClaim(claims::EXP.to_string()));
            }
            None => {}
        }

        if let Some(nbf) = payload.get(claims::NBF) {
            if now + skew < numeric_date(nbf, claims::NBF)? {
                return Err(ValidationError::NotYetValid);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for LifetimeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifetimeValidator")
            .field("require_expiration", &self.require_expiration)
            .field("clock_skew", &self.clock_skew)
            .finish_non_exhaustive()
    }
}
