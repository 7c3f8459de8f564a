use super::Validator;
use crate::result::ValidationError;
use crate::token::Jwt;
use serde_json::Value;

/// Requires a claim, optionally with an exact value
#[derive(Debug, Clone)]
pub struct RequiredClaimValidator {
    claim: String,
    value: Option<Value>,
}

impl RequiredClaimValidator {
    /// Require `claim` to be present
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            value: None,
        }
    }

    /// Require `claim` to equal `value`
    pub fn with_value(claim: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            claim: claim.into(),
            value: Some(value.into()),
        }
    }
}

impl Validator for RequiredClaimValidator {
    fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError> {
        let payload = jwt.payload().ok_or(ValidationError::MalformedToken)?;
        let actual = payload
            .get(&self.claim)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ValidationError::MissingClaim(self.claim.clone()))?;

        match &self.value {
            Some(expected) if expected != actual => {
                Err(ValidationError::InvalidClaim(self.claim.clone()))
            }
            _ => Ok(()),
        }
    }
}
