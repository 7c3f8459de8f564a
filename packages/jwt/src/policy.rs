//! Validation policy applied to signed tokens

use crate::config::JwtConfig;
use crate::constants::{claims, DEFAULT_MAX_TOKEN_SIZE_IN_BYTES};
use crate::provider::KeyProvider;
use crate::result::ValidationError;
use crate::token::Jwt;
use crate::validators::{
    AudienceValidator, LifetimeValidator, RequiredClaimValidator, SignatureValidator, Validator,
};
use chrono::Duration;
use serde_json::Value;
use std::sync::Arc;

/// An ordered list of validators plus the token size limit
#[derive(Clone)]
pub struct TokenValidationPolicy {
    validators: Vec<Arc<dyn Validator>>,
    maximum_token_size_in_bytes: usize,
}

impl TokenValidationPolicy {
    /// Start building a policy
    #[must_use]
    pub fn builder() -> TokenValidationPolicyBuilder {
        TokenValidationPolicyBuilder::new()
    }

    /// Structural checks only: no signature, claim or lifetime validation
    #[must_use]
    pub fn no_validation() -> Self {
        Self {
            validators: Vec::new(),
            maximum_token_size_in_bytes: DEFAULT_MAX_TOKEN_SIZE_IN_BYTES,
        }
    }

    /// Tokens longer than this are rejected before decoding
    #[must_use]
    pub fn maximum_token_size_in_bytes(&self) -> usize {
        self.maximum_token_size_in_bytes
    }

    /// Number of validators
    #[must_use]
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Run every validator in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first validator's rejection.
    pub fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.try_validate(jwt))
    }
}

impl Default for TokenValidationPolicy {
    fn default() -> Self {
        Self::no_validation()
    }
}

impl std::fmt::Debug for TokenValidationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidationPolicy")
            .field("validators", &self.validators.len())
            .field("maximum_token_size_in_bytes", &self.maximum_token_size_in_bytes)
            .finish()
    }
}

enum SignatureRequirement {
    Ignore,
    Require(Arc<dyn KeyProvider>),
}

/// Builder for [`TokenValidationPolicy`]
///
/// The signature check, when required, always runs first; the other
/// validators run in the order they were added.
pub struct TokenValidationPolicyBuilder {
    signature: SignatureRequirement,
    accept_unsecure: bool,
    validators: Vec<Arc<dyn Validator>>,
    maximum_token_size_in_bytes: usize,
}

impl TokenValidationPolicyBuilder {
    /// Empty builder; signatures are ignored until required
    #[must_use]
    pub fn new() -> Self {
        Self {
            signature: SignatureRequirement::Ignore,
            accept_unsecure: false,
            validators: Vec::new(),
            maximum_token_size_in_bytes: DEFAULT_MAX_TOKEN_SIZE_IN_BYTES,
        }
    }

    /// Builder seeded from `config`
    #[must_use]
    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new().max_token_size(config.maximum_token_size_in_bytes)
    }

    /// Verify signatures with keys from `provider`
    #[must_use]
    pub fn require_signature(mut self, provider: Arc<dyn KeyProvider>) -> Self {
        self.signature = SignatureRequirement::Require(provider);
        self
    }

    /// Skip signature verification
    #[must_use]
    pub fn ignore_signature(mut self) -> Self {
        self.signature = SignatureRequirement::Ignore;
        self
    }

    /// Accept `alg: none` tokens when signatures are required
    #[must_use]
    pub fn accept_unsecure_token(mut self) -> Self {
        self.accept_unsecure = true;
        self
    }

    /// Require `claim` to be present
    #[must_use]
    pub fn require_claim(self, claim: impl Into<String>) -> Self {
        self.add_validator(RequiredClaimValidator::new(claim))
    }

    /// Require `claim` to equal `value`
    #[must_use]
    pub fn require_claim_value(self, claim: impl Into<String>, value: impl Into<Value>) -> Self {
        self.add_validator(RequiredClaimValidator::with_value(claim, value))
    }

    /// Require `iss` to equal `issuer`
    #[must_use]
    pub fn require_issuer(self, issuer: impl Into<String>) -> Self {
        self.require_claim_value(claims::ISS, Value::String(issuer.into()))
    }

    /// Require `aud` to contain `audience`
    #[must_use]
    pub fn require_audience(self, audience: impl Into<String>) -> Self {
        self.add_validator(AudienceValidator::new([audience.into()]))
    }

    /// Require `acr` to equal `acr`
    #[must_use]
    pub fn require_acr(self, acr: impl Into<String>) -> Self {
        self.require_claim_value(claims::ACR, Value::String(acr.into()))
    }

    /// Check `exp` and `nbf` with `clock_skew` tolerance
    #[must_use]
    pub fn enable_lifetime_validation(
        self,
        require_expiration: bool,
        clock_skew: Duration,
    ) -> Self {
        self.add_validator(LifetimeValidator::new(require_expiration, clock_skew))
    }

    /// Reject tokens longer than `bytes`
    #[must_use]
    pub fn max_token_size(mut self, bytes: usize) -> Self {
        self.maximum_token_size_in_bytes = bytes;
        self
    }

    /// Append a custom validator
    #[must_use]
    pub fn add_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Finish the policy
    #[must_use]
    pub fn build(self) -> TokenValidationPolicy {
        let mut validators: Vec<Arc<dyn Validator>> = Vec::with_capacity(self.validators.len() + 1);
        if let SignatureRequirement::Require(provider) = self.signature {
            validators.push(Arc::new(
                SignatureValidator::new(provider).accept_unsecure(self.accept_unsecure),
            ));
        }
        validators.extend(self.validators);
        TokenValidationPolicy {
            validators,
            maximum_token_size_in_bytes: self.maximum_token_size_in_bytes,
        }
    }
}

impl Default for TokenValidationPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
