use super::Validator;
use crate::jws;
use crate::provider::KeyProvider;
use crate::result::ValidationError;
use crate::token::Jwt;
use jwx_key::SignatureAlgorithm;
use std::sync::Arc;

/// Verifies the JWS signature with keys from a provider
pub struct SignatureValidator {
    provider: Arc<dyn KeyProvider>,
    accept_unsecure: bool,
}

impl SignatureValidator {
    /// Verify with keys from `provider`
    pub fn new(provider: Arc<dyn KeyProvider>) -> Self {
        Self {
            provider,
            accept_unsecure: false,
        }
    }

    /// Also accept `alg: none` tokens with an empty signature
    #[must_use]
    pub fn accept_unsecure(mut self, accept: bool) -> Self {
        self.accept_unsecure = accept;
        self
    }
}

impl Validator for SignatureValidator {
    fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError> {
        let input = jwt.signing_input().ok_or(ValidationError::SignatureFailed)?;
        let alg = jwt
            .header()
            .alg
            .as_deref()
            .and_then(|name| name.parse::<SignatureAlgorithm>().ok())
            .ok_or(ValidationError::SignatureFailed)?;

        if alg == SignatureAlgorithm::None {
            return if self.accept_unsecure && jwt.signature().is_empty() {
                Ok(())
            } else {
                Err(ValidationError::SignatureFailed)
            };
        }

        let keys = jws::signature_candidates(self.provider.as_ref(), jwt.header());
        if jws::verify_with_any(&keys, alg, input.as_bytes(), jwt.signature()) {
            Ok(())
        } else {
            tracing::trace!(candidates = keys.len(), "no key verified the signature");
            Err(ValidationError::SignatureFailed)
        }
    }
}
