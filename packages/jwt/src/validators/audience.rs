use super::Validator;
use crate::constants::claims;
use crate::result::ValidationError;
use crate::token::Jwt;

/// Requires `aud` to contain at least one accepted audience
#[derive(Debug, Clone)]
pub struct AudienceValidator {
    audiences: Vec<String>,
}

impl AudienceValidator {
    /// Accept any of `audiences`
    pub fn new<I, S>(audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            audiences: audiences.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for AudienceValidator {
    fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError> {
        if jwt.payload().is_none() {
            return Err(ValidationError::MalformedToken);
        }
        let presented = jwt.audiences();
        if presented.is_empty() {
            return Err(ValidationError::MissingClaim(claims::AUD.to_string()));
        }
        if presented
            .iter()
            .any(|aud| self.audiences.iter().any(|accepted| accepted == aud))
        {
            Ok(())
        } else {
            Err(ValidationError::InvalidClaim(claims::AUD.to_string()))
        }
    }
}
