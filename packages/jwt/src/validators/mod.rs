//! Token validators
//!
//! A [`TokenValidationPolicy`](crate::TokenValidationPolicy) runs its
//! validators in order and stops at the first failure.

mod audience;
mod lifetime;
mod required_claim;
mod signature;

pub use audience::AudienceValidator;
pub use lifetime::LifetimeValidator;
pub use required_claim::RequiredClaimValidator;
pub use signature::SignatureValidator;

use crate::result::ValidationError;
use crate::token::Jwt;

/// One check applied to a parsed token
pub trait Validator: Send + Sync {
    /// Accept or reject `jwt`
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing the rejection.
    fn try_validate(&self, jwt: &Jwt) -> Result<(), ValidationError>;
}
