//! JWS signing and verification
//!
//! Signing input is the ASCII `base64url(header) "." base64url(payload)`.

use crate::header::JwtHeader;
use crate::provider::KeyProvider;
use jwx_key::{SignatureAlgorithm, SymmetricKey};
use std::sync::Arc;

/// Keys from `provider` eligible to verify a token with `header`
///
/// A key qualifies when its `use` permits signatures and, if the header
/// names a `kid`, the ids match.
pub(crate) fn signature_candidates(
    provider: &dyn KeyProvider,
    header: &JwtHeader,
) -> Vec<Arc<SymmetricKey>> {
    provider
        .get_keys(header)
        .into_iter()
        .filter(|key| key.is_suitable_for_signature())
        .filter(|key| header.kid.is_none() || key.kid() == header.kid.as_deref())
        .collect()
}

/// Whether any of `keys` verifies `signature` over `input`
pub(crate) fn verify_with_any(
    keys: &[Arc<SymmetricKey>],
    alg: SignatureAlgorithm,
    input: &[u8],
    signature: &[u8],
) -> bool {
    keys.iter().any(|key| match key.signer(alg) {
        Ok(signer) => signer.verify(input, signature),
        Err(e) => {
            tracing::trace!(error = %e, "key unusable for signature");
            false
        }
    })
}
