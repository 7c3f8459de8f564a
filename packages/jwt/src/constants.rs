//! Limits and registered names

/// Default upper bound on token size
pub const DEFAULT_MAX_TOKEN_SIZE_IN_BYTES: usize = 2 * 1024 * 1024;

/// Segments in the longest compact form (JWE)
pub const MAX_SEGMENT_COUNT: usize = 5;

/// Segments in a compact JWS
pub const JWS_SEGMENT_COUNT: usize = 3;

/// Tokens that may be stacked inside one another, counting the outermost
pub const MAX_NESTING_DEPTH: usize = 3;

/// Content type marking a nested token
pub const CONTENT_TYPE_JWT: &str = "JWT";

/// `zip` value for raw DEFLATE
pub const COMPRESSION_DEFLATE: &str = "DEF";

/// Registered claim names
pub mod claims {
    /// Issuer
    pub const ISS: &str = "iss";
    /// Subject
    pub const SUB: &str = "sub";
    /// Audience
    pub const AUD: &str = "aud";
    /// Expiration time
    pub const EXP: &str = "exp";
    /// Not before
    pub const NBF: &str = "nbf";
    /// Issued at
    pub const IAT: &str = "iat";
    /// JWT id
    pub const JTI: &str = "jti";
    /// Authentication context class reference
    pub const ACR: &str = "acr";
}
