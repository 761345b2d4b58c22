//! # Constants for JSON Web Tokens
//!
//! Names of header parameters, registered claims and algorithm identifiers
//! used throughout the library.

/// JOSE header parameter names (RFC 7515 §4.1)
pub mod header_params {
    /// Algorithm
    pub const ALG: &str = "alg";
    /// Token type
    pub const TYP: &str = "typ";
    /// Content type
    pub const CTY: &str = "cty";
    /// Key identifier
    pub const KID: &str = "kid";
}

/// Registered claim names (RFC 7519 §4.1)
pub mod claim_names {
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
    /// JWT ID
    pub const JTI: &str = "jti";
}

/// JWS algorithm identifiers (RFC 7518 §3.1)
pub mod alg_names {
    /// HMAC using SHA-256
    pub const HS256: &str = "HS256";
    /// HMAC using SHA-384
    pub const HS384: &str = "HS384";
    /// HMAC using SHA-512
    pub const HS512: &str = "HS512";
}

/// Conventional value of the `typ` header parameter
pub const JWT_TYPE: &str = "JWT";

/// Separator between the three token segments
pub const SEGMENT_SEPARATOR: char = '.';
