//! Error types for the token codec

use thiserror::Error;

/// Errors that can occur when encoding, decoding or verifying tokens.
///
/// A signature that does not match is not an error: [`crate::verify`] reports
/// it as `VerifyResult { valid: false }`. The variants here describe input
/// that cannot be processed at all, or claims that fail validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input is not valid base64url
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// A segment is not a valid JSON object
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Token does not consist of exactly three non-empty segments
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    /// Header is missing a required parameter or names an unusable algorithm
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Algorithm identifier is not one of HS256, HS384 or HS512
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Header or payload cannot be represented as a JSON object
    #[error("Unserializable value: {0}")]
    UnserializableValue(String),

    /// A required argument was empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required claim
    #[error("Missing required claim: {0}. The token does not contain a required claim")]
    MissingClaim(String),

    /// Token expired
    #[error("Token expired. The token's expiration time (exp) is in the past")]
    Expired,

    /// Token not yet valid
    #[error("Token not yet valid. The token's not-before time (nbf) is in the future")]
    NotYetValid,

    /// Invalid issuer
    #[error("Invalid issuer. The token's issuer (iss) does not match the expected issuer")]
    InvalidIssuer,

    /// Invalid audience
    #[error("Invalid audience. The token's audience (aud) does not contain the expected audience")]
    InvalidAudience,

    /// Invalid claim value
    #[error("Invalid claim value: {0}")]
    InvalidClaimValue(String),
}

impl Error {
    /// Returns `true` for errors caused by structurally unusable input
    /// (bad encoding, bad JSON, wrong segment count, unusable header).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MalformedEncoding(_)
                | Error::MalformedPayload(_)
                | Error::MalformedToken(_)
                | Error::InvalidHeader(_)
                | Error::UnsupportedAlgorithm(_)
        )
    }
}
