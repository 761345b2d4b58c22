//! # Header Types for JSON Web Tokens
//!
//! This module provides the JOSE header and the signing algorithm enumeration.
//!
//! The header is a JSON object carried, base64url-encoded, as the first token
//! segment. The most important parameters are:
//!
//! - **Algorithm (alg)**: The MAC algorithm used to sign the token. Required.
//! - **Type (typ)**: The media type of the token, conventionally `"JWT"`.
//! - **Key ID (kid)**: A hint identifying which secret signed the token.

use crate::constants::{alg_names, header_params, JWT_TYPE};
use crate::error::Error;
use crate::json::{self, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Supported algorithms for token signing and verification.
///
/// Only the shared-secret HMAC family is implemented. New families are added
/// as variants here together with a dispatch arm in [`crate::utils::sign`].
///
/// # Example
///
/// ```
/// use jwt_codec::Algorithm;
///
/// let alg: Algorithm = "HS384".parse().unwrap();
/// assert_eq!(alg, Algorithm::HS384);
/// assert_eq!(alg.signature_len(), 48);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// HMAC using SHA-256
    HS256,
    /// HMAC using SHA-384
    HS384,
    /// HMAC using SHA-512
    HS512,
}

impl Algorithm {
    /// Every supported algorithm
    pub const ALL: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

    /// Get the `alg` header value for this algorithm
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::HS256 => alg_names::HS256,
            Algorithm::HS384 => alg_names::HS384,
            Algorithm::HS512 => alg_names::HS512,
        }
    }

    /// Create an Algorithm from an `alg` header value
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            alg_names::HS256 => Some(Algorithm::HS256),
            alg_names::HS384 => Some(Algorithm::HS384),
            alg_names::HS512 => Some(Algorithm::HS512),
            _ => None,
        }
    }

    /// Length in bytes of a signature produced by this algorithm
    pub fn signature_len(&self) -> usize {
        match self {
            Algorithm::HS256 => 32,
            Algorithm::HS384 => 48,
            Algorithm::HS512 => 64,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::from_name(s).ok_or_else(|| Error::UnsupportedAlgorithm(s.to_string()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type alias for header parameter maps
pub type HeaderMap = JsonObject;

/// Header for a JSON Web Token.
///
/// The header is an insertion-ordered JSON object. It is freely editable
/// until the token is signed; parameters are serialized in the order they
/// were inserted.
///
/// # Examples
///
/// ```
/// use jwt_codec::{Algorithm, Header};
///
/// let header = Header::new()
///     .with_algorithm(Algorithm::HS256)
///     .with_type("JWT")
///     .with_key_id("my-key-2024");
///
/// assert_eq!(header.algorithm(), Some(Algorithm::HS256));
/// assert_eq!(header.key_id(), Some("my-key-2024"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header {
    /// Header parameters
    pub params: HeaderMap,
}

impl Header {
    /// Creates a new empty header with no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the conventional `{"alg":<alg>,"typ":"JWT"}` header.
    ///
    /// # Example
    ///
    /// ```
    /// use jwt_codec::{Algorithm, Header};
    ///
    /// let header = Header::jwt(Algorithm::HS512);
    /// assert_eq!(header.token_type(), Some("JWT"));
    /// ```
    pub fn jwt(alg: Algorithm) -> Self {
        Self::new().with_algorithm(alg).with_type(JWT_TYPE)
    }

    /// Wraps an existing parameter map.
    pub fn from_map(params: HeaderMap) -> Self {
        Self { params }
    }

    /// Parses a header from JSON text, such as one typed by a user.
    ///
    /// Fails with [`Error::MalformedPayload`] unless the text is a JSON object.
    /// The algorithm is not checked here; that happens when signing.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        json::parse(text.as_bytes()).map(Self::from_map)
    }

    /// Sets the `alg` parameter.
    pub fn with_algorithm(mut self, alg: Algorithm) -> Self {
        self.insert(header_params::ALG, alg.name());
        self
    }

    /// Sets the `typ` parameter.
    pub fn with_type<S: Into<String>>(mut self, typ: S) -> Self {
        self.insert(header_params::TYP, typ.into());
        self
    }

    /// Sets the `cty` parameter.
    pub fn with_content_type<S: Into<String>>(mut self, cty: S) -> Self {
        self.insert(header_params::CTY, cty.into());
        self
    }

    /// Sets the `kid` parameter.
    pub fn with_key_id<S: Into<String>>(mut self, kid: S) -> Self {
        self.insert(header_params::KID, kid.into());
        self
    }

    /// Sets an arbitrary parameter.
    pub fn with_param<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, returning the previous value if any.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) -> Option<Value> {
        self.params.insert(name.into(), value.into())
    }

    /// Gets a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Gets the raw `alg` value when it is a string.
    pub fn algorithm_name(&self) -> Option<&str> {
        self.get(header_params::ALG).and_then(Value::as_str)
    }

    /// Gets the algorithm.
    ///
    /// Returns `None` if `alg` is absent, not a string, or not supported.
    ///
    /// # Example
    ///
    /// ```
    /// use jwt_codec::{Algorithm, Header};
    ///
    /// let header = Header::new().with_algorithm(Algorithm::HS256);
    /// assert_eq!(header.algorithm(), Some(Algorithm::HS256));
    ///
    /// let empty_header = Header::new();
    /// assert_eq!(empty_header.algorithm(), None);
    /// ```
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm_name().and_then(Algorithm::from_name)
    }

    /// Gets the algorithm, distinguishing why it is unusable.
    ///
    /// A missing or non-string `alg` is [`Error::InvalidHeader`]; a string
    /// naming an unknown algorithm is [`Error::UnsupportedAlgorithm`].
    pub fn require_algorithm(&self) -> Result<Algorithm, Error> {
        match self.get(header_params::ALG) {
            None => Err(Error::InvalidHeader(
                "missing \"alg\" parameter".to_string(),
            )),
            Some(Value::String(name)) => name.parse(),
            Some(_) => Err(Error::InvalidHeader(
                "\"alg\" parameter must be a string".to_string(),
            )),
        }
    }

    /// Gets the `typ` parameter.
    pub fn token_type(&self) -> Option<&str> {
        self.get(header_params::TYP).and_then(Value::as_str)
    }

    /// Gets the `cty` parameter.
    pub fn content_type(&self) -> Option<&str> {
        self.get(header_params::CTY).and_then(Value::as_str)
    }

    /// Gets the `kid` parameter.
    pub fn key_id(&self) -> Option<&str> {
        self.get(header_params::KID).and_then(Value::as_str)
    }
}

impl From<HeaderMap> for Header {
    fn from(params: HeaderMap) -> Self {
        Self::from_map(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_algorithm_names_round_trip() {
        for alg in Algorithm::ALL {
            assert_eq!(Algorithm::from_name(alg.name()), Some(alg));
            assert_eq!(alg.to_string(), alg.name());
        }
        assert_eq!(Algorithm::from_name("hs256"), None);
        assert_eq!(
            "none".parse::<Algorithm>(),
            Err(Error::UnsupportedAlgorithm("none".to_string()))
        );
    }

    #[test]
    fn test_require_algorithm() {
        assert!(matches!(
            Header::new().require_algorithm(),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            Header::new().with_param("alg", 256).require_algorithm(),
            Err(Error::InvalidHeader(_))
        ));
        assert!(matches!(
            Header::new().with_param("alg", "RS256").require_algorithm(),
            Err(Error::UnsupportedAlgorithm(_))
        ));
        assert_eq!(
            Header::jwt(Algorithm::HS384).require_algorithm(),
            Ok(Algorithm::HS384)
        );
    }

    #[test]
    fn test_header_from_json() {
        let header = Header::from_json("{\n  \"alg\": \"HS256\",\n  \"typ\": \"JWT\"\n}").unwrap();
        assert_eq!(header, Header::jwt(Algorithm::HS256));
        assert!(matches!(
            Header::from_json("not json"),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_header_serializes_as_plain_object() {
        let header = Header::jwt(Algorithm::HS256).with_param("x5t", json!(["a"]));
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"HS256","typ":"JWT","x5t":["a"]}"#
        );
    }
}
