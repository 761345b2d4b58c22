//! # Claims for JSON Web Tokens
//!
//! This module provides the claim set carried in the second token segment.
//!
//! The codec treats every claim as opaque JSON. The helpers here only make
//! the registered claims of RFC 7519 convenient to set and read:
//!
//! - **iss** (Issuer), **sub** (Subject), **aud** (Audience)
//! - **exp** (Expiration Time), **nbf** (Not Before), **iat** (Issued At)
//! - **jti** (JWT ID)

use crate::constants::claim_names;
use crate::error::Error;
use crate::json::{self, JsonObject};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type alias for claims maps
pub type ClaimsMap = JsonObject;

/// Standard registered claims as defined in RFC 7519.
///
/// Set fields are inserted into a [`Claims`] in the order
/// `iss, sub, aud, exp, nbf, iat, jti`.
///
/// # Example
///
/// ```
/// use jwt_codec::RegisteredClaims;
/// use jwt_codec::current_timestamp;
///
/// let now = current_timestamp();
/// let claims = RegisteredClaims::new()
///     .with_issuer("example-issuer")
///     .with_subject("user-123")
///     .with_expiration(now + 3600);
///
/// assert_eq!(claims.iss, Some("example-issuer".to_string()));
/// assert_eq!(claims.exp, Some(now + 3600));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredClaims {
    /// Issuer
    pub iss: Option<String>,
    /// Subject
    pub sub: Option<String>,
    /// Audience
    pub aud: Option<String>,
    /// Expiration time (seconds since Unix epoch)
    pub exp: Option<u64>,
    /// Not before (seconds since Unix epoch)
    pub nbf: Option<u64>,
    /// Issued at (seconds since Unix epoch)
    pub iat: Option<u64>,
    /// JWT ID
    pub jti: Option<String>,
}

impl RegisteredClaims {
    /// Creates a new empty set of registered claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the issuer claim.
    pub fn with_issuer<S: Into<String>>(mut self, iss: S) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Sets the subject claim.
    pub fn with_subject<S: Into<String>>(mut self, sub: S) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Sets the audience claim.
    pub fn with_audience<S: Into<String>>(mut self, aud: S) -> Self {
        self.aud = Some(aud.into());
        self
    }

    /// Sets the expiration time claim.
    pub fn with_expiration(mut self, exp: u64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Sets the not before claim.
    pub fn with_not_before(mut self, nbf: u64) -> Self {
        self.nbf = Some(nbf);
        self
    }

    /// Sets the issued at claim.
    pub fn with_issued_at(mut self, iat: u64) -> Self {
        self.iat = Some(iat);
        self
    }

    /// Sets the JWT ID claim.
    pub fn with_jwt_id<S: Into<String>>(mut self, jti: S) -> Self {
        self.jti = Some(jti.into());
        self
    }

    fn write_into(self, claims: &mut Claims) {
        if let Some(iss) = self.iss {
            claims.insert(claim_names::ISS, iss);
        }
        if let Some(sub) = self.sub {
            claims.insert(claim_names::SUB, sub);
        }
        if let Some(aud) = self.aud {
            claims.insert(claim_names::AUD, aud);
        }
        if let Some(exp) = self.exp {
            claims.insert(claim_names::EXP, exp);
        }
        if let Some(nbf) = self.nbf {
            claims.insert(claim_names::NBF, nbf);
        }
        if let Some(iat) = self.iat {
            claims.insert(claim_names::IAT, iat);
        }
        if let Some(jti) = self.jti {
            claims.insert(claim_names::JTI, jti);
        }
    }
}

/// The claim set (payload) of a token.
///
/// An insertion-ordered JSON object. No claim is required by the codec.
///
/// # Example
///
/// ```
/// use jwt_codec::Claims;
///
/// let claims = Claims::new()
///     .with_claim("sub", "1234567890")
///     .with_claim("name", "John Doe")
///     .with_claim("iat", 1516239022);
///
/// assert_eq!(claims.subject(), Some("1234567890"));
/// assert_eq!(claims.issued_at(), Some(1516239022));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    /// Claim values by name
    pub map: ClaimsMap,
}

impl Claims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing claims map.
    pub fn from_map(map: ClaimsMap) -> Self {
        Self { map }
    }

    /// Parses a claim set from JSON text.
    ///
    /// Fails with [`Error::MalformedPayload`] unless the text is a JSON object.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        json::parse(text.as_bytes()).map(Self::from_map)
    }

    /// Builds a claim set from any value that serializes to a JSON object.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        json::to_object(value).map(Self::from_map)
    }

    /// Deserializes the claim set into an application type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(Value::Object(self.map.clone()))
            .map_err(|e| Error::MalformedPayload(e.to_string()))
    }

    /// Adds the set fields of `registered`, replacing existing values.
    pub fn with_registered_claims(mut self, registered: RegisteredClaims) -> Self {
        registered.write_into(&mut self);
        self
    }

    /// Adds an arbitrary claim.
    pub fn with_claim<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets the audience claim to an array of recipients.
    pub fn with_audiences<I, S>(mut self, audiences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = audiences.into_iter().map(|a| Value::String(a.into())).collect();
        self.insert(claim_names::AUD, values);
        self
    }

    /// Inserts a claim, returning the previous value if any.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) -> Option<Value> {
        self.map.insert(name.into(), value.into())
    }

    /// Gets a claim by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.get(name)
    }

    /// Returns `true` if the claim is present.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of claims
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no claims
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Issuer, when present as a string
    pub fn issuer(&self) -> Option<&str> {
        self.get(claim_names::ISS).and_then(Value::as_str)
    }

    /// Subject, when present as a string
    pub fn subject(&self) -> Option<&str> {
        self.get(claim_names::SUB).and_then(Value::as_str)
    }

    /// JWT ID, when present as a string
    pub fn jwt_id(&self) -> Option<&str> {
        self.get(claim_names::JTI).and_then(Value::as_str)
    }

    /// Audience values.
    ///
    /// `aud` may be a single string or an array of strings; both forms are
    /// returned as a list. Non-string array entries are skipped.
    pub fn audiences(&self) -> Vec<&str> {
        match self.get(claim_names::AUD) {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Expiration time, when present as a valid NumericDate
    pub fn expiration(&self) -> Option<u64> {
        self.numeric_date(claim_names::EXP).ok().flatten()
    }

    /// Not-before time, when present as a valid NumericDate
    pub fn not_before(&self) -> Option<u64> {
        self.numeric_date(claim_names::NBF).ok().flatten()
    }

    /// Issued-at time, when present as a valid NumericDate
    pub fn issued_at(&self) -> Option<u64> {
        self.numeric_date(claim_names::IAT).ok().flatten()
    }

    /// Reads a NumericDate claim.
    ///
    /// Fractional seconds are truncated. A present claim that is not a
    /// non-negative number is [`Error::InvalidClaimValue`].
    pub(crate) fn numeric_date(&self, name: &str) -> Result<Option<u64>, Error> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };

        if let Some(secs) = value.as_u64() {
            return Ok(Some(secs));
        }
        match value.as_f64() {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some(secs as u64)),
            _ => Err(Error::InvalidClaimValue(format!(
                "{name} must be a non-negative NumericDate"
            ))),
        }
    }
}

impl From<ClaimsMap> for Claims {
    fn from(map: ClaimsMap) -> Self {
        Self::from_map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_registered_claims_are_written_in_order() {
        let claims = Claims::new().with_registered_claims(
            RegisteredClaims::new()
                .with_jwt_id("id-1")
                .with_issued_at(10)
                .with_subject("user")
                .with_issuer("issuer"),
        );

        let keys: Vec<&str> = claims.map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["iss", "sub", "iat", "jti"]);
        assert_eq!(claims.issuer(), Some("issuer"));
        assert_eq!(claims.jwt_id(), Some("id-1"));
    }

    #[test]
    fn test_audiences_accepts_string_or_array() {
        let single = Claims::new().with_claim("aud", "svc");
        assert_eq!(single.audiences(), vec!["svc"]);

        let many = Claims::new().with_audiences(["a", "b"]);
        assert_eq!(many.audiences(), vec!["a", "b"]);
        assert_eq!(many.get("aud"), Some(&json!(["a", "b"])));

        assert!(Claims::new().audiences().is_empty());
    }

    #[test]
    fn test_numeric_dates() {
        let claims = Claims::new()
            .with_claim("exp", 1700000000u64)
            .with_claim("nbf", 1600000000.75)
            .with_claim("iat", "yesterday");

        assert_eq!(claims.expiration(), Some(1700000000));
        assert_eq!(claims.not_before(), Some(1600000000));
        assert_eq!(claims.issued_at(), None);
        assert!(matches!(
            claims.numeric_date("iat"),
            Err(Error::InvalidClaimValue(_))
        ));
        assert_eq!(claims.numeric_date("missing"), Ok(None));
    }

    #[test]
    fn test_deserialize_into_application_type() {
        #[derive(Deserialize)]
        struct Profile {
            sub: String,
            admin: bool,
        }

        let claims = Claims::from_json(r#"{"sub":"42","admin":true}"#).unwrap();
        let profile: Profile = claims.deserialize_into().unwrap();
        assert_eq!(profile.sub, "42");
        assert!(profile.admin);

        assert!(matches!(
            Claims::new().deserialize_into::<Profile>(),
            Err(Error::MalformedPayload(_))
        ));
    }
}
