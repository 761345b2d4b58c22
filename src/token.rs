//! Token implementation for JSON Web Tokens
//!
//! The compact serialization is three base64url segments joined by `.`:
//! the header JSON, the claims JSON, and the MAC computed over the ASCII
//! bytes of the first two segments exactly as they appear in the token.

use crate::base64url;
use crate::claims::{Claims, RegisteredClaims};
use crate::constants::{claim_names, header_params, JWT_TYPE, SEGMENT_SEPARATOR};
use crate::error::Error;
use crate::header::{Algorithm, Header};
use crate::json::{self, JsonObject};
use crate::utils::{current_timestamp, sign, verify_signature};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Header and claims recovered from a token without verifying it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Token header
    pub header: Header,
    /// Token claims
    pub payload: Claims,
}

/// Outcome of signature verification.
///
/// A well-formed token signed with a different secret is `valid: false`,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyResult {
    /// Whether the signature matches
    pub valid: bool,
}

impl VerifyResult {
    /// Returns `true` if the signature matched
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Encode a header and payload into a signed compact token.
///
/// The header must carry a supported `alg`. The payload may be any value
/// that serializes to a JSON object, including [`Claims`].
///
/// # Example
///
/// ```
/// use jwt_codec::{encode, Algorithm, Claims, Header};
///
/// let header = Header::jwt(Algorithm::HS256);
/// let claims = Claims::new()
///     .with_claim("sub", "1234567890")
///     .with_claim("name", "John Doe")
///     .with_claim("iat", 1516239022);
///
/// let token = encode(&header, &claims, "your-256-bit-secret").unwrap();
/// assert_eq!(
///     token,
///     "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
///      eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
///      SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c"
/// );
/// ```
pub fn encode<P: Serialize + ?Sized>(
    header: &Header,
    payload: &P,
    secret: impl AsRef<[u8]>,
) -> Result<String, Error> {
    let alg = header.require_algorithm()?;
    let claims = json::to_object(payload)?;
    let token = Token::sign_parts(alg, header.clone(), Claims::from_map(claims), secret.as_ref())?;
    Ok(token.to_compact())
}

/// Decode a token into its header and claims without verifying it.
///
/// No secret is consulted. The signature segment is only checked for
/// base64url well-formedness, so the result must not be trusted.
///
/// # Example
///
/// ```
/// use jwt_codec::decode;
///
/// let decoded = decode(
///     "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
///      eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
///      SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c",
/// )
/// .unwrap();
///
/// assert_eq!(decoded.header.algorithm_name(), Some("HS256"));
/// assert_eq!(decoded.payload.subject(), Some("1234567890"));
/// ```
pub fn decode(token: &str) -> Result<Decoded, Error> {
    let token = Token::parse(token)?;
    Ok(Decoded {
        header: token.header,
        payload: token.claims,
    })
}

/// Verify a token's signature against a shared secret.
///
/// Structural problems are errors; a signature mismatch is
/// `Ok(VerifyResult { valid: false })`.
///
/// # Example
///
/// ```
/// use jwt_codec::{encode, verify, Algorithm, Claims, Header};
///
/// let token = encode(&Header::jwt(Algorithm::HS512), &Claims::new(), "secret").unwrap();
///
/// assert!(verify(&token, "secret").unwrap().valid);
/// assert!(!verify(&token, "not-the-secret").unwrap().valid);
/// ```
pub fn verify(token: &str, secret: impl AsRef<[u8]>) -> Result<VerifyResult, Error> {
    let secret = secret.as_ref();
    if token.is_empty() {
        return Err(Error::InvalidArgument("token is required".to_string()));
    }
    if secret.is_empty() {
        return Err(Error::InvalidArgument("secret is required".to_string()));
    }

    let segments = Segments::split(token)?;
    let header = Header::from_map(segments.parse_header()?);
    segments.parse_payload()?;

    let alg = usable_algorithm(&header)?;
    let signature = segments.decode_signature()?;

    Ok(check_signature(alg, secret, segments.signing_input, &signature))
}

/// The three segments of a compact token, borrowed from the input
struct Segments<'a> {
    signing_input: &'a str,
    header: &'a str,
    payload: &'a str,
    signature: &'a str,
}

impl<'a> Segments<'a> {
    fn split(token: &'a str) -> Result<Self, Error> {
        let mut parts = token.split(SEGMENT_SEPARATOR);
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            let count = token.split(SEGMENT_SEPARATOR).count();
            tracing::warn!("Token has {} segments, expected 3", count);
            return Err(Error::MalformedToken(format!(
                "expected 3 segments, found {count}"
            )));
        };

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            tracing::warn!("Token has an empty segment");
            return Err(Error::MalformedToken("empty segment".to_string()));
        }

        tracing::debug!(
            "Token segment lengths - header: {}, payload: {}, signature: {}",
            header.len(),
            payload.len(),
            signature.len()
        );

        Ok(Self {
            signing_input: &token[..header.len() + 1 + payload.len()],
            header,
            payload,
            signature,
        })
    }

    fn parse_header(&self) -> Result<JsonObject, Error> {
        parse_segment(self.header, "header")
    }

    fn parse_payload(&self) -> Result<JsonObject, Error> {
        parse_segment(self.payload, "payload")
    }

    fn decode_signature(&self) -> Result<Vec<u8>, Error> {
        base64url::decode(self.signature).inspect_err(|e| {
            tracing::warn!("Token signature segment is not base64url: {}", e);
        })
    }
}

fn parse_segment(segment: &str, name: &str) -> Result<JsonObject, Error> {
    let bytes = base64url::decode(segment).inspect_err(|e| {
        tracing::warn!("Token {} segment is not base64url: {}", name, e);
    })?;
    json::parse(&bytes).inspect_err(|e| {
        tracing::warn!("Token {} segment is not a JSON object: {}", name, e);
    })
}

/// Algorithm of a received token; any unusable `alg` is a header problem.
fn usable_algorithm(header: &Header) -> Result<Algorithm, Error> {
    header.require_algorithm().map_err(|e| {
        tracing::warn!("Token header rejected: {}", e);
        match e {
            Error::UnsupportedAlgorithm(name) => {
                Error::InvalidHeader(format!("unsupported algorithm {name:?}"))
            }
            other => other,
        }
    })
}

fn check_signature(alg: Algorithm, secret: &[u8], signing_input: &str, signature: &[u8]) -> VerifyResult {
    let valid = verify_signature(alg, secret, signing_input.as_bytes(), signature);
    tracing::debug!("Token signature check with {}: valid = {}", alg, valid);
    VerifyResult { valid }
}

/// A signed JSON Web Token
///
/// Produced either by signing ([`TokenBuilder::sign`], [`Token::sign`]) or by
/// parsing a compact string ([`Token::parse`]). The signing input is kept
/// exactly as produced or received, so verification never depends on how
/// the header and claims would be re-serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token header
    pub header: Header,
    /// Token claims
    pub claims: Claims,
    /// Token signature
    pub signature: Vec<u8>,
    /// `<header>.<payload>` segments the signature covers
    signing_input: String,
}

impl Token {
    /// Sign a header and claim set.
    ///
    /// Fails with [`Error::InvalidHeader`] if `alg` is missing and
    /// [`Error::UnsupportedAlgorithm`] if it names an unknown algorithm.
    pub fn sign(header: Header, claims: Claims, secret: impl AsRef<[u8]>) -> Result<Self, Error> {
        let alg = header.require_algorithm()?;
        Self::sign_parts(alg, header, claims, secret.as_ref())
    }

    fn sign_parts(alg: Algorithm, header: Header, claims: Claims, secret: &[u8]) -> Result<Self, Error> {
        let header_segment = base64url::encode(json::serialize(&header)?);
        let payload_segment = base64url::encode(json::serialize(&claims)?);
        let signing_input = format!("{header_segment}{SEGMENT_SEPARATOR}{payload_segment}");
        let signature = sign(alg, secret, signing_input.as_bytes());

        tracing::debug!(
            "Signed token with {} - header: {} bytes, payload: {} bytes",
            alg,
            header_segment.len(),
            payload_segment.len()
        );

        Ok(Self {
            header,
            claims,
            signature,
            signing_input,
        })
    }

    /// Parse a compact token without verifying it.
    ///
    /// Fails with [`Error::MalformedToken`] unless there are exactly three
    /// non-empty segments, [`Error::MalformedEncoding`] if a segment is not
    /// base64url, and [`Error::MalformedPayload`] if the header or claims are
    /// not JSON objects.
    pub fn parse(token: &str) -> Result<Self, Error> {
        let segments = Segments::split(token)?;
        let header = Header::from_map(segments.parse_header()?);
        let claims = Claims::from_map(segments.parse_payload()?);
        let signature = segments.decode_signature()?;

        Ok(Self {
            header,
            claims,
            signature,
            signing_input: segments.signing_input.to_string(),
        })
    }

    /// Verify the token signature.
    ///
    /// A mismatch is reported as `valid: false`. Fails with
    /// [`Error::InvalidArgument`] for an empty secret and
    /// [`Error::InvalidHeader`] if the header has no usable algorithm.
    pub fn verify(&self, secret: impl AsRef<[u8]>) -> Result<VerifyResult, Error> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(Error::InvalidArgument("secret is required".to_string()));
        }
        let alg = usable_algorithm(&self.header)?;
        Ok(check_signature(alg, secret, &self.signing_input, &self.signature))
    }

    /// Verify the token claims.
    ///
    /// This is independent of the signature; call [`Token::verify`] first.
    pub fn verify_claims(&self, options: &VerificationOptions) -> Result<(), Error> {
        let now = current_timestamp();

        // Check expiration
        if options.verify_exp {
            match self.claims.numeric_date(claim_names::EXP)? {
                Some(exp) if now >= exp.saturating_add(options.leeway) => {
                    return Err(Error::Expired);
                }
                None if options.require_exp => {
                    return Err(Error::MissingClaim(claim_names::EXP.to_string()));
                }
                _ => {}
            }
        }

        // Check not before
        if options.verify_nbf {
            if let Some(nbf) = self.claims.numeric_date(claim_names::NBF)? {
                if now.saturating_add(options.leeway) < nbf {
                    return Err(Error::NotYetValid);
                }
            }
        }

        // Check issuer
        if let Some(expected_iss) = &options.expected_issuer {
            match self.claims.get(claim_names::ISS) {
                Some(Value::String(iss)) if iss == expected_iss => {}
                Some(_) => return Err(Error::InvalidIssuer),
                None if options.require_iss => {
                    return Err(Error::MissingClaim(claim_names::ISS.to_string()));
                }
                None => {}
            }
        }

        // Check audience
        if let Some(expected_aud) = &options.expected_audience {
            if self.claims.contains(claim_names::AUD) {
                if !self.claims.audiences().contains(&expected_aud.as_str()) {
                    return Err(Error::InvalidAudience);
                }
            } else if options.require_aud {
                return Err(Error::MissingClaim(claim_names::AUD.to_string()));
            }
        }

        Ok(())
    }

    /// Render the compact `header.payload.signature` form
    pub fn to_compact(&self) -> String {
        format!(
            "{}{}{}",
            self.signing_input,
            SEGMENT_SEPARATOR,
            base64url::encode(&self.signature)
        )
    }

    /// The `header.payload` text the signature covers
    pub fn signing_input(&self) -> &str {
        &self.signing_input
    }

    /// Get the algorithm named in the header, if supported
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.header.algorithm()
    }

    /// Check if the token has expired
    ///
    /// Returns `true` if the token has an expiration claim and the current time is at or after it.
    ///
    /// # Example
    ///
    /// ```
    /// use jwt_codec::{Algorithm, TokenBuilder};
    ///
    /// let token = TokenBuilder::new()
    ///     .algorithm(Algorithm::HS256)
    ///     .expires_in_secs(3600)
    ///     .sign(b"my-secret-key")
    ///     .unwrap();
    ///
    /// assert!(!token.is_expired());
    /// ```
    pub fn is_expired(&self) -> bool {
        match self.claims.expiration() {
            Some(exp) => current_timestamp() >= exp,
            None => false,
        }
    }

    /// Get the duration until token expiration
    ///
    /// Returns `None` if the token has no expiration claim or has already expired.
    pub fn expires_in(&self) -> Option<std::time::Duration> {
        let exp = self.claims.expiration()?;
        let now = current_timestamp();
        (now < exp).then(|| std::time::Duration::from_secs(exp - now))
    }

    /// Check if the token is valid based on the not-before (nbf) claim
    pub fn is_valid_yet(&self) -> bool {
        match self.claims.not_before() {
            Some(nbf) => current_timestamp() >= nbf,
            None => true,
        }
    }

    /// Get the issuer claim value
    pub fn issuer(&self) -> Option<&str> {
        self.claims.issuer()
    }

    /// Get the subject claim value
    pub fn subject(&self) -> Option<&str> {
        self.claims.subject()
    }

    /// Get the audience claim values
    pub fn audiences(&self) -> Vec<&str> {
        self.claims.audiences()
    }

    /// Get the expiration timestamp
    pub fn expiration(&self) -> Option<u64> {
        self.claims.expiration()
    }

    /// Get the not-before timestamp
    pub fn not_before(&self) -> Option<u64> {
        self.claims.not_before()
    }

    /// Get the issued-at timestamp
    pub fn issued_at(&self) -> Option<u64> {
        self.claims.issued_at()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact())
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::parse(s)
    }
}

/// Options for claim verification
#[derive(Debug, Clone)]
pub struct VerificationOptions {
    /// Verify expiration claim
    pub verify_exp: bool,
    /// Require expiration claim
    pub require_exp: bool,
    /// Verify not before claim
    pub verify_nbf: bool,
    /// Allowed clock skew in seconds for `exp` and `nbf`
    pub leeway: u64,
    /// Expected issuer
    pub expected_issuer: Option<String>,
    /// Require issuer claim
    pub require_iss: bool,
    /// Expected audience
    pub expected_audience: Option<String>,
    /// Require audience claim
    pub require_aud: bool,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationOptions {
    /// Create new default verification options
    ///
    /// `exp` and `nbf` are checked when present, with no leeway.
    pub fn new() -> Self {
        Self {
            verify_exp: true,
            require_exp: false,
            verify_nbf: true,
            leeway: 0,
            expected_issuer: None,
            require_iss: false,
            expected_audience: None,
            require_aud: false,
        }
    }

    /// Reject the token once `exp` has passed, if it carries one
    pub fn verify_exp(mut self, verify: bool) -> Self {
        self.verify_exp = verify;
        self
    }

    /// Fail with [`Error::MissingClaim`] when `exp` is absent; only read while `exp` is verified
    pub fn require_exp(mut self, require: bool) -> Self {
        self.require_exp = require;
        self
    }

    /// Reject the token before its `nbf` time, if it carries one
    pub fn verify_nbf(mut self, verify: bool) -> Self {
        self.verify_nbf = verify;
        self
    }

    /// Allowed clock skew in seconds, applied to both `exp` and `nbf`
    pub fn leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    /// Require `iss` to equal this string when present
    pub fn expected_issuer<S: Into<String>>(mut self, issuer: S) -> Self {
        self.expected_issuer = Some(issuer.into());
        self
    }

    /// Also fail when `iss` is absent; only read with an expected issuer
    pub fn require_iss(mut self, require: bool) -> Self {
        self.require_iss = require;
        self
    }

    /// Require `aud` (a string or an array of strings) to contain this value when present
    pub fn expected_audience<S: Into<String>>(mut self, audience: S) -> Self {
        self.expected_audience = Some(audience.into());
        self
    }

    /// Also fail when `aud` is absent; only read with an expected audience
    pub fn require_aud(mut self, require: bool) -> Self {
        self.require_aud = require;
        self
    }
}

/// Builder for creating tokens
///
/// The header is assembled as `alg`, then `typ` (`"JWT"` unless changed),
/// then any other parameters in the order they were added.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    algorithm: Option<Algorithm>,
    token_type: Option<String>,
    params: Header,
    claims: Claims,
}

impl Default for TokenBuilder {
    fn default() -> Self {
        Self {
            algorithm: None,
            token_type: Some(JWT_TYPE.to_string()),
            params: Header::new(),
            claims: Claims::new(),
        }
    }
}

impl TokenBuilder {
    /// Create a new token builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `alg` header parameter; signing fails without one
    pub fn algorithm(mut self, alg: Algorithm) -> Self {
        self.algorithm = Some(alg);
        self
    }

    /// Set the `typ` header parameter
    pub fn token_type<S: Into<String>>(mut self, typ: S) -> Self {
        self.token_type = Some(typ.into());
        self
    }

    /// Omit the `typ` header parameter
    pub fn without_token_type(mut self) -> Self {
        self.token_type = None;
        self
    }

    /// Set the `kid` header parameter
    pub fn key_id<S: Into<String>>(mut self, kid: S) -> Self {
        self.params.insert(header_params::KID, kid.into());
        self
    }

    /// Set the `cty` header parameter
    pub fn content_type<S: Into<String>>(mut self, cty: S) -> Self {
        self.params.insert(header_params::CTY, cty.into());
        self
    }

    /// Add an arbitrary header parameter
    pub fn header_param<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Replace the claim set
    pub fn claims(mut self, claims: Claims) -> Self {
        self.claims = claims;
        self
    }

    /// Set the registered claims
    pub fn registered_claims(mut self, claims: RegisteredClaims) -> Self {
        self.claims = self.claims.with_registered_claims(claims);
        self
    }

    /// Add a claim, replacing any earlier value under the same name
    ///
    /// Goes through `Value::from`, which turns NaN and infinities into `null`;
    /// pass float data through [`encode`] instead to have them rejected.
    pub fn claim<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.claims.insert(name, value);
        self
    }

    /// Set the issued-at claim to the current time
    pub fn issued_now(mut self) -> Self {
        self.claims.insert(claim_names::IAT, current_timestamp());
        self
    }

    /// Set `nbf` to an absolute NumericDate
    pub fn not_before(mut self, nbf: u64) -> Self {
        self.claims.insert(claim_names::NBF, nbf);
        self
    }

    /// Set `exp` to now plus `seconds`
    pub fn expires_in_secs(mut self, seconds: u64) -> Self {
        let exp = current_timestamp().saturating_add(seconds);
        self.claims.insert(claim_names::EXP, exp);
        self
    }

    /// Set `exp` to now plus `duration`, truncated to whole seconds
    pub fn expires_in(self, duration: std::time::Duration) -> Self {
        self.expires_in_secs(duration.as_secs())
    }

    /// Stamp `iat` with the current time and set `exp` to `seconds` after it
    ///
    /// # Example
    ///
    /// ```
    /// use jwt_codec::{Algorithm, TokenBuilder};
    ///
    /// let token = TokenBuilder::new()
    ///     .algorithm(Algorithm::HS384)
    ///     .valid_for_secs(3600)
    ///     .sign(b"my-secret-key")
    ///     .unwrap();
    ///
    /// assert!(token.issued_at().is_some());
    /// assert!(token.expiration().is_some());
    /// ```
    pub fn valid_for_secs(mut self, seconds: u64) -> Self {
        let now = current_timestamp();
        self.claims.insert(claim_names::IAT, now);
        self.claims.insert(claim_names::EXP, now.saturating_add(seconds));
        self
    }

    /// Like [`TokenBuilder::valid_for_secs`], truncated to whole seconds
    pub fn valid_for(self, duration: std::time::Duration) -> Self {
        self.valid_for_secs(duration.as_secs())
    }

    /// Assemble the header and sign `header.payload` with `secret`
    pub fn sign(self, secret: impl AsRef<[u8]>) -> Result<Token, Error> {
        let mut header = Header::new();
        if let Some(alg) = self.algorithm {
            header = header.with_algorithm(alg);
        }
        if let Some(typ) = self.token_type {
            header = header.with_type(typ);
        }
        for (name, value) in self.params.params {
            header.insert(name, value);
        }

        Token::sign(header, self.claims, secret)
    }
}
