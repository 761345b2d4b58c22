//! # jwt-codec
//!
//! Encode, decode and verify JSON Web Tokens in the JWS compact serialization,
//! signed with a shared secret.
//!
//! ## Overview
//!
//! A token is three base64url segments separated by periods: the header JSON,
//! the claims JSON, and an HMAC over the first two segments. The format is
//! bit-compatible with other RFC 7519 implementations.
//!
//! ## Features
//!
//! - HS256, HS384 and HS512 (HMAC with SHA-256/384/512)
//! - Insertion-ordered JSON, so headers and claims are serialized as built
//! - Decoding without a secret, for inspecting untrusted tokens
//! - Constant-time signature comparison
//! - Signature mismatch reported as a result value, distinct from malformed input
//! - Optional registered-claim checks (`exp`, `nbf`, `iss`, `aud`)
//!
//! ## Basic Example
//!
//! ```rust
//! use jwt_codec::{decode, encode, verify, Algorithm, Claims, Header};
//!
//! let header = Header::jwt(Algorithm::HS256);
//! let claims = Claims::new()
//!     .with_claim("sub", "1234567890")
//!     .with_claim("name", "John Doe")
//!     .with_claim("iat", 1516239022);
//!
//! let token = encode(&header, &claims, "secret").expect("Failed to encode token");
//!
//! // Anyone can read the contents
//! let decoded = decode(&token).expect("Failed to decode token");
//! assert_eq!(decoded.header, header);
//! assert_eq!(decoded.payload, claims);
//!
//! // Only holders of the secret can authenticate them
//! assert!(verify(&token, "secret").expect("Malformed token").valid);
//! assert!(!verify(&token, "guess").expect("Malformed token").valid);
//! ```
//!
//! ## Builder Example
//!
//! ```rust
//! use jwt_codec::{Algorithm, RegisteredClaims, Token, TokenBuilder, VerificationOptions};
//!
//! let key = b"my-secret-key-for-hmac";
//!
//! let token = TokenBuilder::new()
//!     .algorithm(Algorithm::HS512)
//!     .key_id("key-2024")
//!     .registered_claims(
//!         RegisteredClaims::new()
//!             .with_issuer("example-issuer")
//!             .with_audience("example-audience"),
//!     )
//!     .valid_for_secs(3600)
//!     .claim("role", "admin")
//!     .sign(key)
//!     .expect("Failed to sign token");
//!
//! let received: Token = token.to_string().parse().expect("Failed to parse token");
//! assert!(received.verify(key).expect("Malformed token").valid);
//!
//! let options = VerificationOptions::new()
//!     .expected_issuer("example-issuer")
//!     .expected_audience("example-audience");
//! received.verify_claims(&options).expect("Failed to verify claims");
//! ```

pub mod base64url;
pub mod claims;
pub mod constants;
pub mod error;
pub mod header;
pub mod json;
pub mod token;
pub mod utils;

pub use claims::{Claims, ClaimsMap, RegisteredClaims};
pub use constants::{alg_names, claim_names, header_params, JWT_TYPE};
pub use error::Error;
pub use header::{Algorithm, Header, HeaderMap};
pub use token::{decode, encode, verify, Decoded, Token, TokenBuilder, VerificationOptions, VerifyResult};
pub use utils::current_timestamp;

/// Re-export serde_json for building claim values
pub use serde_json;
