//! HMAC signing and other utility functions

use crate::error::Error;
use crate::header::Algorithm;
use hmac_sha256::HMAC as HmacSha256;
use hmac_sha512::sha384::HMAC as HmacSha384;
use hmac_sha512::HMAC as HmacSha512;

/// Compute the HMAC of `message` under `secret` with the given algorithm.
///
/// The result is always [`Algorithm::signature_len`] bytes long.
pub fn sign(alg: Algorithm, secret: &[u8], message: &[u8]) -> Vec<u8> {
    match alg {
        Algorithm::HS256 => HmacSha256::mac(message, secret).to_vec(),
        Algorithm::HS384 => HmacSha384::mac(message, secret).to_vec(),
        Algorithm::HS512 => HmacSha512::mac(message, secret).to_vec(),
    }
}

/// Compute an HMAC for an algorithm given by its `alg` name.
pub fn sign_with_name(alg: &str, secret: &[u8], message: &[u8]) -> Result<Vec<u8>, Error> {
    let alg: Algorithm = alg.parse()?;
    Ok(sign(alg, secret, message))
}

/// Verify an HMAC signature.
///
/// The comparison runs in constant time with respect to the contents of
/// both signatures. A signature of the wrong length is simply not valid.
pub fn verify_signature(alg: Algorithm, secret: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let computed_mac = sign(alg, secret, message);
    ct_codecs::verify(&computed_mac, signature)
}

/// Get current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
