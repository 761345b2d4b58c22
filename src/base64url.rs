//! URL-safe base64 without padding (RFC 4648 §5), as used by every token segment.

use crate::error::Error;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

/// Encode bytes with the URL-safe alphabet, omitting `=` padding.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url string.
///
/// Both padded and unpadded input are accepted. Characters outside
/// `[A-Za-z0-9_-]` and lengths that leave a single dangling symbol
/// (length mod 4 == 1) are rejected.
pub fn decode(input: &str) -> Result<Vec<u8>, Error> {
    let unpadded = input.trim_end_matches('=');
    let padding = input.len() - unpadded.len();

    if let Some((pos, c)) = unpadded
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
    {
        return Err(Error::MalformedEncoding(format!(
            "invalid base64url character {c:?} at offset {pos}"
        )));
    }

    if unpadded.len() % 4 == 1 {
        return Err(Error::MalformedEncoding(format!(
            "invalid base64url length {}",
            unpadded.len()
        )));
    }

    // Padding, when present, must complete the final quantum exactly
    if padding > 0 && (padding > 2 || input.len() % 4 != 0) {
        return Err(Error::MalformedEncoding(
            "inconsistent base64url padding".to_string(),
        ));
    }

    URL_SAFE_NO_PAD
        .decode(unpadded)
        .map_err(|e| Error::MalformedEncoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_omits_padding() {
        assert_eq!(encode(b"f"), "Zg");
        assert_eq!(encode(b"fo"), "Zm8");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode([0xfb, 0xff]), "-_8");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn test_decode_accepts_padded_and_unpadded() {
        assert_eq!(decode("Zg").unwrap(), b"f");
        assert_eq!(decode("Zg==").unwrap(), b"f");
        assert_eq!(decode("Zm8").unwrap(), b"fo");
        assert_eq!(decode("Zm8=").unwrap(), b"fo");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_decode_rejects_standard_alphabet() {
        assert!(matches!(decode("+/8"), Err(Error::MalformedEncoding(_))));
        assert!(matches!(decode("ab!c"), Err(Error::MalformedEncoding(_))));
        assert!(matches!(decode("ab c"), Err(Error::MalformedEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_dangling_symbol() {
        assert!(matches!(decode("a"), Err(Error::MalformedEncoding(_))));
        assert!(matches!(decode("abcde"), Err(Error::MalformedEncoding(_))));
    }

    #[test]
    fn test_decode_rejects_bad_padding() {
        assert!(matches!(decode("Zg="), Err(Error::MalformedEncoding(_))));
        assert!(matches!(decode("Zg==="), Err(Error::MalformedEncoding(_))));
        assert!(matches!(decode("Z=g="), Err(Error::MalformedEncoding(_))));
    }
}
