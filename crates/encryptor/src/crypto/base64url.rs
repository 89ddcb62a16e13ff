//! URL-safe base64 without padding (RFC 4648 §5), the encoding of every
//! envelope segment.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

pub use base64::DecodeError;

/// Encode bytes as unpadded base64url.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode unpadded base64url. Padding characters and the standard-alphabet
/// `+`/`/` are rejected.
///
/// # Errors
///
/// Returns [`DecodeError`] if `encoded` is not canonical unpadded base64url.
pub fn decode(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded)
}

/// Returns `true` if `s` uses only the unpadded base64url alphabet.
pub fn is_base64url(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4648 §10 vectors, with padding stripped.
    const VECTORS: &[(&str, &str)] = &[
        ("", ""),
        ("f", "Zg"),
        ("fo", "Zm8"),
        ("foo", "Zm9v"),
        ("foob", "Zm9vYg"),
        ("fooba", "Zm9vYmE"),
        ("foobar", "Zm9vYmFy"),
    ];

    #[test]
    fn rfc4648_vectors_encode() {
        for (plain, encoded) in VECTORS {
            assert_eq!(encode(plain), *encoded, "encoding {plain:?}");
        }
    }

    #[test]
    fn rfc4648_vectors_decode() {
        for (plain, encoded) in VECTORS {
            assert_eq!(decode(encoded).unwrap(), plain.as_bytes());
        }
    }

    #[test]
    fn uses_url_safe_alphabet() {
        assert_eq!(encode([0xfb, 0xff]), "-_8");
        assert_eq!(encode([0xff, 0xfe, 0xfd]), "__79");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn rejects_padding_and_standard_alphabet() {
        assert!(decode("Zg==").is_err());
        assert!(decode("+/8").is_err());
    }

    #[test]
    fn alphabet_check() {
        assert!(is_base64url("Zm9v-_"));
        assert!(is_base64url(""));
        assert!(!is_base64url("Zg=="));
        assert!(!is_base64url("a\nb"));
        assert!(!is_base64url("a+b"));
    }
}
