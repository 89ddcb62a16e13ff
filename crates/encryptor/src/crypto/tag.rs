//! Authentication tag for A256CBC-HS512 (RFC 7518 §5.2.2.1).
//!
//! ```text
//! AL  = big-endian u64 of len(AAD) * 8
//! M   = HMAC-SHA-512(mac_key, AAD || IV || ciphertext || AL)
//! tag = M[0..32]
//! ```
//!
//! The tag is the *leading* half of `M`. Any other slice is silently
//! incompatible with the receiving side.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use thiserror::Error;

use super::keys::HALF_KEY_LEN;

type HmacSha512 = Hmac<Sha512>;

/// Byte length of the truncated tag.
pub const TAG_LEN: usize = 32;

/// Errors produced by the tag layer.
#[derive(Debug, Error)]
pub enum TagError {
    /// The MAC key is not [`HALF_KEY_LEN`] bytes.
    #[error("invalid MAC key length: expected {HALF_KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The supplied tag does not match the recomputed one.
    #[error("authentication tag mismatch")]
    Mismatch,
}

/// The `AL` block: AAD length in bits as a big-endian u64.
pub fn aad_length_block(aad: &[u8]) -> [u8; 8] {
    (aad.len() as u64 * 8).to_be_bytes()
}

fn keyed_mac(mac_key: &[u8], aad: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<HmacSha512, TagError> {
    if mac_key.len() != HALF_KEY_LEN {
        return Err(TagError::InvalidKeyLength(mac_key.len()));
    }
    let mut mac =
        HmacSha512::new_from_slice(mac_key).map_err(|_| TagError::InvalidKeyLength(mac_key.len()))?;
    mac.update(aad);
    mac.update(iv);
    mac.update(ciphertext);
    mac.update(&aad_length_block(aad));
    Ok(mac)
}

/// Compute the truncated tag over `AAD || IV || ciphertext || AL`.
///
/// # Errors
///
/// Returns [`TagError::InvalidKeyLength`] if `mac_key` is not 32 bytes.
pub fn compute_tag(
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<[u8; TAG_LEN], TagError> {
    let full = keyed_mac(mac_key, aad, iv, ciphertext)?.finalize().into_bytes();
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&full[..TAG_LEN]);
    Ok(tag)
}

/// Check `tag` against the recomputed value in constant time.
///
/// # Errors
///
/// Returns [`TagError::Mismatch`] if the tag is wrong or not [`TAG_LEN`] bytes.
pub fn verify_tag(
    mac_key: &[u8],
    aad: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<(), TagError> {
    if tag.len() != TAG_LEN {
        return Err(TagError::Mismatch);
    }
    keyed_mac(mac_key, aad, iv, ciphertext)?
        .verify_truncated_left(tag)
        .map_err(|_| TagError::Mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_AAD: &[u8] = b"The second principle of Auguste Kerckhoffs";
    const RFC_IV: &str = "1af38c2dc2b96ffdd86694092341bc04";
    const RFC_CIPHERTEXT: &str = concat!(
        "4affaaadb78c31c5da4b1b590d10ffbd3dd8d5d302423526912da037ecbcc7bd",
        "822c301dd67c373bccb584ad3e9279c2e6d12a1374b77f077553df829410446b",
        "36ebd97066296ae6427ea75c2e0846a11a09ccf5370dc80bfecbad28c73f09b3",
        "a3b75e662a2594410ae496b2e2e6609e31e6e02cc837f053d21f37ff4f51950b",
        "be2638d09dd7a4930930806d0703b1f6",
    );
    const RFC_TAG: &str = "4dd3b4c088a7f45c216839645b2012bf2e6269a8c56a816dbc1b267761955bc5";

    fn rfc_inputs() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
        let mac_key: Vec<u8> = (0x00..0x20).collect();
        (
            mac_key,
            hex::decode(RFC_IV).unwrap(),
            hex::decode(RFC_CIPHERTEXT).unwrap(),
        )
    }

    #[test]
    fn aad_length_is_bits_big_endian() {
        assert_eq!(aad_length_block(RFC_AAD), [0, 0, 0, 0, 0, 0, 0x01, 0x50]);
        assert_eq!(aad_length_block(&[]), [0u8; 8]);
    }

    #[test]
    fn rfc7518_b3_tag() {
        let (mac_key, iv, ciphertext) = rfc_inputs();
        let tag = compute_tag(&mac_key, RFC_AAD, &iv, &ciphertext).unwrap();
        assert_eq!(hex::encode(tag), RFC_TAG);
    }

    #[test]
    fn tag_is_leading_half_of_full_hmac() {
        let (mac_key, iv, ciphertext) = rfc_inputs();
        let mut input = Vec::new();
        input.extend_from_slice(RFC_AAD);
        input.extend_from_slice(&iv);
        input.extend_from_slice(&ciphertext);
        input.extend_from_slice(&aad_length_block(RFC_AAD));
        let mut mac = HmacSha512::new_from_slice(&mac_key).unwrap();
        mac.update(&input);
        let full = mac.finalize().into_bytes();

        let tag = compute_tag(&mac_key, RFC_AAD, &iv, &ciphertext).unwrap();
        assert_eq!(&tag[..], &full[..TAG_LEN]);
        assert_ne!(&tag[..], &full[TAG_LEN..]);
    }

    #[test]
    fn any_single_byte_change_changes_tag() {
        let (mac_key, iv, ciphertext) = rfc_inputs();
        let reference = compute_tag(&mac_key, RFC_AAD, &iv, &ciphertext).unwrap();

        for i in 0..RFC_AAD.len() {
            let mut aad = RFC_AAD.to_vec();
            aad[i] ^= 0x01;
            assert_ne!(compute_tag(&mac_key, &aad, &iv, &ciphertext).unwrap(), reference);
        }
        for i in 0..iv.len() {
            let mut iv = iv.clone();
            iv[i] ^= 0x01;
            assert_ne!(compute_tag(&mac_key, RFC_AAD, &iv, &ciphertext).unwrap(), reference);
        }
        for i in 0..ciphertext.len() {
            let mut ct = ciphertext.clone();
            ct[i] ^= 0x80;
            assert_ne!(compute_tag(&mac_key, RFC_AAD, &iv, &ct).unwrap(), reference);
        }
    }

    #[test]
    fn verify_accepts_valid_and_rejects_invalid() {
        let (mac_key, iv, ciphertext) = rfc_inputs();
        let tag = hex::decode(RFC_TAG).unwrap();
        assert!(verify_tag(&mac_key, RFC_AAD, &iv, &ciphertext, &tag).is_ok());

        let mut bad = tag.clone();
        bad[31] ^= 0x01;
        assert!(matches!(
            verify_tag(&mac_key, RFC_AAD, &iv, &ciphertext, &bad),
            Err(TagError::Mismatch)
        ));
        assert!(verify_tag(&mac_key, RFC_AAD, &iv, &ciphertext, &tag[..16]).is_err());
    }

    #[test]
    fn rejects_wrong_key_length() {
        assert!(matches!(
            compute_tag(&[0u8; 64], b"", b"", b""),
            Err(TagError::InvalidKeyLength(64))
        ));
    }
}
