//! Receiving-side counterpart of [`super::encrypt`]: verifies and decrypts an
//! envelope with the recipient's RSA private key.
//!
//! The tag is checked before any CBC decryption so that padding errors are
//! never observable for forged ciphertexts.

use common::RequestEncryptionData;
use rsa::RsaPrivateKey;
use thiserror::Error;
use zeroize::Zeroizing;

use super::{EncryptedEnvelope, EnvelopeParseError};
use crate::crypto::{
    base64url, cipher,
    header::{HeaderError, ProtectedHeader},
    key_wrap::{self, KeyWrapError},
    keys::InitializationVector,
    tag,
};

/// Errors produced while opening an envelope.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The envelope string is structurally invalid.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] EnvelopeParseError),

    /// The protected header could not be decoded.
    #[error("malformed protected header")]
    Header(#[from] HeaderError),

    /// A segment could not be base64url-decoded or has the wrong length.
    #[error("malformed {0} segment")]
    Segment(&'static str),

    /// The header names an algorithm pair other than RSA-OAEP / A256CBC-HS512.
    #[error("unsupported algorithm pair: alg={alg} enc={enc}")]
    UnsupportedAlgorithm { alg: String, enc: String },

    /// The CEK could not be unwrapped with the supplied private key.
    #[error("failed to unwrap content-encryption key")]
    KeyUnwrap(#[from] KeyWrapError),

    /// The authentication tag does not match.
    #[error("authentication failed")]
    Authentication,

    /// Decryption succeeded structurally but the plaintext is unusable.
    #[error("decryption failed")]
    Decryption,
}

/// The result of opening an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedEnvelope {
    /// `kid` from the protected header.
    pub key_id: String,
    /// Decrypted canonical JSON payload.
    pub payload: String,
}

impl OpenedEnvelope {
    /// Parse the payload back into a request.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the payload is not a
    /// request object.
    pub fn request(&self) -> Result<RequestEncryptionData, serde_json::Error> {
        serde_json::from_str(&self.payload)
    }
}

fn decode_segment(segment: &str, name: &'static str) -> Result<Vec<u8>, OpenError> {
    base64url::decode(segment).map_err(|_| OpenError::Segment(name))
}

/// Verify and decrypt `envelope` with `private_key`.
///
/// # Errors
///
/// Returns [`OpenError`] describing the first check that failed.
pub fn open(envelope: &str, private_key: &RsaPrivateKey) -> Result<OpenedEnvelope, OpenError> {
    let envelope: EncryptedEnvelope = envelope.parse()?;

    let header = ProtectedHeader::decode(&envelope.header)?;
    if !header.is_supported() {
        return Err(OpenError::UnsupportedAlgorithm {
            alg: header.alg,
            enc: header.enc,
        });
    }

    let wrapped = decode_segment(&envelope.encrypted_key, "encrypted key")?;
    let iv = InitializationVector::from_slice(&decode_segment(&envelope.iv, "iv")?)
        .ok_or(OpenError::Segment("iv"))?;
    let ciphertext = decode_segment(&envelope.ciphertext, "ciphertext")?;
    let received_tag = decode_segment(&envelope.tag, "tag")?;

    let cek = key_wrap::unwrap_key(&wrapped, private_key)?;

    tag::verify_tag(cek.mac_key(), envelope.aad(), iv.as_bytes(), &ciphertext, &received_tag)
        .map_err(|_| OpenError::Authentication)?;

    let plaintext = Zeroizing::new(
        cipher::decrypt(&ciphertext, cek.enc_key(), iv.as_bytes())
            .map_err(|_| OpenError::Decryption)?,
    );
    let payload = String::from_utf8(plaintext.to_vec()).map_err(|_| OpenError::Decryption)?;

    Ok(OpenedEnvelope {
        key_id: header.kid,
        payload,
    })
}
