//! RSA-OAEP (SHA-1, MGF1-SHA-1) wrapping of the content-encryption key.
//!
//! The padding is fixed: there is no negotiation with the recipient, and the
//! `RSA-OAEP` header value always means SHA-1 for both the digest and MGF1.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::{
    pkcs1::DecodeRsaPublicKey, pkcs8::DecodePublicKey, Oaep, RsaPrivateKey, RsaPublicKey,
};
use sha1::Sha1;
use thiserror::Error;

use super::keys::ContentEncryptionKey;
use super::random::{RandomError, RandomSource, SourceRng};

/// Errors produced by the key-wrapping layer.
#[derive(Debug, Error)]
pub enum KeyWrapError {
    /// The public key could not be parsed.
    #[error("invalid RSA public key: {0}")]
    InvalidKey(&'static str),

    /// RSA-OAEP encryption or decryption failed (e.g. key too small).
    #[error("RSA-OAEP operation failed")]
    Rsa(#[from] rsa::Error),

    /// The OAEP seed could not be generated.
    #[error("OAEP seed generation failed")]
    Random(#[from] RandomError),

    /// The unwrapped key does not have the expected length.
    #[error("unwrapped key has invalid length: {0} bytes")]
    InvalidKeyLength(usize),
}

/// A recipient public key and the identifier the gateway issued it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyMaterial {
    key_id: String,
    public_key: RsaPublicKey,
}

impl PublicKeyMaterial {
    /// Pair an already-parsed key with its identifier.
    pub fn new(key_id: impl Into<String>, public_key: RsaPublicKey) -> Self {
        Self {
            key_id: key_id.into(),
            public_key,
        }
    }

    /// Parse a PEM public key: SubjectPublicKeyInfo (`PUBLIC KEY`) or
    /// PKCS#1 (`RSA PUBLIC KEY`).
    ///
    /// # Errors
    ///
    /// Returns [`KeyWrapError::InvalidKey`] if neither form parses.
    pub fn from_pem(key_id: impl Into<String>, pem: &str) -> Result<Self, KeyWrapError> {
        let pem = pem.trim();
        let public_key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|_| KeyWrapError::InvalidKey("not a PEM-encoded RSA public key"))?;
        Ok(Self::new(key_id, public_key))
    }

    /// Parse a standard-base64 DER SubjectPublicKeyInfo, the form returned by
    /// the gateway's public key endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`KeyWrapError::InvalidKey`] if the input is not base64 or not
    /// an RSA SubjectPublicKeyInfo.
    pub fn from_base64_der(key_id: impl Into<String>, encoded: &str) -> Result<Self, KeyWrapError> {
        let der = STANDARD
            .decode(encoded.trim())
            .map_err(|_| KeyWrapError::InvalidKey("public key is not valid base64"))?;
        let public_key = RsaPublicKey::from_public_key_der(&der)
            .map_err(|_| KeyWrapError::InvalidKey("not a DER-encoded RSA public key"))?;
        Ok(Self::new(key_id, public_key))
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

/// Encrypt the CEK under `public_key` with RSA-OAEP (SHA-1 / MGF1-SHA-1).
///
/// The OAEP seed is drawn from `source`.
///
/// # Errors
///
/// Returns [`KeyWrapError::Rsa`] if the key is too small for a 64-byte
/// message, or [`KeyWrapError::Random`] if the seed could not be generated.
pub fn wrap_key<R: RandomSource + ?Sized>(
    cek: &ContentEncryptionKey,
    public_key: &RsaPublicKey,
    source: &R,
) -> Result<Vec<u8>, KeyWrapError> {
    let mut rng = SourceRng::new(source);
    let wrapped = public_key.encrypt(&mut rng, Oaep::new::<Sha1>(), cek.as_bytes());
    // A failed seed draw leaves a zero seed; discard whatever was produced.
    rng.finish()?;
    Ok(wrapped?)
}

/// Recover the CEK from a wrapped key.
///
/// # Errors
///
/// Returns [`KeyWrapError::Rsa`] on decryption failure, or
/// [`KeyWrapError::InvalidKeyLength`] if the plaintext is not a 64-byte CEK.
pub fn unwrap_key(
    wrapped: &[u8],
    private_key: &RsaPrivateKey,
) -> Result<ContentEncryptionKey, KeyWrapError> {
    let plaintext = zeroize::Zeroizing::new(private_key.decrypt(Oaep::new::<Sha1>(), wrapped)?);
    ContentEncryptionKey::from_slice(&plaintext)
        .ok_or(KeyWrapError::InvalidKeyLength(plaintext.len()))
}
