//! The JOSE protected header: `{"alg":"RSA-OAEP","enc":"A256CBC-HS512","kid":"..."}`.
//!
//! Its base64url form is both the first envelope segment and the AAD fed to
//! the authentication tag, so key order and encoding must not drift.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::base64url;

/// Key management algorithm identifier.
pub const ALG_RSA_OAEP: &str = "RSA-OAEP";

/// Content encryption algorithm identifier.
pub const ENC_A256CBC_HS512: &str = "A256CBC-HS512";

/// Errors produced while building or reading a protected header.
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The header could not be converted to or from JSON.
    #[error("protected header is not valid JSON")]
    Json(#[from] serde_json::Error),

    /// The header segment is not unpadded base64url.
    #[error("protected header is not valid base64url")]
    Encoding(#[from] base64url::DecodeError),
}

/// Protected header. Field order here is the serialised key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectedHeader {
    pub alg: String,
    pub enc: String,
    pub kid: String,
}

impl ProtectedHeader {
    /// The fixed RSA-OAEP / A256CBC-HS512 header for `key_id`.
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            alg: ALG_RSA_OAEP.into(),
            enc: ENC_A256CBC_HS512.into(),
            kid: key_id.into(),
        }
    }

    /// Whether this header names the only supported algorithm pair.
    pub fn is_supported(&self) -> bool {
        self.alg == ALG_RSA_OAEP && self.enc == ENC_A256CBC_HS512
    }

    /// Serialise to the canonical JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, HeaderError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialise and base64url-encode: the first envelope segment.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError::Json`] if serialisation fails.
    pub fn encode(&self) -> Result<String, HeaderError> {
        Ok(base64url::encode(self.to_json()?))
    }

    /// Parse an encoded header segment.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] if the segment is not base64url-encoded JSON
    /// with `alg`, `enc`, and `kid` string members.
    pub fn decode(segment: &str) -> Result<Self, HeaderError> {
        let bytes = base64url::decode(segment)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
