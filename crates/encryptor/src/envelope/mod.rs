//! Compact five-segment envelope and the operations that produce and open it.
//!
//! # Wire format
//!
//! ```text
//! <b64u(header)>.<b64u(RSA-OAEP(CEK))>.<b64u(IV)>.<b64u(AES-CBC(payload))>.<b64u(tag)>
//! ```
//!
//! Every segment is unpadded base64url; segments are joined with a literal `.`.

pub mod encrypt;
pub mod open;

pub use encrypt::{encrypt, PaymentEncryptor};
pub use open::{open, OpenError, OpenedEnvelope};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::crypto::base64url;

/// Number of dot-separated segments in an envelope.
pub const SEGMENT_COUNT: usize = 5;

/// Errors from parsing an envelope string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeParseError {
    /// The string does not have exactly [`SEGMENT_COUNT`] segments.
    #[error("expected {SEGMENT_COUNT} segments, found {0}")]
    SegmentCount(usize),

    /// A segment is empty or contains characters outside unpadded base64url.
    #[error("segment {0} is not unpadded base64url")]
    InvalidSegment(usize),
}

/// The five encoded segments of an envelope, in wire order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    /// Base64url of the protected header JSON; also the AAD.
    pub header: String,
    /// Base64url of the RSA-OAEP wrapped CEK.
    pub encrypted_key: String,
    /// Base64url of the IV.
    pub iv: String,
    /// Base64url of the AES-CBC ciphertext.
    pub ciphertext: String,
    /// Base64url of the truncated HMAC tag.
    pub tag: String,
}

impl EncryptedEnvelope {
    /// Segments in wire order.
    pub fn segments(&self) -> [&str; SEGMENT_COUNT] {
        [
            &self.header,
            &self.encrypted_key,
            &self.iv,
            &self.ciphertext,
            &self.tag,
        ]
    }

    /// The additional authenticated data: the ASCII bytes of the header segment.
    pub fn aad(&self) -> &[u8] {
        self.header.as_bytes()
    }
}

impl fmt::Display for EncryptedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("."))
    }
}

impl FromStr for EncryptedEnvelope {
    type Err = EnvelopeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != SEGMENT_COUNT {
            return Err(EnvelopeParseError::SegmentCount(parts.len()));
        }
        if let Some(i) = parts
            .iter()
            .position(|p| p.is_empty() || !base64url::is_base64url(p))
        {
            return Err(EnvelopeParseError::InvalidSegment(i));
        }
        Ok(Self {
            header: parts[0].to_owned(),
            encrypted_key: parts[1].to_owned(),
            iv: parts[2].to_owned(),
            ciphertext: parts[3].to_owned(),
            tag: parts[4].to_owned(),
        })
    }
}
