//! Caller-facing error type for payment-field encryption.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Boxed underlying cause carried by an [`EncryptionFailure`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// The step of the encryption pipeline that failed.
///
/// Only [`FailureKind::MissingPublicKey`] is actionable by the caller (fetch
/// the key again, then retry the whole operation). Every other kind is
/// deterministic for the given inputs and points at a defect or a bad key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// No public key material was supplied.
    MissingPublicKey,
    /// RSA-OAEP wrapping of the content-encryption key failed.
    KeyWrapFailure,
    /// AES-CBC encryption of the payload failed.
    CipherFailure,
    /// HMAC computation of the authentication tag failed.
    MacFailure,
    /// The request could not be converted to JSON.
    SerializationFailure,
    /// The CSPRNG could not produce key or IV bytes.
    EntropyFailure,
}

impl FailureKind {
    /// Short machine-readable name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingPublicKey => "missing_public_key",
            FailureKind::KeyWrapFailure => "key_wrap_failure",
            FailureKind::CipherFailure => "cipher_failure",
            FailureKind::MacFailure => "mac_failure",
            FailureKind::SerializationFailure => "serialization_failure",
            FailureKind::EntropyFailure => "entropy_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single failure type returned by the encryption engine.
///
/// The message describes which step failed and never embeds payment values
/// or key material. The underlying cause, if any, is reachable through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("encryption failure ({kind}): {message}")]
pub struct EncryptionFailure {
    kind: FailureKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl EncryptionFailure {
    /// Construct a failure without an underlying cause.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Construct a failure that wraps an underlying cause.
    pub fn with_source(
        kind: FailureKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Shorthand for [`FailureKind::MissingPublicKey`].
    pub fn missing_public_key() -> Self {
        Self::new(
            FailureKind::MissingPublicKey,
            "public key material is not available",
        )
    }

    /// The pipeline step that failed.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns `true` if re-fetching the public key and retrying may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind == FailureKind::MissingPublicKey
    }
}
