//! Builds the envelope from a request and the recipient's public key.
//!
//! Sequence for one call:
//! 1. Reject a missing public key before touching the random source.
//! 2. Serialise the request to its canonical JSON.
//! 3. Build and encode the protected header (also the AAD).
//! 4. Draw a fresh 64-byte CEK and 16-byte IV.
//! 5. Wrap the CEK with RSA-OAEP.
//! 6. Encrypt the payload with AES-256-CBC under `CEK[32..64]`.
//! 7. Tag `AAD || IV || ciphertext || AL` with HMAC-SHA-512 under `CEK[0..32]`.
//! 8. Join the five encoded segments.
//!
//! Nothing is emitted unless every step succeeds. Payment values, the CEK, and
//! the plaintext JSON never reach logs or error messages.

use common::{EncryptionFailure, FailureKind, RequestEncryptionData};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::EncryptedEnvelope;
use crate::crypto::{
    base64url, cipher,
    cipher::CipherError,
    header::{HeaderError, ProtectedHeader},
    key_wrap::{self, KeyWrapError, PublicKeyMaterial},
    keys::{ContentEncryptionKey, InitializationVector},
    random::{OsRandom, RandomError, RandomSource},
    tag::{self, TagError},
};

impl From<RandomError> for EncryptionFailure {
    fn from(e: RandomError) -> Self {
        EncryptionFailure::with_source(
            FailureKind::EntropyFailure,
            "failed to generate content-encryption key or IV",
            e,
        )
    }
}

impl From<KeyWrapError> for EncryptionFailure {
    fn from(e: KeyWrapError) -> Self {
        match e {
            KeyWrapError::Random(inner) => inner.into(),
            other => EncryptionFailure::with_source(
                FailureKind::KeyWrapFailure,
                "failed to wrap content-encryption key with RSA-OAEP",
                other,
            ),
        }
    }
}

impl From<CipherError> for EncryptionFailure {
    fn from(e: CipherError) -> Self {
        EncryptionFailure::with_source(
            FailureKind::CipherFailure,
            "failed to encrypt payload with AES-256-CBC",
            e,
        )
    }
}

impl From<TagError> for EncryptionFailure {
    fn from(e: TagError) -> Self {
        EncryptionFailure::with_source(
            FailureKind::MacFailure,
            "failed to compute HMAC-SHA-512 authentication tag",
            e,
        )
    }
}

impl From<HeaderError> for EncryptionFailure {
    fn from(e: HeaderError) -> Self {
        EncryptionFailure::with_source(
            FailureKind::SerializationFailure,
            "failed to serialise protected header",
            e,
        )
    }
}

/// Produces payment-field envelopes.
///
/// Stateless apart from the injected [`RandomSource`]; one instance may be
/// shared across threads when the source allows it (as [`OsRandom`] does).
#[derive(Debug, Clone, Default)]
pub struct PaymentEncryptor<R = OsRandom> {
    random: R,
}

impl PaymentEncryptor<OsRandom> {
    /// An encryptor backed by the operating-system CSPRNG.
    pub fn new() -> Self {
        Self { random: OsRandom }
    }
}

impl<R: RandomSource> PaymentEncryptor<R> {
    /// An encryptor drawing CEK, IV, and OAEP seed bytes from `random`.
    pub fn with_random_source(random: R) -> Self {
        Self { random }
    }

    /// Encrypt `request` for the holder of `public_key` and return the
    /// compact envelope string.
    ///
    /// # Errors
    ///
    /// Returns [`FailureKind::MissingPublicKey`] when `public_key` is `None`
    /// (no randomness is consumed in that case); otherwise an
    /// [`EncryptionFailure`] naming the step that failed.
    pub fn encrypt(
        &self,
        request: RequestEncryptionData,
        public_key: Option<&PublicKeyMaterial>,
    ) -> Result<String, EncryptionFailure> {
        let Some(public_key) = public_key else {
            warn!(kind = %FailureKind::MissingPublicKey, "payment field encryption skipped");
            return Err(EncryptionFailure::missing_public_key());
        };

        match self.seal(&request, public_key) {
            Ok(envelope) => {
                let envelope = envelope.to_string();
                debug!(
                    kid = public_key.key_id(),
                    fields = request.payment_values.len(),
                    envelope_len = envelope.len(),
                    "payment fields encrypted"
                );
                Ok(envelope)
            }
            Err(e) => {
                warn!(kind = %e.kind(), kid = public_key.key_id(), "payment field encryption failed");
                Err(e)
            }
        }
    }

    /// Build the envelope segments without joining them.
    ///
    /// # Errors
    ///
    /// As for [`PaymentEncryptor::encrypt`], minus the missing-key case.
    pub fn seal(
        &self,
        request: &RequestEncryptionData,
        public_key: &PublicKeyMaterial,
    ) -> Result<EncryptedEnvelope, EncryptionFailure> {
        let payload = Zeroizing::new(request.to_canonical_json().map_err(|e| {
            EncryptionFailure::with_source(
                FailureKind::SerializationFailure,
                "failed to serialise payment request",
                e,
            )
        })?);

        let header = ProtectedHeader::new(public_key.key_id()).encode()?;

        let cek = ContentEncryptionKey::generate(&self.random)?;
        let iv = InitializationVector::generate(&self.random)?;

        let encrypted_key = key_wrap::wrap_key(&cek, public_key.public_key(), &self.random)?;
        let ciphertext = cipher::encrypt(payload.as_bytes(), cek.enc_key(), iv.as_bytes())?;
        let tag = tag::compute_tag(cek.mac_key(), header.as_bytes(), iv.as_bytes(), &ciphertext)?;

        Ok(EncryptedEnvelope {
            encrypted_key: base64url::encode(&encrypted_key),
            iv: base64url::encode(iv.as_bytes()),
            ciphertext: base64url::encode(&ciphertext),
            tag: base64url::encode(tag),
            header,
        })
    }
}

/// Encrypt `request` with the operating-system CSPRNG.
///
/// # Errors
///
/// See [`PaymentEncryptor::encrypt`].
pub fn encrypt(
    request: RequestEncryptionData,
    public_key: Option<&PublicKeyMaterial>,
) -> Result<String, EncryptionFailure> {
    PaymentEncryptor::new().encrypt(request, public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::random::MockRandomSource;

    const PUBLIC_PEM: &str = include_str!("../../tests/fixtures/rsa_public.pem");

    fn key() -> PublicKeyMaterial {
        PublicKeyMaterial::from_pem("86b64e4e-f43e-4a27-9863-9bbd5b499f82", PUBLIC_PEM).unwrap()
    }

    fn request() -> RequestEncryptionData {
        RequestEncryptionData::new("clientSessionId", "nonce")
            .with_payment_product_id(1)
            .with_payment_value("cardNumber", "4012000033330026")
    }

    #[test]
    fn missing_key_consumes_no_randomness() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill().times(0);
        let encryptor = PaymentEncryptor::with_random_source(mock);

        let err = encryptor.encrypt(request(), None).unwrap_err();
        assert_eq!(err.kind(), FailureKind::MissingPublicKey);
        assert!(err.is_retryable());
    }

    #[test]
    fn draws_cek_then_iv_then_oaep_seed() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockRandomSource::new();
        for len in [64usize, 16, 20] {
            mock.expect_fill()
                .withf(move |dest| dest.len() == len)
                .times(1)
                .in_sequence(&mut seq)
                .returning(|dest| {
                    dest.iter_mut().for_each(|b| *b = 0x5A);
                    Ok(())
                });
        }
        let encryptor = PaymentEncryptor::with_random_source(mock);
        assert!(encryptor.encrypt(request(), Some(&key())).is_ok());
    }

    #[test]
    fn entropy_failure_is_reported_without_output() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill()
            .returning(|_| Err(RandomError::Unavailable(rand_core::Error::new("offline"))));
        let encryptor = PaymentEncryptor::with_random_source(mock);

        let err = encryptor.encrypt(request(), Some(&key())).unwrap_err();
        assert_eq!(err.kind(), FailureKind::EntropyFailure);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn failure_message_does_not_leak_values() {
        let mut mock = MockRandomSource::new();
        mock.expect_fill()
            .returning(|_| Err(RandomError::Unavailable(rand_core::Error::new("offline"))));
        let encryptor = PaymentEncryptor::with_random_source(mock);

        let err = encryptor.encrypt(request(), Some(&key())).unwrap_err();
        assert!(!err.to_string().contains("4012000033330026"));
        assert!(!format!("{err:?}").contains("4012000033330026"));
    }

    #[test]
    fn seal_uses_header_segment_as_aad() {
        let sealed = PaymentEncryptor::new().seal(&request(), &key()).unwrap();
        let expected = ProtectedHeader::new(key().key_id()).encode().unwrap();
        assert_eq!(sealed.header, expected);
        assert_eq!(sealed.aad(), expected.as_bytes());
    }

    #[test]
    fn wrap_failure_maps_to_key_wrap_kind() {
        let e: EncryptionFailure = KeyWrapError::InvalidKey("bad").into();
        assert_eq!(e.kind(), FailureKind::KeyWrapFailure);

        let e: EncryptionFailure =
            KeyWrapError::Random(RandomError::Unavailable(rand_core::Error::new("x"))).into();
        assert_eq!(e.kind(), FailureKind::EntropyFailure);
    }

    #[test]
    fn step_errors_map_to_their_kinds() {
        let e: EncryptionFailure = CipherError::Padding.into();
        assert_eq!(e.kind(), FailureKind::CipherFailure);
        let e: EncryptionFailure = TagError::InvalidKeyLength(3).into();
        assert_eq!(e.kind(), FailureKind::MacFailure);
    }
}
