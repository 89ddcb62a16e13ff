//! Payment-field encryption engine.
//!
//! Turns a [`RequestEncryptionData`] and the gateway's RSA public key into a
//! compact, authenticated envelope (RSA-OAEP key wrapping, A256CBC-HS512
//! content encryption) so that card data never leaves the client in plaintext.
//!
//! ```no_run
//! use encryptor::{encrypt, PublicKeyMaterial, RequestEncryptionData};
//!
//! # fn run(pem: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let key = PublicKeyMaterial::from_pem("86b64e4e-f43e-4a27-9863-9bbd5b499f82", pem)?;
//! let request = RequestEncryptionData::new("clientSessionId", "nonce")
//!     .with_payment_product_id(1)
//!     .with_payment_value("cardNumber", "4012000033330026");
//! let envelope = encrypt(request, Some(&key))?;
//! println!("{envelope}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod telemetry;

pub use common::{EncryptionFailure, FailureKind, PaymentValue, RequestEncryptionData};
pub use crypto::{OsRandom, PublicKeyMaterial, RandomError, RandomSource};
pub use envelope::{encrypt, open, EncryptedEnvelope, OpenError, OpenedEnvelope, PaymentEncryptor};
