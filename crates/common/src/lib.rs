//! Common types, payload serialisation, and errors shared across the payment-field
//! encryption crates.

pub mod error;
pub mod protocol;

pub use error::{EncryptionFailure, FailureKind};
pub use protocol::{PaymentValue, RequestEncryptionData};
