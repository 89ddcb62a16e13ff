//! Primitives of the RSA-OAEP + A256CBC-HS512 construction.
//!
//! This module is free of I/O and of any knowledge of the request model. Each
//! step has its own error type; [`crate::envelope`] maps them onto
//! [`common::EncryptionFailure`].
//!
//! | Module        | Role                                          |
//! |---------------|-----------------------------------------------|
//! | [`random`]    | CSPRNG abstraction (CEK, IV, OAEP seed)       |
//! | [`base64url`] | unpadded URL-safe base64 for every segment    |
//! | [`keys`]      | 64-byte CEK with MAC/ENC halves, 16-byte IV   |
//! | [`header`]    | protected header JSON and its encoding        |
//! | [`key_wrap`]  | RSA-OAEP (SHA-1) wrapping of the CEK          |
//! | [`cipher`]    | AES-256-CBC with PKCS#7 padding               |
//! | [`tag`]       | truncated HMAC-SHA-512 authentication tag     |

pub mod base64url;
pub mod cipher;
pub mod header;
pub mod key_wrap;
pub mod keys;
pub mod random;
pub mod tag;

pub use key_wrap::PublicKeyMaterial;
pub use random::{OsRandom, RandomError, RandomSource};
