//! Per-call symmetric key material: the 64-byte CEK and the 16-byte IV.
//!
//! Both are generated fresh for every envelope and zeroed when dropped. The
//! CEK is split in two halves:
//!
//! ```text
//! CEK[0..32]  -> HMAC-SHA-512 key
//! CEK[32..64] -> AES-256-CBC key
//! ```

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::random::{RandomError, RandomSource};

/// Byte length of the content-encryption key.
pub const CEK_LEN: usize = 64;

/// Byte length of each CEK half (MAC key and encryption key).
pub const HALF_KEY_LEN: usize = CEK_LEN / 2;

/// Byte length of the AES-CBC initialisation vector.
pub const IV_LEN: usize = 16;

/// Content-encryption key for A256CBC-HS512.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentEncryptionKey([u8; CEK_LEN]);

impl ContentEncryptionKey {
    /// Draw a fresh key from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError`] if the source fails.
    pub fn generate<R: RandomSource + ?Sized>(source: &R) -> Result<Self, RandomError> {
        let mut key = Self([0u8; CEK_LEN]);
        source.fill(&mut key.0)?;
        Ok(key)
    }

    /// Wrap existing key bytes (e.g. an unwrapped key on the receiving side).
    pub fn from_bytes(bytes: [u8; CEK_LEN]) -> Self {
        Self(bytes)
    }

    /// Wrap a slice, returning `None` unless it is exactly [`CEK_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; CEK_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    /// All 64 key bytes, as wrapped by RSA-OAEP.
    pub fn as_bytes(&self) -> &[u8; CEK_LEN] {
        &self.0
    }

    /// HMAC-SHA-512 key: the leading half.
    pub fn mac_key(&self) -> &[u8] {
        &self.0[..HALF_KEY_LEN]
    }

    /// AES-256 key: the trailing half.
    pub fn enc_key(&self) -> &[u8] {
        &self.0[HALF_KEY_LEN..]
    }
}

impl fmt::Debug for ContentEncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContentEncryptionKey([REDACTED])")
    }
}

/// AES-CBC initialisation vector.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct InitializationVector([u8; IV_LEN]);

impl InitializationVector {
    /// Draw a fresh IV from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RandomError`] if the source fails.
    pub fn generate<R: RandomSource + ?Sized>(source: &R) -> Result<Self, RandomError> {
        let mut iv = Self([0u8; IV_LEN]);
        source.fill(&mut iv.0)?;
        Ok(iv)
    }

    /// Wrap a slice, returning `None` unless it is exactly [`IV_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; IV_LEN] = bytes.try_into().ok()?;
        Some(Self(array))
    }

    pub fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

impl fmt::Debug for InitializationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitializationVector([REDACTED])")
    }
}
