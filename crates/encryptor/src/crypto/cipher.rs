//! AES-256-CBC with PKCS#7 padding: the content cipher of A256CBC-HS512.
//!
//! CBC alone provides no integrity. Ciphertext produced here is only ever
//! released together with the tag from [`super::tag`], and [`decrypt`] must
//! only be called after that tag has been verified.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

use super::keys::{HALF_KEY_LEN, IV_LEN};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key or IV is the wrong length.
    #[error("invalid key or IV length: expected {HALF_KEY_LEN}-byte key and {IV_LEN}-byte IV, got {key} and {iv}")]
    InvalidLength { key: usize, iv: usize },

    /// The decrypted plaintext does not end in valid PKCS#7 padding.
    #[error("invalid padding")]
    Padding,
}

/// Encrypt `plaintext` with AES-256-CBC and PKCS#7 padding.
///
/// The output length is the plaintext length rounded up to the next multiple
/// of 16, always adding at least one byte of padding.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] unless `key` is 32 bytes and `iv`
/// is 16 bytes.
pub fn encrypt(plaintext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CipherError::InvalidLength {
        key: key.len(),
        iv: iv.len(),
    })?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext and strip PKCS#7 padding.
///
/// # Errors
///
/// Returns [`CipherError::InvalidLength`] for a bad key or IV and
/// [`CipherError::Padding`] if the ciphertext does not unpad cleanly.
pub fn decrypt(ciphertext: &[u8], key: &[u8], iv: &[u8]) -> Result<Vec<u8>, CipherError> {
    let cipher = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CipherError::InvalidLength {
        key: key.len(),
        iv: iv.len(),
    })?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::Padding)
}
