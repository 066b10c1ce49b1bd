//! AES-256-GCM authenticated encryption.
//!
//! The nonce is supplied by the caller because the vault stores it in
//! the file header (it is also the key-derivation salt).  The returned
//! ciphertext carries the 16-byte authentication tag at its end.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use super::kdf::NONCE_LEN;
use crate::errors::{Result, TfatError};

/// Size of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` with a 32-byte `key` under `nonce`.
pub fn encrypt(key: &[u8], nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| TfatError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| TfatError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Decrypt and verify data produced by `encrypt`.
///
/// A tag mismatch is reported as `WrongPassword`: a wrong key and a
/// tampered ciphertext are indistinguishable here.
pub fn decrypt(key: &[u8], nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < TAG_LEN {
        return Err(TfatError::WrongPassword);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TfatError::WrongPassword)?;

    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| TfatError::WrongPassword)
}
