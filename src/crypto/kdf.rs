//! Passphrase-based key derivation using Argon2id.
//!
//! The vault header stores only the nonce, so the Argon2id cost
//! parameters are fixed: changing them would make every existing vault
//! unreadable.  The nonce doubles as the KDF salt, which means a fresh
//! key is derived on every save.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, TfatError};

/// Length of the per-file nonce in bytes (AES-GCM standard nonce).
pub const NONCE_LEN: usize = 12;

/// Length of the derived vault key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Argon2id memory cost in KiB (32 MB).
const MEMORY_KIB: u32 = 32 * 1024;

/// Argon2id iteration count.
const ITERATIONS: u32 = 3;

/// Argon2id parallelism lanes.
const PARALLELISM: u32 = 4;

/// Derive `key_len` bytes of key material from a passphrase and nonce.
///
/// The same passphrase + nonce + length always produce the same key.
/// An empty passphrase is accepted; auto-generated vaults pass the
/// nonce itself as the passphrase.
pub fn derive_key(passphrase: &[u8], nonce: &[u8], key_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(key_len))
        .map_err(|e| TfatError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new(vec![0u8; key_len]);
    argon2
        .hash_password_into(passphrase, nonce, &mut key)
        .map_err(|e| TfatError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a cryptographically random nonce for a new vault write.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rng().fill_bytes(&mut nonce);
    nonce
}

/// A 32-byte vault key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Derive the vault key for `passphrase` and the file `nonce`.
    pub fn derive(passphrase: &[u8], nonce: &[u8]) -> Result<Self> {
        let derived = derive_key(passphrase, nonce, KEY_LEN)?;
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&derived);
        Ok(Self { bytes })
    }

    /// Access the raw key bytes (e.g. to build the cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}
