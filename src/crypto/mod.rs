//! Cryptographic primitives for tfat.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id passphrase-based key derivation (`kdf`)

pub mod encryption;
pub mod kdf;

pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, generate_nonce, VaultKey, KEY_LEN, NONCE_LEN};
