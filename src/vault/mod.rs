//! Vault module — encrypted TOTP secret storage.
//!
//! This module provides:
//! - Binary vault file format and atomic writes (`format`)
//! - Plaintext encoding of the account map (`codec`)
//! - The decrypted in-memory `Vault` (`state`)
//! - High-level `VaultStore` for opening, unlocking, and saving (`store`)

pub mod codec;
pub mod format;
pub mod state;
pub mod store;

// Re-export the most commonly used items.
pub use format::{PasswordMode, VaultHeader, HEADER_LEN};
pub use state::{validate_account_name, Vault};
pub use store::{LockedVault, Opened, VaultStore};
