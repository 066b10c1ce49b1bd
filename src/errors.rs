use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in tfat.
#[derive(Debug, Error)]
pub enum TfatError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Wrong password — the vault could not be decrypted")]
    WrongPassword,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("No vault found at {0}")]
    VaultNotFound(PathBuf),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Corrupt vault data: {0}")]
    CorruptData(String),

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Invalid account name: {0}")]
    InvalidAccountName(String),

    #[error("There are no accounts in the vault — run `tfat add <NAME> <SECRET>` first")]
    NoAccounts,

    // --- TOTP errors ---
    #[error("Invalid TOTP secret: {0}")]
    InvalidSecret(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Audit error: {0}")]
    AuditError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

/// Convenience type alias for tfat results.
pub type Result<T> = std::result::Result<T, TfatError>;
