//! The decrypted, in-memory vault.
//!
//! A `Vault` owns the account-name -> secret map and the passphrase it
//! will be re-encrypted with.  Both are wiped from memory on drop.

use std::collections::BTreeMap;

use zeroize::{Zeroize, Zeroizing};

use super::format::PasswordMode;
use crate::errors::{Result, TfatError};
use crate::totp::{self, TotpCode};

/// Longest account name we accept.
const MAX_NAME_LEN: usize = 128;

pub struct Vault {
    accounts: BTreeMap<String, String>,
    mode: PasswordMode,
    passphrase: Zeroizing<Vec<u8>>,
}

impl Vault {
    /// Create an empty vault protected by `passphrase`.
    ///
    /// An empty passphrase selects auto-generated mode.
    pub fn new(passphrase: &[u8]) -> Self {
        Self {
            accounts: BTreeMap::new(),
            mode: PasswordMode::for_passphrase(passphrase),
            passphrase: Zeroizing::new(passphrase.to_vec()),
        }
    }

    /// Rebuild a vault from decrypted parts (used by `VaultStore::unlock`).
    pub(crate) fn from_parts(
        accounts: BTreeMap<String, String>,
        mode: PasswordMode,
        passphrase: Zeroizing<Vec<u8>>,
    ) -> Self {
        Self {
            accounts,
            mode,
            passphrase,
        }
    }

    // ------------------------------------------------------------------
    // Account operations
    // ------------------------------------------------------------------

    /// Add an account, or replace the secret of an existing one.
    ///
    /// The secret is normalized to unpadded uppercase base32 and must
    /// decode; nothing is changed if it does not.  Returns `true` when an
    /// existing account was replaced.
    pub fn add_account(&mut self, name: &str, secret: &str) -> Result<bool> {
        let name = validate_account_name(name)?;
        let secret = totp::normalize_secret(secret)?;

        match self.accounts.insert(name.to_string(), secret) {
            Some(mut old) => {
                old.zeroize();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove an account.
    pub fn remove_account(&mut self, name: &str) -> Result<()> {
        match self.accounts.remove(name.trim()) {
            Some(mut secret) => {
                secret.zeroize();
                Ok(())
            }
            None => Err(TfatError::AccountNotFound(name.to_string())),
        }
    }

    /// Account names in sorted order.
    pub fn account_names(&self) -> Vec<&str> {
        self.accounts.keys().map(String::as_str).collect()
    }

    /// Returns the stored secret for `name`.
    pub fn secret(&self, name: &str) -> Result<&str> {
        self.accounts
            .get(name.trim())
            .map(String::as_str)
            .ok_or_else(|| TfatError::AccountNotFound(name.to_string()))
    }

    /// Compute the TOTP code for `name` at `unix_seconds`.
    pub fn code(&self, name: &str, unix_seconds: u64) -> Result<TotpCode> {
        totp::generate(self.secret(name)?, unix_seconds)
    }

    /// Returns `true` if the vault holds an account with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.accounts.contains_key(name.trim())
    }

    /// Returns the number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns `true` if there are no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Read-only view of the account map.
    pub fn accounts(&self) -> &BTreeMap<String, String> {
        &self.accounts
    }

    // ------------------------------------------------------------------
    // Passphrase
    // ------------------------------------------------------------------

    /// Replace the passphrase used by the next save.
    ///
    /// An empty passphrase switches the vault to auto-generated mode.
    pub fn change_passphrase(&mut self, passphrase: &[u8]) {
        self.mode = PasswordMode::for_passphrase(passphrase);
        self.passphrase = Zeroizing::new(passphrase.to_vec());
    }

    /// Returns how the vault key is protected.
    pub fn mode(&self) -> PasswordMode {
        self.mode
    }

    pub(crate) fn passphrase(&self) -> &[u8] {
        &self.passphrase
    }
}

impl Drop for Vault {
    fn drop(&mut self) {
        for secret in self.accounts.values_mut() {
            secret.zeroize();
        }
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("accounts", &self.account_names())
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Validate an account name and return it trimmed.
///
/// Must be non-empty after trimming, at most 128 characters, and free of
/// control characters.
pub fn validate_account_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TfatError::InvalidAccountName(
            "account name cannot be empty".into(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(TfatError::InvalidAccountName(format!(
            "account name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(TfatError::InvalidAccountName(format!(
            "account name '{}' contains control characters",
            name.escape_debug()
        )));
    }
    Ok(name)
}
