//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` wraps the binary format layer and the crypto layer so
//! that the rest of the application deals only in `Vault` values:
//! `open` -> `unlock` -> mutate -> `save`.

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{decrypt, encrypt, generate_nonce, VaultKey};
use crate::errors::{Result, TfatError};

use super::codec;
use super::format::{self, PasswordMode, RawVault, VaultHeader};
use super::state::Vault;

/// Result of [`VaultStore::open`].
#[derive(Debug)]
pub enum Opened {
    /// No vault file exists yet; the caller should initialize one.
    NotFound,
    /// A vault file with a valid header was read and awaits unlocking.
    Locked(LockedVault),
}

/// A vault file that has been read but not yet decrypted.
#[derive(Debug)]
pub struct LockedVault {
    raw: RawVault,
}

impl LockedVault {
    /// Returns how the vault key is protected.
    pub fn mode(&self) -> PasswordMode {
        self.raw.header.mode
    }

    /// `true` if the user must supply a passphrase to unlock.
    pub fn requires_passphrase(&self) -> bool {
        self.mode() == PasswordMode::UserSupplied
    }
}

/// Handle on the vault file at a fixed path.
#[derive(Debug, Clone)]
pub struct VaultStore {
    /// Path to the vault file on disk.
    path: PathBuf,
}

impl VaultStore {
    /// Create a store for the vault file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store for the vault file configured in `settings`.
    pub fn from_settings(settings: &Settings, home: &Path) -> Self {
        Self::new(settings.vault_path(home))
    }

    /// Returns the path to the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a vault file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    // ------------------------------------------------------------------
    // Reading
    // ------------------------------------------------------------------

    /// Read the vault file and validate its header.
    pub fn open(&self) -> Result<Opened> {
        match format::read_vault(&self.path) {
            Ok(raw) => Ok(Opened::Locked(LockedVault { raw })),
            Err(TfatError::VaultNotFound(_)) => Ok(Opened::NotFound),
            Err(e) => Err(e),
        }
    }

    /// Decrypt a locked vault.
    ///
    /// `passphrase` is ignored for auto-generated vaults, whose key is
    /// derived from the header nonce.  A wrong passphrase and a tampered
    /// file both surface as `WrongPassword`.
    pub fn unlock(&self, locked: LockedVault, passphrase: &[u8]) -> Result<Vault> {
        let LockedVault { raw } = locked;
        let header = raw.header;

        let passphrase = match header.mode {
            PasswordMode::UserSupplied => Zeroizing::new(passphrase.to_vec()),
            PasswordMode::AutoGenerated => Zeroizing::new(header.nonce.to_vec()),
        };

        let key = VaultKey::derive(&passphrase, &header.nonce)?;
        let plaintext = Zeroizing::new(decrypt(key.as_bytes(), &header.nonce, &raw.ciphertext)?);
        drop(key);

        let accounts = codec::decode(&plaintext).map_err(|e| match e {
            TfatError::CorruptData(msg) => TfatError::InvalidVaultFormat(msg),
            other => other,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            accounts = accounts.len(),
            "unlocked vault"
        );

        // Auto-generated vaults get a fresh nonce-passphrase on every save.
        let passphrase = match header.mode {
            PasswordMode::UserSupplied => passphrase,
            PasswordMode::AutoGenerated => Zeroizing::new(Vec::new()),
        };

        Ok(Vault::from_parts(accounts, header.mode, passphrase))
    }

    /// Open and unlock in one step.
    ///
    /// Returns `Ok(None)` when no vault exists.  `passphrase` is only
    /// called for vaults that need one.
    pub fn load<F>(&self, passphrase: F) -> Result<Option<Vault>>
    where
        F: FnOnce() -> Result<Zeroizing<String>>,
    {
        match self.open()? {
            Opened::NotFound => Ok(None),
            Opened::Locked(locked) => {
                let vault = if locked.requires_passphrase() {
                    let pw = passphrase()?;
                    self.unlock(locked, pw.as_bytes())?
                } else {
                    self.unlock(locked, b"")?
                };
                Ok(Some(vault))
            }
        }
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Encrypt the vault under a fresh nonce and write it atomically.
    pub fn save(&self, vault: &Vault) -> Result<()> {
        let nonce = generate_nonce();
        let mode = vault.mode();

        let key = match mode {
            PasswordMode::UserSupplied => VaultKey::derive(vault.passphrase(), &nonce)?,
            PasswordMode::AutoGenerated => {
                tracing::info!("auto-generated mode: vault is protected by file permissions only");
                VaultKey::derive(&nonce, &nonce)?
            }
        };

        let plaintext = codec::encode(vault.accounts())?;
        let ciphertext = encrypt(key.as_bytes(), &nonce, &plaintext)?;
        drop(key);

        let raw = RawVault {
            header: VaultHeader { nonce, mode },
            ciphertext,
        };
        format::write_vault(&self.path, &raw)?;

        tracing::info!(
            path = %self.path.display(),
            accounts = vault.len(),
            "saved vault"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, VaultStore) {
        let dir = TempDir::new().unwrap();
        let store = VaultStore::new(dir.path().join("tfat.dat"));
        (dir, store)
    }

    #[test]
    fn open_without_file_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(store.open().unwrap(), Opened::NotFound));
        assert!(store.load(|| unreachable!()).unwrap().is_none());
    }

    #[test]
    fn auto_mode_needs_no_passphrase() {
        let (_dir, store) = store();
        let mut vault = Vault::new(b"");
        vault.add_account("github", "JBSWY3DPEHPK3PXP").unwrap();
        store.save(&vault).unwrap();

        let Opened::Locked(locked) = store.open().unwrap() else {
            panic!("expected a locked vault");
        };
        assert!(!locked.requires_passphrase());

        // Any supplied passphrase is ignored.
        let reopened = store.unlock(locked, b"whatever").unwrap();
        assert_eq!(reopened.accounts(), vault.accounts());
        assert_eq!(reopened.mode(), PasswordMode::AutoGenerated);
    }

    #[test]
    fn user_mode_requires_passphrase() {
        let (_dir, store) = store();
        store.save(&Vault::new(b"correct horse")).unwrap();

        let Opened::Locked(locked) = store.open().unwrap() else {
            panic!("expected a locked vault");
        };
        assert!(locked.requires_passphrase());
        assert_eq!(locked.mode(), PasswordMode::UserSupplied);
    }

    #[test]
    fn each_save_uses_a_new_nonce() {
        let (_dir, store) = store();
        let vault = Vault::new(b"pw-pw-pw");

        store.save(&vault).unwrap();
        let first = std::fs::read(store.path()).unwrap();
        store.save(&vault).unwrap();
        let second = std::fs::read(store.path()).unwrap();

        assert_ne!(first[..12], second[..12]);
    }
}
