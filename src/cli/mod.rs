//! CLI module — Clap argument parser, prompts, output helpers, and
//! command implementations.

pub mod clipboard;
pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::{default_home, Settings};
use crate::errors::{Result, TfatError};
use crate::vault::{Vault, VaultStore};

/// Minimum length for a typed passphrase (empty selects auto mode).
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the vault passphrase non-interactively.
const PASSWORD_ENV: &str = "TFAT_PASSWORD";

/// Environment variable that supplies the replacement passphrase for
/// `tfat password`.
const NEW_PASSWORD_ENV: &str = "TFAT_NEW_PASSWORD";

/// tfat: two-factor authentication codes from an encrypted local vault.
#[derive(Parser)]
#[command(
    name = "tfat",
    about = "Two-factor authentication codes from an encrypted local vault",
    version
)]
pub struct Cli {
    /// Command to run (default: show a live code)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the vault and config (default: ~/.tfat)
    #[arg(long, env = "TFAT_HOME", global = true)]
    pub home: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add an account (or replace its secret)
    Add {
        /// Account name (e.g. github)
        name: String,
        /// Base32 TOTP secret (omit for interactive prompt)
        secret: Option<String>,
    },

    /// Delete an account
    Delete {
        /// Account name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List all accounts
    List,

    /// Show the live code for an account
    Code(CodeArgs),

    /// Change the vault passphrase
    Password,

    /// View the audit log of vault changes
    Audit {
        /// Number of entries to show (default: 50)
        #[arg(long, default_value = "50")]
        last: usize,
        /// Show entries since a duration ago (e.g. 7d, 24h, 30m)
        #[arg(long)]
        since: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for `tfat code` (also used when no subcommand is given).
#[derive(clap::Args, Default)]
pub struct CodeArgs {
    /// Account name (prompted for when omitted and there are several)
    pub name: Option<String>,

    /// Print the current code once and exit
    #[arg(long)]
    pub once: bool,

    /// Do not copy codes to the clipboard
    #[arg(long)]
    pub no_copy: bool,
}

impl Cli {
    /// Resolve the tfat home directory from `--home`, `TFAT_HOME`, or `~/.tfat`.
    pub fn home_dir(&self) -> Result<PathBuf> {
        match &self.home {
            Some(home) => Ok(home.clone()),
            None => default_home(),
        }
    }
}

/// Everything a command needs to reach the vault.
pub struct Context {
    pub home: PathBuf,
    pub settings: Settings,
    pub store: VaultStore,
}

impl Context {
    /// Resolve the home directory, load settings, and build the store.
    pub fn load(cli: &Cli) -> Result<Self> {
        let home = cli.home_dir()?;
        let settings = Settings::load(&home)?;
        let store = VaultStore::from_settings(&settings, &home);
        tracing::debug!(home = %home.display(), vault = %store.path().display(), "resolved context");
        Ok(Self {
            home,
            settings,
            store,
        })
    }

    /// Open and unlock the vault, prompting for the passphrase if needed.
    ///
    /// Fails with `VaultNotFound` when no vault exists.
    pub fn unlock(&self) -> Result<Vault> {
        self.store
            .load(prompt_password)?
            .ok_or_else(|| TfatError::VaultNotFound(self.store.path().to_path_buf()))
    }

    /// Unlock the existing vault, or start a new one on first use.
    ///
    /// The returned flag is `true` when the vault is new (nothing has
    /// been written yet).
    pub fn unlock_or_init(&self) -> Result<(Vault, bool)> {
        match self.store.load(prompt_password)? {
            Some(vault) => Ok((vault, false)),
            None => {
                output::info("No vault yet; choose a passphrase to create one.");
                let passphrase = prompt_new_password()?;
                Ok((Vault::new(passphrase.as_bytes()), true))
            }
        }
    }

    /// Record a vault change in the audit log.
    ///
    /// Account names are never passed on: the audit database is not
    /// encrypted.
    pub fn audit(&self, operation: &str, details: Option<&str>) {
        crate::audit::log_audit(&self.home, operation, details);
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault passphrase, trying in order:
/// 1. `TFAT_PASSWORD` env var (scripts)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the passphrase is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter vault passphrase")
        .interact()
        .map_err(|e| TfatError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for the passphrase of a vault being created.
///
/// An empty passphrase selects auto-generated mode, which is announced
/// with a warning.  Also respects `TFAT_PASSWORD`.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    read_new_password(PASSWORD_ENV)
}

/// Prompt for the passphrase that replaces the current one.
///
/// Reads `TFAT_NEW_PASSWORD` rather than `TFAT_PASSWORD`, which already
/// holds the passphrase used to unlock.
pub fn prompt_replacement_password() -> Result<Zeroizing<String>> {
    read_new_password(NEW_PASSWORD_ENV)
}

fn read_new_password(env_var: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(env_var) {
        if !pw.is_empty() {
            check_password_len(&pw)?;
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("New passphrase (empty for none)")
                .with_confirmation("Confirm passphrase", "Passphrases do not match, try again")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| TfatError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.is_empty() {
            output::warning(
                "No passphrase: the vault key is stored in the vault file itself. \
                 Anyone who can read the file can read your secrets.",
            );
            return Ok(password);
        }

        if let Err(e) = check_password_len(&password) {
            output::warning(&format!("{e}. Try again."));
            continue;
        }

        return Ok(password);
    }
}

fn check_password_len(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(TfatError::CommandFailed(format!(
            "passphrase must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
