//! `tfat password` — change the vault passphrase.
//!
//! Unlocks with the current passphrase, then re-encrypts the whole vault
//! under the new one with a fresh nonce.  An empty new passphrase
//! switches the vault to auto-generated mode.  In scripts the current
//! passphrase comes from `TFAT_PASSWORD` and the new one from
//! `TFAT_NEW_PASSWORD`.

use crate::cli::output;
use crate::cli::{prompt_replacement_password, Cli, Context};
use crate::errors::{Result, TfatError};
use crate::vault::{PasswordMode, Vault};

/// Execute the `password` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;

    // 1. Open the vault with the current passphrase.
    let mut vault = ctx.unlock()?;

    // 2. Prompt for the new passphrase.
    output::info("Choose your new vault passphrase.");
    let new_password = prompt_replacement_password()?;
    ensure_changed(&vault, new_password.as_bytes())?;

    // 3. Swap it in and save under a fresh nonce.
    vault.change_passphrase(new_password.as_bytes());
    ctx.store.save(&vault)?;

    let detail = match vault.mode() {
        PasswordMode::UserSupplied => "passphrase changed",
        PasswordMode::AutoGenerated => "switched to no passphrase",
    };
    ctx.audit("password", Some(detail));

    output::success(&format!(
        "Vault re-encrypted ({} account(s), {detail})",
        vault.len()
    ));

    Ok(())
}

/// Refuse a "change" that would leave the passphrase as it is.
fn ensure_changed(vault: &Vault, new_passphrase: &[u8]) -> Result<()> {
    if new_passphrase == vault.passphrase() {
        let msg = match vault.mode() {
            PasswordMode::UserSupplied => "new passphrase is the same as the current one",
            PasswordMode::AutoGenerated => "vault already has no passphrase",
        };
        return Err(TfatError::CommandFailed(msg.into()));
    }
    Ok(())
}
