//! `tfat delete` — remove an account from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, TfatError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut vault = ctx.unlock()?;

    if !vault.contains(name) {
        return Err(TfatError::AccountNotFound(name.to_string()));
    }

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| TfatError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.remove_account(name)?;
    ctx.store.save(&vault)?;

    ctx.audit("delete", Some(&format!("{} account(s) remaining", vault.len())));
    output::success(&format!(
        "Deleted account '{}' ({} remaining)",
        name.trim(),
        vault.len()
    ));

    Ok(())
}
