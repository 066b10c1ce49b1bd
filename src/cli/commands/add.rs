//! `tfat add` — add an account or replace its secret.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{Result, TfatError};
use crate::totp;
use crate::vault::validate_account_name;

/// Execute the `add` command.
pub fn execute(cli: &Cli, name: &str, secret: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let name = validate_account_name(name)?;

    // Determine the secret from one of three sources.
    let raw_secret = if let Some(s) = secret {
        // Source 1: Inline value on the command line.
        output::warning("Secret given on the command line may be saved in your shell history.");
        Zeroizing::new(s.to_string())
    } else if !io::stdin().is_terminal() {
        // Source 2: Piped input.
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        Zeroizing::new(buf.trim().to_string())
    } else {
        // Source 3: Hidden interactive prompt.
        Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt(format!("Enter base32 secret for {name}"))
                .interact()
                .map_err(|e| TfatError::CommandFailed(format!("input prompt: {e}")))?,
        )
    };

    // Reject a bad secret before asking for any passphrase or touching disk.
    totp::normalize_secret(&raw_secret)?;

    let (mut vault, created) = ctx.unlock_or_init()?;
    let replaced = vault.add_account(name, &raw_secret)?;
    ctx.store.save(&vault)?;

    if created {
        ctx.audit("init", Some("vault created"));
        output::success(&format!("Vault created at {}", ctx.store.path().display()));
    }

    let detail = if replaced { "updated" } else { "added" };
    ctx.audit(
        "add",
        Some(&format!("{detail}, {} account(s)", vault.len())),
    );

    output::success(&format!(
        "Account '{name}' {detail} ({} total)",
        vault.len()
    ));
    output::tip("Run `tfat code` to see your codes.");

    Ok(())
}
