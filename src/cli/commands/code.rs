//! `tfat code` — show the live code for an account (the default command).
//!
//! Picks the account (argument, the only one, or an interactive choice),
//! then redraws `123456 (expires in 12s)` once per refresh interval and
//! copies every new code to the clipboard.  Press Enter to stop.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dialoguer::Select;

use crate::cli::clipboard::CodeClipboard;
use crate::cli::output;
use crate::cli::{Cli, CodeArgs, Context};
use crate::errors::{Result, TfatError};
use crate::totp::{self, SystemClock};
use crate::vault::Vault;

/// Execute the `code` command.
pub fn execute(cli: &Cli, args: &CodeArgs) -> Result<()> {
    let ctx = Context::load(cli)?;
    let vault = ctx.unlock()?;

    let name = select_account(&vault, args.name.as_deref())?;
    let secret = vault.secret(&name)?;

    let mut clipboard = if args.no_copy || !ctx.settings.copy_to_clipboard {
        None
    } else {
        match CodeClipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                output::warning(&format!("{e}; codes will not be copied."));
                None
            }
        }
    };

    if args.once {
        let code = totp::generate_now(secret)?;
        copy_code(&mut clipboard, &code.to_string());
        println!("{code}");
        return Ok(());
    }

    let stop = Arc::new(AtomicBool::new(false));
    if io::stdin().is_terminal() {
        output::tip("Press Enter to stop.");
        spawn_stop_on_enter(Arc::clone(&stop));
    }

    println!("{name}:");
    let mut stdout = io::stdout();
    totp::watch(
        secret,
        &stop,
        ctx.settings.refresh_interval(),
        &mut SystemClock,
        |tick| {
            if tick.changed {
                copy_code(&mut clipboard, &tick.code.to_string());
            }
            write!(stdout, "\r{} ", output::format_code(&tick.code))?;
            stdout.flush()?;
            Ok(())
        },
    )?;
    println!();

    Ok(())
}

/// Decide which account to show.
fn select_account(vault: &Vault, requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        if !vault.contains(name) {
            return Err(TfatError::AccountNotFound(name.to_string()));
        }
        return Ok(name.trim().to_string());
    }

    let names = vault.account_names();
    match names.len() {
        0 => Err(TfatError::NoAccounts),
        1 => Ok(names[0].to_string()),
        _ => {
            let idx = Select::new()
                .with_prompt("Select an account")
                .items(&names)
                .default(0)
                .interact_opt()
                .map_err(|e| TfatError::CommandFailed(format!("select prompt: {e}")))?
                .ok_or(TfatError::UserCancelled)?;
            Ok(names[idx].to_string())
        }
    }
}

/// Copy to the clipboard if one is available; failures only warn.
fn copy_code(clipboard: &mut Option<CodeClipboard>, code: &str) {
    if let Some(cb) = clipboard.as_mut() {
        if let Err(e) = cb.copy(code) {
            tracing::debug!(error = %e, "clipboard copy failed");
            output::warning(&e.to_string());
        }
    }
}

/// Set `stop` once the user presses Enter.
fn spawn_stop_on_enter(stop: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let mut line = String::new();
        if let Ok(n) = io::stdin().lock().read_line(&mut line) {
            if n > 0 {
                stop.store(true, Ordering::Relaxed);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_single_account_automatically() {
        let mut vault = Vault::new(b"pw");
        vault.add_account("github", "JBSWY3DPEHPK3PXP").unwrap();
        assert_eq!(select_account(&vault, None).unwrap(), "github");
    }

    #[test]
    fn select_requested_account() {
        let mut vault = Vault::new(b"pw");
        vault.add_account("github", "JBSWY3DPEHPK3PXP").unwrap();
        vault.add_account("gitlab", "MFRGG").unwrap();
        assert_eq!(select_account(&vault, Some("gitlab")).unwrap(), "gitlab");
        assert!(matches!(
            select_account(&vault, Some("bitbucket")),
            Err(TfatError::AccountNotFound(_))
        ));
    }

    #[test]
    fn select_on_empty_vault_fails() {
        let vault = Vault::new(b"pw");
        assert!(matches!(
            select_account(&vault, None),
            Err(TfatError::NoAccounts)
        ));
    }
}
