//! `tfat list` — display all account names.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let vault = ctx.unlock()?;

    let names = vault.account_names();
    output::info(&format!("{} account(s)", names.len()));
    output::print_accounts_table(&names);

    Ok(())
}
