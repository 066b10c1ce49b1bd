//! `tfat completions` — generate shell completion scripts.
//!
//! Usage:
//!   tfat completions bash > ~/.local/share/bash-completion/completions/tfat
//!   tfat completions zsh > ~/.zfunc/_tfat

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Commands;

    #[test]
    fn shell_names_parse() {
        for (arg, expected) in [
            ("bash", Shell::Bash),
            ("zsh", Shell::Zsh),
            ("fish", Shell::Fish),
            ("powershell", Shell::PowerShell),
            ("elvish", Shell::Elvish),
        ] {
            let cli = Cli::try_parse_from(["tfat", "completions", arg]).unwrap();
            match cli.command {
                Some(Commands::Completions { shell }) => assert_eq!(shell, expected),
                _ => panic!("expected completions"),
            }
        }
    }

    #[test]
    fn unknown_shell_rejected() {
        assert!(Cli::try_parse_from(["tfat", "completions", "csh"]).is_err());
    }
}
