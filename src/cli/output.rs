//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::totp::TotpCode;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a numbered table of account names.
pub fn print_accounts_table(names: &[&str]) {
    if names.is_empty() {
        info("No accounts in this vault yet.");
        tip("Run `tfat add <NAME> <SECRET>` to add your first account.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Account"]);

    for (idx, name) in names.iter().enumerate() {
        table.add_row(vec![(idx + 1).to_string(), (*name).to_string()]);
    }

    println!("{table}");
}

/// Render a code with its countdown, e.g. `287082 (expires in 12s)`.
///
/// The countdown turns red in the last five seconds.
pub fn format_code(code: &TotpCode) -> String {
    let remaining = format!("expires in {}s", code.seconds_remaining);
    let remaining = if code.seconds_remaining <= 5 {
        style(remaining).red().to_string()
    } else {
        style(remaining).dim().to_string()
    };
    format!("{} ({remaining})", style(code.to_string()).bold())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_code_contains_digits_and_countdown() {
        let code = TotpCode {
            code: 7,
            seconds_remaining: 12,
        };
        let text = console::strip_ansi_codes(&format_code(&code)).to_string();
        assert_eq!(text, "000007 (expires in 12s)");
    }
}
