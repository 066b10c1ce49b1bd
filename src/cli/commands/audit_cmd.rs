//! `tfat audit` — display the audit log.
//!
//! Usage:
//!   tfat audit               # show last 50 entries
//!   tfat audit --last 20     # show last 20
//!   tfat audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::audit::{AuditEntry, AuditLog};
use crate::cli::output;
use crate::cli::Cli;
use crate::errors::{Result, TfatError};

/// Execute the `audit` command.
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let home = cli.home_dir()?;
    if !AuditLog::db_path(&home).exists() {
        output::info("No audit entries found.");
        return Ok(());
    }

    let audit = AuditLog::open(&home)
        .ok_or_else(|| TfatError::AuditError("failed to open audit database".into()))?;

    let since = since.map(parse_since).transpose()?;
    let entries = audit.query(last, since)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Turn `7d`, `24h` or `30m` into the point in time that far back.
fn parse_since(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = |why: &str| TfatError::CommandFailed(format!("--since '{input}': {why}"));

    let Some(unit) = input.chars().last() else {
        return Err(invalid("expected a duration such as 7d, 24h or 30m"));
    };
    let amount = &input[..input.len() - unit.len_utf8()];

    let count: i64 = amount
        .parse()
        .map_err(|_| invalid("expected a whole number before the unit"))?;
    if count < 0 {
        return Err(invalid("duration cannot be negative"));
    }

    let span = match unit {
        'd' => Duration::days(count),
        'h' => Duration::hours(count),
        'm' => Duration::minutes(count),
        _ => return Err(invalid("unit must be d, h or m")),
    };

    Ok(Utc::now() - span)
}

/// Render entries newest first as a table.
pub fn print_audit_table(entries: &[AuditEntry]) {
    let mut table = Table::new();
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Time", "Operation", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            operation_label(&entry.operation),
            entry.details.clone().unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("{}", style(format!("Last {} change(s):", entries.len())).bold());
    println!("{table}");
}

fn operation_label(op: &str) -> String {
    let styled = match op {
        "init" => style(op).green(),
        "add" => style(op).cyan(),
        "delete" => style(op).red(),
        "password" => style(op).yellow(),
        _ => style(op),
    };
    styled.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_days() {
        let dt = parse_since("7d").unwrap();
        let diff = Utc::now() - dt;
        assert!((diff.num_days() - 7).abs() <= 1);
    }

    #[test]
    fn parse_since_hours_and_minutes() {
        let diff = Utc::now() - parse_since("24h").unwrap();
        assert!((diff.num_hours() - 24).abs() <= 1);

        let diff = Utc::now() - parse_since(" 30m ").unwrap();
        assert!((diff.num_minutes() - 30).abs() <= 1);
    }

    #[test]
    fn parse_since_invalid() {
        assert!(parse_since("abc").is_err());
        assert!(parse_since("7x").is_err());
        assert!(parse_since("d").is_err());
        assert!(parse_since("-3d").is_err());
    }

    #[test]
    fn operation_label_keeps_text() {
        for op in ["init", "add", "delete", "password", "other"] {
            let shown = operation_label(op);
            assert_eq!(console::strip_ansi_codes(&shown), op);
        }
    }
}
