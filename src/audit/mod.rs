//! Audit log — SQLite-based history of vault changes.
//!
//! Every mutating command (init, add, delete, password) appends a row to
//! `<home>/audit.db`.  The database sits outside the encrypted vault, so
//! it records only the operation and an account count: never secrets,
//! codes, or account names.
//!
//! Logging is best-effort: if the database can't be opened or written,
//! the vault operation still succeeds.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use crate::errors::{Result, TfatError};

/// File name of the audit database inside the tfat home.
const DB_FILE: &str = "audit.db";

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub details: Option<String>,
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `<home>/audit.db`.
    ///
    /// Returns `None` if the database can't be opened; callers treat
    /// that as "audit logging unavailable".
    pub fn open(home: &Path) -> Option<Self> {
        let db_path = Self::db_path(home);
        let conn = match Connection::open(&db_path) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(path = %db_path.display(), error = %e, "audit log unavailable");
                return None;
            }
        };

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                operation TEXT NOT NULL,
                details   TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation.  Failures are logged and otherwise ignored.
    pub fn log(&self, operation: &str, details: Option<&str>) {
        let now = Utc::now().to_rfc3339();
        if let Err(e) = self.conn.execute(
            "INSERT INTO audit_log (timestamp, operation, details)
             VALUES (?1, ?2, ?3)",
            params![now, operation, details],
        ) {
            tracing::debug!(error = %e, operation, "failed to write audit entry");
        }
    }

    /// Query recent entries, most recent first.
    ///
    /// - `limit`: maximum number of entries to return.
    /// - `since`: if provided, only entries at or after this time.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        // RFC 3339 strings sort chronologically; "" sorts before all of them.
        let since = since.map(|ts| ts.to_rfc3339()).unwrap_or_default();

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, operation, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
            )
            .map_err(|e| TfatError::AuditError(format!("query prepare: {e}")))?;

        let rows = stmt
            .query_map(params![since, limit], entry_from_row)
            .map_err(|e| TfatError::AuditError(format!("query exec: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TfatError::AuditError(format!("row parse: {e}")))
    }

    /// Path of the audit database for a given home directory.
    pub fn db_path(home: &Path) -> PathBuf {
        home.join(DB_FILE)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    let ts: String = row.get(1)?;
    let timestamp = DateTime::parse_from_rfc3339(&ts)
        .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

    Ok(AuditEntry {
        id: row.get(0)?,
        timestamp,
        operation: row.get(2)?,
        details: row.get(3)?,
    })
}

/// Log an event to the audit database in `home`, ignoring any failure.
///
/// Does nothing if `home` does not exist yet, so a failed first command
/// does not leave an empty tfat directory behind.
pub fn log_audit(home: &Path, operation: &str, details: Option<&str>) {
    if !home.is_dir() {
        return;
    }
    if let Some(audit) = AuditLog::open(home) {
        audit.log(operation, details);
    }
}
