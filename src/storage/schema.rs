//! Database schema definition.
//!
//! A single append-only table. There are no migrations: the statement is
//! idempotent and runs before every primary-store operation.

use crate::error::{Error, Result};
use rusqlite::Connection;

/// Name of the completed-timer table.
pub const TABLE: &str = "completed_timers";

/// Schema for the completed-timer table.
///
/// `completed_at` is always written explicitly (RFC 3339, UTC); the default
/// only covers rows inserted by other tools.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS completed_timers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    duration INTEGER NOT NULL,
    completed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_completed_timers_completed
    ON completed_timers(completed_at DESC);
";

/// Create the table if it does not exist.
///
/// # Errors
///
/// Returns `Schema` if the handle rejects the DDL.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL).map_err(|e| {
        tracing::error!(error = %e, "Table creation failed");
        Error::Schema(e)
    })
}
