//! Primary store operations against a SQLite handle.
//!
//! These functions take a handle that the
//! [`ConnectionManager`](crate::storage::ConnectionManager) has just
//! verified. They do not touch connection state themselves; the caller
//! marks the connection suspect when one of them fails.

use crate::error::{Error, Result};
use crate::model::{CompletedTimer, NewTimer, format_timestamp, parse_timestamp};
use chrono::Utc;
use rusqlite::Connection;

/// Insert one completed timer, stamped with the current time.
///
/// # Errors
///
/// Returns `Write` if the engine rejects the insert.
pub fn insert(conn: &Connection, timer: &NewTimer) -> Result<i64> {
    let completed_at = format_timestamp(&Utc::now());

    conn.execute(
        "INSERT INTO completed_timers (title, duration, completed_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![timer.title(), timer.duration(), completed_at],
    )
    .map_err(|e| {
        tracing::error!(error = %e, "Insert operation failed");
        Error::Write(e)
    })?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, "Timer saved to database");
    Ok(id)
}

/// Load every completed timer, most recent first.
///
/// Rows whose `completed_at` is NULL or unreadable are skipped with a
/// warning; one bad row does not hide the rest.
///
/// # Errors
///
/// Returns `Read` if the engine rejects the query.
pub fn select_all(conn: &Connection) -> Result<Vec<CompletedTimer>> {
    let read = |e: rusqlite::Error| {
        tracing::error!(error = %e, "Select operation failed");
        Error::Read(e)
    };

    let mut stmt = conn
        .prepare(
            "SELECT id, title, duration, completed_at FROM completed_timers
             ORDER BY completed_at DESC, id DESC",
        )
        .map_err(read)?;

    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let raw: Option<String> = row.get(3)?;
            let Some(completed_at) = raw.as_deref().and_then(|raw| parse_timestamp(raw).ok())
            else {
                tracing::warn!(id, completed_at = ?raw, "Skipping row with unreadable timestamp");
                return Ok(None);
            };
            Ok(Some(CompletedTimer {
                id,
                title: row.get(1)?,
                duration: row.get(2)?,
                completed_at,
            }))
        })
        .map_err(read)?;

    let timers: Vec<CompletedTimer> = rows
        .filter_map(std::result::Result::transpose)
        .collect::<std::result::Result<_, _>>()
        .map_err(read)?;
    tracing::debug!(count = timers.len(), "Loaded timers from database");
    Ok(timers)
}

/// Number of rows in the primary store.
///
/// # Errors
///
/// Returns `Read` if the query fails.
pub fn count(conn: &Connection) -> Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM completed_timers", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| usize::try_from(n).unwrap_or(0))
    .map_err(Error::Read)
}
