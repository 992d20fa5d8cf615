//! Configuration management.
//!
//! Resolves where the timer database lives and how hard the store tries to
//! reach it.
//!
//! # Layout
//!
//! - **Database**: `~/.lockin/data/timers.db`
//! - **Test database**: `~/.lockin/test/timers.db` (when `LOCKIN_TEST_DB` is set)

use crate::error::{Error, Result};
use crate::storage::connection::DEFAULT_MAX_ATTEMPTS;

use std::path::{Path, PathBuf};

/// Default SQLite busy timeout.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "timers.db";

/// Settings for a [`TimerStore`](crate::storage::TimerStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file; `None` keeps the primary store in memory
    pub db_path: Option<PathBuf>,
    /// Consecutive failed opens tolerated before storage is declared unavailable
    pub max_connection_attempts: u32,
    /// SQLite busy timeout in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            max_connection_attempts: DEFAULT_MAX_ATTEMPTS,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    /// Defaults pointed at a specific database file.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        Self {
            db_path: Some(path.to_path_buf()),
            ..Self::default()
        }
    }

    /// In-memory primary store (for testing).
    ///
    /// The data survives reconnects but not the store itself.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Build the configuration from flags and environment.
    ///
    /// Explicit arguments win over `LOCKIN_MAX_ATTEMPTS` and
    /// `LOCKIN_BUSY_TIMEOUT_MS`. The path follows [`resolve_db_path`].
    ///
    /// # Errors
    ///
    /// Returns `Config` for malformed environment values, and `InvalidPath`
    /// when the database path names a directory or no home directory exists.
    pub fn resolve(explicit_path: Option<&Path>, max_attempts: Option<u32>) -> Result<Self> {
        let db_path = resolve_db_path(explicit_path).ok_or_else(|| {
            Error::Config("Could not determine home directory for the database".to_string())
        })?;
        if db_path.is_dir() {
            return Err(Error::InvalidPath { path: db_path });
        }

        let max_connection_attempts = match max_attempts {
            Some(n) => n,
            None => env_number("LOCKIN_MAX_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        };
        if max_connection_attempts == 0 {
            return Err(Error::Config(
                "LOCKIN_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let busy_timeout_ms =
            env_number("LOCKIN_BUSY_TIMEOUT_MS")?.unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);

        Ok(Self {
            db_path: Some(db_path),
            max_connection_attempts,
            busy_timeout_ms,
        })
    }
}

/// Read a numeric environment variable. Unset or blank means `None`.
fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{name} must be a whole number, got '{raw}'"))),
        _ => Ok(None),
    }
}

/// Get the global Lockin directory location (`~/.lockin/`).
#[must_use]
pub fn global_lockin_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".lockin"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `LOCKIN_TEST_DB=1` (or any non-empty value
/// other than `0`/`false`).
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("LOCKIN_TEST_DB").is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && !value.eq_ignore_ascii_case("false")
}

/// Get the test database path (`~/.lockin/test/timers.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_lockin_dir().map(|dir| dir.join("test").join(DB_FILE_NAME))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `LOCKIN_TEST_DB` environment variable → uses test database
/// 3. `LOCKIN_DB` environment variable
/// 4. Global location: `~/.lockin/data/timers.db`
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    if let Ok(db_path) = std::env::var("LOCKIN_DB") {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    global_lockin_dir().map(|dir| dir.join("data").join(DB_FILE_NAME))
}
