//! Storage engine seam.
//!
//! The connection manager never calls `rusqlite` to open a handle directly;
//! it goes through a [`StorageEngine`]. Production code uses
//! [`SqliteEngine`]; tests substitute engines that fail on demand.

use crate::error::{Error, Result};
use rusqlite::Connection;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How a new handle is opened.
///
/// Tried in [`OpenStrategy::ORDER`]; the first strategy that yields a
/// handle wins. Callers above the connection manager never see which one
/// was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStrategy {
    /// Write-ahead log journal
    Wal,
    /// Classic rollback (delete) journal, for filesystems without WAL support
    RollbackJournal,
}

impl OpenStrategy {
    /// Preferred strategy first.
    pub const ORDER: [Self; 2] = [Self::Wal, Self::RollbackJournal];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::RollbackJournal => "rollback-journal",
        }
    }

    const fn journal_mode(self) -> &'static str {
        match self {
            Self::Wal => "WAL",
            Self::RollbackJournal => "DELETE",
        }
    }
}

impl std::fmt::Display for OpenStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opens and health-checks storage handles.
pub trait StorageEngine {
    /// Open a new handle with the given strategy.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionOpen` if no handle could be produced.
    fn open(&self, strategy: OpenStrategy) -> Result<Connection>;

    /// Lightweight liveness probe run before a handle is trusted.
    ///
    /// # Errors
    ///
    /// Returns `HealthCheck` if the handle cannot serve a trivial read.
    fn probe(&self, conn: &Connection) -> Result<()> {
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map(|_| ())
            .map_err(Error::HealthCheck)
    }

    /// Human-readable location, for logs and status output.
    fn location(&self) -> String;
}

/// Source of unique names for in-memory databases.
static NEXT_MEMORY_DB: AtomicU64 = AtomicU64::new(0);

/// SQLite engine backed by a file, or by a private in-memory database.
#[derive(Debug)]
pub struct SqliteEngine {
    path: Option<PathBuf>,
    busy_timeout: Duration,
    memory_uri: String,
    /// Holds the shared in-memory database open between handles
    keeper: OnceCell<Connection>,
}

impl SqliteEngine {
    /// Engine for a database file. Parent directories are created on open.
    #[must_use]
    pub fn new(path: &Path, busy_timeout: Duration) -> Self {
        Self {
            path: Some(path.to_path_buf()),
            busy_timeout,
            memory_uri: String::new(),
            keeper: OnceCell::new(),
        }
    }

    /// Engine over an in-memory database private to this engine.
    ///
    /// Every handle it opens sees the same data, so records survive a
    /// reopen. The data lives as long as the engine.
    #[must_use]
    pub fn in_memory() -> Self {
        let n = NEXT_MEMORY_DB.fetch_add(1, Ordering::Relaxed);
        Self {
            path: None,
            busy_timeout: Duration::from_secs(5),
            memory_uri: format!(
                "file:lockin-{}-{n}?mode=memory&cache=shared",
                std::process::id()
            ),
            keeper: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn open_file(&self, path: &Path, strategy: OpenStrategy) -> Result<Connection> {
        let open_err = |reason: String| Error::ConnectionOpen {
            strategy: strategy.as_str(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| open_err(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(|e| open_err(e.to_string()))?;
        conn.busy_timeout(self.busy_timeout)
            .map_err(|e| open_err(e.to_string()))?;
        apply_journal_mode(&conn, strategy)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| open_err(e.to_string()))?;

        Ok(conn)
    }

    fn open_memory(&self, strategy: OpenStrategy) -> Result<Connection> {
        let open = || {
            Connection::open(&self.memory_uri).map_err(|e| Error::ConnectionOpen {
                strategy: strategy.as_str(),
                reason: e.to_string(),
            })
        };

        if self.keeper.get().is_none() {
            let _ = self.keeper.set(open()?);
        }
        open()
    }
}

/// Switch the handle to the strategy's journal mode.
///
/// SQLite answers an unsupported mode by keeping the current one, so the
/// mode it reports back is checked.
fn apply_journal_mode(conn: &Connection, strategy: OpenStrategy) -> Result<()> {
    let wanted = strategy.journal_mode();
    let actual: String = conn
        .pragma_update_and_check(None, "journal_mode", wanted, |row| row.get(0))
        .map_err(|e| Error::ConnectionOpen {
            strategy: strategy.as_str(),
            reason: e.to_string(),
        })?;

    if actual.eq_ignore_ascii_case(wanted) {
        Ok(())
    } else {
        Err(Error::ConnectionOpen {
            strategy: strategy.as_str(),
            reason: format!("journal mode {wanted} refused, database is in {actual} mode"),
        })
    }
}

impl StorageEngine for SqliteEngine {
    fn open(&self, strategy: OpenStrategy) -> Result<Connection> {
        match &self.path {
            Some(path) => self.open_file(path, strategy),
            None => self.open_memory(strategy),
        }
    }

    fn location(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |p| p.display().to_string())
    }
}
