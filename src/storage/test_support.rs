//! Fault-injecting engine shared by storage tests.

use crate::error::{Error, Result};
use crate::storage::engine::{OpenStrategy, SqliteEngine, StorageEngine};
use rusqlite::Connection;
use std::cell::Cell;
use std::rc::Rc;

/// In-memory engine with switchable failures.
///
/// Clones share their switches, so a test keeps one clone and hands the
/// other to the code under test.
#[derive(Clone, Default)]
pub struct FaultyEngine {
    pub opens: Rc<Cell<u32>>,
    pub fail_wal: Rc<Cell<bool>>,
    pub fail_opens: Rc<Cell<bool>>,
    pub fail_probe: Rc<Cell<bool>>,
    pub read_only: Rc<Cell<bool>>,
}

impl StorageEngine for FaultyEngine {
    fn open(&self, strategy: OpenStrategy) -> Result<Connection> {
        self.opens.set(self.opens.get() + 1);
        if self.fail_opens.get() || (self.fail_wal.get() && strategy == OpenStrategy::Wal) {
            return Err(Error::ConnectionOpen {
                strategy: strategy.as_str(),
                reason: "injected open failure".to_string(),
            });
        }

        let conn = SqliteEngine::in_memory().open(strategy)?;
        if self.read_only.get() {
            conn.pragma_update(None, "query_only", "ON")
                .map_err(Error::HealthCheck)?;
        }
        Ok(conn)
    }

    fn probe(&self, conn: &Connection) -> Result<()> {
        if self.fail_probe.get() {
            return Err(Error::HealthCheck(rusqlite::Error::QueryReturnedNoRows));
        }
        SqliteEngine::in_memory().probe(conn)
    }

    fn location(&self) -> String {
        "faulty".to_string()
    }
}
