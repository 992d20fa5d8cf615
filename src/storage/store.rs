//! Resilient timer store.
//!
//! [`TimerStore`] is the only type callers use. It routes saves to the
//! primary store when a healthy connection is available and to the memory
//! fallback otherwise, and it serves reads that merge both.
//!
//! Neither `save_timer` nor `load_timers` surfaces storage errors. A save
//! only fails to produce an id when the input itself is rejected; a load
//! at worst returns the fallback records alone.

use crate::config::StoreConfig;
use crate::error::{Error, ErrorCode, Result};
use crate::model::{CompletedTimer, NewTimer};
use crate::storage::connection::{ConnectionManager, ConnectionState};
use crate::storage::engine::{SqliteEngine, StorageEngine};
use crate::storage::fallback::MemoryFallback;
use crate::storage::schema::ensure_schema;
use crate::storage::sqlite;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

/// Where a save ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Written to the database
    Primary { id: i64 },
    /// Buffered in memory for this process only
    Fallback { id: i64, cause: ErrorCode },
    /// Input rejected; nothing was written anywhere
    Rejected { reason: String },
}

impl SaveOutcome {
    /// Identity of the stored record, if any.
    #[must_use]
    pub const fn id(&self) -> Option<i64> {
        match self {
            Self::Primary { id } | Self::Fallback { id, .. } => Some(*id),
            Self::Rejected { .. } => None,
        }
    }

    /// True when the record will not survive a restart.
    #[must_use]
    pub const fn is_temporary(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Message for the user, phrased by the path taken.
    #[must_use]
    pub const fn advisory(&self) -> &'static str {
        match self {
            Self::Primary { .. } => "Timer saved.",
            Self::Fallback { .. } => {
                "Timer completed successfully! Data temporarily stored in memory."
            }
            Self::Rejected { .. } => "Timer completed, but the session was not recorded.",
        }
    }
}

/// Completed-timer store with primary/fallback routing.
///
/// State-changing operations take `&mut self`, so one save or load runs at
/// a time. Share across threads by wrapping the store in a `Mutex`.
#[derive(Debug)]
pub struct TimerStore<E = SqliteEngine> {
    connections: ConnectionManager<E>,
    fallback: MemoryFallback,
}

impl TimerStore<SqliteEngine> {
    /// Store for the configured database. Nothing is opened until first use.
    #[must_use]
    pub fn open(config: &StoreConfig) -> Self {
        let engine = match &config.db_path {
            Some(path) => SqliteEngine::new(path, Duration::from_millis(config.busy_timeout_ms)),
            None => SqliteEngine::in_memory(),
        };
        Self::with_engine(engine, config.max_connection_attempts)
    }
}

impl<E: StorageEngine> TimerStore<E> {
    #[must_use]
    pub fn with_engine(engine: E, max_connection_attempts: u32) -> Self {
        Self {
            connections: ConnectionManager::new(engine, max_connection_attempts),
            fallback: MemoryFallback::new(),
        }
    }

    /// Record a completed timer.
    ///
    /// Blank titles become the default title and fractional durations are
    /// truncated. A non-positive or non-numeric duration skips the save.
    pub fn save_timer(&mut self, title: &str, duration: f64) -> SaveOutcome {
        let timer = match NewTimer::new(title, duration) {
            Ok(timer) => timer,
            Err(e) => {
                warn!(error = %e, "Invalid duration provided, skipping save");
                let reason = match e {
                    Error::InvalidInput(msg) => msg,
                    other => other.to_string(),
                };
                return SaveOutcome::Rejected { reason };
            }
        };

        match self.with_primary(|conn| sqlite::insert(conn, &timer)) {
            Ok(id) => SaveOutcome::Primary { id },
            Err(e) => {
                warn!(error = %e, "Database operation failed, using memory fallback");
                let id = self.fallback.append(&timer);
                SaveOutcome::Fallback {
                    id,
                    cause: e.error_code(),
                }
            }
        }
    }

    /// All completed timers from both stores, most recent first.
    ///
    /// A primary-store failure contributes no records instead of an error.
    pub fn load_timers(&mut self) -> Vec<CompletedTimer> {
        let primary = self.with_primary(sqlite::select_all).unwrap_or_else(|e| {
            warn!(error = %e, "Database read failed, using memory fallback only");
            Vec::new()
        });
        let memory = self.fallback.all();

        let (from_db, from_memory) = (primary.len(), memory.len());
        let timers = reconcile(primary, memory);
        info!(
            from_db,
            from_memory,
            total = timers.len(),
            "Loaded timers"
        );
        timers
    }

    /// Snapshot of the records held only in memory.
    #[must_use]
    pub fn memory_fallback_data(&self) -> Vec<CompletedTimer> {
        self.fallback.all()
    }

    /// Discard the memory fallback. Primary-store rows are untouched.
    pub fn clear_memory_fallback(&mut self) {
        self.fallback.clear();
    }

    /// Leave `Exhausted` (or any state) for `Uninitialized` with a fresh budget.
    pub fn reset_connection_state(&mut self) {
        self.connections.reset();
    }

    #[must_use]
    pub const fn connection_state(&self) -> ConnectionState {
        self.connections.state()
    }

    #[must_use]
    pub const fn connection_attempts(&self) -> u32 {
        self.connections.attempts()
    }

    #[must_use]
    pub const fn max_connection_attempts(&self) -> u32 {
        self.connections.max_attempts()
    }

    /// Where the primary store lives.
    #[must_use]
    pub fn location(&self) -> String {
        self.connections.engine().location()
    }

    /// Number of rows in the primary store.
    ///
    /// Unlike saves and loads, this reports storage failures to the caller.
    ///
    /// # Errors
    ///
    /// Returns the connection, schema, or read error encountered.
    pub fn primary_count(&mut self) -> Result<usize> {
        self.with_primary(sqlite::count)
    }

    /// Run one primary-store operation on a verified handle.
    ///
    /// The schema is ensured first. A failure in either step marks the
    /// connection suspect.
    fn with_primary<T>(&mut self, op: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.connections.acquire()?;
        let result = ensure_schema(conn).and_then(|()| op(conn));
        if result.is_err() {
            self.connections.mark_suspect();
        }
        result
    }
}

/// Merge primary and fallback records into one timeline.
///
/// Primary records come first, so on an id collision the primary copy is
/// kept. The result is sorted by `completed_at`, newest first; ties keep
/// their merged order.
#[must_use]
pub fn reconcile(primary: Vec<CompletedTimer>, fallback: Vec<CompletedTimer>) -> Vec<CompletedTimer> {
    let mut seen = HashSet::new();
    let mut timers: Vec<CompletedTimer> = primary
        .into_iter()
        .chain(fallback)
        .filter(|timer| seen.insert(timer.id))
        .collect();

    timers.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    timers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_support::FaultyEngine;
    use crate::validate::DEFAULT_TITLE;
    use chrono::{TimeZone, Utc};

    fn healthy_store() -> (TimerStore<FaultyEngine>, FaultyEngine) {
        let engine = FaultyEngine::default();
        (TimerStore::with_engine(engine.clone(), 3), engine)
    }

    fn record(id: i64, title: &str, minute: u32) -> CompletedTimer {
        CompletedTimer {
            id,
            title: title.to_string(),
            duration: 60,
            completed_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    /// File-backed store whose table rejects every insert.
    fn rejecting_store(dir: &tempfile::TempDir) -> TimerStore {
        let path = dir.path().join("timers.db");
        let setup = Connection::open(&path).unwrap();
        ensure_schema(&setup).unwrap();
        setup
            .execute_batch(
                "CREATE TRIGGER reject_inserts BEFORE INSERT ON completed_timers
                 BEGIN SELECT RAISE(ABORT, 'disk I/O error'); END;",
            )
            .unwrap();
        drop(setup);

        TimerStore::open(&StoreConfig::for_path(&path))
    }

    #[test]
    fn test_save_and_load_primary() {
        let (mut store, _) = healthy_store();

        let outcome = store.save_timer("Deep Work", 1500.0);
        let SaveOutcome::Primary { id } = outcome else {
            panic!("expected primary save, got {outcome:?}");
        };

        let timers = store.load_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, id);
        assert_eq!(timers[0].title, "Deep Work");
        assert_eq!(timers[0].duration, 1500);
        assert!(store.memory_fallback_data().is_empty());
    }

    #[test]
    fn test_blank_title_stored_as_default() {
        let (mut store, _) = healthy_store();

        let id = store.save_timer("", 600.0).id().unwrap();
        let timers = store.load_timers();

        assert_eq!(timers[0].id, id);
        assert_eq!(timers[0].title, DEFAULT_TITLE);
    }

    #[test]
    fn test_invalid_duration_writes_nothing() {
        let (mut store, engine) = healthy_store();

        for duration in [0.0, -5.0, f64::NAN, f64::NEG_INFINITY] {
            let outcome = store.save_timer("Focus", duration);
            assert!(matches!(outcome, SaveOutcome::Rejected { .. }));
            assert_eq!(outcome.id(), None);
        }

        // Rejection happens before any engine call
        assert_eq!(engine.opens.get(), 0);
        assert!(store.load_timers().is_empty());
        assert!(store.memory_fallback_data().is_empty());
    }

    #[test]
    fn test_insert_failure_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = rejecting_store(&dir);

        let outcome = store.save_timer("Focus", 300.0);
        assert!(outcome.is_temporary());
        assert_eq!(
            outcome,
            SaveOutcome::Fallback {
                id: outcome.id().unwrap(),
                cause: ErrorCode::WriteError,
            }
        );
        assert_eq!(store.connection_state(), ConnectionState::Suspect);

        let memory = store.memory_fallback_data();
        assert_eq!(memory.len(), 1);
        assert_eq!(Some(memory[0].id), outcome.id());
        assert_eq!(memory[0].title, "Focus");
        assert_eq!(memory[0].duration, 300);

        // Still readable through the merged view, exactly once
        let timers = store.load_timers();
        let hits = timers.iter().filter(|t| Some(t.id) == outcome.id()).count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn test_schema_failure_falls_back() {
        let (mut store, engine) = healthy_store();
        engine.read_only.set(true);

        let outcome = store.save_timer("Focus", 300.0);
        assert!(matches!(
            outcome,
            SaveOutcome::Fallback {
                cause: ErrorCode::SchemaError,
                ..
            }
        ));
        assert_eq!(store.connection_state(), ConnectionState::Suspect);
        assert_eq!(store.memory_fallback_data().len(), 1);
    }

    #[test]
    fn test_probe_failure_falls_back_then_recovers() {
        let (mut store, engine) = healthy_store();
        assert!(matches!(
            store.save_timer("one", 60.0),
            SaveOutcome::Primary { .. }
        ));

        engine.fail_probe.set(true);
        let outcome = store.save_timer("two", 60.0);
        assert!(matches!(
            outcome,
            SaveOutcome::Fallback {
                cause: ErrorCode::HealthCheckFailure,
                ..
            }
        ));
        assert_eq!(store.connection_state(), ConnectionState::Suspect);

        engine.fail_probe.set(false);
        assert!(matches!(
            store.save_timer("three", 60.0),
            SaveOutcome::Primary { .. }
        ));
        assert_eq!(store.connection_state(), ConnectionState::Healthy);
        assert_eq!(store.connection_attempts(), 0);
    }

    #[test]
    fn test_exhausted_routes_to_fallback_without_opening() {
        let (mut store, engine) = healthy_store();
        engine.fail_opens.set(true);

        for _ in 0..3 {
            assert!(store.save_timer("Focus", 60.0).is_temporary());
        }
        let outcome = store.save_timer("Focus", 60.0);
        assert!(matches!(
            outcome,
            SaveOutcome::Fallback {
                cause: ErrorCode::StorageUnavailable,
                ..
            }
        ));
        assert_eq!(store.connection_state(), ConnectionState::Exhausted);

        let opens = engine.opens.get();
        engine.fail_opens.set(false);
        assert!(store.save_timer("Focus", 60.0).is_temporary());
        assert_eq!(store.load_timers().len(), 5);
        assert_eq!(engine.opens.get(), opens);

        store.reset_connection_state();
        assert_eq!(store.connection_state(), ConnectionState::Uninitialized);
        assert!(matches!(
            store.save_timer("Focus", 60.0),
            SaveOutcome::Primary { .. }
        ));
        assert_eq!(store.load_timers().len(), 6);
    }

    #[test]
    fn test_load_never_fails() {
        let (mut store, engine) = healthy_store();
        engine.fail_opens.set(true);

        assert!(store.load_timers().is_empty());

        store.save_timer("Focus", 300.0);
        let timers = store.load_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].title, "Focus");
    }

    #[test]
    fn test_clear_fallback_keeps_primary_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timers.db");
        let mut store = TimerStore::open(&StoreConfig::for_path(&path));

        let primary_id = store.save_timer("Deep Work", 1500.0).id().unwrap();
        store.fallback.append(&NewTimer::new("Buffered", 60.0).unwrap());
        assert_eq!(store.load_timers().len(), 2);

        store.clear_memory_fallback();
        assert!(store.memory_fallback_data().is_empty());

        let timers = store.load_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, primary_id);
        assert_eq!(store.primary_count().unwrap(), 1);
    }

    #[test]
    fn test_primary_rows_survive_a_new_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::for_path(&dir.path().join("timers.db"));

        let id = TimerStore::open(&config).save_timer("Deep Work", 1500.0).id();
        let timers = TimerStore::open(&config).load_timers();

        assert_eq!(timers.len(), 1);
        assert_eq!(Some(timers[0].id), id);
    }

    #[test]
    fn test_null_timestamp_row_does_not_hide_saved_timer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timers.db");
        let mut store = TimerStore::open(&StoreConfig::for_path(&path));

        let id = store.save_timer("Deep Work", 1500.0).id().unwrap();
        Connection::open(&path)
            .unwrap()
            .execute(
                "INSERT INTO completed_timers (title, duration, completed_at) VALUES ('x', 60, NULL)",
                [],
            )
            .unwrap();

        let timers = store.load_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].id, id);
        assert_eq!(store.connection_state(), ConnectionState::Healthy);
    }

    #[test]
    fn test_reconcile_dedups_keeping_primary() {
        let primary = vec![record(1, "primary", 10)];
        let fallback = vec![record(1, "memory", 20), record(2, "memory", 5)];

        let merged = reconcile(primary, fallback);
        assert_eq!(merged.len(), 2);
        let one = merged.iter().find(|t| t.id == 1).unwrap();
        assert_eq!(one.title, "primary");
    }

    #[test]
    fn test_reconcile_orders_newest_first() {
        let primary = vec![record(1, "a", 30), record(2, "b", 10)];
        let fallback = vec![record(3, "c", 20), record(4, "d", 40), record(5, "e", 0)];

        let merged = reconcile(primary, fallback);
        let ids: Vec<i64> = merged.iter().map(|t| t.id).collect();
        assert_eq!(ids, [4, 1, 3, 2, 5]);

        for pair in merged.windows(2) {
            assert!(pair[0].completed_at >= pair[1].completed_at);
        }
    }

    #[test]
    fn test_reconcile_ties_keep_merged_order() {
        let merged = reconcile(vec![record(1, "db", 15)], vec![record(2, "mem", 15)]);
        let ids: Vec<i64> = merged.iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2]);
    }

    #[test]
    fn test_save_outcome_serializes_path() {
        let json = serde_json::to_value(SaveOutcome::Fallback {
            id: 42,
            cause: ErrorCode::WriteError,
        })
        .unwrap();
        assert_eq!(json["path"], "fallback");
        assert_eq!(json["id"], 42);
        assert_eq!(json["cause"], "WRITE_ERROR");
    }
}
