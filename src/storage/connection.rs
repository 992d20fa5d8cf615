//! Connection lifecycle management.
//!
//! [`ConnectionManager`] owns the single storage handle and hands it out only
//! after it has just passed a liveness probe. New handles are opened under a
//! bounded attempt budget:
//!
//! ```text
//! UNINITIALIZED --open ok--> HEALTHY --probe ok--> HEALTHY
//!                               |
//!                          probe fails / stage error
//!                               v
//!                            SUSPECT --open ok--> HEALTHY (attempts = 0)
//!
//! UNINITIALIZED / SUSPECT --attempts > budget--> EXHAUSTED (until reset)
//! ```

use crate::error::{Error, Result};
use crate::storage::engine::{OpenStrategy, StorageEngine};
use rusqlite::Connection;
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Default number of consecutive failed opens tolerated.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Health state of the managed connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No handle has been opened yet (or state was reset)
    Uninitialized,
    /// A handle is held and passed its last probe
    Healthy,
    /// The last handle failed; the next acquire opens a fresh one
    Suspect,
    /// The attempt budget is spent; no further opens until reset
    Exhausted,
}

impl ConnectionState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Healthy => "healthy",
            Self::Suspect => "suspect",
            Self::Exhausted => "exhausted",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the storage handle and its health state machine.
#[derive(Debug)]
pub struct ConnectionManager<E> {
    engine: E,
    conn: Option<Connection>,
    state: ConnectionState,
    attempts: u32,
    max_attempts: u32,
}

impl<E: StorageEngine> ConnectionManager<E> {
    /// Create a manager. No handle is opened until the first acquire.
    ///
    /// A budget of zero is raised to one.
    #[must_use]
    pub fn new(engine: E, max_attempts: u32) -> Self {
        Self {
            engine,
            conn: None,
            state: ConnectionState::Uninitialized,
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Consecutive failed opens since the last healthy handle.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Get a handle that has just passed a liveness probe.
    ///
    /// Reuses the held handle when it still answers the probe; otherwise
    /// spends one attempt opening a fresh handle.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` once the budget is spent (without
    /// touching the engine), or the open/health-check error of this attempt.
    pub fn acquire(&mut self) -> Result<&Connection> {
        if self.state == ConnectionState::Exhausted {
            return Err(Error::StorageUnavailable {
                attempts: self.max_attempts,
            });
        }

        if self.state == ConnectionState::Healthy && self.reused_handle_is_live() {
            return self.conn.as_ref().ok_or_else(|| {
                Error::Other("healthy connection state without a handle".to_string())
            });
        }

        self.attempts += 1;
        if self.attempts > self.max_attempts {
            error!(
                attempts = self.max_attempts,
                "Max connection attempts reached, storage unavailable until reset"
            );
            self.state = ConnectionState::Exhausted;
            return Err(Error::StorageUnavailable {
                attempts: self.max_attempts,
            });
        }

        match self.open_healthy() {
            Ok(conn) => {
                self.state = ConnectionState::Healthy;
                self.attempts = 0;
                Ok(&*self.conn.insert(conn))
            }
            Err(e) => {
                error!(attempt = self.attempts, error = %e, "Connection attempt failed");
                Err(e)
            }
        }
    }

    /// Flag the held handle as untrustworthy after a failed operation.
    ///
    /// The handle is dropped; the next acquire opens a new one.
    pub fn mark_suspect(&mut self) {
        if self.state == ConnectionState::Exhausted {
            return;
        }
        if self.state == ConnectionState::Healthy {
            warn!("Connection marked suspect");
        }
        self.conn = None;
        self.state = ConnectionState::Suspect;
    }

    /// Drop any handle and return to `Uninitialized` with a fresh budget.
    pub fn reset(&mut self) {
        self.conn = None;
        self.state = ConnectionState::Uninitialized;
        self.attempts = 0;
        info!("Connection state reset");
    }

    /// Probe the held handle; on failure drop it and move to `Suspect`.
    fn reused_handle_is_live(&mut self) -> bool {
        let probe = match &self.conn {
            Some(conn) => self.engine.probe(conn),
            None => Err(Error::Other("no handle held".to_string())),
        };

        match probe {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Existing connection is unhealthy, reopening");
                self.conn = None;
                self.state = ConnectionState::Suspect;
                false
            }
        }
    }

    /// Open a handle with the first strategy that works, then health-check it.
    fn open_healthy(&self) -> Result<Connection> {
        let mut last_err = None;

        for strategy in OpenStrategy::ORDER {
            match self.engine.open(strategy) {
                Ok(conn) => {
                    self.engine.probe(&conn)?;
                    debug!(
                        %strategy,
                        attempt = self.attempts,
                        location = %self.engine.location(),
                        "Database opened"
                    );
                    return Ok(conn);
                }
                Err(e) => {
                    warn!(%strategy, error = %e, "Open strategy failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Other("no open strategy available".to_string())))
    }
}
