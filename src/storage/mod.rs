//! Storage layer for Lockin.
//!
//! Completed timers go to a SQLite primary store when it is reachable and to
//! an in-process buffer when it is not. Reads merge both.
//!
//! # Submodules
//!
//! - [`engine`] - Opening and probing storage handles
//! - [`connection`] - Connection lifecycle and health state machine
//! - [`schema`] - Table definition
//! - [`sqlite`] - Primary store insert/select
//! - [`fallback`] - Memory fallback buffer
//! - [`store`] - `TimerStore`, routing saves and reconciling reads

pub mod connection;
pub mod engine;
pub mod fallback;
pub mod schema;
pub mod sqlite;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use connection::{ConnectionManager, ConnectionState};
pub use engine::{OpenStrategy, SqliteEngine, StorageEngine};
pub use fallback::MemoryFallback;
pub use store::{SaveOutcome, TimerStore, reconcile};
