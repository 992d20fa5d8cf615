//! Command implementations.

pub mod activity;
pub mod completions;
pub mod list;
pub mod save;
pub mod status;
pub mod version;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::TimerStore;
use std::path::PathBuf;

/// Resolve configuration and build the store every data command works on.
///
/// # Errors
///
/// Returns a configuration error if the database location cannot be resolved.
pub fn open_store(db_path: Option<&PathBuf>, max_attempts: Option<u32>) -> Result<TimerStore> {
    let config = StoreConfig::resolve(db_path.map(PathBuf::as_path), max_attempts)?;
    Ok(TimerStore::open(&config))
}
