//! Status command implementation.

use crate::cli::commands::open_store;
use crate::error::Result;
use crate::storage::ConnectionState;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for status.
#[derive(Serialize)]
struct StatusOutput {
    location: String,
    state: ConnectionState,
    attempts: u32,
    max_attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    timer_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the status command.
///
/// Storage failures are reported in the output rather than as an error.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or JSON output fails.
pub fn execute(db_path: Option<&PathBuf>, max_attempts: Option<u32>, json: bool) -> Result<()> {
    let mut store = open_store(db_path, max_attempts)?;

    let (timer_count, error) = match store.primary_count() {
        Ok(n) => (Some(n), None),
        Err(e) => (None, Some(e.to_string())),
    };

    let output = StatusOutput {
        location: store.location(),
        state: store.connection_state(),
        attempts: store.connection_attempts(),
        max_attempts: store.max_connection_attempts(),
        timer_count,
        error,
    };

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    let state = match output.state {
        ConnectionState::Healthy => output.state.as_str().green(),
        ConnectionState::Exhausted => output.state.as_str().red(),
        _ => output.state.as_str().yellow(),
    };

    println!("Database:   {}", output.location);
    println!("Connection: {state}");
    println!("Attempts:   {}/{}", output.attempts, output.max_attempts);
    if let Some(count) = output.timer_count {
        println!("Timers:     {count}");
    }
    if let Some(error) = &output.error {
        println!("Error:      {}", error.red());
    }

    Ok(())
}
