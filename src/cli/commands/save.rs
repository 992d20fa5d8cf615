//! Save command implementation.

use crate::activity::format_elapsed;
use crate::cli::commands::open_store;
use crate::error::{Error, Result};
use crate::storage::SaveOutcome;
use crate::validate::parse_duration;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for save.
#[derive(Serialize)]
struct SaveOutput<'a> {
    #[serde(flatten)]
    outcome: &'a SaveOutcome,
    elapsed: String,
    message: &'a str,
}

/// Execute the save command.
///
/// A fallback save still succeeds; only rejected input is an error.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-numeric or non-positive duration.
pub fn execute(
    title: &str,
    duration: &str,
    db_path: Option<&PathBuf>,
    max_attempts: Option<u32>,
    json: bool,
) -> Result<()> {
    let seconds = parse_duration(duration)?;
    let mut store = open_store(db_path, max_attempts)?;

    let outcome = store.save_timer(title, seconds);
    let id = match &outcome {
        SaveOutcome::Rejected { reason } => return Err(Error::InvalidInput(reason.clone())),
        SaveOutcome::Primary { id } | SaveOutcome::Fallback { id, .. } => *id,
    };

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    // Truncation already validated by save_timer
    #[allow(clippy::cast_possible_truncation)]
    let elapsed = format_elapsed(seconds.trunc() as i64);

    if json {
        let output = SaveOutput {
            outcome: &outcome,
            elapsed,
            message: outcome.advisory(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("You've locked in for {elapsed}");
        if outcome.is_temporary() {
            println!("{}", outcome.advisory().yellow());
        } else {
            println!("{} #{id}", outcome.advisory().green());
        }
    }

    Ok(())
}
