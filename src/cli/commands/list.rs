//! List command implementation.

use crate::activity::format_elapsed;
use crate::cli::commands::open_store;
use crate::error::Result;
use crate::model::CompletedTimer;
use serde::Serialize;
use std::path::PathBuf;

/// Output for list.
#[derive(Serialize)]
struct ListOutput<'a> {
    timers: &'a [CompletedTimer],
    count: usize,
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if configuration cannot be resolved or JSON output fails.
pub fn execute(
    limit: Option<usize>,
    db_path: Option<&PathBuf>,
    max_attempts: Option<u32>,
    json: bool,
) -> Result<()> {
    let mut store = open_store(db_path, max_attempts)?;

    let mut timers = store.load_timers();
    if let Some(limit) = limit {
        timers.truncate(limit);
    }

    print_timers(&timers, json)
}

/// Print timers as CSV, JSON, or a table.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_timers(timers: &[CompletedTimer], json: bool) -> Result<()> {
    if crate::is_csv() {
        println!("id,title,duration,completed_at");
        for t in timers {
            println!(
                "{},{},{},{}",
                t.id,
                crate::csv_escape(&t.title),
                t.duration,
                t.completed_at_iso()
            );
        }
    } else if json {
        let output = ListOutput {
            timers,
            count: timers.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if timers.is_empty() {
        println!("No completed timers yet.");
    } else {
        println!("Completed timers ({} found):", timers.len());
        println!();
        for t in timers {
            println!(
                "  #{:<14} {:>6}  {}  {}",
                t.id,
                format_elapsed(t.duration),
                t.completed_at.format("%Y-%m-%d %H:%M"),
                t.title
            );
        }
    }

    Ok(())
}
