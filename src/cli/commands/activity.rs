//! Activity command implementation.

use crate::activity::{DayActivity, activity_for_year, format_elapsed, timers_on_day};
use crate::cli::commands::list::print_timers;
use crate::cli::commands::open_store;
use crate::error::Result;
use crate::validate::parse_day;
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for the yearly activity summary.
#[derive(Serialize)]
struct ActivityOutput {
    from: NaiveDate,
    to: NaiveDate,
    total_timers: usize,
    active_days: usize,
    total_seconds: i64,
    days: Vec<DayActivity>,
}

/// Execute the activity command.
///
/// With `day`, prints that day's timers; otherwise a per-day summary of the
/// past year.
///
/// # Errors
///
/// Returns `InvalidInput` for a malformed day, or a configuration error.
pub fn execute(
    day: Option<&str>,
    db_path: Option<&PathBuf>,
    max_attempts: Option<u32>,
    json: bool,
) -> Result<()> {
    let day = day.map(parse_day).transpose()?;
    let mut store = open_store(db_path, max_attempts)?;
    let timers = store.load_timers();

    if let Some(day) = day {
        return print_timers(&timers_on_day(&timers, day), json);
    }

    let today = Utc::now().date_naive();
    let days = activity_for_year(&timers, today);
    let from = days.first().map_or(today, |d| d.day);

    let in_window: Vec<_> = timers.iter().filter(|t| t.completed_at.date_naive() >= from).collect();
    let output = ActivityOutput {
        from,
        to: today,
        total_timers: in_window.len(),
        active_days: days.iter().filter(|d| d.count > 0).count(),
        total_seconds: in_window.iter().map(|t| t.duration).sum(),
        days,
    };

    if crate::is_csv() {
        println!("day,count");
        for d in &output.days {
            println!("{},{}", d.day, d.count);
        }
    } else if json {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", format!("Activity {} to {}", output.from, output.to).bold());
        println!();
        println!("Timers:      {}", output.total_timers);
        println!("Active days: {}", output.active_days);
        println!("Focus time:  {}", format_elapsed(output.total_seconds));

        let active: Vec<_> = output.days.iter().filter(|d| d.count > 0).collect();
        if !active.is_empty() {
            println!();
            for d in active {
                println!("  {}  {} {}", d.day, "■".repeat(d.count.min(20)).green(), d.count);
            }
        }
    }

    Ok(())
}
