//! Activity summaries over completed timers.
//!
//! Days are UTC calendar days of `completed_at`.

use crate::model::CompletedTimer;
use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Number of timers completed on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub day: NaiveDate,
    pub count: usize,
}

/// Per-day completion counts for the year ending on `today`.
///
/// Covers every day from the same date one year earlier through `today`
/// inclusive, oldest first, including days with no completions. Timers
/// outside that window are ignored.
#[must_use]
pub fn activity_for_year(timers: &[CompletedTimer], today: NaiveDate) -> Vec<DayActivity> {
    let start = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);

    let mut counts: BTreeMap<NaiveDate, usize> = start
        .iter_days()
        .take_while(|day| *day <= today)
        .map(|day| (day, 0))
        .collect();

    for timer in timers {
        if let Some(count) = counts.get_mut(&timer.completed_at.date_naive()) {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .map(|(day, count)| DayActivity { day, count })
        .collect()
}

/// Timers completed on `day`, in their original order.
#[must_use]
pub fn timers_on_day(timers: &[CompletedTimer], day: NaiveDate) -> Vec<CompletedTimer> {
    timers
        .iter()
        .filter(|timer| timer.completed_at.date_naive() == day)
        .cloned()
        .collect()
}

/// Format seconds as `MM:SS`; minutes keep counting past 59.
#[must_use]
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
