//! Completed timer model.
//!
//! A completed timer is written once, when a focus session ends, and is
//! never updated afterwards.

use crate::error::Result;
use crate::validate::{normalize_duration, normalize_title};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A completed focus timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTimer {
    /// Engine-assigned row id, or a time-derived id for memory records
    pub id: i64,

    /// Trimmed, never empty
    pub title: String,

    /// Whole seconds, always positive
    pub duration: i64,

    /// Assigned when the record is written
    pub completed_at: DateTime<Utc>,
}

impl CompletedTimer {
    /// Timestamp in the stored ISO-8601 form (millisecond precision, `Z`).
    #[must_use]
    pub fn completed_at_iso(&self) -> String {
        format_timestamp(&self.completed_at)
    }
}

/// A normalized save request.
///
/// Can only be built through [`NewTimer::new`], so every value that reaches
/// a store already satisfies the record invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimer {
    title: String,
    duration: i64,
}

impl NewTimer {
    /// Normalize a raw title and duration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the duration is non-numeric or not positive.
    pub fn new(title: &str, duration: f64) -> Result<Self> {
        let duration = normalize_duration(duration)?;
        Ok(Self {
            title: normalize_title(title),
            duration,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn duration(&self) -> i64 {
        self.duration
    }

    /// Stamp the request into a record with the given identity.
    #[must_use]
    pub fn complete(&self, id: i64, completed_at: DateTime<Utc>) -> CompletedTimer {
        CompletedTimer {
            id,
            title: self.title.clone(),
            duration: self.duration,
            completed_at,
        }
    }
}

/// Format a timestamp the way it is stored.
#[must_use]
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 (what Lockin writes) and SQLite's `CURRENT_TIMESTAMP`
/// form (`YYYY-MM-DD HH:MM:SS`, UTC), which rows inserted without an
/// explicit timestamp carry.
///
/// # Errors
///
/// Returns the parse error for the SQLite form when neither format matches.
pub fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|naive| naive.and_utc())
}
