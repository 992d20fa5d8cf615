//! Input normalization for timer saves.
//!
//! Normalization always happens before any engine call. Titles are
//! repaired (blank becomes [`DEFAULT_TITLE`]); durations are not: a
//! non-positive or non-numeric duration rejects the whole save.

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Title stored when the caller supplies a blank one.
pub const DEFAULT_TITLE: &str = "Deep Work Session";

/// Trim a title, substituting [`DEFAULT_TITLE`] when nothing is left.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        tracing::warn!("Blank title provided, using default");
        DEFAULT_TITLE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Validate a duration in seconds and truncate it to whole seconds.
///
/// # Errors
///
/// Returns `InvalidInput` if the value is NaN, infinite, or does not
/// truncate to at least one second.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn normalize_duration(seconds: f64) -> Result<i64> {
    if !seconds.is_finite() {
        return Err(Error::InvalidInput(format!(
            "duration must be a finite number, got {seconds}"
        )));
    }

    let whole = seconds.trunc();
    if whole < 1.0 {
        return Err(Error::InvalidInput(format!(
            "duration must be positive, got {seconds}"
        )));
    }
    if whole > i64::MAX as f64 {
        return Err(Error::InvalidInput(format!(
            "duration is out of range, got {seconds}"
        )));
    }

    Ok(whole as i64)
}

/// Parse a raw duration argument (seconds) into a number.
///
/// Only checks that the text is numeric; range checks belong to
/// [`normalize_duration`].
///
/// # Errors
///
/// Returns `InvalidInput` for non-numeric text.
pub fn parse_duration(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("duration must be a number, got '{raw}'")))
}

/// Parse a `YYYY-MM-DD` calendar day.
///
/// # Errors
///
/// Returns `InvalidInput` if the text is not a valid date.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("day must be YYYY-MM-DD, got '{raw}'")))
}
