//! Data models for Lockin.
//!
//! - [`CompletedTimer`] - a persisted (or memory-buffered) completion record
//! - [`NewTimer`] - a validated save request, not yet stored

pub mod timer;

pub use timer::{CompletedTimer, NewTimer, format_timestamp, parse_timestamp};
