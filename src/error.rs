//! Error types for Lockin.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 4=validation, 7=config, 8=io)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Storage-stage errors are normally absorbed by
//! [`TimerStore`](crate::storage::TimerStore) and turned into fallback
//! writes or partial reads. They still carry codes so the absorbed cause can
//! be reported alongside a fallback save.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Lockin operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Storage (exit 2)
    ConnectionOpenFailure,
    HealthCheckFailure,
    SchemaError,
    WriteError,
    ReadError,
    StorageUnavailable,

    // Validation (exit 4)
    InvalidInput,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::ConnectionOpenFailure => "CONNECTION_OPEN_FAILURE",
            Self::HealthCheckFailure => "HEALTH_CHECK_FAILURE",
            Self::SchemaError => "SCHEMA_ERROR",
            Self::WriteError => "WRITE_ERROR",
            Self::ReadError => "READ_ERROR",
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::ConnectionOpenFailure
            | Self::HealthCheckFailure
            | Self::SchemaError
            | Self::WriteError
            | Self::ReadError
            | Self::StorageUnavailable => 2,
            Self::InvalidInput => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the same call could succeed if retried.
    ///
    /// Validation errors need corrected input. Transient storage failures
    /// may clear on their own; an exhausted attempt budget needs a reset.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::ConnectionOpenFailure
                | Self::HealthCheckFailure
                | Self::WriteError
                | Self::ReadError
        )
    }

    /// True for failures raised by the storage layer.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        self.exit_code() == 2
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in Lockin operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to open database ({strategy}): {reason}")]
    ConnectionOpen {
        strategy: &'static str,
        reason: String,
    },

    #[error("Database health check failed: {0}")]
    HealthCheck(#[source] rusqlite::Error),

    #[error("Schema setup failed: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Write failed: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Read failed: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("Storage unavailable after {attempts} connection attempts")]
    StorageUnavailable { attempts: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid database location: {}", path.display())]
    InvalidPath { path: PathBuf },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::ConnectionOpen { .. } => ErrorCode::ConnectionOpenFailure,
            Self::HealthCheck(_) => ErrorCode::HealthCheckFailure,
            Self::Schema(_) => ErrorCode::SchemaError,
            Self::Write(_) => ErrorCode::WriteError,
            Self::Read(_) => ErrorCode::ReadError,
            Self::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            Self::InvalidInput(_) => ErrorCode::InvalidInput,
            Self::Config(_) | Self::InvalidPath { .. } => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint for humans.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::StorageUnavailable { .. } => Some(
                "The database could not be opened. Check the path passed to --db \
                 (or LOCKIN_DB) and that its directory is writable."
                    .to_string(),
            ),
            Self::InvalidInput(msg) => {
                if msg.contains("duration") {
                    Some("Duration is a positive number of seconds, e.g. 1500".to_string())
                } else if msg.contains("day") {
                    Some("Days are written as YYYY-MM-DD, e.g. 2025-01-31".to_string())
                } else {
                    None
                }
            }
            Self::Config(msg) if msg.contains("LOCKIN_MAX_ATTEMPTS") => {
                Some("LOCKIN_MAX_ATTEMPTS must be a whole number of at least 1".to_string())
            }
            Self::InvalidPath { path } => Some(format!(
                "Pass a file path such as {}/timers.db",
                path.display()
            )),
            Self::ConnectionOpen { .. }
            | Self::HealthCheck(_)
            | Self::Schema(_)
            | Self::Write(_)
            | Self::Read(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
