//! Error types and exit codes for compact-guard
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (extraction, IO, write failures)
//! - 2: Usage error (bad flags/args, invalid configuration values)
//! - 3: Data error (missing transcript, no stored decisions, unreadable entry)
//!
//! Hook commands never surface these codes to the host: every error is
//! downgraded to a diagnostic line and the process exits 0.

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing transcript or stored decisions (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while extracting, storing or injecting decisions
#[derive(Error, Debug)]
pub enum GuardError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("transcript not found: {path:?}")]
    MissingTranscript { path: PathBuf },

    #[error("no stored decisions for project {project}")]
    NoStoreFound { project: String },

    #[error("invalid decisions file {path:?}: {reason}")]
    InvalidEntry { path: PathBuf, reason: String },

    // Generic failures (exit code 1)
    #[error("extraction timed out after {timeout_secs}s")]
    ExtractionTimeout { timeout_secs: u64 },

    #[error("extraction failed: {reason}")]
    ExtractionError { reason: String },

    #[error("failed to write {path:?}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl GuardError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        GuardError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed extraction
    pub fn extraction(reason: impl Into<String>) -> Self {
        GuardError::ExtractionError {
            reason: reason.into(),
        }
    }

    /// Create an error for a failed store write
    pub fn write_failure(path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        GuardError::WriteFailure {
            path: path.into(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a stored file that cannot be parsed
    pub fn invalid_entry(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        GuardError::InvalidEntry {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GuardError::UnknownFormat(_)
            | GuardError::UsageError(_)
            | GuardError::InvalidValue { .. } => ExitCode::Usage,

            GuardError::MissingTranscript { .. }
            | GuardError::NoStoreFound { .. }
            | GuardError::InvalidEntry { .. } => ExitCode::Data,

            GuardError::ExtractionTimeout { .. }
            | GuardError::ExtractionError { .. }
            | GuardError::WriteFailure { .. }
            | GuardError::Io(_)
            | GuardError::Yaml(_)
            | GuardError::Json(_)
            | GuardError::Toml(_)
            | GuardError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            GuardError::UnknownFormat(_) => "unknown_format",
            GuardError::UsageError(_) => "usage_error",
            GuardError::InvalidValue { .. } => "invalid_value",
            GuardError::MissingTranscript { .. } => "missing_transcript",
            GuardError::NoStoreFound { .. } => "no_store_found",
            GuardError::InvalidEntry { .. } => "invalid_entry",
            GuardError::ExtractionTimeout { .. } => "extraction_timeout",
            GuardError::ExtractionError { .. } => "extraction_error",
            GuardError::WriteFailure { .. } => "write_failure",
            GuardError::Io(_) => "io_error",
            GuardError::Yaml(_) => "yaml_error",
            GuardError::Json(_) => "json_error",
            GuardError::Toml(_) => "toml_error",
            GuardError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for compact-guard operations
pub type Result<T> = std::result::Result<T, GuardError>;
