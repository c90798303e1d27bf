//! Error types for timer, bench and formatting operations
//!
//! Every misuse of the timing API is reported synchronously as a
//! `LapwatchError`; nothing is retried or recovered internally.

use std::fmt;
use thiserror::Error;

/// Error type for all lapwatch operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LapwatchError {
    /// `start` was called on a timer that is still running
    #[error("Timer '{name}' is already started. Stop it before starting it again.")]
    TimerAlreadyStarted { name: String },

    /// `stop` or `lap` was called on a timer that is not running
    #[error("Timer '{name}' has not been started or is already stopped.")]
    TimerNotStartedOrIsStopped { name: String },

    /// A reading was requested from a timer that was never started
    #[error("Timer '{name}' does not exist. It must be started first.")]
    TimerDoesNotExist { name: String },

    /// `end` or a reading was requested before the bench was started
    #[error("Bench has not been started. Call start() first.")]
    BenchNotStarted,

    /// A reading was requested before the bench was ended
    #[error("Bench has not been ended. Call end() first.")]
    BenchNotEnded,

    /// A printf-style format string could not be parsed or applied
    #[error("Invalid format '{format}': {message}")]
    InvalidFormat { format: String, message: String },

    /// Configuration values that cannot be used
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },

    /// The process memory counters could not be read
    #[error("Memory error: {message}")]
    Memory { message: String, source_details: Option<String> },

    /// Snapshots could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl LapwatchError {
    /// Get the error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            LapwatchError::TimerAlreadyStarted { .. }
            | LapwatchError::TimerNotStartedOrIsStopped { .. }
            | LapwatchError::TimerDoesNotExist { .. } => ErrorCategory::Timer,
            LapwatchError::BenchNotStarted | LapwatchError::BenchNotEnded => ErrorCategory::Bench,
            LapwatchError::InvalidFormat { .. } => ErrorCategory::Format,
            LapwatchError::Configuration { .. } => ErrorCategory::Configuration,
            LapwatchError::Memory { .. } => ErrorCategory::Memory,
            LapwatchError::Serialization { .. } => ErrorCategory::Serialization,
        }
    }

    /// Whether the error comes from calling the API in the wrong order
    pub fn is_usage_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Timer | ErrorCategory::Bench)
    }

    /// Name of the timer involved, if any
    pub fn timer_name(&self) -> Option<&str> {
        match self {
            LapwatchError::TimerAlreadyStarted { name }
            | LapwatchError::TimerNotStartedOrIsStopped { name }
            | LapwatchError::TimerDoesNotExist { name } => Some(name),
            _ => None,
        }
    }
}

/// Broad grouping of errors for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorCategory {
    Timer,
    Bench,
    Format,
    Configuration,
    Memory,
    Serialization,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Timer => write!(f, "timer"),
            ErrorCategory::Bench => write!(f, "bench"),
            ErrorCategory::Format => write!(f, "format"),
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Memory => write!(f, "memory"),
            ErrorCategory::Serialization => write!(f, "serialization"),
        }
    }
}

/// Result type alias for lapwatch operations
pub type LapwatchResult<T> = Result<T, LapwatchError>;

/// Convenience constructors for common error scenarios
impl LapwatchError {
    pub fn already_started(name: &str) -> Self {
        Self::TimerAlreadyStarted { name: name.to_string() }
    }

    pub fn not_started_or_stopped(name: &str) -> Self {
        Self::TimerNotStartedOrIsStopped { name: name.to_string() }
    }

    pub fn does_not_exist(name: &str) -> Self {
        Self::TimerDoesNotExist { name: name.to_string() }
    }

    /// Create a format error for the given format string
    pub fn invalid_format(format: &str, message: impl Into<String>) -> Self {
        Self::InvalidFormat { format: format.to_string(), message: message.into() }
    }

    /// Create a configuration error for a named setting
    pub fn configuration(setting: &str, message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), setting: Some(setting.to_string()) }
    }
}

impl From<std::io::Error> for LapwatchError {
    fn from(err: std::io::Error) -> Self {
        LapwatchError::Memory {
            message: format!("I/O error: {err}"),
            source_details: Some(format!("IO Error kind: {:?}", err.kind())),
        }
    }
}

impl From<serde_json::Error> for LapwatchError {
    fn from(err: serde_json::Error) -> Self {
        LapwatchError::Serialization { message: format!("JSON error: {err}") }
    }
}

/// Convert from the memory probe's anyhow errors
impl From<anyhow::Error> for LapwatchError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return LapwatchError::Memory {
                message: format!("Memory probe failed: {io_err}"),
                source_details: Some(format!("IO Error kind: {:?}", io_err.kind())),
            };
        }

        LapwatchError::Memory { message: format!("Memory probe failed: {err}"), source_details: None }
    }
}
