// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// Invalid time range (end at or before start)
    InvalidTimeRange(String),
    /// Requested window fully consumed by removed content
    WindowConsumed {
        start: f64,
        end: f64,
        removed: f64,
    },
    /// External process could not be started or failed
    ProcessFailed(String),
    /// Operation cancelled by the user
    Cancelled,
    /// File system failure
    FsFail(String),
    /// Configuration failure
    ConfigFail(String),
    /// Internal error
    InternalError(String),
}

impl DomainError {
    /// Short status tag used in hook contexts and exit summaries
    pub fn status(&self) -> &'static str {
        match self {
            DomainError::BadArgs(_) => "bad_args",
            DomainError::InvalidTimeRange(_) => "invalid_range",
            DomainError::WindowConsumed { .. } => "window_consumed",
            DomainError::ProcessFailed(_) => "process_failed",
            DomainError::Cancelled => "cancelled",
            DomainError::FsFail(_) => "fs_failed",
            DomainError::ConfigFail(_) => "config_failed",
            DomainError::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::InvalidTimeRange(msg) => write!(f, "Invalid time range: {}", msg),
            DomainError::WindowConsumed {
                start,
                end,
                removed,
            } => write!(
                f,
                "Requested window fully consumed by removed content: {:.3}s - {:.3}s loses {:.3}s",
                start, end, removed
            ),
            DomainError::ProcessFailed(msg) => write!(f, "Process failed: {}", msg),
            DomainError::Cancelled => write!(f, "Operation cancelled"),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigFail(msg) => write!(f, "Configuration error: {}", msg),
            DomainError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
