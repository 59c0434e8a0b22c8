//! Error handling module for SkipCut

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for SkipCut operations
#[derive(Error, Debug)]
pub enum SkipCutError {
    /// Domain rule or orchestration failure
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Invalid time format
    #[error("Invalid time format: {time}. Expected seconds, MM:SS, or HH:MM:SS")]
    InvalidTimeFormat { time: String },

    /// Segments file could not be understood
    #[error("Invalid segments file {path}: {message}")]
    InvalidSegmentsFile { path: String, message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for SkipCut operations
pub type SkipCutResult<T> = std::result::Result<T, SkipCutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_convert() {
        let err: SkipCutError = DomainError::BadArgs("empty url".to_string()).into();
        assert!(matches!(err, SkipCutError::Domain(DomainError::BadArgs(_))));

        let err: SkipCutError = serde_json::from_str::<Vec<f64>>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("JSON error"));

        let err: SkipCutError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
