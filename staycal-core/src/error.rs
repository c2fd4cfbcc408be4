//! Error types for staycal.
//!
//! These cover I/O, configuration and parse failures only. Data-quality
//! problems inside a day feed are reported as [`crate::Diagnostic`] values
//! instead, so one bad record never aborts a whole batch.

use thiserror::Error;

/// Errors that can occur in staycal operations.
#[derive(Error, Debug)]
pub enum StayCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("Feed directory not found: {0}")]
    FeedDirNotFound(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for staycal operations.
pub type StayCalResult<T> = Result<T, StayCalError>;
