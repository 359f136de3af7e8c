//! Error types for the log field extraction crate.
//!
//! Per-line extraction never produces an [`ExtractError`]: lines that cannot be
//! matched come back as an unmatched [`crate::ExtractionResult`]. These errors
//! only cover loading rule and record collections, configuration, and file I/O.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid rule collection: {0}")]
    InvalidRuleSet(String),

    #[error("Invalid log record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
