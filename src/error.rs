//! Error types for reading, merging and writing exports.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a merge run
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Cannot read {} with common encodings: {}", .path.display(), .reason)]
    Read { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;
