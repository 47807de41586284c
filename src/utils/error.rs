//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading an engine log file
#[derive(Error, Debug)]
pub enum LogError {
    #[error("log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read log file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading a metric CSV file
#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("failed to read metric CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during document output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
