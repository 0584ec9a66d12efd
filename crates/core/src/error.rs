//! Error types for the vacancy statistics system.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the vacancy statistics system.
#[derive(Error, Debug)]
pub enum Error {
    /// A record stream, or the file backing it, has no rows.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Currency code with no entry in the reference-rate table.
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Published timestamp that does not start with a four-digit year.
    #[error("Malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    /// Required CSV column missing from the header.
    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// Row rejected by the reader.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },

    /// Numeric field that failed to parse.
    #[error("Invalid number in '{field}': {value:?}")]
    InvalidNumber { field: String, value: String },

    /// Listing filter or sort parameter that could not be parsed.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A shard worker panicked before producing its accumulators.
    #[error("Worker error: {0}")]
    Worker(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an empty input error.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Error::EmptyInput(msg.into())
    }

    /// Create an unknown currency error.
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Error::UnknownCurrency(code.into())
    }

    /// Create a malformed timestamp error.
    pub fn malformed_timestamp(raw: impl Into<String>) -> Self {
        Error::MalformedTimestamp(raw.into())
    }

    /// Create a missing column error.
    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    /// Create an invalid number error.
    pub fn invalid_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::InvalidNumber {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an invalid filter error.
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        Error::InvalidFilter(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a worker error.
    pub fn worker(msg: impl Into<String>) -> Self {
        Error::Worker(msg.into())
    }
}
