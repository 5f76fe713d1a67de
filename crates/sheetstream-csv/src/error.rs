//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur while reading CSV input
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The requested character set is not a known encoding label
    #[error("unknown charset: {0:?}")]
    UnknownCharset(String),

    /// The input held no records at all
    #[error("input is empty")]
    EmptyInput,
}
