//! ODS error types

use thiserror::Error;

/// Result type for ODS operations
pub type OdsResult<T> = std::result::Result<T, OdsError>;

/// Errors that can occur while writing an ODS document
#[derive(Debug, Error)]
pub enum OdsError {
    /// IO error (spill file or archive write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writer condition (row ceiling, closed sheet/document)
    #[error("{0}")]
    Core(#[from] sheetstream_core::Error),
}

impl OdsError {
    /// True for the recoverable row-ceiling condition; the sheet stays
    /// usable and previously written rows are intact.
    pub fn is_row_limit(&self) -> bool {
        matches!(self, OdsError::Core(sheetstream_core::Error::TooManyRows))
    }
}
