//! XLSX backend error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while writing an XLSX document
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the delegated workbook library
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Writer condition (row ceiling, closed sheet/document)
    #[error("{0}")]
    Core(#[from] sheetstream_core::Error),
}

impl XlsxError {
    /// True for the recoverable row-ceiling condition
    pub fn is_row_limit(&self) -> bool {
        matches!(self, XlsxError::Core(sheetstream_core::Error::TooManyRows))
    }
}
