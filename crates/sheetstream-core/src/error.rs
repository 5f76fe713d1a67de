//! Error types for sheetstream-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-visible writer conditions shared by all backends
///
/// These are deliberately distinct from I/O failures: a [`Error::TooManyRows`]
/// append leaves the sheet usable and already-written rows intact, while I/O
/// errors (surfaced by the backend error types) are fatal to the affected
/// sheet or document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The sheet reached the row ceiling; the append was rejected
    #[error("too many rows (limit is {})", crate::MAX_ROW_COUNT)]
    TooManyRows,

    /// Append on a sheet that has already been closed
    #[error("sheet is closed")]
    SheetClosed,

    /// New sheet requested on a document that has already been closed
    #[error("document is closed")]
    DocumentClosed,
}
