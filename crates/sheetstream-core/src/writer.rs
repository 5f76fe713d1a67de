//! The writer seam implemented by every output backend

use crate::{CellValue, Column};

/// One named worksheet being written
///
/// A sheet is created by [`SpreadsheetWriter::new_sheet`], fed rows by a
/// single dedicated thread, and terminated exactly once by [`close`].
/// After close, further appends return [`crate::Error::SheetClosed`].
///
/// [`close`]: SheetWriter::close
pub trait SheetWriter: Send {
    /// Backend error type
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encode one row of values
    ///
    /// Rejects the append with a row-limit condition once the sheet holds
    /// [`crate::MAX_ROW_COUNT`] rows; already-written rows are untouched.
    fn append_row(&mut self, values: &[CellValue]) -> Result<(), Self::Error>;

    /// Finish the sheet and hand its content to the document
    ///
    /// Idempotent: closing an already-closed sheet is a no-op.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A spreadsheet document writer producing sheets created with
/// [`new_sheet`]; the document finishes when [`close`] is called.
///
/// Writers allow writing to separate sheets concurrently: `new_sheet` takes
/// `&self` and the returned sheet handle may move to its own thread. The
/// final document lists sheets in the order they were created, regardless
/// of the order their threads finish.
///
/// [`new_sheet`]: SpreadsheetWriter::new_sheet
/// [`close`]: SpreadsheetWriter::close
pub trait SpreadsheetWriter {
    /// Backend error type
    type Error: std::error::Error + Send + Sync + 'static;
    /// The backend's sheet handle
    type Sheet: SheetWriter<Error = Self::Error>;

    /// Create the next sheet; its position in the document is fixed now
    fn new_sheet(&self, name: &str, columns: &[Column]) -> Result<Self::Sheet, Self::Error>;

    /// Wait for every sheet to finish and finalize the document
    ///
    /// Idempotent: closing an already-closed document is a no-op.
    fn close(&mut self) -> Result<(), Self::Error>;
}
