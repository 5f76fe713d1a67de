//! # sheetstream-core
//!
//! Shared vocabulary for the sheetstream streaming spreadsheet writers:
//! - [`CellValue`] - Typed cell values (numbers, dates, text) and their
//!   [`ValueType`] classification
//! - [`Style`] and [`Column`] - The small style surface shared by backends
//! - [`SpreadsheetWriter`] and [`SheetWriter`] - The seam every output
//!   backend implements
//!
//! The writers themselves live in the backend crates (`sheetstream-ods`,
//! `sheetstream-xlsx`); a backend hands out one [`SheetWriter`] per sheet
//! and each sheet may be fed from its own thread.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetstream_core::{Column, SpreadsheetWriter, SheetWriter};
//!
//! let writer = /* some backend */;
//! let mut sheet = writer.new_sheet("People", &[Column::bold_header("Name")])?;
//! sheet.append_row(&["Ada".into(), 1815.into()])?;
//! sheet.close()?;
//! ```

pub mod error;
pub mod style;
pub mod value;
pub mod writer;

pub use error::{Error, Result};
pub use style::{Column, Style};
pub use value::{CellValue, ValueType};
pub use writer::{SheetWriter, SpreadsheetWriter};

/// Maximum number of rows in a sheet (the target formats' hard limit)
pub const MAX_ROW_COUNT: u32 = 1 << 20;
