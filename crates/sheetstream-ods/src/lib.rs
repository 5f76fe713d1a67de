//! # sheetstream-ods
//!
//! Streaming, concurrent ODS (OpenDocument spreadsheet) writer.
//!
//! An [`OdsWriter`] owns the output archive; each [`OdsSheet`] streams its
//! rows through a compressed, disk-backed spill buffer and may live on its
//! own thread. The finished document lists sheets in creation order
//! regardless of which sheet finished writing first.
//!
//! ## Example
//!
//! ```no_run
//! use sheetstream_core::Column;
//! use sheetstream_ods::OdsWriter;
//!
//! # fn main() -> Result<(), sheetstream_ods::OdsError> {
//! let mut writer = OdsWriter::create("people.ods")?;
//! let mut sheet = writer.new_sheet("People", &[Column::bold_header("Name")])?;
//! sheet.append_row(&["Ada".into()])?;
//! sheet.close()?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod spill;
mod styles;
mod writer;
mod xml;

pub use error::{OdsError, OdsResult};
pub use writer::{OdsSheet, OdsWriter};
