//! # sheetstream-csv
//!
//! CSV source for sheetstream: opens a CSV file or stream, sniffs the
//! field separator, decodes legacy character sets to UTF-8 on the fly and
//! yields typed rows ready for a spreadsheet writer.

mod decode;
mod error;
mod options;
mod reader;

pub use error::{CsvError, CsvResult};
pub use options::CsvReadOptions;
pub use reader::{CsvSource, Rows};
