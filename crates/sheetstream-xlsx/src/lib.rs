//! # sheetstream-xlsx
//!
//! XLSX backend for sheetstream, delegating to the `rust_xlsxwriter`
//! workbook library. This is a thin adapter over the same
//! [`SpreadsheetWriter`](sheetstream_core::SpreadsheetWriter) seam the ODS
//! backend implements; unlike the ODS backend it collects the whole
//! workbook in memory, so very large sheets may impose problems.

mod error;
mod writer;

pub use error::{XlsxError, XlsxResult};
pub use writer::{XlsxSheet, XlsxWriter};
