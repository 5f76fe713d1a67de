//! XLSX writer delegating to `rust_xlsxwriter`
//!
//! A thin adapter: the workbook library buffers everything in memory, so
//! big sheets impose memory pressure that the ODS backend avoids. Sheets
//! may still be fed from separate threads; the workbook lock serialises
//! them.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use ahash::AHashMap;
use rust_xlsxwriter::{Format, Url, Workbook};

use sheetstream_core::{
    CellValue, Column, Error as CoreError, SheetWriter, SpreadsheetWriter, Style, ValueType,
    MAX_ROW_COUNT,
};

use crate::error::{XlsxError, XlsxResult};

/// Excel's sheet name length limit
const MAX_SHEET_NAME_LEN: usize = 31;

/// Writes an XLSX document through `rust_xlsxwriter`
pub struct XlsxWriter<W: Write> {
    out: Option<W>,
    book: Arc<Mutex<Book>>,
}

/// Workbook plus the deduplicating format cache, behind one lock
struct Book {
    workbook: Workbook,
    formats: AHashMap<Style, Format>,
    sheet_count: usize,
}

impl Book {
    /// Identical style descriptors resolve to the same cached format
    fn format_for(&mut self, style: &Style) -> Option<&Format> {
        if style.is_default() {
            return None;
        }
        Some(self.formats.entry(style.clone()).or_insert_with(|| {
            let mut format = Format::new();
            if style.font_bold {
                format = format.set_bold();
            }
            if !style.number_format.is_empty() {
                format = format.set_num_format(&style.number_format);
            }
            format
        }))
    }
}

impl XlsxWriter<BufWriter<File>> {
    /// Create an XLSX file at `path`
    pub fn create<P: AsRef<Path>>(path: P) -> XlsxResult<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> XlsxWriter<W> {
    /// Create a writer that saves the workbook into `w` on close
    pub fn new(w: W) -> Self {
        XlsxWriter {
            out: Some(w),
            book: Arc::new(Mutex::new(Book {
                workbook: Workbook::new(),
                formats: AHashMap::new(),
                sheet_count: 0,
            })),
        }
    }

    /// Create the next sheet and write its header row
    ///
    /// Thread-safe; the sheet's position in the workbook is fixed here.
    pub fn new_sheet(&self, name: &str, columns: &[Column]) -> XlsxResult<XlsxSheet> {
        let mut book = lock(&self.book);
        if self.out.is_none() {
            return Err(CoreError::DocumentClosed.into());
        }
        let index = book.sheet_count;
        book.sheet_count += 1;
        book.workbook
            .add_worksheet()
            .set_name(sanitize_sheet_name(name))?;

        let mut has_header = false;
        for (i, col) in columns.iter().enumerate() {
            let c = i as u16;
            if let Some(format) = book.format_for(&col.column).cloned() {
                let worksheet = book.workbook.worksheet_from_index(index)?;
                worksheet.set_column_format(c, &format)?;
            }
            if !col.name.is_empty() {
                has_header = true;
                let format = book.format_for(&col.header).cloned();
                let worksheet = book.workbook.worksheet_from_index(index)?;
                match format {
                    Some(f) => worksheet.write_string_with_format(0, c, &col.name, &f)?,
                    None => worksheet.write_string(0, c, &col.name)?,
                };
            }
        }

        Ok(XlsxSheet {
            book: Arc::clone(&self.book),
            index,
            row: u32::from(has_header),
            closed: false,
        })
    }

    /// Save the workbook and write it out
    ///
    /// Everything the sheets appended lives in memory until this point.
    /// Idempotent: closing an already-closed writer is a no-op.
    pub fn close(&mut self) -> XlsxResult<()> {
        let Some(mut out) = self.out.take() else {
            return Ok(());
        };
        let buf = lock(&self.book).workbook.save_to_buffer()?;
        out.write_all(&buf)?;
        out.flush()?;
        Ok(())
    }
}

fn lock(book: &Arc<Mutex<Book>>) -> MutexGuard<'_, Book> {
    book.lock().unwrap_or_else(|e| e.into_inner())
}

/// Excel rejects names over 31 chars or containing `[ ] : * ? / \`
fn sanitize_sheet_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// One worksheet of an [`XlsxWriter`]
pub struct XlsxSheet {
    book: Arc<Mutex<Book>>,
    index: usize,
    row: u32,
    closed: bool,
}

impl XlsxSheet {
    /// Append one row of typed values
    pub fn append_row(&mut self, values: &[CellValue]) -> XlsxResult<()> {
        if self.closed {
            return Err(CoreError::SheetClosed.into());
        }
        if self.row >= MAX_ROW_COUNT {
            return Err(CoreError::TooManyRows.into());
        }
        let mut book = lock(&self.book);
        let worksheet = book.workbook.worksheet_from_index(self.index)?;
        let row = self.row;
        for (i, value) in values.iter().enumerate() {
            let col = i as u16;
            match value {
                CellValue::Empty => continue,
                CellValue::Number(n) => worksheet.write_number(row, col, *n)?,
                CellValue::Int(n) => worksheet.write_number(row, col, *n as f64)?,
                CellValue::Date(_) => worksheet.write_string(row, col, value.literal())?,
                CellValue::Text(_) if value.value_type() == ValueType::Link => {
                    worksheet.write_url(row, col, Url::new(value.literal()))?
                }
                CellValue::Text(s) => worksheet.write_string(row, col, s)?,
            };
        }
        self.row += 1;
        Ok(())
    }

    /// Nothing to flush: the workbook is saved by the document's close.
    /// Idempotent.
    pub fn close(&mut self) -> XlsxResult<()> {
        self.closed = true;
        Ok(())
    }
}

impl<W: Write + Send> SpreadsheetWriter for XlsxWriter<W> {
    type Error = XlsxError;
    type Sheet = XlsxSheet;

    fn new_sheet(&self, name: &str, columns: &[Column]) -> XlsxResult<XlsxSheet> {
        XlsxWriter::new_sheet(self, name, columns)
    }

    fn close(&mut self) -> XlsxResult<()> {
        XlsxWriter::close(self)
    }
}

impl SheetWriter for XlsxSheet {
    type Error = XlsxError;

    fn append_row(&mut self, values: &[CellValue]) -> XlsxResult<()> {
        XlsxSheet::append_row(self, values)
    }

    fn close(&mut self) -> XlsxResult<()> {
        XlsxSheet::close(self)
    }
}
