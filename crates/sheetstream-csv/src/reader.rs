//! CSV source: sniffing, decoding and typed record conversion

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use encoding_rs::Encoding;

use sheetstream_core::{CellValue, Column};

use crate::decode::DecodingReader;
use crate::error::{CsvError, CsvResult};
use crate::options::CsvReadOptions;

/// A CSV input opened for streaming into a spreadsheet writer
///
/// The first record becomes the column names (bold headers, the usual
/// export shape); every following record converts to typed cell values.
pub struct CsvSource {
    reader: csv::Reader<Box<dyn Read + Send>>,
    headers: csv::StringRecord,
    detect_types: bool,
}

impl std::fmt::Debug for CsvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSource")
            .field("headers", &self.headers)
            .field("detect_types", &self.detect_types)
            .finish_non_exhaustive()
    }
}

impl CsvSource {
    /// Open a CSV file
    pub fn open<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Open a CSV byte stream
    ///
    /// Decodes the configured charset to UTF-8 on the fly, sniffs the field
    /// separator from the first kilobyte unless one is given, and consumes
    /// the header record.
    pub fn from_reader<R: Read + Send + 'static>(
        input: R,
        options: &CsvReadOptions,
    ) -> CsvResult<Self> {
        let encoding = match &options.charset {
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| CsvError::UnknownCharset(label.clone()))?,
            None => encoding_rs::UTF_8,
        };
        let decoded: Box<dyn Read + Send> = if encoding == encoding_rs::UTF_8 {
            Box::new(input)
        } else {
            Box::new(DecodingReader::new(input, encoding))
        };

        let mut buffered = BufReader::with_capacity(1 << 20, decoded);
        let delimiter = match options.delimiter {
            Some(d) => d,
            None => sniff_delimiter(buffered.fill_buf()?),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .from_reader(Box::new(buffered) as Box<dyn Read + Send>);

        let mut headers = csv::StringRecord::new();
        if options.has_header && !reader.read_record(&mut headers)? {
            return Err(CsvError::EmptyInput);
        }

        Ok(CsvSource {
            reader,
            headers,
            detect_types: options.detect_types,
        })
    }

    /// The header record (empty when the input has no header)
    pub fn headers(&self) -> &csv::StringRecord {
        &self.headers
    }

    /// Columns for sheet creation: header names with bold header styles
    pub fn columns(&self) -> Vec<Column> {
        self.headers.iter().map(Column::bold_header).collect()
    }

    /// Iterate the remaining records as rows of typed cell values
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            inner: self.reader.records(),
            detect_types: self.detect_types,
        }
    }
}

/// Iterator over typed rows of a [`CsvSource`]
pub struct Rows<'a> {
    inner: csv::StringRecordsIter<'a, Box<dyn Read + Send>>,
    detect_types: bool,
}

impl Iterator for Rows<'_> {
    type Item = CsvResult<Vec<CellValue>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.inner.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        let row = record
            .iter()
            .map(|field| {
                if self.detect_types {
                    detect_type(field)
                } else {
                    CellValue::text(field)
                }
            })
            .collect();
        Some(Ok(row))
    }
}

/// The first byte of the initial kilobyte that does not look like field
/// content is the separator; `,` if none shows up.
fn sniff_delimiter(peek: &[u8]) -> u8 {
    for &b in peek.iter().take(1024) {
        if b == b'"' || b == b'_' || b == b'\r' || b == b'\n' {
            continue;
        }
        // Multi-byte sequences are letters in any charset we emit
        if b.is_ascii_alphanumeric() || b >= 0x80 {
            continue;
        }
        return b;
    }
    b','
}

/// Detect the type of a field value
fn detect_type(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return CellValue::Int(n);
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        return CellValue::Number(n);
    }
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return d.into();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return dt.into();
    }
    CellValue::text(field)
}
