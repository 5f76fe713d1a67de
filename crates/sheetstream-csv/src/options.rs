//! CSV options

/// Options for reading CSV input
#[derive(Debug, Clone)]
pub struct CsvReadOptions {
    /// Field delimiter; `None` sniffs it from the first kilobyte
    pub delimiter: Option<u8>,
    /// Character-set label (e.g. `windows-1252`); `None` means UTF-8
    pub charset: Option<String>,
    /// Whether the first record carries the column names
    pub has_header: bool,
    /// Automatic type detection for fields
    pub detect_types: bool,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            charset: None,
            has_header: true,
            detect_types: true,
        }
    }
}
