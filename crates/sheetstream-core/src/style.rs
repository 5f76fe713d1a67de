//! Column and style types
//!
//! The style surface is intentionally small: backends share a bold flag and
//! a number-format string, and deduplicate identical descriptors so each
//! distinct style is emitted once per document.

/// A style for a column, row or cell
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Style {
    /// True if the font is bold
    pub font_bold: bool,
    /// The number format (empty for the backend default)
    pub number_format: String,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font_bold = bold;
        self
    }

    /// Set the number format string
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = format.into();
        self
    }

    /// A style with no distinguishing attributes maps to "no style" and is
    /// never registered with a backend's style table.
    pub fn is_default(&self) -> bool {
        !self.font_bold && self.number_format.is_empty()
    }
}

/// One column of a sheet: its name plus the header's and the column's style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Column {
    /// Column name, written into the header row
    pub name: String,
    /// Style of the header cell
    pub header: Style,
    /// Style of the column's data cells
    pub column: Style,
}

impl Column {
    /// Create a column with a plain header
    pub fn new<S: Into<String>>(name: S) -> Self {
        Column {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a column with a bold header, the usual shape for exports
    pub fn bold_header<S: Into<String>>(name: S) -> Self {
        Column {
            name: name.into(),
            header: Style::new().bold(true),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_detection() {
        assert!(Style::new().is_default());
        assert!(!Style::new().bold(true).is_default());
        assert!(!Style::new().number_format("0.00").is_default());
    }

    #[test]
    fn test_identical_styles_compare_equal() {
        assert_eq!(Style::new().bold(true), Style::new().bold(true));
        assert_ne!(Style::new().bold(true), Style::new());
    }
}
