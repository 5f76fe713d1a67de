//! Cell value types and classification

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// Represents the value fed into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell; encoders emit a placeholder with no value or text
    Empty,

    /// Floating-point value
    Number(f64),

    /// Integer value (kept apart from [`CellValue::Number`] so the literal
    /// text never grows a fractional part)
    Int(i64),

    /// A timestamp; rendered as `YYYY-MM-DD`
    Date(NaiveDateTime),

    /// String value
    Text(String),
}

/// The cell's value's type, driving the XML `value-type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Numerical data (integers and floats)
    Float,
    /// Dates
    Date,
    /// A string that looks like an http(s) link
    Link,
    /// Everything else
    String,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueType::Float => "float",
            ValueType::Date => "date",
            ValueType::Link => "link",
            ValueType::String => "string",
        })
    }
}

impl CellValue {
    /// Create a text value
    pub fn text<S: Into<String>>(s: S) -> Self {
        CellValue::Text(s.into())
    }

    /// Classify the value for cell encoding
    ///
    /// Pure function: numbers map to [`ValueType::Float`], timestamps to
    /// [`ValueType::Date`], strings beginning with `http://` or `https://`
    /// to [`ValueType::Link`], everything else to [`ValueType::String`].
    /// Callers must check [`CellValue::is_empty`] first; an empty value has
    /// no meaningful type and no cell content is emitted for it.
    pub fn value_type(&self) -> ValueType {
        match self {
            CellValue::Number(_) | CellValue::Int(_) => ValueType::Float,
            CellValue::Date(_) => ValueType::Date,
            CellValue::Text(s) if s.starts_with("https://") || s.starts_with("http://") => {
                ValueType::Link
            }
            CellValue::Text(_) | CellValue::Empty => ValueType::String,
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// The literal text written into the cell
    ///
    /// Dates render as `%Y-%m-%d`, numbers with their natural decimal
    /// representation, empty values as the empty string.
    pub fn literal(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<f32> for CellValue {
    fn from(n: f32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i as i64)
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        CellValue::Int(i as i64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(d: NaiveDateTime) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

/// Unset values map to [`CellValue::Empty`]: an absent timestamp (or any
/// other `None`) emits no cell content.
impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => CellValue::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_typing() {
        assert_eq!(CellValue::from(42.5).value_type(), ValueType::Float);
        assert_eq!(CellValue::from(7i64).value_type(), ValueType::Float);
        assert_eq!(
            CellValue::text("https://example.com").value_type(),
            ValueType::Link
        );
        assert_eq!(
            CellValue::text("http://example.com/x").value_type(),
            ValueType::Link
        );
        // Scheme must be a prefix, not merely present
        assert_eq!(
            CellValue::text("see https://example.com").value_type(),
            ValueType::String
        );
        assert_eq!(CellValue::text("hello").value_type(), ValueType::String);

        let date = NaiveDate::from_ymd_opt(2023, 4, 5).unwrap();
        assert_eq!(CellValue::from(date).value_type(), ValueType::Date);
    }

    #[test]
    fn test_literal_text() {
        assert_eq!(CellValue::from(42.5).literal(), "42.5");
        assert_eq!(CellValue::from(-3i64).literal(), "-3");
        let date = NaiveDate::from_ymd_opt(2023, 4, 5).unwrap();
        assert_eq!(CellValue::from(date).literal(), "2023-04-05");
        assert_eq!(CellValue::Empty.literal(), "");
    }

    #[test]
    fn test_unset_maps_to_empty() {
        assert_eq!(CellValue::from(None::<NaiveDate>), CellValue::Empty);
        assert_eq!(CellValue::from(None::<f64>), CellValue::Empty);
        assert_eq!(
            CellValue::from(Some("x")),
            CellValue::Text("x".to_string())
        );
    }
}
