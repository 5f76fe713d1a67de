//! Static document parts and the per-sheet XML encoder
//!
//! The fixed parts mirror a minimal OpenDocument spreadsheet package; the
//! encoder streams table markup into a sheet's spill buffer.

use std::io::{self, Write};

use sheetstream_core::{CellValue, Column, ValueType};

use crate::styles::StyleRegistry;

pub(crate) const MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

pub(crate) const META: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<office:document-meta \
xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
xmlns:meta=\"urn:oasis:names:tc:opendocument:xmlns:meta:1.0\" \
office:version=\"1.2\">\
<office:meta><meta:generator>sheetstream</meta:generator></office:meta>\
</office:document-meta>";

pub(crate) const MANIFEST: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<manifest:manifest \
xmlns:manifest=\"urn:oasis:names:tc:opendocument:xmlns:manifest:1.0\" \
manifest:version=\"1.2\">\
<manifest:file-entry manifest:full-path=\"/\" manifest:media-type=\"application/vnd.oasis.opendocument.spreadsheet\"/>\
<manifest:file-entry manifest:full-path=\"content.xml\" manifest:media-type=\"text/xml\"/>\
<manifest:file-entry manifest:full-path=\"styles.xml\" manifest:media-type=\"text/xml\"/>\
<manifest:file-entry manifest:full-path=\"meta.xml\" manifest:media-type=\"text/xml\"/>\
<manifest:file-entry manifest:full-path=\"settings.xml\" manifest:media-type=\"text/xml\"/>\
</manifest:manifest>";

pub(crate) const SETTINGS: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<office:document-settings \
xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
office:version=\"1.2\"><office:settings/></office:document-settings>";

/// content.xml opening: document wrapper, body and spreadsheet tags.
/// Written exactly once, before any sheet bytes.
pub(crate) const CONTENT_BEGIN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<office:document-content \
xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
xmlns:table=\"urn:oasis:names:tc:opendocument:xmlns:table:1.0\" \
xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\" \
xmlns:style=\"urn:oasis:names:tc:opendocument:xmlns:style:1.0\" \
xmlns:fo=\"urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0\" \
xmlns:xlink=\"http://www.w3.org/1999/xlink\" \
office:version=\"1.2\"><office:body><office:spreadsheet>";

pub(crate) const CONTENT_END: &str =
    "</office:spreadsheet></office:body></office:document-content>";

pub(crate) const STYLES_BEGIN: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
<office:document-styles \
xmlns:office=\"urn:oasis:names:tc:opendocument:xmlns:office:1.0\" \
xmlns:style=\"urn:oasis:names:tc:opendocument:xmlns:style:1.0\" \
xmlns:text=\"urn:oasis:names:tc:opendocument:xmlns:text:1.0\" \
xmlns:fo=\"urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0\" \
office:version=\"1.2\"><office:styles>";

pub(crate) const STYLES_END: &str = "</office:styles></office:document-styles>";

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Stream a sheet's opening tag, column definitions and header row.
///
/// Style lookups go through the shared registry; the caller holds the
/// document lock for the duration.
pub(crate) fn write_begin_sheet<W: Write>(
    w: &mut W,
    name: &str,
    columns: &[Column],
    styles: &mut StyleRegistry,
) -> io::Result<()> {
    write!(w, "<table:table table:name=\"{}\">", escape_xml(name))?;
    for col in columns {
        match styles.intern(&col.column) {
            Some(id) => write!(
                w,
                "<table:table-column table:default-cell-style-name=\"{id}\"/>"
            )?,
            None => write!(w, "<table:table-column/>")?,
        }
    }
    write!(w, "<table:table-row>")?;
    for col in columns {
        let style_attr = match styles.intern(&col.header) {
            Some(id) => format!(" table:style-name=\"{id}\""),
            None => String::new(),
        };
        write!(
            w,
            "<table:table-cell{style_attr} office:value-type=\"string\">\
             <text:p>{}</text:p></table:table-cell>",
            escape_xml(&col.name)
        )?;
    }
    write!(w, "</table:table-row>")
}

/// Encode one row: each cell carries its typed value and literal text
pub(crate) fn write_row<W: Write>(w: &mut W, values: &[CellValue]) -> io::Result<()> {
    write!(w, "<table:table-row>")?;
    for value in values {
        write_cell(w, value)?;
    }
    write!(w, "</table:table-row>")
}

fn write_cell<W: Write>(w: &mut W, value: &CellValue) -> io::Result<()> {
    // Absent values keep their column position but carry nothing
    if value.is_empty() {
        return write!(w, "<table:table-cell/>");
    }
    let literal = value.literal();
    match value.value_type() {
        ValueType::Float => write!(
            w,
            "<table:table-cell office:value-type=\"float\" office:value=\"{literal}\">\
             <text:p>{literal}</text:p></table:table-cell>"
        ),
        ValueType::Date => write!(
            w,
            "<table:table-cell office:value-type=\"date\" office:date-value=\"{literal}\">\
             <text:p>{literal}</text:p></table:table-cell>"
        ),
        ValueType::Link => {
            let href = escape_xml(&literal);
            write!(
                w,
                "<table:table-cell office:value-type=\"string\"><text:p>\
                 <text:a xlink:type=\"simple\" xlink:href=\"{href}\">{href}</text:a>\
                 </text:p></table:table-cell>"
            )
        }
        ValueType::String => write!(
            w,
            "<table:table-cell office:value-type=\"string\">\
             <text:p>{}</text:p></table:table-cell>",
            escape_xml(&literal)
        ),
    }
}

/// The sheet's closing tag
pub(crate) fn write_end_sheet<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "</table:table>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a<b&c>\"d'"), "a&lt;b&amp;c&gt;&quot;d&apos;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_row_encoding() {
        let mut out = Vec::new();
        let date = NaiveDate::from_ymd_opt(2023, 4, 5).unwrap();
        write_row(
            &mut out,
            &[
                CellValue::from(42.5),
                CellValue::from(date),
                CellValue::Empty,
                CellValue::text("a<b"),
            ],
        )
        .unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert_eq!(
            xml,
            "<table:table-row>\
             <table:table-cell office:value-type=\"float\" office:value=\"42.5\"><text:p>42.5</text:p></table:table-cell>\
             <table:table-cell office:value-type=\"date\" office:date-value=\"2023-04-05\"><text:p>2023-04-05</text:p></table:table-cell>\
             <table:table-cell/>\
             <table:table-cell office:value-type=\"string\"><text:p>a&lt;b</text:p></table:table-cell>\
             </table:table-row>"
        );
    }

    #[test]
    fn test_link_cell_becomes_anchor() {
        let mut out = Vec::new();
        write_row(&mut out, &[CellValue::text("https://example.com/x")]).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains(
            "<text:a xlink:type=\"simple\" xlink:href=\"https://example.com/x\">https://example.com/x</text:a>"
        ));
    }

    #[test]
    fn test_begin_sheet_header_uses_interned_style() {
        use sheetstream_core::Column;
        let mut styles = crate::styles::StyleRegistry::default();
        let mut out = Vec::new();
        write_begin_sheet(
            &mut out,
            "People",
            &[Column::bold_header("Name"), Column::new("Notes")],
            &mut styles,
        )
        .unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.starts_with("<table:table table:name=\"People\">"));
        assert!(xml.contains("table:style-name=\"bf-3053630529\""));
        // The plain header carries no style attribute
        assert!(xml.contains("<table:table-cell office:value-type=\"string\"><text:p>Notes</text:p>"));
        assert_eq!(styles.fragments().count(), 1);
    }
}
