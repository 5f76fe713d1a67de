//! End-to-end tests for the ODS assembler: archive layout, the
//! creation-order invariant, concurrency, the row ceiling and close
//! idempotency. Output is read back with the `zip` crate and inspected
//! with `quick-xml`.

use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::thread;

use chrono::NaiveDate;
use sheetstream_core::{CellValue, Column, Error as CoreError, MAX_ROW_COUNT};
use sheetstream_ods::{OdsError, OdsWriter};

fn read_entry(path: &Path, name: &str) -> String {
    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut out = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut out).unwrap();
    out
}

fn entry_names(path: &Path) -> Vec<String> {
    let bytes = fs::read(path).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Table names in document order, via a proper XML traversal
fn table_names(content: &str) -> Vec<String> {
    let mut reader = quick_xml::Reader::from_str(content);
    let mut names = Vec::new();
    loop {
        match reader.read_event() {
            Ok(quick_xml::events::Event::Start(e)) => {
                if e.name().as_ref() == b"table:table" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"table:name" {
                            names.push(String::from_utf8_lossy(&attr.value).into_owned());
                        }
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("content.xml is not well-formed: {e}"),
        }
    }
    names
}

#[test]
fn test_archive_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let mut sheet = writer.new_sheet("S1", &[Column::bold_header("A")]).unwrap();
    sheet.append_row(&["x".into()]).unwrap();
    sheet.close().unwrap();
    writer.close().unwrap();

    assert_eq!(
        entry_names(&path),
        vec![
            "mimetype",
            "meta.xml",
            "META-INF/",
            "META-INF/manifest.xml",
            "settings.xml",
            "content.xml",
            "styles.xml",
        ]
    );
    assert_eq!(
        read_entry(&path, "mimetype"),
        "application/vnd.oasis.opendocument.spreadsheet"
    );

    let content = read_entry(&path, "content.xml");
    // The body wrapper is written exactly once each way
    assert_eq!(content.matches("<office:spreadsheet>").count(), 1);
    assert_eq!(content.matches("</office:spreadsheet>").count(), 1);
}

#[test]
fn test_sheets_appear_in_creation_order_not_close_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let cols = [Column::bold_header("A")];
    let mut s1 = writer.new_sheet("First", &cols).unwrap();
    let mut s2 = writer.new_sheet("Second", &cols).unwrap();
    let mut s3 = writer.new_sheet("Third", &cols).unwrap();

    s1.append_row(&["1".into()]).unwrap();
    s2.append_row(&["2".into()]).unwrap();
    s3.append_row(&["3".into()]).unwrap();

    // Close in reverse order; the archive must not care.
    s3.close().unwrap();
    s1.close().unwrap();
    s2.close().unwrap();
    writer.close().unwrap();

    let content = read_entry(&path, "content.xml");
    assert_eq!(table_names(&content), vec!["First", "Second", "Third"]);
}

#[test]
fn test_concurrent_appends_match_sequential_build() {
    const ROWS: i64 = 2_000;
    let cols = [Column::bold_header("n"), Column::bold_header("text")];

    let dir = tempfile::tempdir().unwrap();

    let sequential = dir.path().join("seq.ods");
    {
        let mut writer = OdsWriter::create(&sequential).unwrap();
        for name in ["Alpha", "Beta"] {
            let mut sheet = writer.new_sheet(name, &cols).unwrap();
            for i in 0..ROWS {
                sheet
                    .append_row(&[i.into(), format!("{name}-{i}").into()])
                    .unwrap();
            }
            sheet.close().unwrap();
        }
        writer.close().unwrap();
    }

    let concurrent = dir.path().join("conc.ods");
    {
        let mut writer = OdsWriter::create(&concurrent).unwrap();
        let mut handles = Vec::new();
        for name in ["Alpha", "Beta"] {
            let mut sheet = writer.new_sheet(name, &cols).unwrap();
            handles.push(thread::spawn(move || {
                for i in 0..ROWS {
                    sheet
                        .append_row(&[i.into(), format!("{name}-{i}").into()])
                        .unwrap();
                }
                sheet.close().unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        writer.close().unwrap();
    }

    assert_eq!(
        read_entry(&sequential, "content.xml"),
        read_entry(&concurrent, "content.xml")
    );
    assert_eq!(
        read_entry(&sequential, "styles.xml"),
        read_entry(&concurrent, "styles.xml")
    );
}

#[test]
fn test_row_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("full.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let mut sheet = writer.new_sheet("Big", &[Column::new("A")]).unwrap();

    // Fill to one row short of the ceiling cheaply, then write a marker as
    // the final legal row.
    for _ in 0..MAX_ROW_COUNT - 1 {
        sheet.append_row(&[CellValue::Empty]).unwrap();
    }
    sheet.append_row(&[424_242i64.into()]).unwrap();

    let err = sheet.append_row(&["overflow".into()]).unwrap_err();
    assert!(err.is_row_limit());
    assert!(matches!(err, OdsError::Core(CoreError::TooManyRows)));

    // The rejected append corrupts nothing: the sheet still closes and the
    // final legal row is intact.
    sheet.close().unwrap();
    writer.close().unwrap();

    let content = read_entry(&path, "content.xml");
    assert!(content.contains("office:value=\"424242\""));
    assert!(!content.contains("overflow"));
}

#[test]
fn test_style_interned_once_across_concurrent_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styles.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    thread::scope(|scope| {
        for name in ["One", "Two", "Three"] {
            let writer = &writer;
            scope.spawn(move || {
                let mut sheet = writer
                    .new_sheet(name, &[Column::bold_header("H")])
                    .unwrap();
                sheet.append_row(&["v".into()]).unwrap();
                sheet.close().unwrap();
            });
        }
    });
    writer.close().unwrap();

    let styles = read_entry(&path, "styles.xml");
    assert_eq!(styles.matches("<style:style ").count(), 1);
    assert!(styles.contains("style:name=\"bf-3053630529\""));
    assert!(styles.contains("fo:font-weight=\"bold\""));

    let content = read_entry(&path, "content.xml");
    assert_eq!(
        content.matches("table:style-name=\"bf-3053630529\"").count(),
        3
    );
}

#[test]
fn test_double_close_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let mut sheet = writer.new_sheet("Only", &[Column::new("A")]).unwrap();
    sheet.append_row(&["x".into()]).unwrap();
    sheet.close().unwrap();
    sheet.close().unwrap();
    writer.close().unwrap();
    writer.close().unwrap();

    let content = read_entry(&path, "content.xml");
    assert_eq!(content.matches("<table:table ").count(), 1);
    assert_eq!(content.matches("</table:table>").count(), 1);
}

#[test]
fn test_append_after_close_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("closed.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let mut sheet = writer.new_sheet("S", &[Column::new("A")]).unwrap();
    sheet.close().unwrap();
    assert!(matches!(
        sheet.append_row(&["late".into()]),
        Err(OdsError::Core(CoreError::SheetClosed))
    ));
    writer.close().unwrap();

    assert!(matches!(
        writer.new_sheet("Late", &[]),
        Err(OdsError::Core(CoreError::DocumentClosed))
    ));
}

#[test]
fn test_dropped_sheet_still_delivers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    {
        let mut sheet = writer.new_sheet("Scoped", &[Column::new("A")]).unwrap();
        sheet.append_row(&["kept".into()]).unwrap();
        // No explicit close; scope exit must still deliver the stream.
    }
    writer.close().unwrap();

    let content = read_entry(&path, "content.xml");
    assert_eq!(table_names(&content), vec!["Scoped"]);
    assert!(content.contains("<text:p>kept</text:p>"));
}

#[test]
fn test_typed_cells_and_empties() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typed.ods");

    let mut writer = OdsWriter::create(&path).unwrap();
    let mut sheet = writer
        .new_sheet("Values", &[Column::new("A"), Column::new("B"), Column::new("C")])
        .unwrap();
    let date = NaiveDate::from_ymd_opt(2023, 4, 5).unwrap();
    sheet
        .append_row(&[42.5.into(), date.into(), CellValue::from(None::<NaiveDate>)])
        .unwrap();
    sheet
        .append_row(&["a<b".into(), "https://example.com".into(), CellValue::Empty])
        .unwrap();
    sheet.close().unwrap();
    writer.close().unwrap();

    let content = read_entry(&path, "content.xml");
    assert!(content.contains("office:value-type=\"float\" office:value=\"42.5\""));
    assert!(content.contains("office:date-value=\"2023-04-05\""));
    assert!(content.contains("<text:p>a&lt;b</text:p>"));
    assert!(content.contains("xlink:href=\"https://example.com\""));
    // Absent values keep their column but carry nothing
    assert_eq!(content.matches("<table:table-cell/>").count(), 2);
}
