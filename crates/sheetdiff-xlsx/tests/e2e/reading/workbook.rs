//! Workbook-level behaviour: sheet listing, selection and failure modes.

use crate::{row, XlsxFixture};
use sheetdiff_core::CellValue;
use sheetdiff_xlsx::{LoadError, XlsxReader};

fn three_sheets() -> XlsxFixture {
    XlsxFixture::new()
        .sheet("Alpha", &format!("<sheetData>{}</sheetData>", row(1, &[("A1", "n", "1")])))
        .sheet("Beta & Co", &format!("<sheetData>{}</sheetData>", row(1, &[("A1", "n", "2")])))
        .sheet("Gamma", &format!("<sheetData>{}</sheetData>", row(1, &[("A1", "n", "3")])))
}

#[test]
fn test_sheet_names_in_workbook_order() {
    let workbook = XlsxReader::new().open_bytes(three_sheets().build()).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Alpha", "Beta & Co", "Gamma"]);
    assert_eq!(workbook.active_sheet(), Some("Alpha"));
}

#[test]
fn test_default_sheet_is_the_active_tab() {
    let mut workbook = XlsxReader::new()
        .open_bytes(three_sheets().active_tab(2).build())
        .unwrap();
    assert_eq!(workbook.active_sheet(), Some("Gamma"));

    let sheet = workbook.load_sheet(None).unwrap();
    assert_eq!(sheet.name, "Gamma");
    assert_eq!(sheet.value(0, 0), &CellValue::Number(3.0));
}

#[test]
fn test_load_named_sheet() {
    let mut workbook = XlsxReader::new().open_bytes(three_sheets().build()).unwrap();
    let sheet = workbook.load_sheet(Some("Beta & Co")).unwrap();
    assert_eq!(sheet.value(0, 0), &CellValue::Number(2.0));
}

#[test]
fn test_unknown_sheet() {
    let mut workbook = XlsxReader::new().open_bytes(three_sheets().build()).unwrap();
    match workbook.load_sheet(Some("Delta")) {
        Err(LoadError::SheetNotFound(name)) => assert_eq!(name, "Delta"),
        other => panic!("expected SheetNotFound, got {:?}", other),
    }
}

#[test]
fn test_open_from_file() {
    let file = three_sheets().write_temp();
    let sheet = XlsxReader::new().load_sheet(file.path(), Some("Gamma")).unwrap();
    assert_eq!(sheet.value(0, 0), &CellValue::Number(3.0));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = XlsxReader::new()
        .open_file(dir.path().join("nope.xlsx"))
        .unwrap_err();
    assert!(matches!(err, LoadError::Io(_)), "{:?}", err);
}

#[test]
fn test_truncated_package_is_corrupt() {
    let mut bytes = three_sheets().build();
    bytes.truncate(bytes.len() / 2);
    let err = XlsxReader::new().open_bytes(bytes).unwrap_err();
    assert!(matches!(err, LoadError::Corrupt(_)), "{:?}", err);
}

#[test]
fn test_malformed_worksheet_is_corrupt() {
    let fixture = XlsxFixture::new().sheet("Bad", "<sheetData><row r=\"1\"><c r=\"A1\"><v>1</v></row>");
    let mut workbook = XlsxReader::new().open_bytes(fixture.build()).unwrap();
    let err = workbook.load_sheet(None).unwrap_err();
    assert!(matches!(err, LoadError::Corrupt(_)), "{:?}", err);
}
