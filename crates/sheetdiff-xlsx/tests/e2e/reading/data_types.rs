//! Cell value and formula reading.

use crate::{row, XlsxFixture};
use sheetdiff_core::CellValue;
use sheetdiff_xlsx::XlsxReader;

fn load(fixture: XlsxFixture) -> sheetdiff_core::SheetSnapshot {
    XlsxReader::new()
        .open_bytes(fixture.build())
        .unwrap()
        .load_sheet(None)
        .unwrap()
}

#[test]
fn test_value_kinds() {
    let body = format!(
        "<sheetData>{}{}</sheetData>",
        row(
            1,
            &[
                ("A1", "s", "0"),
                ("B1", "n", "1234.5"),
                ("C1", "b", "0"),
                ("D1", "e", "#N/A"),
                ("E1", "inlineStr", "inline"),
            ]
        ),
        row(2, &[("A2", "s", "1"), ("B2", "n", "-0.25")])
    );
    let sheet = load(
        XlsxFixture::new()
            .sheet("Data", &body)
            .shared_strings(&["Revenue", "Line1_x000D__x000A_Line2"]),
    );

    assert_eq!((sheet.row_count(), sheet.col_count()), (2, 5));
    assert_eq!(sheet.value(0, 0), &CellValue::text("Revenue"));
    assert_eq!(sheet.value(0, 1), &CellValue::Number(1234.5));
    assert_eq!(sheet.value(0, 2), &CellValue::Boolean(false));
    assert_eq!(sheet.value(0, 3), &CellValue::text("#N/A"));
    assert_eq!(sheet.value(0, 4), &CellValue::text("inline"));
    assert_eq!(sheet.value(1, 0), &CellValue::text("Line1\r\nLine2"));
    assert_eq!(sheet.value(1, 1), &CellValue::Number(-0.25));
    assert_eq!(sheet.value(1, 4), &CellValue::Empty);
}

#[test]
fn test_formulas_keep_cached_values() {
    let body = r#"<sheetData>
        <row r="1"><c r="A1"><v>2</v></c><c r="B1"><v>3</v></c><c r="C1"><f>SUM(A1:B1)</f><v>5</v></c></row>
        <row r="2"><c r="A2"><v>4</v></c><c r="B2"><v>5</v></c><c r="C2"><f t="shared" ref="C2:C3" si="0">A2*$B$2</f><v>20</v></c></row>
        <row r="3"><c r="A3"><v>6</v></c><c r="B3"><v>7</v></c><c r="C3"><f t="shared" si="0"/><v>30</v></c></row>
        <row r="4"><c r="C4"><f>1/0</f></c></row>
    </sheetData>"#;
    let sheet = load(XlsxFixture::new().sheet("Calc", body));

    assert_eq!(sheet.formula(0, 2), Some("=SUM(A1:B1)"));
    assert_eq!(sheet.value(0, 2), &CellValue::Number(5.0));
    assert_eq!(sheet.formula(1, 2), Some("=A2*$B$2"));
    assert_eq!(sheet.formula(2, 2), Some("=A3*$B$2"));
    assert_eq!(sheet.value(2, 2), &CellValue::Number(30.0));
    // formula without a cached result
    assert_eq!(sheet.formula(3, 2), Some("=1/0"));
    assert_eq!(sheet.value(3, 2), &CellValue::Empty);
    assert_eq!(sheet.formula(0, 0), None);
    assert_eq!(sheet.formulas.len(), 4);
}

#[test]
fn test_shared_formulas_into_other_sheets_move() {
    let body = r#"<sheetData>
        <row r="1"><c r="A1"><f t="shared" ref="A1:A3" si="3">Data!B1*2+'Q1 Data'!$C1</f><v>0</v></c></row>
        <row r="2"><c r="A2"><f t="shared" si="3"/><v>0</v></c></row>
        <row r="3"><c r="A3"><f t="shared" si="3"/><v>0</v></c></row>
    </sheetData>"#;
    let sheet = load(
        XlsxFixture::new()
            .sheet("Summary", body)
            .sheet("Data", "<sheetData/>")
            .sheet("Q1 Data", "<sheetData/>"),
    );

    assert_eq!(sheet.name, "Summary");
    assert_eq!(sheet.formula(0, 0), Some("=Data!B1*2+'Q1 Data'!$C1"));
    assert_eq!(sheet.formula(1, 0), Some("=Data!B2*2+'Q1 Data'!$C2"));
    assert_eq!(sheet.formula(2, 0), Some("=Data!B3*2+'Q1 Data'!$C3"));
}

#[test]
fn test_iso_date_cells_load_as_serials() {
    let body = format!(
        "<sheetData>{}</sheetData>",
        row(
            1,
            &[
                ("A1", "d", "2024-01-15"),
                ("B1", "d", "2024-01-15T18:00:00"),
                ("C1", "d", "someday"),
            ]
        )
    );
    let sheet = load(XlsxFixture::new().sheet("Dates", &body));

    assert_eq!(sheet.value(0, 0), &CellValue::Number(45306.0));
    assert_eq!(sheet.value(0, 1), &CellValue::Number(45306.75));
    assert_eq!(sheet.value(0, 2), &CellValue::text("someday"));
}

#[test]
fn test_whitespace_in_strings_is_preserved() {
    let sheet = load(
        XlsxFixture::new()
            .sheet("S", &format!("<sheetData>{}</sheetData>", row(1, &[("A1", "s", "0")])))
            .shared_strings(&["  two  spaces "]),
    );
    assert_eq!(sheet.value(0, 0), &CellValue::text("  two  spaces "));
}
