//! Merged regions, column widths and row heights.

use crate::{row, XlsxFixture};
use sheetdiff_core::{CellValue, MergeRange};
use sheetdiff_xlsx::XlsxReader;

#[test]
fn test_merges_and_sizes() {
    let body = format!(
        r#"<cols><col min="1" max="1" width="32.7" customWidth="1"/><col min="2" max="3" width="12"/></cols>
           <sheetData>
             <row r="1" ht="24.75" customHeight="1">{}</row>
             {}
           </sheetData>
           <mergeCells count="1"><mergeCell ref="A1:C1"/></mergeCells>"#,
        r#"<c r="A1" t="inlineStr"><is><t>Quarterly report</t></is></c>"#,
        row(3, &[("B3", "n", "7")])
    );
    let mut workbook = XlsxReader::new()
        .open_bytes(XlsxFixture::new().sheet("Layout", &body).build())
        .unwrap();
    let sheet = workbook.load_sheet(Some("Layout")).unwrap();

    assert_eq!((sheet.row_count(), sheet.col_count()), (3, 3));
    assert_eq!(
        sheet.merge_at(0, 0),
        Some(&MergeRange {
            row: 0,
            col: 0,
            row_span: 1,
            col_span: 3
        })
    );
    assert_eq!(sheet.merge_at(0, 1), None);
    assert_eq!(sheet.value(0, 0), &CellValue::text("Quarterly report"));
    assert_eq!(sheet.col_widths.get(&0), Some(&32.7));
    assert_eq!(sheet.col_widths.get(&2), Some(&12.0));
    assert_eq!(sheet.row_heights.get(&0), Some(&24.75));
    assert_eq!(sheet.row_heights.get(&2), None);
}

#[test]
fn test_merge_beyond_cells_grows_extent() {
    let body = format!(
        r#"<sheetData>{}</sheetData><mergeCells count="1"><mergeCell ref="D5:E9"/></mergeCells>"#,
        row(1, &[("A1", "n", "1")])
    );
    let sheet = XlsxReader::new()
        .open_bytes(XlsxFixture::new().sheet("S", &body).build())
        .unwrap()
        .load_sheet(None)
        .unwrap();
    assert_eq!((sheet.row_count(), sheet.col_count()), (9, 5));
}
