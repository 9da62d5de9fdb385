//! Style resolution through the theme palette.

use crate::{XlsxFixture, OFFICE_THEME};
use pretty_assertions::assert_eq;
use sheetdiff_core::{HexColor, HorizontalAlignment, StyleRecord};
use sheetdiff_xlsx::{LoadOptions, XlsxReader};

const STYLES: &str = r##"
  <numFmts count="1"><numFmt numFmtId="164" formatCode="#,##0.000"/></numFmts>
  <fonts count="3">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>
    <font><b/><sz val="11"/><color rgb="FFC00000"/><name val="Calibri"/></font>
    <font><i/><sz val="9"/><color theme="4" tint="-0.249977111117893"/><name val="Arial"/></font>
  </fonts>
  <fills count="4">
    <fill><patternFill patternType="none"/></fill>
    <fill><patternFill patternType="gray125"/></fill>
    <fill><patternFill patternType="solid"><fgColor theme="5" tint="0.79998168889431442"/><bgColor indexed="64"/></patternFill></fill>
    <fill><patternFill patternType="solid"><fgColor indexed="13"/><bgColor indexed="64"/></patternFill></fill>
  </fills>
  <borders count="2">
    <border><left/><right/><top/><bottom/><diagonal/></border>
    <border><left/><right/><top style="thin"><color auto="1"/></top><bottom style="medium"><color auto="1"/></bottom><diagonal/></border>
  </borders>
  <cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
  <cellXfs count="4">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="164" fontId="1" fillId="2" borderId="1" xfId="0" applyNumberFormat="1" applyFont="1" applyFill="1" applyBorder="1"/>
    <xf numFmtId="9" fontId="2" fillId="3" borderId="0" xfId="0" applyAlignment="1"><alignment horizontal="right" wrapText="1"/></xf>
    <xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0"/>
  </cellXfs>
  <cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>
  <dxfs count="0"/>
"##;

const BODY: &str = r#"<sheetData>
  <row r="1"><c r="A1" s="1"><v>1</v></c><c r="B1" s="2"><v>0.5</v></c><c r="C1" s="3"><v>45000</v></c></row>
</sheetData>"#;

fn fixture() -> XlsxFixture {
    XlsxFixture::new()
        .sheet("Styled", BODY)
        .styles(STYLES)
        .theme(OFFICE_THEME)
}

fn load(options: LoadOptions) -> sheetdiff_core::SheetSnapshot {
    XlsxReader::new()
        .with_options(options)
        .open_bytes(fixture().build())
        .unwrap()
        .load_sheet(None)
        .unwrap()
}

#[test]
fn test_theme_palette_is_exposed() {
    let workbook = XlsxReader::new().open_bytes(fixture().build()).unwrap();
    let palette = workbook.theme_palette();
    assert_eq!(palette.len(), 12);
    assert_eq!(palette.get(5), Some(HexColor::rgb(0xED, 0x7D, 0x31)));
}

#[test]
fn test_explicit_fill_font_and_border() {
    let sheet = load(LoadOptions::default());
    let style = sheet.style(0, 0);

    // accent2 lightened by ~0.8
    assert_eq!(style.background, Some(HexColor::rgb(0xFB, 0xE4, 0xD5)));
    assert_eq!(style.font.bold, Some(true));
    assert_eq!(style.font.color, Some(HexColor::rgb(0xC0, 0, 0)));
    assert_eq!(style.number_format.as_deref(), Some("#,##0.000"));
    assert!(style.border.top && style.border.bottom);
    assert!(!style.border.left && !style.border.right);
}

#[test]
fn test_indexed_fill_and_darkened_theme_font() {
    let sheet = load(LoadOptions::default());
    let style = sheet.style(0, 1);

    assert_eq!(style.background, Some(HexColor::rgb(255, 255, 0)));
    assert_eq!(style.font.italic, Some(true));
    assert_eq!(style.font.family.as_deref(), Some("Arial"));
    assert_eq!(style.font.size_pt, Some(9.0));
    // accent1 darkened by ~25%
    assert_eq!(style.font.color, Some(HexColor::rgb(0x33, 0x55, 0x93)));
    assert_eq!(style.number_format.as_deref(), Some("0%"));
    assert_eq!(style.alignment.horizontal, Some(HorizontalAlignment::Right));
    assert_eq!(style.alignment.wrap, Some(true));
}

#[test]
fn test_builtin_date_format() {
    let sheet = load(LoadOptions::default());
    assert_eq!(sheet.style(0, 2).number_format.as_deref(), Some("mm-dd-yy"));
}

#[test]
fn test_unwritten_cells_use_default_xf() {
    let body = r#"<sheetData><row r="2"><c r="B2" s="1"><v>1</v></c></row></sheetData>"#;
    let sheet = XlsxReader::new()
        .open_bytes(
            XlsxFixture::new()
                .sheet("S", body)
                .styles(STYLES)
                .theme(OFFICE_THEME)
                .build(),
        )
        .unwrap()
        .load_sheet(None)
        .unwrap();

    let base = sheet.style(0, 0);
    assert_eq!(base.font.family.as_deref(), Some("Calibri"));
    assert_eq!(base.number_format.as_deref(), Some("General"));
    assert_eq!(base.background, None);
    // padding beyond the extent is the absent style, not the default xf
    assert_eq!(sheet.style(5, 5), &StyleRecord::default());
}

#[test]
fn test_font_theme_text_alias() {
    let plain = load(LoadOptions::default());
    let aliased = load(LoadOptions::new().font_theme_text_alias(true));

    // xf 0 uses theme 1, which is the white lt1 slot in document order
    let body = r#"<sheetData><row r="1"><c r="A1"><v>1</v></c></row></sheetData>"#;
    let base = XlsxReader::new()
        .with_options(LoadOptions::new().font_theme_text_alias(true))
        .open_bytes(
            XlsxFixture::new()
                .sheet("S", body)
                .styles(STYLES)
                .theme(OFFICE_THEME)
                .build(),
        )
        .unwrap()
        .load_sheet(None)
        .unwrap();
    assert_eq!(base.style(0, 0).font.color, Some(HexColor::BLACK));

    // explicit rgb fonts are untouched by the alias
    assert_eq!(plain.style(0, 0).font.color, aliased.style(0, 0).font.color);
}

#[test]
fn test_missing_theme_leaves_theme_colors_unresolved() {
    let sheet = XlsxReader::new()
        .open_bytes(XlsxFixture::new().sheet("S", BODY).styles(STYLES).build())
        .unwrap()
        .load_sheet(None)
        .unwrap();
    assert_eq!(sheet.style(0, 0).background, None);
    assert_eq!(sheet.style(0, 1).background, Some(HexColor::rgb(255, 255, 0)));
}

#[test]
fn test_unparseable_theme_is_ignored() {
    let sheet = XlsxReader::new()
        .open_bytes(
            XlsxFixture::new()
                .sheet("S", BODY)
                .styles(STYLES)
                .theme("<a:theme><a:clrScheme></a:theme>")
                .build(),
        )
        .unwrap()
        .load_sheet(None)
        .unwrap();
    assert_eq!(sheet.style(0, 0).background, None);
    assert_eq!(sheet.style(0, 0).font.bold, Some(true));
}
