//! Common utilities for E2E tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Office 2013+ default color scheme
pub const OFFICE_THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme">
  <a:themeElements>
    <a:clrScheme name="Office">
      <a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>
      <a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
  </a:themeElements>
</a:theme>"#;

/// Builder for a minimal XLSX package.
///
/// Sheet bodies are the children of `<worksheet>` (e.g. `<sheetData>...`).
#[derive(Debug, Clone, Default)]
pub struct XlsxFixture {
    sheets: Vec<(String, String)>,
    shared_strings: Vec<String>,
    styles: Option<String>,
    theme: Option<String>,
    active_tab: Option<usize>,
}

impl XlsxFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, name: &str, body: &str) -> Self {
        self.sheets.push((name.to_string(), body.to_string()));
        self
    }

    pub fn shared_strings(mut self, strings: &[&str]) -> Self {
        self.shared_strings = strings.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Children of `<styleSheet>`
    pub fn styles(mut self, body: &str) -> Self {
        self.styles = Some(body.to_string());
        self
    }

    /// Complete theme part
    pub fn theme(mut self, xml: &str) -> Self {
        self.theme = Some(xml.to_string());
        self
    }

    pub fn active_tab(mut self, index: usize) -> Self {
        self.active_tab = Some(index);
        self
    }

    /// Package bytes
    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut put = |name: &str, body: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", &self.content_types());
        put(
            "_rels/.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
                PKG_REL_NS, REL_NS
            ),
        );
        put("xl/workbook.xml", &self.workbook_xml());
        put("xl/_rels/workbook.xml.rels", &self.workbook_rels());

        for (idx, (_, body)) in self.sheets.iter().enumerate() {
            put(
                &format!("xl/worksheets/sheet{}.xml", idx + 1),
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{}" xmlns:r="{}">{}</worksheet>"#,
                    MAIN_NS, REL_NS, body
                ),
            );
        }
        if !self.shared_strings.is_empty() {
            let items: String = self
                .shared_strings
                .iter()
                .map(|s| format!(r#"<si><t xml:space="preserve">{}</t></si>"#, escape(s)))
                .collect();
            put(
                "xl/sharedStrings.xml",
                &format!(r#"<sst xmlns="{}" count="{n}" uniqueCount="{n}">{}</sst>"#, MAIN_NS, items, n = self.shared_strings.len()),
            );
        }
        if let Some(styles) = &self.styles {
            put(
                "xl/styles.xml",
                &format!(r#"<styleSheet xmlns="{}">{}</styleSheet>"#, MAIN_NS, styles),
            );
        }
        if let Some(theme) = &self.theme {
            put("xl/theme/theme1.xml", theme);
        }

        zip.finish().unwrap().into_inner()
    }

    /// Write the package to a temporary `.xlsx` file
    pub fn write_temp(&self) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }

    fn content_types(&self) -> String {
        let mut overrides = String::from(
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for idx in 0..self.sheets.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                idx + 1
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}</Types>"#,
            overrides
        )
    }

    fn workbook_xml(&self) -> String {
        let view = match self.active_tab {
            Some(tab) => format!(r#"<bookViews><workbookView activeTab="{}"/></bookViews>"#, tab),
            None => String::new(),
        };
        let sheets: String = self
            .sheets
            .iter()
            .enumerate()
            .map(|(idx, (name, _))| {
                format!(
                    r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                    escape(name),
                    idx + 1,
                    idx + 1
                )
            })
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}">{}<sheets>{}</sheets></workbook>"#,
            MAIN_NS, REL_NS, view, sheets
        )
    }

    fn workbook_rels(&self) -> String {
        let mut rels: String = (0..self.sheets.len())
            .map(|idx| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{}/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                    idx + 1,
                    REL_NS,
                    idx + 1
                )
            })
            .collect();
        let next = self.sheets.len() + 1;
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/styles" Target="styles.xml"/>"#,
            next, REL_NS
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/theme" Target="theme/theme1.xml"/>"#,
            next + 1,
            REL_NS
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/sharedStrings" Target="sharedStrings.xml"/>"#,
            next + 2,
            REL_NS
        ));
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">{}</Relationships>"#,
            PKG_REL_NS, rels
        )
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One row of inline-typed cells, e.g. `row(1, &[("A1", "n", "5")])`
pub fn row(r: u32, cells: &[(&str, &str, &str)]) -> String {
    let cells: String = cells
        .iter()
        .map(|(reference, kind, value)| match *kind {
            "inlineStr" => format!(
                r#"<c r="{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                reference,
                escape(value)
            ),
            "n" => format!(r#"<c r="{}"><v>{}</v></c>"#, reference, value),
            kind => format!(r#"<c r="{}" t="{}"><v>{}</v></c>"#, reference, kind, escape(value)),
        })
        .collect();
    format!(r#"<row r="{}">{}</row>"#, r, cells)
}
