//! XLSX reader
//!
//! [`XlsxReader`] opens a workbook container; [`XlsxWorkbook`] lists its
//! sheets and loads one of them into a [`SheetSnapshot`].

mod strings;
mod worksheet;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use sheetdiff_core::{SheetSnapshot, StyleRecord, ThemeColorResolver, ThemePalette};

use crate::error::{LoadError, LoadResult};
use crate::styles::read_styles_xml;
use crate::theme::parse_theme_palette;
use crate::xml::{attr, attr_parse};

/// Signature of OLE2 compound documents (legacy `.xls`)
const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_THEME_PART: &str = "xl/theme/theme1.xml";
const DEFAULT_STYLES_PART: &str = "xl/styles.xml";
const DEFAULT_SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Loader options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Read font colors on theme slot 1 as slot 0 when slot 1 is white
    pub font_theme_text_alias: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_theme_text_alias(mut self, enabled: bool) -> Self {
        self.font_theme_text_alias = enabled;
        self
    }
}

/// Converts a legacy binary workbook into an XLSX container.
///
/// No converter ships with this crate; callers that can shell out to an
/// office suite plug one in with [`XlsxReader::with_legacy_converter`].
pub trait LegacyConverter: Send + Sync {
    fn convert(&self, legacy: &[u8]) -> Result<Vec<u8>, String>;
}

/// XLSX file reader
#[derive(Clone, Default)]
pub struct XlsxReader {
    options: LoadOptions,
    converter: Option<Arc<dyn LegacyConverter>>,
}

impl fmt::Debug for XlsxReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlsxReader")
            .field("options", &self.options)
            .field("legacy_converter", &self.converter.is_some())
            .finish()
    }
}

impl XlsxReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_legacy_converter<C: LegacyConverter + 'static>(mut self, converter: C) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// Open a workbook from a file path
    pub fn open_file<P: AsRef<Path>>(&self, path: P) -> LoadResult<XlsxWorkbook> {
        let path = path.as_ref();
        log::debug!("Opening workbook {}", path.display());
        self.open_bytes(fs::read(path)?)
    }

    /// Open a workbook from any reader
    pub fn open<R: Read>(&self, mut reader: R) -> LoadResult<XlsxWorkbook> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.open_bytes(bytes)
    }

    /// Open a workbook held in memory
    pub fn open_bytes(&self, bytes: Vec<u8>) -> LoadResult<XlsxWorkbook> {
        let bytes = if bytes.starts_with(&CFB_MAGIC) {
            self.convert_legacy(&bytes)?
        } else {
            bytes
        };
        XlsxWorkbook::from_archive(zip::ZipArchive::new(Cursor::new(bytes))?, self.options)
    }

    /// Open `path` and load one sheet (the active sheet when `sheet` is `None`)
    pub fn load_sheet<P: AsRef<Path>>(
        &self,
        path: P,
        sheet: Option<&str>,
    ) -> LoadResult<SheetSnapshot> {
        self.open_file(path)?.load_sheet(sheet)
    }

    fn convert_legacy(&self, bytes: &[u8]) -> LoadResult<Vec<u8>> {
        let converter = self.converter.as_ref().ok_or_else(|| {
            LoadError::Unsupported("legacy .xls workbook and no converter configured".into())
        })?;
        log::info!("Converting legacy workbook ({} bytes)", bytes.len());
        converter
            .convert(bytes)
            .map_err(|e| LoadError::Unsupported(format!("legacy conversion failed: {}", e)))
    }
}

#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

#[derive(Debug, Clone)]
struct Relationship {
    rel_type: String,
    target: String,
}

/// An opened workbook: sheet list, shared strings and resolved styles.
///
/// Worksheet parts are parsed on demand by [`XlsxWorkbook::load_sheet`].
pub struct XlsxWorkbook {
    archive: zip::ZipArchive<Cursor<Vec<u8>>>,
    sheets: Vec<SheetEntry>,
    active: usize,
    shared_strings: Vec<String>,
    cell_styles: Vec<StyleRecord>,
    resolver: ThemeColorResolver,
}

impl fmt::Debug for XlsxWorkbook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlsxWorkbook")
            .field("sheets", &self.sheet_names())
            .field("active", &self.active)
            .field("shared_strings", &self.shared_strings.len())
            .field("cell_styles", &self.cell_styles.len())
            .finish()
    }
}

impl XlsxWorkbook {
    fn from_archive(
        mut archive: zip::ZipArchive<Cursor<Vec<u8>>>,
        options: LoadOptions,
    ) -> LoadResult<Self> {
        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(LoadError::corrupt("missing [Content_Types].xml"));
        }

        let (declared, active_tab) = read_workbook_xml(&mut archive)?;
        let rels = read_workbook_rels(&mut archive)?;

        let active_name = declared.get(active_tab).map(|(name, _)| name.clone());
        let mut sheets = Vec::with_capacity(declared.len());
        for (name, r_id) in declared {
            match rels.get(&r_id) {
                Some(rel) if rel.rel_type.ends_with("/worksheet") => sheets.push(SheetEntry {
                    name,
                    path: rel.target.clone(),
                }),
                // chartsheets and dialog sheets carry no cells
                Some(rel) => log::debug!("Skipping sheet '{}' ({})", name, rel.rel_type),
                None => log::warn!("Sheet '{}' has no relationship '{}'", name, r_id),
            }
        }
        let active = active_name
            .and_then(|name| sheets.iter().position(|s| s.name == name))
            .unwrap_or(0);

        let part_for = |suffix: &str, default: &str| {
            rels.values()
                .find(|r| r.rel_type.ends_with(suffix))
                .map_or_else(|| default.to_string(), |r| r.target.clone())
        };

        let palette = read_theme(&mut archive, &part_for("/theme", DEFAULT_THEME_PART));
        let resolver = ThemeColorResolver::new(palette)
            .with_font_theme_text_alias(options.font_theme_text_alias);

        let styles_part = part_for("/styles", DEFAULT_STYLES_PART);
        let cell_styles = match archive.by_name(&styles_part) {
            Ok(file) => read_styles_xml(BufReader::new(file))?.resolve(&resolver),
            Err(_) => Vec::new(),
        };

        let strings_part = part_for("/sharedStrings", DEFAULT_SHARED_STRINGS_PART);
        let shared_strings = match archive.by_name(&strings_part) {
            Ok(file) => strings::read_shared_strings(BufReader::new(file))?,
            Err(_) => Vec::new(),
        };

        log::debug!(
            "Workbook has {} sheets, {} shared strings, {} cell styles",
            sheets.len(),
            shared_strings.len(),
            cell_styles.len()
        );

        Ok(Self {
            archive,
            sheets,
            active,
            shared_strings,
            cell_styles,
            resolver,
        })
    }

    /// Worksheet names in workbook order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Name of the sheet selected when the workbook was saved
    pub fn active_sheet(&self) -> Option<&str> {
        self.sheets.get(self.active).map(|s| s.name.as_str())
    }

    /// Theme palette used to resolve colors
    pub fn theme_palette(&self) -> &ThemePalette {
        self.resolver.palette()
    }

    /// Load one sheet by name, or the active sheet when `name` is `None`.
    pub fn load_sheet(&mut self, name: Option<&str>) -> LoadResult<SheetSnapshot> {
        let entry = match name {
            Some(name) => self
                .sheets
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| LoadError::SheetNotFound(name.to_string()))?,
            None => self
                .sheets
                .get(self.active)
                .ok_or_else(|| LoadError::corrupt("workbook has no worksheets"))?,
        };
        let SheetEntry { name, path } = entry.clone();

        let file = self
            .archive
            .by_name(&path)
            .map_err(|_| LoadError::corrupt(format!("missing worksheet part {}", path)))?;
        let sheet = worksheet::read_worksheet(
            BufReader::new(file),
            name,
            &self.shared_strings,
            &self.cell_styles,
        )?;

        log::debug!(
            "Loaded sheet '{}': {} rows x {} cols, {} formulas, {} merges",
            sheet.name,
            sheet.row_count(),
            sheet.col_count(),
            sheet.formulas.len(),
            sheet.merges.len()
        );
        Ok(sheet)
    }
}

/// Sheet (name, r:id) pairs in tab order plus the active tab index
fn read_workbook_xml<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> LoadResult<(Vec<(String, String)>, usize)> {
    let file = archive
        .by_name(WORKBOOK_PART)
        .map_err(|_| LoadError::corrupt(format!("missing {}", WORKBOOK_PART)))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    let mut active_tab = 0;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) => match e.local_name().as_ref() {
                b"sheet" => {
                    if let (Some(name), Some(r_id)) = (attr(&e, b"name"), attr(&e, b"r:id")) {
                        sheets.push((name, r_id));
                    }
                }
                b"workbookView" => {
                    active_tab = attr_parse(&e, b"activeTab").unwrap_or(0);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, active_tab))
}

/// Relationship id -> (type, archive path)
fn read_workbook_rels<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> LoadResult<HashMap<String, Relationship>> {
    let file = archive
        .by_name(WORKBOOK_RELS_PART)
        .map_err(|_| LoadError::corrupt(format!("missing {}", WORKBOOK_RELS_PART)))?;

    let mut xml_reader = Reader::from_reader(BufReader::new(file));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut rels = HashMap::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target), Some(rel_type)) =
                    (attr(&e, b"Id"), attr(&e, b"Target"), attr(&e, b"Type"))
                {
                    let target = resolve_target(&target);
                    rels.insert(id, Relationship { rel_type, target });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// Archive path of a workbook relationship target
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    }
}

/// Theme palette, or an empty one when the part is missing or unreadable.
fn read_theme<R: Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>, path: &str) -> ThemePalette {
    let mut bytes = Vec::new();
    match archive.by_name(path) {
        Ok(mut file) => {
            if let Err(e) = file.read_to_end(&mut bytes) {
                log::warn!("Cannot read theme {}: {}", path, e);
                return ThemePalette::empty();
            }
        }
        Err(_) => {
            log::debug!("No theme part at {}", path);
            return ThemePalette::empty();
        }
    }

    match parse_theme_palette(&bytes) {
        Ok(palette) => palette,
        Err(e) => {
            log::warn!("Ignoring unparseable theme {}: {}", path, e);
            ThemePalette::empty()
        }
    }
}
