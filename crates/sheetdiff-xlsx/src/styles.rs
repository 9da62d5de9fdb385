//! `xl/styles.xml` reading
//!
//! The part is read into raw tables (fonts, fills, borders, `cellXfs`) that
//! still carry unresolved [`ColorDescriptor`]s. [`RawStyles::resolve`] turns
//! each `cellXfs` entry into a [`StyleRecord`] once the theme is known.

use std::collections::HashMap;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetdiff_core::{
    builtin_format_code, AlignmentRecord, BorderSides, ColorDescriptor, ColorRole, FontRecord,
    StyleRecord, ThemeColorResolver,
};

use crate::error::LoadResult;
use crate::xml::{attr, attr_parse, flag, parse_bool};

#[derive(Debug, Clone, Default)]
struct RawFont {
    bold: Option<bool>,
    italic: Option<bool>,
    family: Option<String>,
    size_pt: Option<f64>,
    color: Option<ColorDescriptor>,
}

#[derive(Debug, Clone, Default)]
struct RawFill {
    fg: Option<ColorDescriptor>,
    bg: Option<ColorDescriptor>,
}

#[derive(Debug, Clone, Default)]
struct RawXf {
    num_fmt_id: u32,
    font_id: Option<usize>,
    fill_id: Option<usize>,
    border_id: Option<usize>,
    alignment: AlignmentRecord,
}

/// Style tables as written, before theme resolution
#[derive(Debug, Clone, Default)]
pub(crate) struct RawStyles {
    num_fmts: HashMap<u32, String>,
    fonts: Vec<RawFont>,
    fills: Vec<RawFill>,
    borders: Vec<BorderSides>,
    cell_xfs: Vec<RawXf>,
}

impl RawStyles {
    /// One record per `cellXfs` entry, indexed like the cell `s` attribute
    pub(crate) fn resolve(&self, resolver: &ThemeColorResolver) -> Vec<StyleRecord> {
        self.cell_xfs
            .iter()
            .map(|xf| self.resolve_xf(xf, resolver))
            .collect()
    }

    fn resolve_xf(&self, xf: &RawXf, resolver: &ThemeColorResolver) -> StyleRecord {
        let font = xf
            .font_id
            .and_then(|id| self.fonts.get(id))
            .map(|f| FontRecord {
                bold: f.bold,
                italic: f.italic,
                family: f.family.clone(),
                size_pt: f.size_pt,
                color: f
                    .color
                    .as_ref()
                    .and_then(|c| resolver.resolve(c, ColorRole::Font)),
            })
            .unwrap_or_default();

        // first candidate that resolves wins: fgColor, then bgColor
        let background = xf.fill_id.and_then(|id| self.fills.get(id)).and_then(|fill| {
            [fill.fg.as_ref(), fill.bg.as_ref()]
                .into_iter()
                .flatten()
                .find_map(|c| resolver.resolve(c, ColorRole::Fill))
        });

        let border = xf
            .border_id
            .and_then(|id| self.borders.get(id))
            .copied()
            .unwrap_or_default();

        StyleRecord {
            background,
            font,
            alignment: xf.alignment,
            border,
            number_format: Some(self.format_code(xf.num_fmt_id)),
        }
    }

    fn format_code(&self, id: u32) -> String {
        match self.num_fmts.get(&id) {
            Some(code) => code.clone(),
            None => builtin_format_code(id).unwrap_or("General").to_string(),
        }
    }
}

/// Parse a color element's attributes.
///
/// `auto` wins, then `rgb`, `theme` (with `tint`) and `indexed`.
fn parse_color(e: &BytesStart<'_>) -> ColorDescriptor {
    let mut rgb = None;
    let mut theme = None;
    let mut indexed = None;
    let mut tint = None;
    let mut auto = false;

    for a in e.attributes().flatten() {
        let Ok(val) = a.unescape_value() else {
            continue;
        };
        match a.key.as_ref() {
            b"rgb" => rgb = Some(val.into_owned()),
            b"theme" => theme = val.trim().parse::<u32>().ok(),
            b"indexed" => indexed = val.trim().parse::<u32>().ok(),
            b"tint" => tint = val.trim().parse::<f64>().ok(),
            b"auto" => auto = parse_bool(&val).unwrap_or(false),
            _ => {}
        }
    }

    if auto {
        ColorDescriptor::auto()
    } else if let Some(rgb) = rgb {
        ColorDescriptor::rgb(rgb)
    } else if let Some(slot) = theme {
        ColorDescriptor::theme(slot, tint)
    } else if let Some(index) = indexed {
        ColorDescriptor::indexed(index)
    } else {
        ColorDescriptor::auto()
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> AlignmentRecord {
    AlignmentRecord {
        horizontal: attr_parse(e, b"horizontal"),
        vertical: attr_parse(e, b"vertical"),
        wrap: attr(e, b"wrapText").and_then(|v| parse_bool(&v)),
    }
}

/// A border edge counts when it has a line style other than `none`
fn edge_has_line(e: &BytesStart<'_>) -> bool {
    attr(e, b"style").map_or(false, |s| !s.is_empty() && s != "none")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Other,
    NumFmts,
    Fonts,
    Fills,
    Borders,
    CellXfs,
}

/// Event sink for the styles part; empty elements are a start plus an end.
#[derive(Debug, Default)]
struct StylesParser {
    styles: RawStyles,
    section: Section,
    font: Option<RawFont>,
    fill: Option<RawFill>,
    border: Option<BorderSides>,
    xf: Option<RawXf>,
}

impl StylesParser {
    fn start(&mut self, e: &BytesStart<'_>) {
        let name = e.local_name();
        match (self.section, name.as_ref()) {
            (_, b"numFmts") => self.section = Section::NumFmts,
            (_, b"fonts") => self.section = Section::Fonts,
            (_, b"fills") => self.section = Section::Fills,
            (_, b"borders") => self.section = Section::Borders,
            (_, b"cellXfs") => self.section = Section::CellXfs,
            (_, b"cellStyleXfs" | b"cellStyles" | b"dxfs" | b"tableStyles" | b"colors") => {
                self.section = Section::Other
            }

            (Section::NumFmts, b"numFmt") => {
                if let (Some(id), Some(code)) = (attr_parse(e, b"numFmtId"), attr(e, b"formatCode"))
                {
                    self.styles.num_fmts.insert(id, code);
                }
            }

            (Section::Fonts, b"font") => self.font = Some(RawFont::default()),
            (Section::Fonts, tag) => {
                if let Some(font) = self.font.as_mut() {
                    match tag {
                        b"b" => font.bold = Some(flag(e)),
                        b"i" => font.italic = Some(flag(e)),
                        b"name" => font.family = attr(e, b"val"),
                        b"sz" => font.size_pt = attr_parse(e, b"val"),
                        b"color" => font.color = Some(parse_color(e)),
                        _ => {}
                    }
                }
            }

            (Section::Fills, b"fill") => self.fill = Some(RawFill::default()),
            (Section::Fills, b"fgColor") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.fg = Some(parse_color(e));
                }
            }
            (Section::Fills, b"bgColor") => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.bg = Some(parse_color(e));
                }
            }

            (Section::Borders, b"border") => self.border = Some(BorderSides::default()),
            (Section::Borders, tag @ (b"left" | b"right" | b"top" | b"bottom" | b"start" | b"end")) => {
                if let Some(border) = self.border.as_mut() {
                    let line = edge_has_line(e);
                    match tag {
                        b"left" | b"start" => border.left |= line,
                        b"right" | b"end" => border.right |= line,
                        b"top" => border.top = line,
                        _ => border.bottom = line,
                    }
                }
            }

            (Section::CellXfs, b"xf") => {
                self.xf = Some(RawXf {
                    num_fmt_id: attr_parse(e, b"numFmtId").unwrap_or(0),
                    font_id: attr_parse(e, b"fontId"),
                    fill_id: attr_parse(e, b"fillId"),
                    border_id: attr_parse(e, b"borderId"),
                    alignment: AlignmentRecord::default(),
                });
            }
            (Section::CellXfs, b"alignment") => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = parse_alignment(e);
                }
            }

            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match (self.section, local_name) {
            (_, b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs") => {
                self.section = Section::Other
            }
            (Section::Fonts, b"font") => {
                if let Some(font) = self.font.take() {
                    self.styles.fonts.push(font);
                }
            }
            (Section::Fills, b"fill") => {
                if let Some(fill) = self.fill.take() {
                    self.styles.fills.push(fill);
                }
            }
            (Section::Borders, b"border") => {
                if let Some(border) = self.border.take() {
                    self.styles.borders.push(border);
                }
            }
            (Section::CellXfs, b"xf") => {
                if let Some(xf) = self.xf.take() {
                    self.styles.cell_xfs.push(xf);
                }
            }
            _ => {}
        }
    }
}

/// Read the styles part into raw tables
pub(crate) fn read_styles_xml<R: BufRead>(reader: R) -> LoadResult<RawStyles> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parser = StylesParser::default();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.start(&e),
            Event::Empty(e) => {
                parser.start(&e);
                parser.end(e.local_name().as_ref());
            }
            Event::End(e) => parser.end(e.local_name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.styles)
}
