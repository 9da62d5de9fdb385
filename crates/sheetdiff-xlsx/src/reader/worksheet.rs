//! Worksheet part reading

use std::collections::HashMap;
use std::io::BufRead;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sheetdiff_core::{
    translate_formula, CellAddress, CellValue, MergeRange, SheetSnapshot, StyleId, StyleRecord,
    MAX_COLS,
};

use super::strings::{decode_excel_escapes, TextCollector};
use crate::error::{LoadError, LoadResult};
use crate::xml::{attr, attr_parse, parse_bool};

/// Formula as written on the cell
#[derive(Debug, Clone, PartialEq)]
enum FormulaSource {
    Text(String),
    /// Dependent of a shared formula group
    Shared(u32),
}

#[derive(Debug)]
struct RawCell {
    row: u32,
    col: u16,
    value: CellValue,
    formula: Option<FormulaSource>,
    xf: u32,
}

/// Cell being read: attributes plus collected child text
#[derive(Debug, Default)]
struct PendingCell {
    row: u32,
    col: u16,
    kind: Option<String>,
    xf: u32,
    value: Option<String>,
    formula: Option<String>,
    formula_kind: Option<String>,
    shared_index: Option<u32>,
    inline: Option<String>,
}

/// Everything collected from the worksheet XML before the grid is built
#[derive(Debug, Default)]
struct SheetParts {
    cells: Vec<RawCell>,
    /// Shared formula masters: si -> (row, col, text)
    masters: HashMap<u32, (u32, u16, String)>,
    merges: Vec<MergeRange>,
    /// (first col, last col, width), 1-based like the `col` element
    col_spans: Vec<(u32, u32, f64)>,
    row_heights: Vec<(u32, f64)>,
}

struct WorksheetParser<'a> {
    shared_strings: &'a [String],
    parts: SheetParts,
    cell: Option<PendingCell>,
    next_row: u32,
    next_col: u16,
    in_value: bool,
    in_formula: bool,
    inline: Option<TextCollector>,
}

impl<'a> WorksheetParser<'a> {
    fn new(shared_strings: &'a [String]) -> Self {
        Self {
            shared_strings,
            parts: SheetParts::default(),
            cell: None,
            next_row: 0,
            next_col: 0,
            in_value: false,
            in_formula: false,
            inline: None,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) -> LoadResult<()> {
        let name = e.local_name();
        match name.as_ref() {
            b"row" => self.begin_row(e),
            b"c" => self.begin_cell(e)?,
            b"v" if self.cell.is_some() => self.in_value = true,
            b"f" if self.cell.is_some() => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.formula_kind = attr(e, b"t");
                    cell.shared_index = attr_parse(e, b"si");
                }
                self.in_formula = true;
            }
            b"is" if self.cell.is_some() => self.inline = Some(TextCollector::default()),
            b"col" => self.read_col(e),
            b"mergeCell" => self.read_merge(e),
            tag => {
                if let Some(inline) = self.inline.as_mut() {
                    inline.start(tag);
                }
            }
        }
        Ok(())
    }

    fn end(&mut self, local_name: &[u8]) -> LoadResult<()> {
        match local_name {
            b"c" => self.finish_cell()?,
            b"v" => self.in_value = false,
            b"f" => self.in_formula = false,
            b"is" => {
                if let (Some(mut inline), Some(cell)) = (self.inline.take(), self.cell.as_mut()) {
                    cell.inline = Some(inline.finish());
                }
            }
            tag => {
                if let Some(inline) = self.inline.as_mut() {
                    inline.end(tag);
                }
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(inline) = self.inline.as_mut() {
            inline.text(text);
            return;
        }
        let Some(cell) = self.cell.as_mut() else {
            return;
        };
        if self.in_value {
            cell.value.get_or_insert_with(String::new).push_str(text);
        } else if self.in_formula {
            cell.formula.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn begin_row(&mut self, e: &BytesStart<'_>) {
        let row = attr_parse::<u32>(e, b"r")
            .filter(|&r| r > 0)
            .map(|r| r - 1)
            .unwrap_or(self.next_row);
        self.next_row = row + 1;
        self.next_col = 0;

        if let Some(height) = attr_parse::<f64>(e, b"ht").filter(|h| *h > 0.0) {
            self.parts.row_heights.push((row, height));
        }
    }

    fn begin_cell(&mut self, e: &BytesStart<'_>) -> LoadResult<()> {
        let (row, col) = match attr(e, b"r") {
            Some(reference) => {
                let addr = CellAddress::parse(&reference)?;
                (addr.row, addr.col)
            }
            // cells without a reference follow the previous one in the row
            None => (self.next_row.saturating_sub(1), self.next_col),
        };
        self.next_col = col.saturating_add(1);

        self.cell = Some(PendingCell {
            row,
            col,
            kind: attr(e, b"t"),
            xf: attr_parse(e, b"s").unwrap_or(0),
            ..PendingCell::default()
        });
        Ok(())
    }

    fn finish_cell(&mut self) -> LoadResult<()> {
        self.in_value = false;
        self.in_formula = false;
        self.inline = None;
        let Some(cell) = self.cell.take() else {
            return Ok(());
        };

        let value = cell_value(
            cell.kind.as_deref(),
            cell.value.as_deref(),
            cell.inline,
            self.shared_strings,
        )?;

        let text = cell.formula.filter(|f| !f.is_empty());
        let formula = match (cell.formula_kind.as_deref(), cell.shared_index, text) {
            (Some("shared"), Some(si), Some(text)) => {
                self.parts
                    .masters
                    .insert(si, (cell.row, cell.col, text.clone()));
                Some(FormulaSource::Text(text))
            }
            (Some("shared"), Some(si), None) => Some(FormulaSource::Shared(si)),
            (_, _, Some(text)) => Some(FormulaSource::Text(text)),
            _ => None,
        };

        self.parts.cells.push(RawCell {
            row: cell.row,
            col: cell.col,
            value,
            formula,
            xf: cell.xf,
        });
        Ok(())
    }

    fn read_col(&mut self, e: &BytesStart<'_>) {
        let (Some(min), Some(max), Some(width)) = (
            attr_parse::<u32>(e, b"min"),
            attr_parse::<u32>(e, b"max"),
            attr_parse::<f64>(e, b"width"),
        ) else {
            return;
        };
        if min >= 1 && max >= min && width > 0.0 {
            self.parts.col_spans.push((min, max, width));
        }
    }

    fn read_merge(&mut self, e: &BytesStart<'_>) {
        let Some(reference) = attr(e, b"ref") else {
            return;
        };
        match MergeRange::parse(&reference) {
            Ok(merge) => self.parts.merges.push(merge),
            Err(err) => log::warn!("Skipping merge '{}': {}", reference, err),
        }
    }
}

/// Convert the raw `v` text of a cell according to its `t` attribute.
///
/// Numbers that fail to parse are kept as text; error cells (`t="e"`) are
/// text such as `#DIV/0!`. ISO dates (`t="d"`) become serial numbers, or
/// stay text when they cannot be read.
fn cell_value(
    kind: Option<&str>,
    raw: Option<&str>,
    inline: Option<String>,
    shared_strings: &[String],
) -> LoadResult<CellValue> {
    if kind == Some("inlineStr") {
        return Ok(match inline {
            Some(text) => CellValue::Text(text),
            None => raw.map_or(CellValue::Empty, |v| CellValue::text(decode_excel_escapes(v))),
        });
    }

    let Some(raw) = raw else {
        return Ok(CellValue::Empty);
    };

    Ok(match kind.unwrap_or("n") {
        "s" => {
            let text = raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx))
                .ok_or_else(|| {
                    LoadError::corrupt(format!("invalid shared string index '{}'", raw))
                })?;
            CellValue::Text(text.clone())
        }
        "b" => CellValue::Boolean(parse_bool(raw).unwrap_or(false)),
        "str" => CellValue::text(decode_excel_escapes(raw)),
        "e" => CellValue::text(raw),
        "d" => match iso_date_serial(raw) {
            Some(serial) => CellValue::number(serial),
            None => {
                log::debug!("Keeping unreadable date '{}' as text", raw);
                CellValue::text(raw)
            }
        },
        _ => match raw.trim().parse::<f64>() {
            Ok(n) => CellValue::number(n),
            Err(_) => CellValue::text(raw),
        },
    })
}

/// Serial number (1900 date system) of an ISO 8601 date or date-time.
///
/// Days from 1900-03-01 on count the phantom 1900-02-29, as Excel does.
/// Dates before 1900 have no serial.
fn iso_date_serial(raw: &str) -> Option<f64> {
    let raw = raw.trim().trim_end_matches('Z');
    let stamp = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    let date = stamp.date();
    let mut days = (date - NaiveDate::from_ymd_opt(1899, 12, 31)?).num_days();
    if days < 0 {
        return None;
    }
    if date >= NaiveDate::from_ymd_opt(1900, 3, 1)? {
        days += 1;
    }
    let time = stamp.time();
    let seconds = f64::from(time.num_seconds_from_midnight()) + f64::from(time.nanosecond()) / 1e9;
    Some(days as f64 + seconds / 86_400.0)
}

/// Read one worksheet part into a snapshot.
///
/// `cell_styles` is indexed by the cell `s` attribute; cells that are not
/// written use entry 0.
pub(crate) fn read_worksheet<R: BufRead>(
    reader: R,
    name: String,
    shared_strings: &[String],
    cell_styles: &[StyleRecord],
) -> LoadResult<SheetSnapshot> {
    let mut xml_reader = Reader::from_reader(reader);
    // leading and trailing spaces of inline strings are content
    xml_reader.trim_text(false);

    let mut buf = Vec::new();
    let mut parser = WorksheetParser::new(shared_strings);

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.start(&e)?,
            Event::Empty(e) => {
                parser.start(&e)?;
                parser.end(e.local_name().as_ref())?;
            }
            Event::End(e) => parser.end(e.local_name().as_ref())?,
            Event::Text(e) => parser.text(&e.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(build_snapshot(name, parser.parts, cell_styles))
}

fn build_snapshot(name: String, parts: SheetParts, cell_styles: &[StyleRecord]) -> SheetSnapshot {
    // used range always starts at A1
    let mut rows = 0u32;
    let mut cols = 0u16;
    for cell in &parts.cells {
        rows = rows.max(cell.row + 1);
        cols = cols.max(cell.col + 1);
    }
    for merge in &parts.merges {
        rows = rows.max(merge.last_row() + 1);
        cols = cols.max(merge.last_col() + 1);
    }

    let mut sheet = SheetSnapshot::new(name, rows, cols);

    let xf_ids: Vec<StyleId> = cell_styles
        .iter()
        .map(|style| sheet.styles.table_mut().intern(style.clone()))
        .collect();
    let default_id = xf_ids.first().copied().unwrap_or(0);
    if default_id != 0 {
        for row in 0..rows {
            for col in 0..cols {
                sheet.styles.set_id(row, col, default_id);
            }
        }
    }

    for cell in &parts.cells {
        sheet.grid.set_value(cell.row, cell.col, cell.value.clone());

        let id = match xf_ids.get(cell.xf as usize) {
            Some(&id) => id,
            None => {
                log::warn!(
                    "Cell {} references unknown style {}",
                    CellAddress::new(cell.row, cell.col),
                    cell.xf
                );
                0
            }
        };
        sheet.styles.set_id(cell.row, cell.col, id);

        let text = match &cell.formula {
            Some(FormulaSource::Text(text)) => text.clone(),
            Some(FormulaSource::Shared(si)) => match parts.masters.get(si) {
                Some((row, col, master)) => translate_formula(
                    master,
                    i64::from(cell.row) - i64::from(*row),
                    i64::from(cell.col) - i64::from(*col),
                ),
                None => {
                    log::warn!(
                        "Cell {} uses shared formula {} with no master",
                        CellAddress::new(cell.row, cell.col),
                        si
                    );
                    continue;
                }
            },
            None => continue,
        };
        sheet.formulas.insert(cell.row, cell.col, format!("={}", text));
    }

    for (min, max, width) in parts.col_spans {
        let last = max.min(u32::from(cols)).min(u32::from(MAX_COLS));
        for col in min..=last {
            sheet.col_widths.insert((col - 1) as u16, width);
        }
    }
    sheet.row_heights.extend(parts.row_heights);
    sheet.merges = parts.merges;

    sheet
}
