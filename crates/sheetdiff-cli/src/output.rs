//! Diff report rendering: text, JSON and CSV

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use sheetdiff::{
    CellAddress, ChangeList, ComparisonSession, DiffConfig, DiffMask, DiffSummary, DiffView,
};

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// One reported cell
#[derive(Debug, Serialize)]
pub struct CellDiff {
    pub cell: String,
    pub row: u32,
    pub col: u16,
    pub content: bool,
    pub format: bool,
    pub formula: bool,
    pub old: String,
    pub new: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_formula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_formula: Option<String>,
}

/// Everything written for one comparison
#[derive(Debug, Serialize)]
pub struct DiffReport {
    pub old_file: String,
    pub new_file: String,
    pub old_sheet: String,
    pub new_sheet: String,
    pub config: DiffConfig,
    pub summary: DiffSummary,
    /// Cells with a visible difference, row-major
    pub cells: Vec<CellDiff>,
    /// Value changes among the visible cells
    pub changes: ChangeList,
}

impl DiffReport {
    pub fn new(old: &Path, new: &Path, session: &ComparisonSession, view: DiffView) -> Self {
        let (left, right, result) = (session.left(), session.right(), session.result());

        let cells = result
            .diff_map()
            .sorted()
            .into_iter()
            .filter_map(|((row, col), mask)| {
                let mask = view.visible_mask(mask);
                if mask.is_empty() {
                    return None;
                }
                Some(CellDiff {
                    cell: CellAddress::new(row, col).to_string(),
                    row,
                    col,
                    content: mask.content(),
                    format: mask.format(),
                    formula: mask.formula(),
                    old: left.value(row, col).to_natural_string(),
                    new: right.value(row, col).to_natural_string(),
                    old_formula: left.formula(row, col).map(str::to_string),
                    new_formula: right.formula(row, col).map(str::to_string),
                })
            })
            .collect();

        let changes = if view.enabled_mask().contains(DiffMask::CONTENT) {
            ChangeList::build(left, right, result)
        } else {
            ChangeList::default()
        };

        Self {
            old_file: old.display().to_string(),
            new_file: new.display().to_string(),
            old_sheet: left.name.clone(),
            new_sheet: right.name.clone(),
            config: *session.config(),
            summary: result.summary(),
            cells,
            changes,
        }
    }
}

pub fn write_report<W: Write>(report: &DiffReport, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(report, out),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => write_csv(report, out),
    }
}

fn kinds(cell: &CellDiff) -> String {
    let mut parts = Vec::with_capacity(3);
    if cell.content {
        parts.push("content");
    }
    if cell.format {
        parts.push("format");
    }
    if cell.formula {
        parts.push("formula");
    }
    parts.join("+")
}

fn write_text<W: Write>(report: &DiffReport, out: &mut W) -> Result<()> {
    let s = &report.summary;
    writeln!(
        out,
        "--- {} [{}]\n+++ {} [{}]",
        report.old_file, report.old_sheet, report.new_file, report.new_sheet
    )?;
    writeln!(
        out,
        "Compared {} rows x {} columns: {} cells differ ({} content, {} format, {} formula)",
        s.total_rows, s.total_cols, s.changed_cells, s.content_cells, s.format_cells, s.formula_cells
    )?;
    if report.cells.is_empty() {
        writeln!(out, "No differences")?;
        return Ok(());
    }
    writeln!(out)?;
    for cell in &report.cells {
        write!(out, "{:<8} {:<22}", cell.cell, kinds(cell))?;
        if cell.content {
            write!(out, " {:?} -> {:?}", cell.old, cell.new)?;
        }
        if cell.formula {
            write!(
                out,
                " {} -> {}",
                cell.old_formula.as_deref().unwrap_or("(none)"),
                cell.new_formula.as_deref().unwrap_or("(none)")
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_csv<W: Write>(report: &DiffReport, out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "cell",
        "row",
        "col",
        "kinds",
        "old",
        "new",
        "old_formula",
        "new_formula",
    ])?;
    for cell in &report.cells {
        let row = (cell.row + 1).to_string();
        let col = (u32::from(cell.col) + 1).to_string();
        let kinds = kinds(cell);
        writer.write_record([
            cell.cell.as_str(),
            row.as_str(),
            col.as_str(),
            kinds.as_str(),
            cell.old.as_str(),
            cell.new.as_str(),
            cell.old_formula.as_deref().unwrap_or(""),
            cell.new_formula.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
