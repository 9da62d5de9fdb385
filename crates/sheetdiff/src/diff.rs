//! Diff engine
//!
//! For every coordinate of the aligned extent the engine decides,
//! independently, whether the value, the style and the formula differ, and
//! packs the three answers into a [`DiffMask`]. Only non-zero masks are
//! stored. Changing the [`DiffConfig`] means running [`diff`] again; results
//! are never patched in place.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use ahash::AHashMap;
use sheetdiff_core::{CellValue, HexColor, HorizontalAlignment, SheetSnapshot, StyleRecord, VerticalAlignment};

use crate::align::aligned_extent;

/// Equivalence rules for a comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiffConfig {
    /// Compare text and formulas case-insensitively
    pub ignore_case: bool,
    /// Collapse whitespace runs to one space and trim before comparing
    pub ignore_whitespace: bool,
    /// Leave number-format codes out of the style comparison
    pub ignore_number_format: bool,
}

impl DiffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_case(mut self, enabled: bool) -> Self {
        self.ignore_case = enabled;
        self
    }

    pub fn ignore_whitespace(mut self, enabled: bool) -> Self {
        self.ignore_whitespace = enabled;
        self
    }

    pub fn ignore_number_format(mut self, enabled: bool) -> Self {
        self.ignore_number_format = enabled;
        self
    }
}

/// Per-cell difference bits: content (bit 0), format (bit 1), formula (bit 2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DiffMask(u8);

impl DiffMask {
    pub const NONE: DiffMask = DiffMask(0);
    pub const CONTENT: DiffMask = DiffMask(0b001);
    pub const FORMAT: DiffMask = DiffMask(0b010);
    pub const FORMULA: DiffMask = DiffMask(0b100);
    pub const ALL: DiffMask = DiffMask(0b111);

    /// Mask from raw bits; bits above the third are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        DiffMask(bits & 0b111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set
    pub const fn contains(self, other: DiffMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: DiffMask) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn content(self) -> bool {
        self.intersects(Self::CONTENT)
    }

    pub const fn format(self) -> bool {
        self.intersects(Self::FORMAT)
    }

    pub const fn formula(self) -> bool {
        self.intersects(Self::FORMULA)
    }
}

impl BitOr for DiffMask {
    type Output = DiffMask;

    fn bitor(self, rhs: DiffMask) -> DiffMask {
        DiffMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for DiffMask {
    fn bitor_assign(&mut self, rhs: DiffMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DiffMask {
    type Output = DiffMask;

    fn bitand(self, rhs: DiffMask) -> DiffMask {
        DiffMask(self.0 & rhs.0)
    }
}

impl fmt::Display for DiffMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::with_capacity(3);
        if self.content() {
            names.push("content");
        }
        if self.format() {
            names.push("format");
        }
        if self.formula() {
            names.push("formula");
        }
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join("+"))
        }
    }
}

#[inline]
fn pack(row: u32, col: u16) -> u64 {
    (u64::from(row) << 32) | u64::from(col)
}

#[inline]
fn unpack(key: u64) -> (u32, u16) {
    ((key >> 32) as u32, (key & 0xFFFF) as u16)
}

/// Sparse (row, col) -> non-zero [`DiffMask`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffMap {
    cells: AHashMap<u64, DiffMask>,
}

impl DiffMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mask; empty masks are not stored.
    pub fn insert(&mut self, row: u32, col: u16, mask: DiffMask) {
        if mask.is_empty() {
            self.cells.remove(&pack(row, col));
        } else {
            self.cells.insert(pack(row, col), mask);
        }
    }

    /// Mask at (row, col); [`DiffMask::NONE`] for identical cells
    pub fn get(&self, row: u32, col: u16) -> DiffMask {
        self.cells.get(&pack(row, col)).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = ((u32, u16), DiffMask)> + '_ {
        self.cells.iter().map(|(&k, &m)| (unpack(k), m))
    }

    /// Entries in row-major order
    pub fn sorted(&self) -> Vec<((u32, u16), DiffMask)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by_key(|&(pos, _)| pos);
        entries
    }
}

/// Counters for a finished comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffSummary {
    pub total_rows: u32,
    pub total_cols: u16,
    /// Cells with any difference
    pub changed_cells: usize,
    pub content_cells: usize,
    pub format_cells: usize,
    pub formula_cells: usize,
}

/// Immutable outcome of one [`diff`] run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    rows: u32,
    cols: u16,
    config: DiffConfig,
    map: DiffMap,
    rows_content: BTreeSet<u32>,
    rows_format: BTreeSet<u32>,
    rows_formula: BTreeSet<u32>,
}

impl DiffResult {
    /// Rows in the aligned extent
    pub fn row_count(&self) -> u32 {
        self.rows
    }

    /// Columns in the aligned extent
    pub fn col_count(&self) -> u16 {
        self.cols
    }

    /// Configuration the result was computed under
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn diff_map(&self) -> &DiffMap {
        &self.map
    }

    pub fn mask(&self, row: u32, col: u16) -> DiffMask {
        self.map.get(row, col)
    }

    pub fn is_identical(&self) -> bool {
        self.map.is_empty()
    }

    pub fn rows_with_content_diff(&self) -> &BTreeSet<u32> {
        &self.rows_content
    }

    pub fn rows_with_format_diff(&self) -> &BTreeSet<u32> {
        &self.rows_format
    }

    pub fn rows_with_formula_diff(&self) -> &BTreeSet<u32> {
        &self.rows_formula
    }

    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary {
            total_rows: self.rows,
            total_cols: self.cols,
            changed_cells: self.map.len(),
            ..DiffSummary::default()
        };
        for (_, mask) in self.map.iter() {
            summary.content_cells += usize::from(mask.content());
            summary.format_cells += usize::from(mask.format());
            summary.formula_cells += usize::from(mask.formula());
        }
        summary
    }
}

/// Text after the configured whitespace and case folding
pub fn normalize_text<'a>(text: &'a str, config: &DiffConfig) -> Cow<'a, str> {
    let mut out = Cow::Borrowed(text);
    if config.ignore_whitespace {
        out = Cow::Owned(text.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    if config.ignore_case {
        out = Cow::Owned(out.to_lowercase());
    }
    out
}

/// Content equality.
///
/// Numbers compare exactly; a number never equals text or a boolean.
/// Everything else compares by its natural string form after
/// [`normalize_text`], so a boolean equals the text `TRUE`/`FALSE`.
pub fn values_equal(a: &CellValue, b: &CellValue, config: &DiffConfig) -> bool {
    match (a, b) {
        (CellValue::Empty, CellValue::Empty) => true,
        (CellValue::Empty, _) | (_, CellValue::Empty) => false,
        (CellValue::Number(x), CellValue::Number(y)) => x == y,
        (CellValue::Number(_), _) | (_, CellValue::Number(_)) => false,
        _ => {
            let (a, b) = (a.to_natural_string(), b.to_natural_string());
            normalize_text(&a, config) == normalize_text(&b, config)
        }
    }
}

/// Formula equality; `None` means the cell holds a plain value.
pub fn formulas_equal(a: Option<&str>, b: Option<&str>, config: &DiffConfig) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => normalize_text(a, config) == normalize_text(b, config),
        _ => false,
    }
}

/// The style fields that take part in format comparison
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSignature<'a> {
    pub background: Option<HexColor>,
    pub font_color: Option<HexColor>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub size_pt: Option<f64>,
    pub family: Option<&'a str>,
    pub horizontal: Option<HorizontalAlignment>,
    pub vertical: Option<VerticalAlignment>,
    pub wrap: Option<bool>,
    pub border_left: bool,
    pub border_right: bool,
    pub border_top: bool,
    pub border_bottom: bool,
    /// `None` when number formats are ignored
    pub number_format: Option<&'a str>,
}

impl<'a> StyleSignature<'a> {
    pub fn new(style: &'a StyleRecord, config: &DiffConfig) -> Self {
        Self {
            background: style.background,
            font_color: style.font.color,
            bold: style.font.bold,
            italic: style.font.italic,
            size_pt: style.font.size_pt,
            family: style.font.family.as_deref(),
            horizontal: style.alignment.horizontal,
            vertical: style.alignment.vertical,
            wrap: style.alignment.wrap,
            border_left: style.border.left,
            border_right: style.border.right,
            border_top: style.border.top,
            border_bottom: style.border.bottom,
            number_format: if config.ignore_number_format {
                None
            } else {
                style.number_format.as_deref()
            },
        }
    }
}

/// Compare two sheets over their aligned extent.
///
/// Full rebuild, `O(rows * cols)`. Never fails.
pub fn diff(left: &SheetSnapshot, right: &SheetSnapshot, config: &DiffConfig) -> DiffResult {
    let (rows, cols) = aligned_extent(left, right);

    let mut map = DiffMap::new();
    let mut rows_content = BTreeSet::new();
    let mut rows_format = BTreeSet::new();
    let mut rows_formula = BTreeSet::new();

    for row in 0..rows {
        for col in 0..cols {
            let mut mask = DiffMask::NONE;
            if !values_equal(left.value(row, col), right.value(row, col), config) {
                mask |= DiffMask::CONTENT;
                rows_content.insert(row);
            }
            if StyleSignature::new(left.style(row, col), config)
                != StyleSignature::new(right.style(row, col), config)
            {
                mask |= DiffMask::FORMAT;
                rows_format.insert(row);
            }
            if !formulas_equal(left.formula(row, col), right.formula(row, col), config) {
                mask |= DiffMask::FORMULA;
                rows_formula.insert(row);
            }
            map.insert(row, col, mask);
        }
    }

    log::debug!(
        "Compared {} x {} cells: {} differ ({} content rows, {} format rows, {} formula rows)",
        rows,
        cols,
        map.len(),
        rows_content.len(),
        rows_format.len(),
        rows_formula.len()
    );

    DiffResult {
        rows,
        cols,
        config: *config,
        map,
        rows_content,
        rows_format,
        rows_formula,
    }
}
