//! Rectangular sheet model
//!
//! A loaded sheet is a [`SheetSnapshot`]: a value [`Grid`], per-cell
//! [`CellStyles`], a sparse [`FormulaMap`], merged regions and sizing.
//! Reads outside the extent never fail; they return the empty cell, the
//! absent style and no formula, which is exactly what padding produces.

use crate::cell::CellValue;
use crate::range::MergeRange;
use crate::style::{
    AlignmentRecord, BorderSides, FontRecord, StyleId, StyleRecord, StyleTable,
};
use std::collections::BTreeMap;

static EMPTY: CellValue = CellValue::Empty;

static ABSENT_STYLE: StyleRecord = StyleRecord {
    background: None,
    font: FontRecord {
        bold: None,
        italic: None,
        family: None,
        size_pt: None,
        color: None,
    },
    alignment: AlignmentRecord {
        horizontal: None,
        vertical: None,
        wrap: None,
    },
    border: BorderSides {
        left: false,
        right: false,
        top: false,
        bottom: false,
    },
    number_format: None,
};

#[inline]
fn offset(cols: u16, row: u32, col: u16) -> usize {
    row as usize * cols as usize + col as usize
}

/// Dense row-major grid of cell values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: u32,
    cols: u16,
    cells: Vec<CellValue>,
}

impl Grid {
    /// Create a grid of empty cells
    pub fn new(rows: u32, cols: u16) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellValue::Empty; rows as usize * cols as usize],
        }
    }

    /// Build from possibly ragged rows; short rows are padded with `Empty`.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cols = width.min(u16::MAX as usize) as u16;
        let mut grid = Self::new(rows.len() as u32, cols);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().take(cols as usize).enumerate() {
                grid.set_value(r as u32, c as u16, value);
            }
        }
        grid
    }

    pub fn row_count(&self) -> u32 {
        self.rows
    }

    pub fn col_count(&self) -> u16 {
        self.cols
    }

    pub fn contains(&self, row: u32, col: u16) -> bool {
        row < self.rows && col < self.cols
    }

    /// Value at (row, col); `Empty` outside the extent
    pub fn value(&self, row: u32, col: u16) -> &CellValue {
        if self.contains(row, col) {
            &self.cells[offset(self.cols, row, col)]
        } else {
            &EMPTY
        }
    }

    /// Store a value; writes outside the extent are ignored and return false.
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) -> bool {
        if !self.contains(row, col) {
            return false;
        }
        self.cells[offset(self.cols, row, col)] = value;
        true
    }

    /// One row as a slice
    pub fn row(&self, row: u32) -> &[CellValue] {
        if row < self.rows {
            let start = offset(self.cols, row, 0);
            &self.cells[start..start + self.cols as usize]
        } else {
            &[]
        }
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// Copy re-expressed at a larger extent. Never shrinks.
    pub fn padded_to(&self, rows: u32, cols: u16) -> Grid {
        let rows = rows.max(self.rows);
        let cols = cols.max(self.cols);
        if rows == self.rows && cols == self.cols {
            return self.clone();
        }
        let mut grid = Grid::new(rows, cols);
        for r in 0..self.rows {
            let dst = offset(cols, r, 0);
            grid.cells[dst..dst + self.cols as usize].clone_from_slice(self.row(r));
        }
        grid
    }
}

/// Style id per cell plus the table they index
#[derive(Debug, Clone)]
pub struct CellStyles {
    rows: u32,
    cols: u16,
    ids: Vec<StyleId>,
    table: StyleTable,
}

impl CellStyles {
    /// Every cell starts with the absent style
    pub fn new(rows: u32, cols: u16) -> Self {
        Self {
            rows,
            cols,
            ids: vec![0; rows as usize * cols as usize],
            table: StyleTable::new(),
        }
    }

    /// Style at (row, col); absent outside the extent
    pub fn get(&self, row: u32, col: u16) -> &StyleRecord {
        self.table.get(self.id(row, col)).unwrap_or(&ABSENT_STYLE)
    }

    pub fn id(&self, row: u32, col: u16) -> StyleId {
        if row < self.rows && col < self.cols {
            self.ids[offset(self.cols, row, col)]
        } else {
            0
        }
    }

    /// Assign a style; writes outside the extent are ignored.
    pub fn set(&mut self, row: u32, col: u16, style: StyleRecord) {
        let id = self.table.intern(style);
        self.set_id(row, col, id);
    }

    /// Assign an already-interned id
    pub fn set_id(&mut self, row: u32, col: u16, id: StyleId) {
        if row < self.rows && col < self.cols {
            self.ids[offset(self.cols, row, col)] = id;
        }
    }

    pub fn table(&self) -> &StyleTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut StyleTable {
        &mut self.table
    }

    /// Copy re-expressed at a larger extent; new cells have the absent style.
    pub fn padded_to(&self, rows: u32, cols: u16) -> CellStyles {
        let rows = rows.max(self.rows);
        let cols = cols.max(self.cols);
        let mut ids = vec![0; rows as usize * cols as usize];
        for r in 0..self.rows {
            let src = offset(self.cols, r, 0);
            let dst = offset(cols, r, 0);
            ids[dst..dst + self.cols as usize].copy_from_slice(&self.ids[src..src + self.cols as usize]);
        }
        CellStyles {
            rows,
            cols,
            ids,
            table: self.table.clone(),
        }
    }
}

impl Default for CellStyles {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Sparse (row, col) -> formula text, ordered row-major
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormulaMap {
    formulas: BTreeMap<(u32, u16), String>,
}

impl FormulaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, row: u32, col: u16, text: S) {
        self.formulas.insert((row, col), text.into());
    }

    /// Formula text, `None` when the cell holds a plain value
    pub fn get(&self, row: u32, col: u16) -> Option<&str> {
        self.formulas.get(&(row, col)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((u32, u16), &str)> {
        self.formulas.iter().map(|(&k, v)| (k, v.as_str()))
    }
}

impl FromIterator<((u32, u16), String)> for FormulaMap {
    fn from_iter<I: IntoIterator<Item = ((u32, u16), String)>>(iter: I) -> Self {
        Self {
            formulas: iter.into_iter().collect(),
        }
    }
}

/// Explicit column widths or row heights; absent keys use the viewer default.
pub type SizeMap<K> = BTreeMap<K, f64>;

/// Everything loaded from one sheet
#[derive(Debug, Clone, Default)]
pub struct SheetSnapshot {
    /// Sheet name as shown on its tab
    pub name: String,
    pub grid: Grid,
    pub styles: CellStyles,
    pub formulas: FormulaMap,
    pub merges: Vec<MergeRange>,
    pub col_widths: SizeMap<u16>,
    pub row_heights: SizeMap<u32>,
}

impl SheetSnapshot {
    /// An empty snapshot with the given extent
    pub fn new<S: Into<String>>(name: S, rows: u32, cols: u16) -> Self {
        Self {
            name: name.into(),
            grid: Grid::new(rows, cols),
            styles: CellStyles::new(rows, cols),
            ..Self::default()
        }
    }

    /// Build from value rows with no styles or formulas
    pub fn from_rows<S: Into<String>>(name: S, rows: Vec<Vec<CellValue>>) -> Self {
        let grid = Grid::from_rows(rows);
        Self {
            name: name.into(),
            styles: CellStyles::new(grid.row_count(), grid.col_count()),
            grid,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> u32 {
        self.grid.row_count()
    }

    pub fn col_count(&self) -> u16 {
        self.grid.col_count()
    }

    pub fn value(&self, row: u32, col: u16) -> &CellValue {
        self.grid.value(row, col)
    }

    pub fn style(&self, row: u32, col: u16) -> &StyleRecord {
        self.styles.get(row, col)
    }

    pub fn formula(&self, row: u32, col: u16) -> Option<&str> {
        self.formulas.get(row, col)
    }

    /// Merged region whose top-left cell is (row, col)
    pub fn merge_at(&self, row: u32, col: u16) -> Option<&MergeRange> {
        self.merges.iter().find(|m| m.row == row && m.col == col)
    }

    /// Copy with values and styles padded to a larger extent
    pub fn padded_to(&self, rows: u32, cols: u16) -> SheetSnapshot {
        SheetSnapshot {
            name: self.name.clone(),
            grid: self.grid.padded_to(rows, cols),
            styles: self.styles.padded_to(rows, cols),
            formulas: self.formulas.clone(),
            merges: self.merges.clone(),
            col_widths: self.col_widths.clone(),
            row_heights: self.row_heights.clone(),
        }
    }
}
