//! Merged-cell regions

use crate::cell::CellRange;
use crate::error::{Error, Result};

/// A merged region as (row, col, row_span, col_span), 0-based, spans >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeRange {
    /// Top row
    pub row: u32,
    /// Left column
    pub col: u16,
    /// Number of rows covered
    pub row_span: u32,
    /// Number of columns covered
    pub col_span: u16,
}

impl MergeRange {
    /// Build from a `mergeCell@ref` value such as "B2:D4"
    pub fn parse(reference: &str) -> Result<Self> {
        if !reference.contains(':') {
            return Err(Error::InvalidRange(format!("merge without extent: '{}'", reference)));
        }
        Ok(Self::from(CellRange::parse(reference)?))
    }

    /// Last row covered (inclusive)
    pub fn last_row(&self) -> u32 {
        self.row + self.row_span - 1
    }

    /// Last column covered (inclusive)
    pub fn last_col(&self) -> u16 {
        self.col + self.col_span - 1
    }

    /// Check if a cell is within the merged region
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.row..=self.last_row()).contains(&row) && (self.col..=self.last_col()).contains(&col)
    }
}

impl From<CellRange> for MergeRange {
    fn from(range: CellRange) -> Self {
        Self {
            row: range.start.row,
            col: range.start.col,
            row_span: range.row_count(),
            col_span: range.col_count(),
        }
    }
}
