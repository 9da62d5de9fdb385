//! Which differences a viewer shows

use std::collections::BTreeSet;

use crate::diff::{DiffMask, DiffResult};

/// Category visibility toggles; everything is shown by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DiffView {
    /// Master switch; when off no difference is highlighted
    pub show_differences: bool,
    pub show_content: bool,
    pub show_format: bool,
    pub show_formula: bool,
}

impl Default for DiffView {
    fn default() -> Self {
        Self {
            show_differences: true,
            show_content: true,
            show_format: true,
            show_formula: true,
        }
    }
}

impl DiffView {
    /// Show only the given categories
    pub fn only(mask: DiffMask) -> Self {
        Self {
            show_differences: true,
            show_content: mask.content(),
            show_format: mask.format(),
            show_formula: mask.formula(),
        }
    }

    /// Categories currently enabled
    pub fn enabled_mask(&self) -> DiffMask {
        if !self.show_differences {
            return DiffMask::NONE;
        }
        let mut mask = DiffMask::NONE;
        if self.show_content {
            mask |= DiffMask::CONTENT;
        }
        if self.show_format {
            mask |= DiffMask::FORMAT;
        }
        if self.show_formula {
            mask |= DiffMask::FORMULA;
        }
        mask
    }

    /// A cell's stored bits restricted to the enabled categories
    pub fn visible_mask(&self, mask: DiffMask) -> DiffMask {
        mask & self.enabled_mask()
    }

    /// Rows to display, ascending.
    ///
    /// Without `only_changes` that is every row of the aligned extent.
    /// Otherwise it is the union of the row sets of the enabled categories.
    /// Hiding differences switches `only_changes` off, so every row shows.
    pub fn visible_rows(&self, result: &DiffResult, only_changes: bool) -> Vec<u32> {
        if !only_changes || !self.show_differences {
            return (0..result.row_count()).collect();
        }
        let enabled = self.enabled_mask();
        let mut rows = BTreeSet::new();
        if enabled.content() {
            rows.extend(result.rows_with_content_diff());
        }
        if enabled.format() {
            rows.extend(result.rows_with_format_diff());
        }
        if enabled.formula() {
            rows.extend(result.rows_with_formula_diff());
        }
        rows.into_iter().collect()
    }
}
