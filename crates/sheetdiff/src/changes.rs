//! Flat list of value changes between two sheets

use std::fmt;

use sheetdiff_core::{CellAddress, SheetSnapshot};

use crate::diff::DiffResult;

/// How a cell's content changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChangeKind {
    /// Empty before, filled after
    Added,
    /// Filled before, empty after
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One content-changed cell with both sides in natural string form
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Change {
    pub row: u32,
    pub col: u16,
    pub old: String,
    pub new: String,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ChangeKind,
}

impl Change {
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.col)
    }
}

/// Content changes in row-major order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ChangeList {
    changes: Vec<Change>,
}

impl ChangeList {
    /// Collect every cell whose content bit is set in `result`.
    pub fn build(left: &SheetSnapshot, right: &SheetSnapshot, result: &DiffResult) -> Self {
        let changes = result
            .diff_map()
            .sorted()
            .into_iter()
            .filter(|(_, mask)| mask.content())
            .map(|((row, col), _)| {
                let old = left.value(row, col);
                let new = right.value(row, col);
                let kind = match (old.is_empty(), new.is_empty()) {
                    (true, _) => ChangeKind::Added,
                    (_, true) => ChangeKind::Removed,
                    _ => ChangeKind::Modified,
                };
                Change {
                    row,
                    col,
                    old: old.to_natural_string(),
                    new: new.to_natural_string(),
                    kind,
                }
            })
            .collect();
        Self { changes }
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Change> {
        self.changes.iter()
    }

    pub fn as_slice(&self) -> &[Change] {
        &self.changes
    }

    /// Number of changes of one kind
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }
}

impl IntoIterator for ChangeList {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeList {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
