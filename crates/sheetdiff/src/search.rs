//! Find within one sheet
//!
//! Cells are visited row by row or column by column. [`find_next`] starts
//! just after a given cell and wraps around the end of the sheet, so the
//! starting cell itself is the last one tried.

use std::borrow::Cow;

use sheetdiff_core::{CellAddress, SheetSnapshot};

/// What text of a cell is searched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LookIn {
    /// The cell value
    #[default]
    Values,
    /// The formula text, or the value for cells without a formula
    Formulas,
}

/// Visiting order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchOrder {
    #[default]
    ByRows,
    ByColumns,
}

/// A find request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchOptions {
    pub text: String,
    pub match_case: bool,
    /// Whole-cell match instead of substring
    pub match_entire: bool,
    pub look_in: LookIn,
    pub order: SearchOrder,
}

impl SearchOptions {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn match_case(mut self, enabled: bool) -> Self {
        self.match_case = enabled;
        self
    }

    pub fn match_entire(mut self, enabled: bool) -> Self {
        self.match_entire = enabled;
        self
    }

    pub fn look_in(mut self, look_in: LookIn) -> Self {
        self.look_in = look_in;
        self
    }

    pub fn order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }
}

/// Query text folded once per search
struct Matcher<'a> {
    options: &'a SearchOptions,
    needle: Cow<'a, str>,
}

impl<'a> Matcher<'a> {
    fn new(options: &'a SearchOptions) -> Self {
        let needle = if options.match_case {
            Cow::Borrowed(options.text.as_str())
        } else {
            Cow::Owned(options.text.to_lowercase())
        };
        Self { options, needle }
    }

    fn searchable<'s>(&self, sheet: &'s SheetSnapshot, row: u32, col: u16) -> Option<Cow<'s, str>> {
        if self.options.look_in == LookIn::Formulas {
            if let Some(formula) = sheet.formula(row, col).filter(|f| f.starts_with('=')) {
                return Some(Cow::Borrowed(formula));
            }
        }
        let value = sheet.value(row, col);
        if value.is_empty() {
            None
        } else {
            Some(Cow::Owned(value.to_natural_string()))
        }
    }

    fn matches(&self, sheet: &SheetSnapshot, row: u32, col: u16) -> bool {
        let Some(text) = self.searchable(sheet, row, col) else {
            return false;
        };
        let haystack = if self.options.match_case {
            text
        } else {
            Cow::Owned(text.to_lowercase())
        };
        if self.options.match_entire {
            haystack == self.needle
        } else {
            haystack.contains(self.needle.as_ref())
        }
    }
}

/// Maps positions in visiting order to coordinates and back
#[derive(Clone, Copy)]
struct ScanOrder {
    rows: u32,
    cols: u16,
    order: SearchOrder,
}

impl ScanOrder {
    fn new(sheet: &SheetSnapshot, order: SearchOrder) -> Self {
        Self {
            rows: sheet.row_count(),
            cols: sheet.col_count(),
            order,
        }
    }

    fn len(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    fn index_of(&self, row: u32, col: u16) -> Option<u64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(match self.order {
            SearchOrder::ByRows => u64::from(row) * u64::from(self.cols) + u64::from(col),
            SearchOrder::ByColumns => u64::from(col) * u64::from(self.rows) + u64::from(row),
        })
    }

    fn at(&self, index: u64) -> (u32, u16) {
        match self.order {
            SearchOrder::ByRows => {
                let cols = u64::from(self.cols);
                ((index / cols) as u32, (index % cols) as u16)
            }
            SearchOrder::ByColumns => {
                let rows = u64::from(self.rows);
                ((index % rows) as u32, (index / rows) as u16)
            }
        }
    }
}

/// Every matching cell in visiting order; empty when the query is empty.
pub fn find_all(sheet: &SheetSnapshot, options: &SearchOptions) -> Vec<CellAddress> {
    if options.text.is_empty() {
        return Vec::new();
    }
    let matcher = Matcher::new(options);
    let scan = ScanOrder::new(sheet, options.order);
    (0..scan.len())
        .map(|i| scan.at(i))
        .filter(|&(r, c)| matcher.matches(sheet, r, c))
        .map(|(r, c)| CellAddress::new(r, c))
        .collect()
}

/// The next matching cell after `from`, wrapping around.
///
/// With no `from`, or one outside the sheet, the scan starts at the first
/// cell.
pub fn find_next(
    sheet: &SheetSnapshot,
    options: &SearchOptions,
    from: Option<(u32, u16)>,
) -> Option<CellAddress> {
    if options.text.is_empty() {
        return None;
    }
    let matcher = Matcher::new(options);
    let scan = ScanOrder::new(sheet, options.order);
    let total = scan.len();
    let start = from
        .and_then(|(r, c)| scan.index_of(r, c))
        .map_or(0, |i| i + 1);

    (0..total)
        .map(|step| scan.at((start + step) % total))
        .find(|&(r, c)| matcher.matches(sheet, r, c))
        .map(|(r, c)| CellAddress::new(r, c))
}
