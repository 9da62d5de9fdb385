//! # sheetdiff
//!
//! Compares one sheet of a workbook against one sheet of another, cell by
//! cell, and classifies every difference as content, format and/or formula.
//!
//! ## Pipeline
//!
//! 1. Load each side with [`XlsxReader`] into a [`SheetSnapshot`]
//! 2. [`align`] both snapshots to a common extent
//! 3. [`diff`] them under a [`DiffConfig`] into a [`DiffResult`]
//! 4. Render cells with [`format_cell`], filter with [`DiffView`],
//!    list value changes with [`ChangeList`]
//!
//! [`ComparisonSession`] ties these together and supports recomputing off
//! the caller's thread.
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff::prelude::*;
//!
//! let old = SheetSnapshot::from_rows("Q1", vec![vec![CellValue::Number(1.0), "x".into()]]);
//! let new = SheetSnapshot::from_rows("Q1", vec![vec![CellValue::Number(2.0), "x".into()]]);
//!
//! let result = diff(&old, &new, &DiffConfig::default());
//! assert_eq!(result.mask(0, 0), DiffMask::CONTENT);
//! assert!(result.mask(0, 1).is_empty());
//! assert_eq!(result.summary().changed_cells, 1);
//! ```

pub mod align;
pub mod changes;
pub mod diff;
pub mod display;
pub mod error;
pub mod filter;
pub mod prelude;
pub mod search;
pub mod session;

pub use align::{align, aligned_extent};
pub use changes::{Change, ChangeKind, ChangeList};
pub use diff::{
    diff, formulas_equal, normalize_text, values_equal, DiffConfig, DiffMap, DiffMask, DiffResult,
    DiffSummary, StyleSignature,
};
pub use display::{format_cell, DecimalOverrides};
pub use error::{Error, Result};
pub use filter::DiffView;
pub use search::{find_all, find_next, LookIn, SearchOptions, SearchOrder};
pub use session::{ComparisonSession, DiffOutcome, DiffRequest};

// Re-export the data model
pub use sheetdiff_core::{
    formula_references, CellAddress, CellRange, CellValue, FormatInfo, FormulaReference, HexColor,
    MergeRange, SheetSnapshot, StyleRecord,
};

// Re-export the loader
pub use sheetdiff_xlsx::{LegacyConverter, LoadError, LoadOptions, XlsxReader, XlsxWorkbook};
