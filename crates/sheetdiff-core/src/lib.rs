//! # sheetdiff-core
//!
//! Data model shared by the sheetdiff loader and diff engine.
//!
//! - [`CellValue`] - the four value kinds a compared cell can hold
//! - [`CellAddress`], [`CellRange`] and [`MergeRange`] - addressing
//! - [`StyleRecord`] and [`StyleTable`] - per-cell presentation metadata
//! - [`ColorDescriptor`] and [`ThemePalette`] - raw workbook colors and their resolution
//! - [`FormatInfo`] - parsed number-format parameters
//! - [`Grid`] and [`SheetSnapshot`] - one loaded sheet
//!
//! ## Example
//!
//! ```rust
//! use sheetdiff_core::{parse_number_format, CellValue, Grid};
//!
//! let mut grid = Grid::new(2, 2);
//! grid.set_value(0, 1, CellValue::Number(3.5));
//! assert_eq!(grid.value(0, 1), &CellValue::Number(3.5));
//! assert_eq!(grid.value(5, 5), &CellValue::Empty);
//!
//! let info = parse_number_format("#,##0.00").unwrap();
//! assert_eq!(info.decimals, 2);
//! assert!(info.grouping);
//! ```

pub mod cell;
pub mod error;
pub mod formula;
pub mod grid;
pub mod range;
pub mod style;

pub use cell::{CellAddress, CellRange, CellValue};
pub use error::{Error, Result};
pub use formula::{formula_references, translate_formula, FormulaReference};
pub use grid::{CellStyles, FormulaMap, Grid, SheetSnapshot, SizeMap};
pub use range::MergeRange;

pub use style::{
    apply_tint, builtin_format_code, indexed_color, is_date_format, parse_number_format,
    AlignmentRecord, BorderSides, ColorDescriptor, ColorKind, ColorRole, FontRecord, FormatInfo,
    HexColor, HorizontalAlignment, StyleId, StyleRecord, StyleTable, ThemeColorResolver,
    ThemePalette, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;
