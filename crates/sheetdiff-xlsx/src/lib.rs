//! # sheetdiff-xlsx
//!
//! Loads one worksheet of an XLSX (Office Open XML) workbook into a
//! [`SheetSnapshot`](sheetdiff_core::SheetSnapshot): computed values, formula
//! text, resolved per-cell styles, merged regions and column/row sizing.
//!
//! ```rust,no_run
//! use sheetdiff_xlsx::XlsxReader;
//!
//! let mut workbook = XlsxReader::new().open_file("report.xlsx")?;
//! println!("sheets: {:?}", workbook.sheet_names());
//! let sheet = workbook.load_sheet(Some("Summary"))?;
//! println!("{} x {}", sheet.row_count(), sheet.col_count());
//! # Ok::<(), sheetdiff_xlsx::LoadError>(())
//! ```

pub mod error;
pub mod reader;

mod styles;
mod theme;
mod xml;

pub use error::{LoadError, LoadResult};
pub use reader::{LegacyConverter, LoadOptions, XlsxReader, XlsxWorkbook};
pub use theme::parse_theme_palette;
