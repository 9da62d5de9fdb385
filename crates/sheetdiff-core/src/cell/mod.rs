//! Cell values and A1-style addressing
//!
//! - [`CellValue`] - the value stored in a grid cell
//! - [`CellAddress`] - a cell's location (e.g., "A1")
//! - [`CellRange`] - a rectangle of cells (e.g., "A1:B10")

mod address;
mod value;

pub use address::{CellAddress, CellRange};
pub use value::CellValue;
