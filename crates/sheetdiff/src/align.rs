//! Grid alignment
//!
//! Two sheets are compared over the union of their extents. Reads outside a
//! sheet's own extent already yield the empty cell, the absent style and no
//! formula, so the engine never needs padded copies; [`align`] materializes
//! them for consumers that render both sides in one coordinate space.

use sheetdiff_core::SheetSnapshot;

/// `(max rows, max cols)` of two sheets
pub fn aligned_extent(left: &SheetSnapshot, right: &SheetSnapshot) -> (u32, u16) {
    (
        left.row_count().max(right.row_count()),
        left.col_count().max(right.col_count()),
    )
}

/// Re-express both sheets at their common extent.
///
/// Symmetric, and a no-op (up to copying) for sheets of equal shape.
pub fn align(left: &SheetSnapshot, right: &SheetSnapshot) -> (SheetSnapshot, SheetSnapshot) {
    let (rows, cols) = aligned_extent(left, right);
    (left.padded_to(rows, cols), right.padded_to(rows, cols))
}
