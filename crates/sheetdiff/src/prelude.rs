//! Prelude module - common imports for sheetdiff users
//!
//! ```rust
//! use sheetdiff::prelude::*;
//! ```

pub use crate::{
    // Engine
    align,
    diff,
    format_cell,
    find_all,
    find_next,
    // Model
    CellAddress,
    CellRange,
    CellValue,
    ChangeList,
    ComparisonSession,
    DecimalOverrides,
    DiffConfig,
    DiffMask,
    DiffResult,
    DiffView,
    // Errors
    Error,
    LoadError,
    LoadOptions,
    Result,
    SearchOptions,
    SheetSnapshot,
    StyleRecord,
    // I/O
    XlsxReader,
};
