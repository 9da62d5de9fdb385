//! End-to-end tests for sheetdiff-xlsx.
//!
//! Each test builds the exact workbook it needs in memory with
//! [`XlsxFixture`] (a minimal OOXML package written through `zip`), then
//! reads it back with `XlsxReader` and asserts on the snapshot.

mod common;
mod reading;

// Re-export common utilities for submodules
pub use common::*;
