//! Comparison session
//!
//! Holds both sides of a comparison and the current result. Every change of
//! input or configuration replaces the result wholesale. Callers that keep a
//! UI responsive can instead take a [`DiffRequest`], run it on another
//! thread, and hand the [`DiffOutcome`] back; outcomes for superseded
//! requests are dropped.

use std::path::Path;
use std::sync::Arc;

use sheetdiff_core::SheetSnapshot;
use sheetdiff_xlsx::XlsxReader;

use crate::diff::{diff, DiffConfig, DiffResult};
use crate::error::{Error, Result};

/// A self-contained recompute job
#[derive(Debug, Clone)]
pub struct DiffRequest {
    generation: u64,
    left: Arc<SheetSnapshot>,
    right: Arc<SheetSnapshot>,
    config: DiffConfig,
}

impl DiffRequest {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Run the comparison; may be called on any thread.
    pub fn run(self) -> DiffOutcome {
        let result = diff(&self.left, &self.right, &self.config);
        DiffOutcome {
            generation: self.generation,
            result: Arc::new(result),
        }
    }
}

/// Result of a [`DiffRequest`], tagged with the generation it was made for
#[derive(Debug, Clone)]
pub struct DiffOutcome {
    generation: u64,
    result: Arc<DiffResult>,
}

impl DiffOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Arc<DiffResult> {
        &self.result
    }
}

/// Two sheets, a configuration and the diff between them
#[derive(Debug, Clone)]
pub struct ComparisonSession {
    left: Arc<SheetSnapshot>,
    right: Arc<SheetSnapshot>,
    config: DiffConfig,
    result: Arc<DiffResult>,
    /// Bumped on every input change or request
    generation: u64,
    /// Generation `result` was computed for
    result_generation: u64,
}

impl ComparisonSession {
    /// Compare two loaded sheets.
    pub fn new(left: SheetSnapshot, right: SheetSnapshot, config: DiffConfig) -> Self {
        let result = Arc::new(diff(&left, &right, &config));
        Self {
            left: Arc::new(left),
            right: Arc::new(right),
            config,
            result,
            generation: 0,
            result_generation: 0,
        }
    }

    /// Load one sheet from each workbook and compare them.
    ///
    /// `None` for a sheet name picks that workbook's active sheet.
    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(
        reader: &XlsxReader,
        left_path: P,
        left_sheet: Option<&str>,
        right_path: Q,
        right_sheet: Option<&str>,
        config: DiffConfig,
    ) -> Result<Self> {
        let left = reader
            .load_sheet(left_path, left_sheet)
            .map_err(|e| Error::load("old", e))?;
        let right = reader
            .load_sheet(right_path, right_sheet)
            .map_err(|e| Error::load("new", e))?;
        log::debug!(
            "Loaded '{}' ({} x {}) and '{}' ({} x {})",
            left.name,
            left.row_count(),
            left.col_count(),
            right.name,
            right.row_count(),
            right.col_count()
        );
        Ok(Self::new(left, right, config))
    }

    pub fn left(&self) -> &Arc<SheetSnapshot> {
        &self.left
    }

    pub fn right(&self) -> &Arc<SheetSnapshot> {
        &self.right
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    pub fn result(&self) -> &Arc<DiffResult> {
        &self.result
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while a request newer than the installed result is outstanding
    pub fn is_stale(&self) -> bool {
        self.result_generation != self.generation
    }

    /// Change the configuration and recompute.
    pub fn set_config(&mut self, config: DiffConfig) {
        self.config = config;
        self.rebuild();
    }

    /// Replace the old side and recompute.
    pub fn set_left(&mut self, left: SheetSnapshot) {
        self.left = Arc::new(left);
        self.rebuild();
    }

    /// Replace the new side and recompute.
    pub fn set_right(&mut self, right: SheetSnapshot) {
        self.right = Arc::new(right);
        self.rebuild();
    }

    /// Exchange old and new and recompute.
    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let outcome = self.request().run();
        self.install(outcome);
    }

    /// Start a recompute of the current inputs.
    ///
    /// Any earlier request becomes stale.
    pub fn request(&mut self) -> DiffRequest {
        self.request_with(self.config)
    }

    /// Start a recompute under a new configuration.
    ///
    /// The configuration is adopted immediately; the result follows when the
    /// outcome is installed.
    pub fn request_with(&mut self, config: DiffConfig) -> DiffRequest {
        self.config = config;
        self.generation += 1;
        DiffRequest {
            generation: self.generation,
            left: Arc::clone(&self.left),
            right: Arc::clone(&self.right),
            config,
        }
    }

    /// Adopt an outcome if it belongs to the latest request.
    ///
    /// Returns false, leaving the session untouched, for stale outcomes.
    pub fn install(&mut self, outcome: DiffOutcome) -> bool {
        if outcome.generation != self.generation {
            log::debug!(
                "Discarding diff for generation {} (current {})",
                outcome.generation,
                self.generation
            );
            return false;
        }
        self.result = outcome.result;
        self.result_generation = outcome.generation;
        true
    }
}
