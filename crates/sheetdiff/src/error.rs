//! Error types for sheetdiff

use sheetdiff_xlsx::LoadError;
use thiserror::Error;

/// Result type alias for sheetdiff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from session-level operations.
///
/// Aligning, diffing and formatting never fail; only loading does.
#[derive(Debug, Error)]
pub enum Error {
    /// A side could not be loaded
    #[error("Failed to load {side} sheet: {source}")]
    Load {
        side: &'static str,
        #[source]
        source: LoadError,
    },

    /// Invalid address or range text
    #[error(transparent)]
    Address(#[from] sheetdiff_core::Error),
}

impl Error {
    pub(crate) fn load(side: &'static str, source: LoadError) -> Self {
        Error::Load { side, source }
    }

    /// The loader error, if this is a load failure
    pub fn as_load_error(&self) -> Option<&LoadError> {
        match self {
            Error::Load { source, .. } => Some(source),
            Error::Address(_) => None,
        }
    }
}
