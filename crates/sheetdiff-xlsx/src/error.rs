//! Loader error types

use thiserror::Error;

/// Result type for loading operations
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Why a sheet could not be loaded.
///
/// A failed load never yields a partial snapshot.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The workbook has no sheet with this name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The container or one of its parts cannot be parsed
    #[error("Corrupt workbook: {0}")]
    Corrupt(String),

    /// Legacy binary workbook with no conversion available
    #[error("Unsupported workbook format: {0}")]
    Unsupported(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    pub(crate) fn corrupt<S: Into<String>>(msg: S) -> Self {
        LoadError::Corrupt(msg.into())
    }
}

impl From<zip::result::ZipError> for LoadError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => LoadError::Io(io),
            other => LoadError::Corrupt(format!("ZIP error: {}", other)),
        }
    }
}

impl From<quick_xml::Error> for LoadError {
    fn from(err: quick_xml::Error) -> Self {
        LoadError::Corrupt(format!("XML error: {}", err))
    }
}

impl From<sheetdiff_core::Error> for LoadError {
    fn from(err: sheetdiff_core::Error) -> Self {
        LoadError::Corrupt(err.to_string())
    }
}
