//! XLSX error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while writing an XLSX package
#[derive(Debug, Error)]
pub enum XlsxError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file format
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// The writer is in the wrong state for the requested operation
    #[error("Writer state error: {0}")]
    WriterState(String),

    /// A filesystem operation resolved outside the scratch folder
    #[error("Path escapes the scratch folder: {0}")]
    PathEscape(PathBuf),

    /// Core error
    #[error("Core error: {0}")]
    Core(#[from] sheetforge_core::Error),
}

impl XlsxError {
    /// Shorthand for the "operation not allowed once the writer is open" error.
    pub(crate) fn already_opened(operation: &str) -> Self {
        XlsxError::WriterState(format!(
            "writer is already opened, cannot {operation}"
        ))
    }
}
