//! Error types for sheetforge-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheetforge-core
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument passed to an operation
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sheet name rejected by validation; the message lists every failed rule
    #[error("Invalid sheet name '{name}': {reasons}")]
    InvalidSheetName {
        name: String,
        /// All violated rules, joined with " - "
        reasons: String,
    },

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid column letters
    #[error("Invalid column reference: {0}")]
    InvalidColumn(String),

    /// Invalid color specification
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Invalid style attribute value
    #[error("Invalid style attribute: {0}")]
    InvalidStyleAttribute(String),
}
