//! End-to-end tests for sheetforge-xlsx.
//!
//! Each test writes a workbook into its own temp folder, then opens the
//! produced package with the `zip` crate and asserts on the raw parts.

mod common;
mod writing;

// Re-export common utilities for submodules
pub use common::*;
