//! Writer configuration.

use std::path::PathBuf;

use sheetforge_core::Style;

use crate::styles::default_row_style;

/// Settings for a resumable write session split across multiple runs.
///
/// A session of `max` passes writes rows incrementally; the package is only
/// assembled on the final pass. `counter` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Total number of passes in the session.
    pub max: u32,
    /// Which pass this run is (1-based).
    pub counter: u32,
}

impl LoopSettings {
    /// True when this run should pick up scratch state from a previous pass.
    pub fn is_continuation(&self) -> bool {
        self.counter != 1 && self.counter <= self.max
    }

    /// True when this run is the last pass and must produce the package.
    pub fn is_final_pass(&self) -> bool {
        self.counter >= self.max
    }
}

/// Options controlling how the writer behaves.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Base folder in which the scratch folder is created.
    pub temp_folder: PathBuf,
    /// Fixed scratch folder name; a unique one is generated when `None`.
    pub temp_folder_name: Option<String>,
    /// Style merged under every written row's own style.
    pub default_row_style: Style,
    /// Start a new sheet automatically when the row ceiling is reached.
    pub auto_new_sheets: bool,
    /// Write strings inline instead of through the shared strings table.
    pub inline_strings: bool,
    /// Multi-pass session settings, if any.
    pub loop_settings: Option<LoopSettings>,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            temp_folder: std::env::temp_dir(),
            temp_folder_name: None,
            default_row_style: default_row_style(),
            auto_new_sheets: true,
            inline_strings: true,
            loop_settings: None,
        }
    }
}

impl WriterOptions {
    /// True when this run resumes scratch state written by a previous pass.
    pub fn is_continuation(&self) -> bool {
        self.loop_settings
            .map(|l| l.is_continuation())
            .unwrap_or(false)
    }

    /// True when this run must assemble the final package on close.
    pub fn is_final_pass(&self) -> bool {
        self.loop_settings
            .map(|l| l.is_final_pass())
            .unwrap_or(true)
    }
}
