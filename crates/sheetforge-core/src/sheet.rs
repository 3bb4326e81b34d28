//! Logical worksheets and sheet name validation

use crate::error::{Error, Result};
use crate::MAX_SHEET_NAME_LEN;
use std::collections::BTreeMap;

/// Prefix used for automatically generated sheet names ("Sheet1", "Sheet2", ...)
pub const DEFAULT_SHEET_NAME_PREFIX: &str = "Sheet";

const INVALID_SHEET_NAME_CHARS: [char; 7] = ['\\', '/', '?', '*', ':', '[', ']'];

/// Sheet visibility state as written to workbook.xml
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetVisibility {
    #[default]
    Visible,
    Hidden,
}

impl SheetVisibility {
    pub fn as_str(self) -> &'static str {
        match self {
            SheetVisibility::Visible => "visible",
            SheetVisibility::Hidden => "hidden",
        }
    }
}

/// A logical worksheet: identity and presentation settings
///
/// Row content never lives here; it streams through the format writer.
#[derive(Debug, Clone)]
pub struct Sheet {
    index: usize,
    name: String,
    visibility: SheetVisibility,
    merge_ranges: Vec<String>,
    auto_size_columns: Vec<String>,
    columns_width: BTreeMap<String, f64>,
}

impl Sheet {
    /// Create a sheet with the default name for its position
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: format!("{}{}", DEFAULT_SHEET_NAME_PREFIX, index + 1),
            visibility: SheetVisibility::Visible,
            merge_ranges: Vec::new(),
            auto_size_columns: Vec::new(),
            columns_width: BTreeMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the sheet; the caller is responsible for having validated
    /// the name against the workbook's [`SheetNameRegistry`]
    pub fn set_name_unchecked(&mut self, name: String) {
        self.name = name;
    }

    pub fn visibility(&self) -> SheetVisibility {
        self.visibility
    }

    pub fn set_visibility(&mut self, visibility: SheetVisibility) {
        self.visibility = visibility;
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == SheetVisibility::Visible
    }

    /// Declared merge ranges, in A1 notation (e.g. "A1:C1")
    pub fn merge_ranges(&self) -> &[String] {
        &self.merge_ranges
    }

    pub fn add_merge_range<S: Into<String>>(&mut self, range: S) {
        self.merge_ranges.push(range.into());
    }

    /// Replaces the merge range list wholesale, e.g. after the written
    /// worksheet part has resolved ranges to absolute row numbers
    pub fn set_merge_ranges(&mut self, ranges: Vec<String>) {
        self.merge_ranges = ranges;
    }

    /// Columns marked for automatic width, by letters
    pub fn auto_size_columns(&self) -> &[String] {
        &self.auto_size_columns
    }

    pub fn add_auto_size_column<S: Into<String>>(&mut self, column: S) {
        let column = column.into();
        if !self.auto_size_columns.contains(&column) {
            self.auto_size_columns.push(column);
        }
    }

    /// Explicit column widths by letters; auto-sized columns win over
    /// explicit widths, so setting one on an auto-sized column is a no-op
    pub fn columns_width(&self) -> &BTreeMap<String, f64> {
        &self.columns_width
    }

    pub fn set_column_width<S: Into<String>>(&mut self, column: S, width: f64) {
        let column = column.into();
        if !self.auto_size_columns.contains(&column) {
            self.columns_width.insert(column, width);
        }
    }
}

/// Tracks the sheet names claimed within one workbook
///
/// Owned by the workbook that created it, so two concurrently open
/// workbooks never see each other's names.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    names: BTreeMap<usize, String>,
}

impl SheetNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a candidate name for the sheet at `sheet_index` and claim
    /// it on success
    ///
    /// All violated rules are reported in a single error. A duplicate name
    /// short-circuits the remaining checks, matching the rule that a name
    /// already in use cannot be re-judged on its own merits.
    pub fn validate_and_claim(&mut self, sheet_index: usize, name: &str) -> Result<()> {
        let mut failed: Vec<&str> = Vec::new();
        let name_length = name.chars().count();

        if !self.is_unique(sheet_index, name) {
            failed.push("It should be unique");
        } else if name_length == 0 {
            failed.push("It should not be blank");
        } else {
            if name_length > MAX_SHEET_NAME_LEN {
                failed.push("It should not exceed 31 characters");
            }
            if name.contains(INVALID_SHEET_NAME_CHARS) {
                failed.push("It should not contain these characters: \\ / ? * : [ or ]");
            }
            if name.starts_with('\'') || name.ends_with('\'') {
                failed.push("It should not start or end with a single quote");
            }
        }

        if !failed.is_empty() {
            return Err(Error::InvalidSheetName {
                name: name.to_string(),
                reasons: failed.join(" - "),
            });
        }

        self.names.insert(sheet_index, name.to_string());
        Ok(())
    }

    fn is_unique(&self, sheet_index: usize, name: &str) -> bool {
        !self
            .names
            .iter()
            .any(|(&index, used)| index != sheet_index && used == name)
    }
}
