//! # sheetforge-core
//!
//! Core data structures for the sheetforge streaming spreadsheet writer.
//!
//! This crate provides the value types shared by the format writers:
//! - [`CellValue`] and [`Cell`] - Typed cell values and styled cells
//! - [`Row`] - A sparse collection of cells with an optional row style
//! - [`Style`] - Cell formatting (fonts, fills, borders, alignment, formats)
//! - [`Sheet`] - A logical worksheet (name, visibility, merges, columns)
//!
//! ## Example
//!
//! ```rust
//! use sheetforge_core::{Cell, Row, Style};
//!
//! let header = Style::new().bold(true).background_color_hex("EEEEEE").unwrap();
//! let row = Row::from_values(["Name", "Amount"]).with_style(header);
//! assert_eq!(row.num_cells(), 2);
//! ```

pub mod cell;
pub mod column;
pub mod error;
pub mod row;
pub mod sheet;
pub mod style;

// Re-exports for convenience
pub use cell::{Cell, CellValue};
pub use column::{column_index_from_letters, column_letters};
pub use error::{Error, Result};
pub use row::Row;
pub use sheet::{Sheet, SheetNameRegistry, SheetVisibility};
pub use style::{
    Border, BorderLineStyle, BorderPart, BorderSide, BorderWidth, CellAlignment, Color, Style,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Maximum number of characters a single cell can hold (Excel limit)
pub const MAX_CHARACTERS_PER_CELL: usize = 32_767;
