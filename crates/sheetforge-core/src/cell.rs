//! Cell values and styled cells

use crate::style::Style;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

/// A typed cell value
///
/// Conversions from common Rust types are provided via `From`; an empty
/// string and `Option::None` both convert to [`CellValue::Empty`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,

    /// Boolean value
    Bool(bool),

    /// Numeric value
    Number(f64),

    /// Date/time value
    Date(NaiveDateTime),

    /// Elapsed-time value
    Duration(Duration),

    /// Text value
    Text(String),

    /// A value that could not be represented; carries the raw text
    Error(String),
}

impl CellValue {
    /// Whether this is the [`Empty`](CellValue::Empty) variant
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether this is the [`Error`](CellValue::Error) variant
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Number(v as f64)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        if v.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(v.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        if v.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(v)
        }
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::Date(v)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(v: NaiveDate) -> Self {
        CellValue::Date(v.and_hms_opt(0, 0, 0).unwrap_or_default())
    }
}

impl From<Duration> for CellValue {
    fn from(v: Duration) -> Self {
        CellValue::Duration(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => CellValue::Empty,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Date(v) => write!(f, "{}", v),
            CellValue::Duration(v) => write!(f, "{}", v),
            CellValue::Text(v) => write!(f, "{}", v),
            CellValue::Error(v) => write!(f, "{}", v),
        }
    }
}

/// A cell: a value plus its formatting
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    value: CellValue,
    style: Style,
}

impl Cell {
    /// Create a cell from any value convertible to [`CellValue`]
    pub fn new<V: Into<CellValue>>(value: V) -> Self {
        Self {
            value: value.into(),
            style: Style::default(),
        }
    }

    /// Create a cell with an explicit style
    pub fn with_style<V: Into<CellValue>>(value: V, style: Style) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// The cell's value, or `None` for error cells
    pub fn value(&self) -> Option<&CellValue> {
        match &self.value {
            CellValue::Error(_) => None,
            v => Some(v),
        }
    }

    /// The cell's value, including the raw text of error cells
    pub fn raw_value(&self) -> &CellValue {
        &self.value
    }

    /// The cell's style
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Replace the cell's style
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// Whether the cell holds no value
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<V: Into<CellValue>> From<V> for Cell {
    fn from(value: V) -> Self {
        Cell::new(value)
    }
}
