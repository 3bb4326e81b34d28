//! Cell alignment values

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Cell alignment keywords accepted by the style model
///
/// The same set is valid horizontally and vertically; a combined alignment
/// applies the keyword on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellAlignment {
    Left,
    Right,
    Center,
    Justify,
    Top,
    Bottom,
}

impl CellAlignment {
    /// The keyword as it appears in worksheet XML
    pub fn as_str(self) -> &'static str {
        match self {
            CellAlignment::Left => "left",
            CellAlignment::Right => "right",
            CellAlignment::Center => "center",
            CellAlignment::Justify => "justify",
            CellAlignment::Top => "top",
            CellAlignment::Bottom => "bottom",
        }
    }
}

impl FromStr for CellAlignment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "left" => Ok(CellAlignment::Left),
            "right" => Ok(CellAlignment::Right),
            "center" => Ok(CellAlignment::Center),
            "justify" => Ok(CellAlignment::Justify),
            "top" => Ok(CellAlignment::Top),
            "bottom" => Ok(CellAlignment::Bottom),
            _ => Err(Error::InvalidStyleAttribute(format!(
                "invalid cell alignment value '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for CellAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
