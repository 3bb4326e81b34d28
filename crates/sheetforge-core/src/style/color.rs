//! Color representation

use crate::error::{Error, Result};
use std::fmt;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parse a hex color string ("FF0000" or "#FF0000"); an 8-digit ARGB
    /// string is accepted and its alpha discarded
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim_start_matches('#');
        let rgb = match digits.len() {
            6 => digits,
            8 => &digits[2..],
            _ => return Err(Error::InvalidColor(hex.to_string())),
        };
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&rgb[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };
        Ok(Color {
            r: component(0..2)?,
            g: component(2..4)?,
            b: component(4..6)?,
        })
    }

    /// Six-digit uppercase hex representation ("RRGGBB")
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Eight-digit ARGB representation with full opacity ("FFRRGGBB")
    pub fn to_argb(self) -> String {
        format!("FF{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    // Standard colors - based on Office Online
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Color = Color::rgb(0xFF, 0x00, 0x00);
    pub const DARK_RED: Color = Color::rgb(0xC0, 0x00, 0x00);
    pub const ORANGE: Color = Color::rgb(0xFF, 0xC0, 0x00);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0x00);
    pub const LIGHT_GREEN: Color = Color::rgb(0x92, 0xD0, 0x40);
    pub const GREEN: Color = Color::rgb(0x00, 0xB0, 0x50);
    pub const LIGHT_BLUE: Color = Color::rgb(0x00, 0xB0, 0xE0);
    pub const BLUE: Color = Color::rgb(0x00, 0x70, 0xC0);
    pub const DARK_BLUE: Color = Color::rgb(0x00, 0x20, 0x60);
    pub const PURPLE: Color = Color::rgb(0x70, 0x30, 0xA0);
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}
