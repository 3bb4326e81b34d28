//! Cell styling types
//!
//! - [`Style`] - Complete cell style with optional attributes
//! - [`Border`] and [`BorderPart`] - Cell borders
//! - [`CellAlignment`] - Alignment keywords
//! - [`Color`] - RGB colors

mod alignment;
mod border;
mod color;

pub use alignment::CellAlignment;
pub use border::{Border, BorderLineStyle, BorderPart, BorderSide, BorderWidth};
pub use color::Color;

use crate::error::Result;

/// Default font size in points, applied when a style sets none
pub const DEFAULT_FONT_SIZE: u8 = 11;

/// Default font color, applied when a style sets none
pub const DEFAULT_FONT_COLOR: Color = Color::BLACK;

/// Default font name, applied when a style sets none
pub const DEFAULT_FONT_NAME: &str = "Calibri";

/// A cell style
///
/// Every attribute is optional; an unset attribute means "inherit" during
/// merging and "use the default" during serialization. Styles compare and
/// hash structurally, which is what the registry keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
    strikethrough: Option<bool>,
    font_size: Option<u8>,
    font_color: Option<Color>,
    font_name: Option<String>,
    /// Combined alignment, applied on both axes
    alignment: Option<CellAlignment>,
    horizontal_alignment: Option<CellAlignment>,
    vertical_alignment: Option<CellAlignment>,
    wrap_text: Option<bool>,
    border: Option<Border>,
    background_color: Option<Color>,
    format: Option<String>,
}

impl Style {
    /// Create a style with nothing set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set underline
    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    /// Set strikethrough
    pub fn strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = Some(strikethrough);
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: u8) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set the combined alignment (both axes)
    pub fn alignment(mut self, alignment: CellAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, alignment: CellAlignment) -> Self {
        self.horizontal_alignment = Some(alignment);
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, alignment: CellAlignment) -> Self {
        self.vertical_alignment = Some(alignment);
        self
    }

    /// Enable or disable text wrapping
    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.wrap_text = Some(wrap);
        self
    }

    /// Set the cell border
    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    /// Set the background color (solid fill)
    pub fn background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Set the background color from a hex string
    pub fn background_color_hex(mut self, hex: &str) -> Result<Self> {
        self.background_color = Some(Color::from_hex(hex)?);
        Ok(self)
    }

    /// Set the number format string (e.g. "0.00", "#,##0")
    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    // Raw accessors

    pub fn bold_opt(&self) -> Option<bool> {
        self.bold
    }

    pub fn italic_opt(&self) -> Option<bool> {
        self.italic
    }

    pub fn underline_opt(&self) -> Option<bool> {
        self.underline
    }

    pub fn strikethrough_opt(&self) -> Option<bool> {
        self.strikethrough
    }

    pub fn font_size_opt(&self) -> Option<u8> {
        self.font_size
    }

    pub fn font_color_opt(&self) -> Option<Color> {
        self.font_color
    }

    pub fn font_name_opt(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    pub fn alignment_opt(&self) -> Option<CellAlignment> {
        self.alignment
    }

    pub fn horizontal_alignment_opt(&self) -> Option<CellAlignment> {
        self.horizontal_alignment
    }

    pub fn vertical_alignment_opt(&self) -> Option<CellAlignment> {
        self.vertical_alignment
    }

    pub fn wrap_text_opt(&self) -> Option<bool> {
        self.wrap_text
    }

    pub fn border_opt(&self) -> Option<&Border> {
        self.border.as_ref()
    }

    pub fn background_color_opt(&self) -> Option<Color> {
        self.background_color
    }

    pub fn format_opt(&self) -> Option<&str> {
        self.format.as_deref()
    }

    // Effective values with defaults applied

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    pub fn is_strikethrough(&self) -> bool {
        self.strikethrough.unwrap_or(false)
    }

    pub fn effective_font_size(&self) -> u8 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn effective_font_color(&self) -> Color {
        self.font_color.unwrap_or(DEFAULT_FONT_COLOR)
    }

    pub fn effective_font_name(&self) -> &str {
        self.font_name.as_deref().unwrap_or(DEFAULT_FONT_NAME)
    }

    pub fn should_wrap_text(&self) -> bool {
        self.wrap_text.unwrap_or(false)
    }

    /// Whether any alignment attribute is set
    pub fn should_apply_alignment(&self) -> bool {
        self.alignment.is_some()
            || self.horizontal_alignment.is_some()
            || self.vertical_alignment.is_some()
    }

    /// Whether nothing has been set on this style
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}
