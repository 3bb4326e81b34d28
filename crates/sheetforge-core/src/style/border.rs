//! Cell borders

use super::Color;
use std::fmt;

/// The four sides a border part can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    /// The element name used in styles.xml
    pub fn as_str(self) -> &'static str {
        match self {
            BorderSide::Left => "left",
            BorderSide::Right => "right",
            BorderSide::Top => "top",
            BorderSide::Bottom => "bottom",
        }
    }
}

impl fmt::Display for BorderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line width of a border part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderWidth {
    Thin,
    #[default]
    Medium,
    Thick,
}

/// Line style of a border part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// One side of a cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderPart {
    pub side: BorderSide,
    pub color: Color,
    pub width: BorderWidth,
    pub line_style: BorderLineStyle,
}

impl BorderPart {
    /// A solid medium black part, the same defaults a bare side carries
    pub fn new(side: BorderSide) -> Self {
        Self {
            side,
            color: Color::BLACK,
            width: BorderWidth::Medium,
            line_style: BorderLineStyle::Solid,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_width(mut self, width: BorderWidth) -> Self {
        self.width = width;
        self
    }

    pub fn with_line_style(mut self, line_style: BorderLineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// The XLSX border style keyword for this part's (style, width) pair
    ///
    /// Dotted and double lines collapse to one keyword regardless of
    /// width; dashed medium and thick both map to mediumDashed.
    pub fn xlsx_style_name(&self) -> &'static str {
        match (self.line_style, self.width) {
            (BorderLineStyle::Solid, BorderWidth::Thin) => "thin",
            (BorderLineStyle::Solid, BorderWidth::Medium) => "medium",
            (BorderLineStyle::Solid, BorderWidth::Thick) => "thick",
            (BorderLineStyle::Dotted, _) => "dotted",
            (BorderLineStyle::Dashed, BorderWidth::Thin) => "dashed",
            (BorderLineStyle::Dashed, _) => "mediumDashed",
            (BorderLineStyle::Double, _) => "double",
            (BorderLineStyle::None, _) => "none",
        }
    }

    /// Inverse of [`xlsx_style_name`](Self::xlsx_style_name); ambiguous
    /// keywords resolve to the first (style, width) pair that produces them
    pub fn style_and_width_from_xlsx_name(
        name: &str,
    ) -> Option<(BorderLineStyle, BorderWidth)> {
        match name {
            "thin" => Some((BorderLineStyle::Solid, BorderWidth::Thin)),
            "medium" => Some((BorderLineStyle::Solid, BorderWidth::Medium)),
            "thick" => Some((BorderLineStyle::Solid, BorderWidth::Thick)),
            "dotted" => Some((BorderLineStyle::Dotted, BorderWidth::Thin)),
            "dashed" => Some((BorderLineStyle::Dashed, BorderWidth::Thin)),
            "mediumDashed" => Some((BorderLineStyle::Dashed, BorderWidth::Medium)),
            "double" => Some((BorderLineStyle::Double, BorderWidth::Thin)),
            "none" => Some((BorderLineStyle::None, BorderWidth::Thin)),
            _ => None,
        }
    }
}

/// A cell border: up to one part per side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Border {
    left: Option<BorderPart>,
    right: Option<BorderPart>,
    top: Option<BorderPart>,
    bottom: Option<BorderPart>,
}

impl Border {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or replace the part for the side it names
    pub fn set_part(&mut self, part: BorderPart) {
        match part.side {
            BorderSide::Left => self.left = Some(part),
            BorderSide::Right => self.right = Some(part),
            BorderSide::Top => self.top = Some(part),
            BorderSide::Bottom => self.bottom = Some(part),
        }
    }

    /// Builder form of [`set_part`](Self::set_part)
    pub fn with_part(mut self, part: BorderPart) -> Self {
        self.set_part(part);
        self
    }

    pub fn left(mut self) -> Self {
        self.set_part(BorderPart::new(BorderSide::Left));
        self
    }

    pub fn right(mut self) -> Self {
        self.set_part(BorderPart::new(BorderSide::Right));
        self
    }

    pub fn top(mut self) -> Self {
        self.set_part(BorderPart::new(BorderSide::Top));
        self
    }

    pub fn bottom(mut self) -> Self {
        self.set_part(BorderPart::new(BorderSide::Bottom));
        self
    }

    pub fn part(&self, side: BorderSide) -> Option<&BorderPart> {
        match side {
            BorderSide::Left => self.left.as_ref(),
            BorderSide::Right => self.right.as_ref(),
            BorderSide::Top => self.top.as_ref(),
            BorderSide::Bottom => self.bottom.as_ref(),
        }
    }

    pub fn has_part(&self, side: BorderSide) -> bool {
        self.part(side).is_some()
    }

    /// Iterate over the set parts in left, right, top, bottom order
    pub fn parts(&self) -> impl Iterator<Item = &BorderPart> {
        [&self.left, &self.right, &self.top, &self.bottom]
            .into_iter()
            .filter_map(|p| p.as_ref())
    }

    pub fn num_parts(&self) -> usize {
        self.parts().count()
    }
}
