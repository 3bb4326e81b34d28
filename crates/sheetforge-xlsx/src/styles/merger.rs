//! Merging a cell or row style over a base style.

use sheetforge_core::style::{
    Style, DEFAULT_FONT_COLOR, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE,
};

/// Merges `style` over `base`, producing the style actually registered.
///
/// Decoration flags and cell properties fill in from the base only where
/// `style` leaves them unset. Font size, color and name behave differently:
/// a base that departs from the factory default takes precedence even over
/// an explicit value in `style`, so a row or default style's font carries
/// through the whole row.
pub fn merge_styles(style: &Style, base: &Style) -> Style {
    let mut merged = style.clone();

    // Decoration flags
    if style.bold_opt().is_none() && base.is_bold() {
        merged = merged.bold(true);
    }
    if style.italic_opt().is_none() && base.is_italic() {
        merged = merged.italic(true);
    }
    if style.underline_opt().is_none() && base.is_underline() {
        merged = merged.underline(true);
    }
    if style.strikethrough_opt().is_none() && base.is_strikethrough() {
        merged = merged.strikethrough(true);
    }

    // Font attributes, base-wins when non-default
    if base.effective_font_size() != DEFAULT_FONT_SIZE {
        merged = merged.font_size(base.effective_font_size());
    }
    if base.effective_font_color() != DEFAULT_FONT_COLOR {
        merged = merged.font_color(base.effective_font_color());
    }
    if base.effective_font_name() != DEFAULT_FONT_NAME {
        merged = merged.font_name(base.effective_font_name());
    }

    // Cell properties
    if style.wrap_text_opt().is_none() && base.should_wrap_text() {
        merged = merged.wrap_text(true);
    }
    if style.alignment_opt().is_none() && base.should_apply_alignment() {
        if let Some(alignment) = base.alignment_opt() {
            merged = merged.alignment(alignment);
        }
    }
    if style.border_opt().is_none() {
        if let Some(border) = base.border_opt() {
            merged = merged.border(border.clone());
        }
    }
    if style.format_opt().is_none() {
        if let Some(format) = base.format_opt() {
            merged = merged.format(format);
        }
    }
    if style.background_color_opt().is_none() {
        if let Some(color) = base.background_color_opt() {
            merged = merged.background_color(color);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sheetforge_core::style::{Border, CellAlignment, Color};

    use super::*;

    #[test]
    fn unset_flags_inherit_from_base() {
        let merged = merge_styles(&Style::new(), &Style::new().bold(true).italic(true));
        assert!(merged.is_bold());
        assert!(merged.is_italic());
    }

    #[test]
    fn explicit_flag_beats_base() {
        let merged = merge_styles(&Style::new().bold(false), &Style::new().bold(true));
        assert!(!merged.is_bold());
    }

    #[test]
    fn base_flag_false_does_not_propagate() {
        let merged = merge_styles(&Style::new(), &Style::new().bold(false));
        assert_eq!(merged.bold_opt(), None);
    }

    #[test]
    fn non_default_base_font_overrides_explicit_value() {
        let style = Style::new().font_size(20).font_name("Verdana");
        let base = Style::new().font_size(14).font_color(Color::RED);
        let merged = merge_styles(&style, &base);

        assert_eq!(merged.effective_font_size(), 14);
        assert_eq!(merged.effective_font_color(), Color::RED);
        // The base's font name is the default, so the style's own survives.
        assert_eq!(merged.effective_font_name(), "Verdana");
    }

    #[test]
    fn default_base_font_leaves_style_untouched() {
        let style = Style::new().font_size(20);
        let merged = merge_styles(&style, &Style::new().font_size(11));
        assert_eq!(merged.effective_font_size(), 20);
    }

    #[test]
    fn cell_properties_fill_in_when_unset() {
        let base = Style::new()
            .wrap_text(true)
            .alignment(CellAlignment::Center)
            .border(Border::new().top())
            .format("0.00")
            .background_color(Color::YELLOW);
        let merged = merge_styles(&Style::new(), &base);

        assert!(merged.should_wrap_text());
        assert_eq!(merged.alignment_opt(), Some(CellAlignment::Center));
        assert!(merged.border_opt().is_some());
        assert_eq!(merged.format_opt(), Some("0.00"));
        assert_eq!(merged.background_color_opt(), Some(Color::YELLOW));
    }

    #[test]
    fn explicit_cell_properties_survive() {
        let style = Style::new()
            .format("@")
            .background_color(Color::GREEN)
            .alignment(CellAlignment::Right);
        let base = Style::new()
            .format("0.00")
            .background_color(Color::YELLOW)
            .alignment(CellAlignment::Center);
        let merged = merge_styles(&style, &base);

        assert_eq!(merged.format_opt(), Some("@"));
        assert_eq!(merged.background_color_opt(), Some(Color::GREEN));
        assert_eq!(merged.alignment_opt(), Some(CellAlignment::Right));
    }
}
