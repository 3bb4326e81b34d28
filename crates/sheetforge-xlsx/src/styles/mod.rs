//! Style registration, merging and styles.xml generation.

mod merger;
mod registry;
mod xml;

pub use merger::merge_styles;
pub use registry::StyleRegistry;
pub use xml::write_styles_xml;

use sheetforge_core::style::{Style, DEFAULT_FONT_COLOR, DEFAULT_FONT_NAME, DEFAULT_FONT_SIZE};

/// The style applied under every row when no other default is configured.
///
/// Font attributes are set explicitly so the style registers identically
/// whether it was built fresh or reconstructed from an existing styles part.
pub fn default_row_style() -> Style {
    Style::new()
        .font_size(DEFAULT_FONT_SIZE)
        .font_color(DEFAULT_FONT_COLOR)
        .font_name(DEFAULT_FONT_NAME)
}
