//! styles.xml generation.
//!
//! The part is regenerated from the registry every time it is written.
//! A resumed session bootstraps its registry from the previous pass's
//! part first, so regeneration reproduces the same section indices and
//! cell `s` references stay valid.

use std::io::Write;

use sheetforge_core::style::{BorderSide, Color, Style};

use crate::error::XlsxResult;
use crate::escape::escape_attr;
use crate::styles::registry::{StyleRegistry, FIRST_CUSTOM_FORMAT_ID};

const STYLES_XML_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FontFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
}

struct EmittedFont {
    size: u8,
    color: Color,
    name: String,
    flag: Option<FontFlag>,
}

fn style_has_flag(style: &Style, flag: FontFlag) -> bool {
    match flag {
        FontFlag::Bold => style.is_bold(),
        FontFlag::Italic => style.is_italic(),
        FontFlag::Underline => style.is_underline(),
        FontFlag::Strikethrough => style.is_strikethrough(),
    }
}

fn first_flag(style: &Style) -> Option<FontFlag> {
    [
        FontFlag::Bold,
        FontFlag::Italic,
        FontFlag::Underline,
        FontFlag::Strikethrough,
    ]
    .into_iter()
    .find(|&flag| style_has_flag(style, flag))
}

/// Deduplicates fonts across styles and assigns each style a font id.
///
/// A font carries at most one decoration flag. A style reuses the first
/// font whose base attributes match and whose flag is one of the style's
/// own, or the flagless font when the style has no decorations.
fn assign_fonts(styles: &[Style]) -> (Vec<EmittedFont>, Vec<u32>) {
    let mut fonts: Vec<EmittedFont> = Vec::new();
    let mut font_ids = Vec::with_capacity(styles.len());

    for style in styles {
        let size = style.effective_font_size();
        let color = style.effective_font_color();
        let name = style.effective_font_name();
        let style_flag = first_flag(style);

        let existing = fonts.iter().position(|font| {
            font.size == size
                && font.color == color
                && font.name == name
                && match font.flag {
                    None => style_flag.is_none(),
                    Some(flag) => style_has_flag(style, flag),
                }
        });

        let font_id = match existing {
            Some(idx) => idx as u32,
            None => {
                fonts.push(EmittedFont {
                    size,
                    color,
                    name: name.to_string(),
                    flag: style_flag,
                });
                (fonts.len() - 1) as u32
            }
        };
        font_ids.push(font_id);
    }

    (fonts, font_ids)
}

/// Writes the complete styles part for the registry's current state.
pub fn write_styles_xml<W: Write>(writer: &mut W, registry: &StyleRegistry) -> XlsxResult<()> {
    let styles = registry.styles();
    let (fonts, font_ids) = assign_fonts(styles);

    let mut xml = String::with_capacity(2048);
    xml.push_str(STYLES_XML_HEADER);

    write_num_fmts(&mut xml, registry);
    write_fonts(&mut xml, &fonts);
    write_fills(&mut xml, registry);
    write_borders(&mut xml, registry);

    xml.push_str(
        r#"<cellStyleXfs count="1"><xf borderId="0" fillId="0" fontId="0" numFmtId="0"/></cellStyleXfs>"#,
    );

    write_cell_xfs(&mut xml, registry, &font_ids);

    xml.push_str(
        r#"<cellStyles count="1"><cellStyle builtinId="0" name="normal" xfId="0"/></cellStyles>"#,
    );
    xml.push_str("</styleSheet>");

    writer.write_all(xml.as_bytes())?;
    Ok(())
}

fn write_num_fmts(xml: &mut String, registry: &StyleRegistry) {
    // Builtin formats are referenced by reserved id and never declared.
    let custom: Vec<(u32, &str)> = registry
        .format_introducers()
        .iter()
        .filter_map(|&style_id| {
            let format_id = registry.format_id_for(style_id);
            if format_id < FIRST_CUSTOM_FORMAT_ID {
                return None;
            }
            registry
                .style(style_id)
                .and_then(|s| s.format_opt())
                .map(|code| (format_id, code))
        })
        .collect();

    xml.push_str(&format!(r#"<numFmts count="{}">"#, custom.len()));
    for (format_id, code) in custom {
        xml.push_str(&format!(
            r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
            format_id,
            escape_attr(code)
        ));
    }
    xml.push_str("</numFmts>");
}

fn write_fonts(xml: &mut String, fonts: &[EmittedFont]) {
    xml.push_str(&format!(r#"<fonts count="{}">"#, fonts.len()));
    for font in fonts {
        xml.push_str(&format!(
            r#"<font><sz val="{}"/><color rgb="{}"/><name val="{}"/>"#,
            font.size,
            font.color.to_argb(),
            escape_attr(&font.name)
        ));
        match font.flag {
            Some(FontFlag::Bold) => xml.push_str("<b/>"),
            Some(FontFlag::Italic) => xml.push_str("<i/>"),
            Some(FontFlag::Underline) => xml.push_str("<u/>"),
            Some(FontFlag::Strikethrough) => xml.push_str("<strike/>"),
            None => {}
        }
        xml.push_str("</font>");
    }
    xml.push_str("</fonts>");
}

fn write_fills(xml: &mut String, registry: &StyleRegistry) {
    let introducers = registry.fill_introducers();
    xml.push_str(&format!(r#"<fills count="{}">"#, introducers.len() + 2));
    xml.push_str(r#"<fill><patternFill patternType="none"/></fill>"#);
    xml.push_str(r#"<fill><patternFill patternType="gray125"/></fill>"#);
    for &style_id in introducers {
        if let Some(color) = registry
            .style(style_id)
            .and_then(|s| s.background_color_opt())
        {
            xml.push_str(&format!(
                r#"<fill><patternFill patternType="solid"><fgColor rgb="{}"/></patternFill></fill>"#,
                color.to_argb()
            ));
        }
    }
    xml.push_str("</fills>");
}

fn write_borders(xml: &mut String, registry: &StyleRegistry) {
    let introducers = registry.border_introducers();
    xml.push_str(&format!(r#"<borders count="{}">"#, introducers.len() + 1));
    xml.push_str("<border><left/><right/><top/><bottom/></border>");
    for &style_id in introducers {
        let Some(border) = registry.style(style_id).and_then(|s| s.border_opt()) else {
            continue;
        };
        xml.push_str("<border>");
        for side in [
            BorderSide::Left,
            BorderSide::Right,
            BorderSide::Top,
            BorderSide::Bottom,
        ] {
            if let Some(part) = border.part(side) {
                xml.push_str(&format!(
                    r#"<{name} style="{style}"><color rgb="{color}"/></{name}>"#,
                    name = side.as_str(),
                    style = part.xlsx_style_name(),
                    color = part.color.to_argb()
                ));
            }
        }
        xml.push_str("</border>");
    }
    xml.push_str("</borders>");
}

fn write_cell_xfs(xml: &mut String, registry: &StyleRegistry, font_ids: &[u32]) {
    let styles = registry.styles();
    xml.push_str(&format!(r#"<cellXfs count="{}">"#, styles.len()));

    for (style_id, style) in styles.iter().enumerate() {
        let style_id = style_id as u32;
        let apply_border = if style.border_opt().is_some() { 1 } else { 0 };
        xml.push_str(&format!(
            r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0" applyFont="1" applyBorder="{}""#,
            registry.format_id_for(style_id),
            font_ids[style_id as usize],
            registry.fill_id_for(style_id),
            registry.border_id_for(style_id),
            apply_border
        ));

        if style.should_apply_alignment() || style.should_wrap_text() {
            xml.push_str(r#" applyAlignment="1"><alignment"#);
            if let Some(alignment) = style.alignment_opt() {
                xml.push_str(&format!(
                    r#" horizontal="{align}" vertical="{align}""#,
                    align = alignment.as_str()
                ));
            } else {
                if let Some(vertical) = style.vertical_alignment_opt() {
                    xml.push_str(&format!(r#" vertical="{}""#, vertical.as_str()));
                }
                if let Some(horizontal) = style.horizontal_alignment_opt() {
                    xml.push_str(&format!(r#" horizontal="{}""#, horizontal.as_str()));
                }
            }
            if style.should_wrap_text() {
                xml.push_str(r#" wrapText="1""#);
            }
            xml.push_str("/></xf>");
        } else {
            xml.push_str("/>");
        }
    }

    xml.push_str("</cellXfs>");
}
