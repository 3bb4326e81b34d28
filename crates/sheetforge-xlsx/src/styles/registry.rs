//! Registry deduplicating every style used by the workbook.
//!
//! Style ids are assigned by insertion order and double as cellXfs row
//! indices, which is what `s="..."` cell attributes reference. The default
//! style is registered first so it always holds id 0. Fill, border and
//! number format declarations are tracked in secondary tables so identical
//! declarations are shared between styles.

use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use sheetforge_core::style::{
    Border, BorderPart, BorderSide, CellAlignment, Color, Style,
};

use crate::error::{XlsxError, XlsxResult};

/// Custom number formats are declared starting at this id; lower ids are
/// reserved for the builtin formats.
pub const FIRST_CUSTOM_FORMAT_ID: u32 = 164;

/// Builtin number formats, keyed by format code.
///
/// See ECMA-376 part 1, 18.8.30. Builtin formats are referenced by id and
/// never declared in the numFmts section.
const BUILTIN_FORMATS: &[(&str, u32)] = &[
    ("General", 0),
    ("0", 1),
    ("0.00", 2),
    ("#,##0", 3),
    ("#,##0.00", 4),
    ("$#,##0,\\-$#,##0", 5),
    ("$#,##0,[Red]\\-$#,##0", 6),
    ("$#,##0.00,\\-$#,##0.00", 7),
    ("$#,##0.00,[Red]\\-$#,##0.00", 8),
    ("0%", 9),
    ("0.00%", 10),
    ("0.00E+00", 11),
    ("# ?/?", 12),
    ("# ??/??", 13),
    ("mm-dd-yy", 14),
    ("d-mmm-yy", 15),
    ("d-mmm", 16),
    ("mmm-yy", 17),
    ("h:mm AM/PM", 18),
    ("h:mm:ss AM/PM", 19),
    ("h:mm", 20),
    ("h:mm:ss", 21),
    ("m/d/yy h:mm", 22),
    ("[$-404]e/m/d", 27),
    ("m/d/yy", 30),
    ("#,##0 ,(#,##0)", 37),
    ("#,##0 ,[Red](#,##0)", 38),
    ("#,##0.00,(#,##0.00)", 39),
    ("#,##0.00,[Red](#,##0.00)", 40),
    (
        "_(\"$\"* #,##0.00_),_(\"$\"* \\(#,##0.00\\),_(\"$\"* \"-\"??_),_(@_)",
        44,
    ),
    ("mm:ss", 45),
    ("[h]:mm:ss", 46),
    ("mm:ss.0", 47),
    ("##0.0E+0", 48),
    ("@", 49),
    ("t0", 59),
    ("t0.00", 60),
    ("t#,##0", 61),
    ("t#,##0.00", 62),
    ("t0%", 67),
    ("t0.00%", 68),
    ("t# ?/?", 69),
    ("t# ??/??", 70),
];

fn builtin_format_id(code: &str) -> Option<u32> {
    BUILTIN_FORMATS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, id)| *id)
}

fn builtin_format_code(id: u32) -> Option<&'static str> {
    BUILTIN_FORMATS
        .iter()
        .find(|(_, i)| *i == id)
        .map(|(c, _)| *c)
}

/// Registry of deduplicated styles and their secondary declarations.
#[derive(Debug)]
pub struct StyleRegistry {
    style_to_id: AHashMap<Style, u32>,
    styles: Vec<Style>,

    /// Format code -> style id that introduced it.
    registered_formats: AHashMap<String, u32>,
    /// Style ids that introduced a format, in declaration order.
    format_order: Vec<u32>,
    style_to_format_id: AHashMap<u32, u32>,
    next_custom_format_id: u32,

    /// Background color -> style id that introduced it.
    registered_fills: AHashMap<Color, u32>,
    /// Style ids that introduced a fill, in declaration order.
    fill_order: Vec<u32>,
    style_to_fill_id: AHashMap<u32, u32>,
    /// Declared fill ids start at 2; 0 is "none" and 1 is "gray125".
    next_fill_id: u32,

    /// Border -> style id that introduced it.
    registered_borders: AHashMap<Border, u32>,
    /// Style ids that introduced a border, in declaration order.
    border_order: Vec<u32>,
    style_to_border_id: AHashMap<u32, u32>,
}

impl StyleRegistry {
    /// Creates a registry with `default_style` registered under id 0.
    pub fn new(default_style: &Style) -> Self {
        let mut registry = Self::empty();
        registry.register(default_style);
        registry
    }

    /// Creates a registry seeded from an existing styles part, so a resumed
    /// session keeps assigning the same ids the interrupted one did.
    /// Falls back to a fresh registry when the part does not exist yet.
    pub fn open(default_style: &Style, styles_xml_path: &Path) -> XlsxResult<Self> {
        if styles_xml_path.exists() {
            let file = std::fs::File::open(styles_xml_path)?;
            let mut registry = Self::empty();
            registry.load_from_xml(std::io::BufReader::new(file))?;
            Ok(registry)
        } else {
            Ok(Self::new(default_style))
        }
    }

    fn empty() -> Self {
        StyleRegistry {
            style_to_id: AHashMap::new(),
            styles: Vec::new(),
            registered_formats: AHashMap::new(),
            format_order: Vec::new(),
            style_to_format_id: AHashMap::new(),
            next_custom_format_id: FIRST_CUSTOM_FORMAT_ID,
            registered_fills: AHashMap::new(),
            fill_order: Vec::new(),
            style_to_fill_id: AHashMap::new(),
            next_fill_id: 2,
            registered_borders: AHashMap::new(),
            border_order: Vec::new(),
            style_to_border_id: AHashMap::new(),
        }
    }

    /// Registers a style and returns its id. Structurally equal styles
    /// always resolve to the same id.
    pub fn register(&mut self, style: &Style) -> u32 {
        if let Some(&id) = self.style_to_id.get(style) {
            return id;
        }

        let id = self.styles.len() as u32;
        self.style_to_id.insert(style.clone(), id);
        self.styles.push(style.clone());

        self.register_fill(style, id);
        self.register_format(style, id);
        self.register_border(style, id);

        id
    }

    /// Looks up the id of an already-registered style.
    pub fn lookup(&self, style: &Style) -> Option<u32> {
        self.style_to_id.get(style).copied()
    }

    /// All registered styles, indexed by style id.
    pub fn styles(&self) -> &[Style] {
        &self.styles
    }

    pub fn style(&self, style_id: u32) -> Option<&Style> {
        self.styles.get(style_id as usize)
    }

    /// Fill id for a style; 0 means "no fill".
    pub fn fill_id_for(&self, style_id: u32) -> u32 {
        self.style_to_fill_id.get(&style_id).copied().unwrap_or(0)
    }

    /// Border id for a style; 0 means "no border".
    pub fn border_id_for(&self, style_id: u32) -> u32 {
        self.style_to_border_id.get(&style_id).copied().unwrap_or(0)
    }

    /// Number format id for a style; 0 means "General".
    pub fn format_id_for(&self, style_id: u32) -> u32 {
        self.style_to_format_id.get(&style_id).copied().unwrap_or(0)
    }

    /// Style ids that introduced a unique fill, in fill id order.
    pub fn fill_introducers(&self) -> &[u32] {
        &self.fill_order
    }

    /// Style ids that introduced a unique border, in border id order.
    pub fn border_introducers(&self) -> &[u32] {
        &self.border_order
    }

    /// Style ids that introduced a unique format, in declaration order.
    pub fn format_introducers(&self) -> &[u32] {
        &self.format_order
    }

    /// An empty cell still needs a `<c>` element when its style carries a
    /// fill, border or number format, otherwise the styling would be lost.
    pub fn should_apply_style_on_empty_cell(&self, style_id: u32) -> bool {
        self.fill_id_for(style_id) != 0
            || self.border_id_for(style_id) != 0
            || self.format_id_for(style_id) != 0
    }

    fn register_format(&mut self, style: &Style, style_id: u32) {
        let format_id = match style.format_opt() {
            Some(code) => {
                if let Some(&introducer) = self.registered_formats.get(code) {
                    self.style_to_format_id
                        .get(&introducer)
                        .copied()
                        .unwrap_or(0)
                } else {
                    self.registered_formats.insert(code.to_string(), style_id);
                    self.format_order.push(style_id);
                    match builtin_format_id(code) {
                        Some(builtin) => builtin,
                        None => {
                            let id = self.next_custom_format_id;
                            self.next_custom_format_id += 1;
                            id
                        }
                    }
                }
            }
            None => 0,
        };
        self.style_to_format_id.insert(style_id, format_id);
    }

    fn register_fill(&mut self, style: &Style, style_id: u32) {
        let fill_id = match style.background_color_opt() {
            Some(color) => {
                if let Some(&introducer) = self.registered_fills.get(&color) {
                    self.style_to_fill_id.get(&introducer).copied().unwrap_or(0)
                } else {
                    self.registered_fills.insert(color, style_id);
                    self.fill_order.push(style_id);
                    let id = self.next_fill_id;
                    self.next_fill_id += 1;
                    id
                }
            }
            None => 0,
        };
        self.style_to_fill_id.insert(style_id, fill_id);
    }

    fn register_border(&mut self, style: &Style, style_id: u32) {
        let border_id = match style.border_opt() {
            Some(border) => {
                if let Some(&introducer) = self.registered_borders.get(border) {
                    self.style_to_border_id
                        .get(&introducer)
                        .copied()
                        .unwrap_or(0)
                } else {
                    self.registered_borders.insert(border.clone(), style_id);
                    self.border_order.push(style_id);
                    // Declared border ids start at 1; 0 is the empty border.
                    self.border_order.len() as u32
                }
            }
            None => 0,
        };
        self.style_to_border_id.insert(style_id, border_id);
    }

    /// Appends a reconstructed style without deduplicating, keeping the
    /// style id equal to the cellXfs position it came from. Two xfs can
    /// reconstruct to the same structural style (the fonts section pools
    /// them); collapsing those would shift every later id and leave the
    /// sheet's `s` references dangling.
    fn register_loaded(&mut self, style: &Style) -> u32 {
        let id = self.styles.len() as u32;
        // Later lookups resolve to the first xf with this shape.
        self.style_to_id.entry(style.clone()).or_insert(id);
        self.styles.push(style.clone());

        self.register_fill(style, id);
        self.register_format(style, id);
        self.register_border(style, id);

        id
    }

    /// Rebuilds the registry state from a styles part written by a previous
    /// pass, walking cellXfs in order so ids come out identical.
    fn load_from_xml<R: BufRead>(&mut self, reader: R) -> XlsxResult<()> {
        let parsed = parse_styles_xml(reader)?;

        for xf in &parsed.xfs {
            let mut style = Style::new();

            if let Some(font) = parsed.fonts.get(xf.font_id) {
                if let Some(size) = font.size {
                    style = style.font_size(size);
                }
                if let Some(color) = font.color {
                    style = style.font_color(color);
                }
                if let Some(name) = &font.name {
                    style = style.font_name(name.clone());
                }
                if font.bold {
                    style = style.bold(true);
                }
                if font.italic {
                    style = style.italic(true);
                }
                if font.underline {
                    style = style.underline(true);
                }
                if font.strikethrough {
                    style = style.strikethrough(true);
                }
            }

            // Fill ids 0 and 1 are the fixed "none" and "gray125" entries.
            if xf.fill_id > 1 {
                if let Some(fill) = parsed.fills.get(xf.fill_id) {
                    if let Some(color) = fill.fg_color {
                        style = style.background_color(color);
                    }
                }
            }

            if xf.border_id > 0 {
                if let Some(parsed_border) = parsed.borders.get(xf.border_id) {
                    let mut border = Border::new();
                    for part in &parsed_border.parts {
                        let (line_style, width) =
                            BorderPart::style_and_width_from_xlsx_name(&part.style_name)
                                .ok_or_else(|| {
                                    XlsxError::InvalidFormat(format!(
                                        "unknown border style '{}'",
                                        part.style_name
                                    ))
                                })?;
                        let mut border_part = BorderPart::new(part.side)
                            .with_line_style(line_style)
                            .with_width(width);
                        if let Some(color) = part.color {
                            border_part = border_part.with_color(color);
                        }
                        border.set_part(border_part);
                    }
                    style = style.border(border);
                }
            }

            if xf.apply_alignment {
                if xf.wrap_text {
                    style = style.wrap_text(true);
                }
                match (&xf.horizontal, &xf.vertical) {
                    (Some(h), Some(v)) if h == v => {
                        style = style.alignment(parse_alignment(h)?);
                    }
                    (Some(h), _) => {
                        style = style.horizontal_alignment(parse_alignment(h)?);
                    }
                    (None, Some(v)) => {
                        style = style.vertical_alignment(parse_alignment(v)?);
                    }
                    (None, None) => {}
                }
            }

            if xf.num_fmt_id > 0 {
                let code = parsed
                    .num_fmts
                    .get(&xf.num_fmt_id)
                    .map(String::as_str)
                    .or_else(|| builtin_format_code(xf.num_fmt_id));
                if let Some(code) = code {
                    style = style.format(code);
                }
            }

            self.register_loaded(&style);
        }

        Ok(())
    }
}

fn parse_alignment(keyword: &str) -> XlsxResult<CellAlignment> {
    keyword
        .parse::<CellAlignment>()
        .map_err(XlsxError::Core)
}

#[derive(Debug, Default)]
struct ParsedFont {
    size: Option<u8>,
    color: Option<Color>,
    name: Option<String>,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
}

#[derive(Debug, Default)]
struct ParsedFill {
    fg_color: Option<Color>,
}

#[derive(Debug)]
struct ParsedBorderPart {
    side: BorderSide,
    style_name: String,
    color: Option<Color>,
}

#[derive(Debug, Default)]
struct ParsedBorder {
    parts: Vec<ParsedBorderPart>,
}

#[derive(Debug, Default)]
struct ParsedXf {
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    num_fmt_id: u32,
    apply_alignment: bool,
    wrap_text: bool,
    horizontal: Option<String>,
    vertical: Option<String>,
}

#[derive(Debug, Default)]
struct ParsedStyles {
    fonts: Vec<ParsedFont>,
    fills: Vec<ParsedFill>,
    borders: Vec<ParsedBorder>,
    num_fmts: AHashMap<u32, String>,
    xfs: Vec<ParsedXf>,
}

fn attr(start: &BytesStart<'_>, name: &str) -> XlsxResult<Option<String>> {
    for a in start.attributes().with_checks(false).flatten() {
        if a.key.local_name().as_ref() == name.as_bytes() {
            let value = a.unescape_value()?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn attr_color(start: &BytesStart<'_>, name: &str) -> XlsxResult<Option<Color>> {
    match attr(start, name)? {
        Some(value) => Ok(Some(Color::from_hex(&value).map_err(XlsxError::Core)?)),
        None => Ok(None),
    }
}

fn border_side_from_name(name: &[u8]) -> Option<BorderSide> {
    match name {
        b"left" => Some(BorderSide::Left),
        b"right" => Some(BorderSide::Right),
        b"top" => Some(BorderSide::Top),
        b"bottom" => Some(BorderSide::Bottom),
        _ => None,
    }
}

/// Streams the styles part once, collecting the sections the registry
/// needs to rebuild its state.
fn parse_styles_xml<R: BufRead>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut parsed = ParsedStyles::default();
    let mut buf = Vec::new();

    // Section currently open, and the entry being filled within it.
    let mut in_fonts = false;
    let mut in_fills = false;
    let mut in_borders = false;
    let mut in_cell_xfs = false;
    let mut current_font: Option<ParsedFont> = None;
    let mut current_fill: Option<ParsedFill> = None;
    let mut current_border: Option<ParsedBorder> = None;
    let mut current_border_side: Option<(BorderSide, String)> = None;
    let mut current_xf: Option<ParsedXf> = None;

    loop {
        let event = xml.read_event_into(&mut buf)?;
        match &event {
            Event::Start(start) | Event::Empty(start) => {
                let is_empty = matches!(event, Event::Empty(_));
                let name = start.local_name();
                match name.as_ref() {
                    b"fonts" => in_fonts = true,
                    b"fills" => in_fills = true,
                    b"borders" => in_borders = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"font" if in_fonts => {
                        current_font = Some(ParsedFont::default());
                        if is_empty {
                            parsed.fonts.push(current_font.take().unwrap_or_default());
                        }
                    }
                    b"sz" => {
                        if let (Some(font), Some(val)) =
                            (current_font.as_mut(), attr(start, "val")?)
                        {
                            font.size = val.parse::<f64>().ok().map(|v| v as u8);
                        }
                    }
                    b"color" => {
                        if let Some((_, _)) = &current_border_side {
                            if let Some(color) = attr_color(start, "rgb")? {
                                if let (Some(border), Some((side, style_name))) =
                                    (current_border.as_mut(), current_border_side.take())
                                {
                                    border.parts.push(ParsedBorderPart {
                                        side,
                                        style_name,
                                        color: Some(color),
                                    });
                                }
                            }
                        } else if let Some(font) = current_font.as_mut() {
                            font.color = attr_color(start, "rgb")?;
                        }
                    }
                    b"name" => {
                        if let Some(font) = current_font.as_mut() {
                            font.name = attr(start, "val")?;
                        }
                    }
                    b"b" => {
                        if let Some(font) = current_font.as_mut() {
                            font.bold = true;
                        }
                    }
                    b"i" => {
                        if let Some(font) = current_font.as_mut() {
                            font.italic = true;
                        }
                    }
                    b"u" => {
                        if let Some(font) = current_font.as_mut() {
                            font.underline = true;
                        }
                    }
                    b"strike" => {
                        if let Some(font) = current_font.as_mut() {
                            font.strikethrough = true;
                        }
                    }
                    b"fill" if in_fills => {
                        current_fill = Some(ParsedFill::default());
                        if is_empty {
                            parsed.fills.push(current_fill.take().unwrap_or_default());
                        }
                    }
                    b"fgColor" => {
                        if let Some(fill) = current_fill.as_mut() {
                            fill.fg_color = attr_color(start, "rgb")?;
                        }
                    }
                    b"border" if in_borders => {
                        current_border = Some(ParsedBorder::default());
                        if is_empty {
                            parsed
                                .borders
                                .push(current_border.take().unwrap_or_default());
                        }
                    }
                    b"left" | b"right" | b"top" | b"bottom" if current_border.is_some() => {
                        if let (Some(side), Some(style_name)) =
                            (border_side_from_name(name.as_ref()), attr(start, "style")?)
                        {
                            if is_empty {
                                if let Some(border) = current_border.as_mut() {
                                    border.parts.push(ParsedBorderPart {
                                        side,
                                        style_name,
                                        color: None,
                                    });
                                }
                            } else {
                                current_border_side = Some((side, style_name));
                            }
                        }
                    }
                    b"numFmt" => {
                        if let (Some(id), Some(code)) =
                            (attr(start, "numFmtId")?, attr(start, "formatCode")?)
                        {
                            if let Ok(id) = id.parse::<u32>() {
                                parsed.num_fmts.insert(id, code);
                            }
                        }
                    }
                    b"xf" if in_cell_xfs => {
                        let xf = ParsedXf {
                            font_id: attr(start, "fontId")?
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            fill_id: attr(start, "fillId")?
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            border_id: attr(start, "borderId")?
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            num_fmt_id: attr(start, "numFmtId")?
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            apply_alignment: attr(start, "applyAlignment")?
                                .as_deref()
                                == Some("1"),
                            ..ParsedXf::default()
                        };
                        if is_empty {
                            parsed.xfs.push(xf);
                        } else {
                            current_xf = Some(xf);
                        }
                    }
                    b"alignment" => {
                        if let Some(xf) = current_xf.as_mut() {
                            xf.wrap_text = attr(start, "wrapText")?.as_deref() == Some("1");
                            xf.horizontal = attr(start, "horizontal")?;
                            xf.vertical = attr(start, "vertical")?;
                        }
                    }
                    _ => {}
                }
            }
            Event::End(end) => match end.local_name().as_ref() {
                b"fonts" => in_fonts = false,
                b"fills" => in_fills = false,
                b"borders" => in_borders = false,
                b"cellXfs" => in_cell_xfs = false,
                b"font" => {
                    if let Some(font) = current_font.take() {
                        parsed.fonts.push(font);
                    }
                }
                b"fill" => {
                    if let Some(fill) = current_fill.take() {
                        parsed.fills.push(fill);
                    }
                }
                b"border" => {
                    if let Some(border) = current_border.take() {
                        parsed.borders.push(border);
                    }
                }
                b"left" | b"right" | b"top" | b"bottom" => {
                    // A side with a style but no color child closes here.
                    if let (Some(border), Some((side, style_name))) =
                        (current_border.as_mut(), current_border_side.take())
                    {
                        border.parts.push(ParsedBorderPart {
                            side,
                            style_name,
                            color: None,
                        });
                    }
                }
                b"xf" => {
                    if let Some(xf) = current_xf.take() {
                        parsed.xfs.push(xf);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sheetforge_core::style::BorderLineStyle;

    use super::*;
    use crate::styles::default_row_style;

    #[test]
    fn default_style_gets_id_zero() {
        let registry = StyleRegistry::new(&default_row_style());
        assert_eq!(registry.lookup(&default_row_style()), Some(0));
    }

    #[test]
    fn equal_styles_share_an_id() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let a = registry.register(&Style::new().bold(true));
        let b = registry.register(&Style::new().bold(true));
        assert_eq!(a, b);
        assert_eq!(a, 1);
    }

    #[test]
    fn distinct_styles_get_sequential_ids() {
        let mut registry = StyleRegistry::new(&default_row_style());
        assert_eq!(registry.register(&Style::new().bold(true)), 1);
        assert_eq!(registry.register(&Style::new().italic(true)), 2);
    }

    #[test]
    fn fills_are_shared_and_start_at_two() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let red = registry.register(&Style::new().background_color(Color::RED));
        let red_bold = registry
            .register(&Style::new().background_color(Color::RED).bold(true));
        let blue = registry.register(&Style::new().background_color(Color::BLUE));

        assert_eq!(registry.fill_id_for(red), 2);
        assert_eq!(registry.fill_id_for(red_bold), 2);
        assert_eq!(registry.fill_id_for(blue), 3);
        assert_eq!(registry.fill_id_for(0), 0);
        assert_eq!(registry.fill_introducers(), &[red, blue]);
    }

    #[test]
    fn borders_are_shared_and_start_at_one() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let border = Border::new().top().bottom();
        let a = registry.register(&Style::new().border(border.clone()));
        let b = registry
            .register(&Style::new().border(border.clone()).italic(true));
        let other = registry.register(
            &Style::new().border(Border::new().with_part(
                BorderPart::new(BorderSide::Left).with_line_style(BorderLineStyle::Dotted),
            )),
        );

        assert_eq!(registry.border_id_for(a), 1);
        assert_eq!(registry.border_id_for(b), 1);
        assert_eq!(registry.border_id_for(other), 2);
        assert_eq!(registry.border_id_for(0), 0);
    }

    #[test]
    fn builtin_formats_keep_reserved_ids() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let percent = registry.register(&Style::new().format("0.00%"));
        let text = registry.register(&Style::new().format("@"));
        assert_eq!(registry.format_id_for(percent), 10);
        assert_eq!(registry.format_id_for(text), 49);
    }

    #[test]
    fn custom_formats_count_up_from_164() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let a = registry.register(&Style::new().format("0.000"));
        let b = registry.register(&Style::new().format("[Green]0.0"));
        let a_again = registry.register(&Style::new().format("0.000").bold(true));
        assert_eq!(registry.format_id_for(a), 164);
        assert_eq!(registry.format_id_for(b), 165);
        assert_eq!(registry.format_id_for(a_again), 164);
    }

    #[test]
    fn empty_cell_styling_requires_fill_border_or_format() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let bold = registry.register(&Style::new().bold(true));
        let filled = registry.register(&Style::new().background_color(Color::YELLOW));
        let formatted = registry.register(&Style::new().format("0.00"));

        assert!(!registry.should_apply_style_on_empty_cell(bold));
        assert!(registry.should_apply_style_on_empty_cell(filled));
        assert!(registry.should_apply_style_on_empty_cell(formatted));
    }

    #[test]
    fn reload_keeps_one_entry_per_xf() {
        // The default style and an unstyled row style render byte-identical
        // xfs. A reload must still keep both so ids assigned after them do
        // not shift.
        let mut registry = StyleRegistry::new(&default_row_style());
        let plain = registry.register(&Style::new());
        let bold = registry.register(&Style::new().bold(true));
        assert_eq!((plain, bold), (1, 2));

        let mut xml = Vec::new();
        crate::styles::write_styles_xml(&mut xml, &registry).unwrap();

        let mut reloaded = StyleRegistry::empty();
        reloaded.load_from_xml(std::io::Cursor::new(xml)).unwrap();

        assert_eq!(reloaded.styles().len(), 3);
        assert!(reloaded.style(bold).unwrap().is_bold());
        assert!(!reloaded.style(plain).unwrap().is_bold());
    }

    #[test]
    fn reload_reassigns_identical_ids() {
        let mut registry = StyleRegistry::new(&default_row_style());
        let styled = Style::new()
            .font_size(14)
            .font_color(Color::RED)
            .font_name("Arial")
            .bold(true)
            .background_color(Color::YELLOW)
            .alignment(CellAlignment::Center)
            .wrap_text(true)
            .format("0.00");
        let id = registry.register(&styled);
        assert_eq!(id, 1);

        let mut xml = Vec::new();
        crate::styles::write_styles_xml(&mut xml, &registry).unwrap();

        let mut reloaded = StyleRegistry::empty();
        reloaded.load_from_xml(std::io::Cursor::new(xml)).unwrap();

        assert_eq!(reloaded.styles().len(), 2);
        assert_eq!(reloaded.fill_id_for(id), registry.fill_id_for(id));
        assert_eq!(reloaded.format_id_for(id), registry.format_id_for(id));
        let round_tripped = reloaded.style(id).unwrap();
        assert!(round_tripped.is_bold());
        assert_eq!(round_tripped.effective_font_size(), 14);
        assert_eq!(round_tripped.background_color_opt(), Some(Color::YELLOW));
        assert_eq!(round_tripped.alignment_opt(), Some(CellAlignment::Center));
        assert_eq!(round_tripped.format_opt(), Some("0.00"));
    }
}
