//! Streaming worksheet assembly.

use std::collections::BTreeMap;
use std::path::PathBuf;

use ahash::AHashSet;
use sheetforge_core::column::{
    column_index_from_letters, column_letters, default_column_width, estimate_cell_width,
};
use sheetforge_core::style::Style;
use sheetforge_core::{Cell, CellValue, Error as CoreError, Row, Sheet, MAX_CHARACTERS_PER_CELL};

use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape;
use crate::shared_strings::SharedStrings;
use crate::sheet_doc::SheetDocument;
use crate::styles::{merge_styles, StyleRegistry};

/// Shared writer state a worksheet needs while appending rows.
pub(crate) struct WriteContext<'a> {
    pub registry: &'a mut StyleRegistry,
    pub shared_strings: &'a mut SharedStrings,
    pub inline_strings: bool,
}

/// One sheet being written: the public [`Sheet`] plus assembly state.
#[derive(Debug)]
pub struct Worksheet {
    file_path: PathBuf,
    sheet: Sheet,
    doc: SheetDocument,
    /// Rows kept for column auto-sizing, keyed by 1-based row index.
    row_cache: BTreeMap<u32, Row>,
    max_num_columns: u16,
    last_written_row_index: u32,
    /// Row offset of this pass; merge ranges are declared relative to it.
    first_row_index: u32,
    font_style: Style,
}

impl Worksheet {
    /// Opens a worksheet part, resuming from an existing file when one is
    /// there. The high-water mark starts at the highest row index found.
    pub(crate) fn open(
        file_path: PathBuf,
        sheet: Sheet,
        font_style: Style,
    ) -> XlsxResult<Self> {
        let doc = SheetDocument::open(&file_path)?;
        let last_written_row_index = doc.max_row_index();
        Ok(Worksheet {
            file_path,
            sheet,
            doc,
            row_cache: BTreeMap::new(),
            max_num_columns: 0,
            last_written_row_index,
            first_row_index: last_written_row_index,
            font_style,
        })
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    /// 1-based sheet id, used in part names and relationship ids.
    pub fn id(&self) -> u32 {
        self.sheet.index() as u32 + 1
    }

    pub fn last_written_row_index(&self) -> u32 {
        self.last_written_row_index
    }

    pub(crate) fn set_max_num_columns(&mut self, num: u16) {
        self.max_num_columns = self.max_num_columns.max(num);
    }

    /// Appends a row, or splices it at `row_index` (1-based) when given.
    ///
    /// Empty rows produce no element but still advance the high-water
    /// mark, leaving a gap in the sheet.
    pub(crate) fn add_row(
        &mut self,
        row: &Row,
        row_index: Option<u32>,
        ctx: &mut WriteContext<'_>,
    ) -> XlsxResult<()> {
        if let Some(0) = row_index {
            return Err(XlsxError::Core(CoreError::InvalidArgument(
                "row indexes are 1-based; 0 is not a valid row".to_string(),
            )));
        }

        if !row.is_empty() {
            self.add_non_empty_row(row, row_index, ctx)?;
        }
        self.last_written_row_index += 1;
        Ok(())
    }

    fn add_non_empty_row(
        &mut self,
        row: &Row,
        row_index: Option<u32>,
        ctx: &mut WriteContext<'_>,
    ) -> XlsxResult<()> {
        let row_index_one_based = row_index.unwrap_or(self.last_written_row_index + 1);
        let num_cells = row.num_cells();

        // An explicit index beyond the high-water mark moves the mark so
        // the universal increment in add_row lands exactly on it.
        if let Some(explicit) = row_index {
            if explicit > self.last_written_row_index {
                self.last_written_row_index = explicit - 1;
            }
        }

        self.row_cache.insert(row_index_one_based, row.clone());

        let row_style = row.style();
        // Id of the registered row style, resolved on first use.
        let mut row_style_id: Option<u32> = None;

        let mut fragment = format!(
            r#"<row r="{}" spans="1:{}">"#,
            row_index_one_based, num_cells
        );

        for (col, cell) in row.cells() {
            let style_id = if cell.style().is_empty() {
                if needs_wrap(cell, row_style) {
                    ctx.registry.register(&row_style.clone().wrap_text(true))
                } else {
                    match row_style_id {
                        Some(id) => id,
                        None => {
                            let id = ctx.registry.register(row_style);
                            row_style_id = Some(id);
                            id
                        }
                    }
                }
            } else {
                let mut merged = merge_styles(cell.style(), row_style);
                if needs_wrap(cell, &merged) {
                    merged = merged.wrap_text(true);
                }
                ctx.registry.register(&merged)
            };

            if let Some(cell_xml) =
                serialize_cell(col, row_index_one_based, cell, style_id, ctx)?
            {
                fragment.push_str(&cell_xml);
            }
        }

        fragment.push_str("</row>");
        self.doc.insert_row(row_index_one_based, fragment);
        Ok(())
    }

    /// Finishes the part: resolves merge ranges, declares column widths
    /// and writes the file.
    pub(crate) fn close(&mut self) -> XlsxResult<()> {
        for range in self.sheet.merge_ranges().to_vec() {
            let resolved = offset_range(&range, self.first_row_index)?;
            self.doc.add_merge_ref(&resolved);
        }
        // The sheet takes back the full resolved list, including ranges
        // declared by earlier passes.
        self.sheet.set_merge_ranges(self.doc.merge_refs().to_vec());

        let explicit_widths: Vec<(String, f64)> = self
            .sheet
            .columns_width()
            .iter()
            .map(|(col, &width)| (col.clone(), width))
            .collect();
        for (col, width) in explicit_widths {
            // col declarations are 1-based while the index helper is 0-based.
            let index = column_index_from_letters(&col)? + 1;
            if index <= self.max_num_columns {
                self.doc.upsert_col_width(index, width);
            }
        }

        let auto_size = self.sheet.auto_size_columns().to_vec();
        if !auto_size.is_empty() {
            let merged = merged_cell_refs(self.sheet.merge_ranges())?;
            let font_name = self.font_style.effective_font_name().to_string();
            let font_size = self.font_style.effective_font_size();

            for col in auto_size {
                let index = column_index_from_letters(&col)? + 1;
                if index > self.max_num_columns {
                    continue;
                }
                let mut max_width = default_column_width(&font_name, font_size);
                let letters = column_letters(index - 1);

                for (&row_index, row) in &self.row_cache {
                    let Some(cell) = row.cell(index - 1) else { continue };
                    if cell.is_empty() {
                        continue;
                    }
                    if merged.contains(&format!("{letters}{row_index}")) {
                        continue;
                    }
                    let width = estimate_cell_width(
                        &font_name,
                        font_size,
                        &cell.raw_value().to_string(),
                    );
                    if width > max_width {
                        max_width = width;
                    }
                }

                self.doc.upsert_col_width(index, max_width);
            }
        }

        self.doc.save(&self.file_path)
    }
}

/// Wrap is implied for multi-line text unless the style said otherwise.
fn needs_wrap(cell: &Cell, style: &Style) -> bool {
    style.wrap_text_opt().is_none()
        && matches!(cell.raw_value(), CellValue::Text(text) if text.contains('\n'))
}

/// Serializes one cell. Empty cells only produce an element when their
/// style would actually show on one (fill, border or number format).
fn serialize_cell(
    col: u16,
    row_index: u32,
    cell: &Cell,
    style_id: u32,
    ctx: &mut WriteContext<'_>,
) -> XlsxResult<Option<String>> {
    let reference = format!("{}{}", column_letters(col), row_index);

    let xml = match cell.raw_value() {
        CellValue::Empty => {
            if ctx.registry.should_apply_style_on_empty_cell(style_id) {
                format!(r#"<c r="{reference}" s="{style_id}"/>"#)
            } else {
                return Ok(None);
            }
        }
        CellValue::Text(text) => {
            if text.chars().count() > MAX_CHARACTERS_PER_CELL {
                return Err(XlsxError::Core(CoreError::InvalidArgument(
                    "cell value exceeds the maximum of 32,767 characters".to_string(),
                )));
            }
            if ctx.inline_strings {
                format!(
                    r#"<c r="{reference}" s="{style_id}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                )
            } else {
                let shared_id = ctx.shared_strings.write_string(text);
                format!(
                    r#"<c r="{reference}" s="{style_id}" t="s"><v>{shared_id}</v></c>"#
                )
            }
        }
        CellValue::Bool(value) => format!(
            r#"<c r="{reference}" s="{style_id}" t="b"><v>{}</v></c>"#,
            u8::from(*value)
        ),
        CellValue::Number(value) => {
            format!(r#"<c r="{reference}" s="{style_id}"><v>{value}</v></c>"#)
        }
        CellValue::Error(raw) => format!(
            r#"<c r="{reference}" s="{style_id}" t="e"><v>{}</v></c>"#,
            escape(raw)
        ),
        CellValue::Date(_) | CellValue::Duration(_) => {
            return Err(XlsxError::Core(CoreError::InvalidArgument(format!(
                "cell {reference} holds an unsupported value type"
            ))));
        }
    };

    Ok(Some(xml))
}

/// Splits an A1 reference into column letters and row number.
fn split_cell_ref(reference: &str) -> XlsxResult<(&str, u32)> {
    let digits_at = reference
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| XlsxError::InvalidFormat(format!("bad cell reference '{reference}'")))?;
    let (letters, digits) = reference.split_at(digits_at);
    let row = digits
        .parse::<u32>()
        .map_err(|_| XlsxError::InvalidFormat(format!("bad cell reference '{reference}'")))?;
    Ok((letters, row))
}

/// Shifts both endpoints of a range down by `row_offset` rows.
fn offset_range(range: &str, row_offset: u32) -> XlsxResult<String> {
    let endpoints: Vec<&str> = range.split(':').collect();
    let shifted: XlsxResult<Vec<String>> = endpoints
        .iter()
        .map(|endpoint| {
            let (letters, row) = split_cell_ref(endpoint)?;
            Ok(format!("{letters}{}", row + row_offset))
        })
        .collect();
    Ok(shifted?.join(":"))
}

/// Expands merge ranges to the set of cell references they cover.
///
/// Vertical single-column merges are left out: their content still
/// renders in the top cell's column, so it counts for auto-sizing.
fn merged_cell_refs(ranges: &[String]) -> XlsxResult<AHashSet<String>> {
    let mut refs = AHashSet::new();
    for range in ranges {
        match range.split_once(':') {
            None => {
                refs.insert(range.clone());
            }
            Some((start, end)) => {
                let (start_letters, start_row) = split_cell_ref(start)?;
                let (end_letters, end_row) = split_cell_ref(end)?;
                let start_col = column_index_from_letters(start_letters)?;
                let end_col = column_index_from_letters(end_letters)?;
                if start_col == end_col && start_row < end_row {
                    continue;
                }
                for col in start_col..=end_col {
                    for row in start_row..=end_row {
                        refs.insert(format!("{}{row}", column_letters(col)));
                    }
                }
            }
        }
    }
    Ok(refs)
}
