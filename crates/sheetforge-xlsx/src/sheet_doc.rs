//! In-progress worksheet part model.
//!
//! Rows are kept as serialized `<row>` fragments keyed by 1-based row
//! index, so inserting a row at an explicit index splices it into place
//! without reparsing what was already written. A resumed session reloads
//! the fragments from the part left behind by the previous pass.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use crate::error::{XlsxError, XlsxResult};

const SHEET_XML_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    "\n",
    r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
);

/// A `<col>` declaration: one column with an explicit or computed width.
#[derive(Debug, Clone, PartialEq)]
pub struct ColEntry {
    /// 1-based column index.
    pub index: u16,
    pub width: f64,
}

/// The mutable content of one worksheet part.
#[derive(Debug, Default)]
pub struct SheetDocument {
    rows: BTreeMap<u32, String>,
    merge_refs: Vec<String>,
    cols: Vec<ColEntry>,
}

impl SheetDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the part written by a previous pass, or an empty document
    /// when the file does not exist.
    pub fn open(path: &Path) -> XlsxResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        parse_sheet_xml(&content)
    }

    /// Highest row index present, or 0 for an empty sheet.
    pub fn max_row_index(&self) -> u32 {
        self.rows.keys().next_back().copied().unwrap_or(0)
    }

    /// Inserts a row fragment, replacing any existing row at that index.
    pub fn insert_row(&mut self, index: u32, fragment: String) {
        self.rows.insert(index, fragment);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Adds a merge reference unless it is already declared.
    pub fn add_merge_ref(&mut self, reference: &str) {
        if !self.merge_refs.iter().any(|r| r == reference) {
            self.merge_refs.push(reference.to_string());
        }
    }

    pub fn merge_refs(&self) -> &[String] {
        &self.merge_refs
    }

    /// Declares a column width; an existing declaration keeps the greater
    /// of the two widths.
    pub fn upsert_col_width(&mut self, index: u16, width: f64) {
        match self.cols.iter_mut().find(|c| c.index == index) {
            Some(existing) => {
                if existing.width < width {
                    existing.width = width;
                }
            }
            None => self.cols.push(ColEntry { index, width }),
        }
    }

    pub fn cols(&self) -> &[ColEntry] {
        &self.cols
    }

    /// Writes the complete part.
    pub fn save(&self, path: &Path) -> XlsxResult<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        file.write_all(SHEET_XML_HEADER.as_bytes())?;

        if !self.cols.is_empty() {
            file.write_all(b"<cols>")?;
            for col in &self.cols {
                write!(
                    file,
                    r#"<col min="{idx}" max="{idx}" width="{width}" bestFit="true" customWidth="true" style="0"/>"#,
                    idx = col.index,
                    width = col.width
                )?;
            }
            file.write_all(b"</cols>")?;
        }

        file.write_all(b"<sheetData>")?;
        for fragment in self.rows.values() {
            file.write_all(fragment.as_bytes())?;
        }
        file.write_all(b"</sheetData>")?;

        if !self.merge_refs.is_empty() {
            write!(file, r#"<mergeCells count="{}">"#, self.merge_refs.len())?;
            for reference in &self.merge_refs {
                write!(file, r#"<mergeCell ref="{reference}"/>"#)?;
            }
            file.write_all(b"</mergeCells>")?;
        }

        file.write_all(b"</worksheet>")?;
        file.flush()?;
        Ok(())
    }
}

/// Pulls a double-quoted attribute value out of a raw tag.
fn raw_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(r#"{name}=""#);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')? + start;
    Some(&tag[start..end])
}

/// Reparses a part this writer produced earlier. The scanner relies on
/// the fixed shape of our own output, where row elements never nest.
fn parse_sheet_xml(content: &str) -> XlsxResult<SheetDocument> {
    let mut doc = SheetDocument::new();

    let mut rest = content;
    while let Some(pos) = rest.find("<row") {
        let after = &rest[pos + 4..];
        if !after.starts_with([' ', '>', '/']) {
            rest = &rest[pos + 4..];
            continue;
        }
        let open_end = after.find('>').ok_or_else(|| {
            XlsxError::InvalidFormat("unterminated row element".to_string())
        })?;
        let open_tag = &rest[pos..pos + 5 + open_end];
        let fragment_end = if open_tag.ends_with("/>") {
            pos + 5 + open_end
        } else {
            let close = rest[pos..].find("</row>").ok_or_else(|| {
                XlsxError::InvalidFormat("unterminated row element".to_string())
            })?;
            pos + close + "</row>".len()
        };
        let fragment = &rest[pos..fragment_end];
        let index = raw_attr(open_tag, "r")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| {
                XlsxError::InvalidFormat("row element without an index".to_string())
            })?;
        doc.rows.insert(index, fragment.to_string());
        rest = &rest[fragment_end..];
    }

    let mut rest = content;
    while let Some(pos) = rest.find("<mergeCell ") {
        let tag_end = rest[pos..]
            .find('>')
            .ok_or_else(|| XlsxError::InvalidFormat("unterminated mergeCell".to_string()))?;
        let tag = &rest[pos..pos + tag_end + 1];
        if let Some(reference) = raw_attr(tag, "ref") {
            doc.add_merge_ref(reference);
        }
        rest = &rest[pos + tag_end + 1..];
    }

    let mut rest = content;
    while let Some(pos) = rest.find("<col ") {
        let tag_end = rest[pos..]
            .find('>')
            .ok_or_else(|| XlsxError::InvalidFormat("unterminated col".to_string()))?;
        let tag = &rest[pos..pos + tag_end + 1];
        if let (Some(index), Some(width)) = (
            raw_attr(tag, "min").and_then(|v| v.parse::<u16>().ok()),
            raw_attr(tag, "width").and_then(|v| v.parse::<f64>().ok()),
        ) {
            doc.upsert_col_width(index, width);
        }
        rest = &rest[pos + tag_end + 1..];
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rows_serialize_in_index_order() {
        let mut doc = SheetDocument::new();
        doc.insert_row(3, r#"<row r="3" spans="1:1"><c r="A3" s="0"/></row>"#.to_string());
        doc.insert_row(1, r#"<row r="1" spans="1:1"><c r="A1" s="0"/></row>"#.to_string());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet1.xml");
        doc.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let first = written.find(r#"<row r="1""#).unwrap();
        let third = written.find(r#"<row r="3""#).unwrap();
        assert!(first < third);
        assert_eq!(doc.max_row_index(), 3);
    }

    #[test]
    fn insert_at_existing_index_replaces_the_row() {
        let mut doc = SheetDocument::new();
        doc.insert_row(2, "<row r=\"2\"><c r=\"A2\" s=\"0\"/></row>".to_string());
        doc.insert_row(2, "<row r=\"2\"><c r=\"B2\" s=\"0\"/></row>".to_string());
        assert_eq!(doc.num_rows(), 1);
    }

    #[test]
    fn reload_round_trips_rows_merges_and_cols() {
        let mut doc = SheetDocument::new();
        doc.insert_row(
            1,
            r#"<row r="1" spans="1:2"><c r="A1" s="0" t="inlineStr"><is><t>hi</t></is></c></row>"#
                .to_string(),
        );
        doc.add_merge_ref("A1:B1");
        doc.upsert_col_width(1, 12.5);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet1.xml");
        doc.save(&path).unwrap();

        let reloaded = SheetDocument::open(&path).unwrap();
        assert_eq!(reloaded.max_row_index(), 1);
        assert_eq!(reloaded.merge_refs(), &["A1:B1".to_string()]);
        assert_eq!(reloaded.cols(), &[ColEntry { index: 1, width: 12.5 }]);
        assert!(reloaded.rows[&1].contains("<is><t>hi</t></is>"));
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let doc = SheetDocument::open(&dir.path().join("absent.xml")).unwrap();
        assert_eq!(doc.max_row_index(), 0);
        assert_eq!(doc.num_rows(), 0);
    }

    #[test]
    fn col_width_keeps_the_greater_value() {
        let mut doc = SheetDocument::new();
        doc.upsert_col_width(2, 10.0);
        doc.upsert_col_width(2, 8.0);
        doc.upsert_col_width(2, 14.0);
        assert_eq!(doc.cols(), &[ColEntry { index: 2, width: 14.0 }]);
    }

    #[test]
    fn duplicate_merge_refs_collapse() {
        let mut doc = SheetDocument::new();
        doc.add_merge_ref("A1:B2");
        doc.add_merge_ref("A1:B2");
        assert_eq!(doc.merge_refs().len(), 1);
    }
}
