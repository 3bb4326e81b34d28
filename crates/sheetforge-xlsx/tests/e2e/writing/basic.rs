//! Package structure and cell serialization for single-pass sessions.

use std::collections::HashSet;
use std::path::Path;

use sheetforge_core::{Cell, CellValue, Row, Style};
use sheetforge_xlsx::{CloseOutcome, Writer};

use crate::{part_names, read_part};

fn writer_in(dir: &Path) -> Writer {
    let mut writer = Writer::new();
    writer.set_temp_folder(dir).unwrap();
    writer
}

#[test]
fn test_package_layout() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("basic.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["Name", "Amount"])).unwrap();
    assert_eq!(writer.close().unwrap(), CloseOutcome::Finished);

    let names = part_names(&out);
    assert_eq!(names[0], "[Content_Types].xml");
    assert_eq!(names[1], "xl/workbook.xml");
    assert_eq!(names[2], "xl/styles.xml");
    for expected in [
        "_rels/.rels",
        "docProps/app.xml",
        "docProps/core.xml",
        "xl/_rels/workbook.xml.rels",
        "xl/sharedStrings.xml",
        "xl/worksheets/sheet1.xml",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len(), "duplicate package members");

    // The scratch folder is gone; only the output remains.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec!["basic.xlsx"]);
}

#[test]
fn test_static_parts_content() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("static.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["x"])).unwrap();
    writer.close().unwrap();

    let app = read_part(&out, "docProps/app.xml");
    assert!(app.contains("<Application>Spout</Application>"));

    let core = read_part(&out, "docProps/core.xml");
    assert!(core.contains("<dcterms:created xsi:type=\"dcterms:W3CDTF\">"));
    assert!(core.contains("<cp:revision>0</cp:revision>"));

    let rels = read_part(&out, "_rels/.rels");
    assert!(rels.contains(r#"Target="xl/workbook.xml""#));

    let content_types = read_part(&out, "[Content_Types].xml");
    assert!(content_types.contains(r#"PartName="/xl/worksheets/sheet1.xml""#));
}

#[test]
fn test_inline_string_and_number_cells() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cells.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["Name", "Amount"])).unwrap();

    let mut row = Row::from_values(["Widgets"]);
    row.push_cell(12.5);
    row.push_cell(true);
    writer.add_row(&row).unwrap();
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="1" spans="1:2">"#));
    assert!(sheet.contains(r#"<c r="A1" s="1" t="inlineStr"><is><t>Name</t></is></c>"#));
    assert!(sheet.contains(r#"<c r="B2" s="1"><v>12.5</v></c>"#));
    assert!(sheet.contains(r#"<c r="C2" s="1" t="b"><v>1</v></c>"#));
}

#[test]
fn test_shared_string_mode() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("shared.xlsx");
    let mut writer = writer_in(dir.path());
    writer.set_inline_strings(false).unwrap();
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["alpha", "beta"])).unwrap();
    writer.add_row(&Row::from_values(["alpha"])).unwrap();
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="A1" s="1" t="s"><v>0</v></c>"#));
    assert!(sheet.contains(r#"<c r="B1" s="1" t="s"><v>1</v></c>"#));
    // Strings are not deduplicated; the repeat gets its own id.
    assert!(sheet.contains(r#"<c r="A2" s="1" t="s"><v>2</v></c>"#));

    let sst = read_part(&out, "xl/sharedStrings.xml");
    assert!(sst.contains(r#"count="3" uniqueCount="3""#));
    assert!(sst.contains(r#"<si><t xml:space="preserve">alpha</t></si>"#));
}

#[test]
fn test_styled_cells_reach_styles_xml() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("styled.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    let header = Style::new()
        .bold(true)
        .background_color_hex("EEEEEE")
        .unwrap();
    let row = Row::from_values(["Name", "Amount"]).with_style(header);
    writer.add_row(&row).unwrap();

    let mut priced = Row::new();
    priced.set_cell(1, Cell::with_style(19.99, Style::new().format("0.000")));
    writer.add_row(&priced).unwrap();

    let mut total = Row::new();
    total.set_cell(1, Cell::with_style(42.0, Style::new().format("0.00")));
    writer.add_row(&total).unwrap();
    writer.close().unwrap();

    let styles = read_part(&out, "xl/styles.xml");
    assert!(styles.contains("<b/>"));
    assert!(styles.contains(r#"<patternFill patternType="solid"><fgColor rgb="FFEEEEEE"/></patternFill>"#));
    // Custom codes are declared from 164 up; "0.00" is builtin id 2 and
    // only referenced.
    assert!(styles.contains(r#"<numFmt numFmtId="164" formatCode="0.000"/>"#));
    assert!(styles.contains(r#"<numFmts count="1">"#));
    assert!(styles.contains(r#"<xf numFmtId="2""#));

    // No cell of the styled rows is left on the plain style.
    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(!sheet.contains(r#"<c r="A1" s="0""#));
}

#[test]
fn test_styled_empty_cell_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    let filled = Style::new().background_color_hex("FFCC00").unwrap();
    let mut row = Row::new();
    row.set_cell(0, Cell::with_style(CellValue::Empty, filled));
    row.set_cell(1, "end");
    writer.add_row(&row).unwrap();

    // A plain empty cell produces no element at all.
    let mut sparse = Row::new();
    sparse.set_cell(0, CellValue::Empty);
    sparse.set_cell(1, "tail");
    writer.add_row(&sparse).unwrap();
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="A1" s="1"/>"#));
    assert!(!sheet.contains(r#"<c r="A2""#));
    assert!(sheet.contains(r#"<c r="B2" s="2" t="inlineStr"><is><t>tail</t></is></c>"#));
}

#[test]
fn test_merges_and_column_widths() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("layout.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.current_sheet_mut().unwrap().add_merge_range("A1:B1");
    writer.current_sheet_mut().unwrap().set_column_width("A", 40.0);
    writer.add_row(&Row::from_values(["Report", ""])).unwrap();
    writer.add_row(&Row::from_values(["a", "b"])).unwrap();
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<mergeCells count="1"><mergeCell ref="A1:B1"/></mergeCells>"#));
    assert!(sheet.contains(r#"<col min="1" max="1" width="40" bestFit="true" customWidth="true" style="0"/>"#));
    // cols must precede sheetData
    assert!(sheet.find("<cols>").unwrap() < sheet.find("<sheetData>").unwrap());
}

#[test]
fn test_multiline_text_registers_wrapping() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("wrap.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["first\nsecond"])).unwrap();
    writer.close().unwrap();

    let styles = read_part(&out, "xl/styles.xml");
    assert!(styles.contains(r#"wrapText="1""#));

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("first\nsecond"));
}
