//! Sheet management: naming, selection, ordering, visibility.

use std::path::Path;

use sheetforge_core::{Row, SheetVisibility, MAX_ROWS};
use sheetforge_xlsx::Writer;

use crate::read_part;

fn writer_in(dir: &Path) -> Writer {
    let mut writer = Writer::new();
    writer.set_temp_folder(dir).unwrap();
    writer
}

#[test]
fn test_rename_and_sort_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sorted.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.rename_sheet(0, "banana").unwrap();
    writer.add_new_sheet().unwrap();
    writer.rename_sheet(1, "Apple").unwrap();
    writer.select_sheet_by_name("cherry").unwrap();
    writer.sort_sheets_by_name(false).unwrap();
    writer.close().unwrap();

    let workbook = read_part(&out, "xl/workbook.xml");
    let apple = workbook.find(r#"name="Apple""#).unwrap();
    let banana = workbook.find(r#"name="banana""#).unwrap();
    let cherry = workbook.find(r#"name="cherry""#).unwrap();
    assert!(apple < banana && banana < cherry);

    // Part names follow the sheet's creation position, not the tab order.
    assert!(workbook.contains(r#"<sheet name="Apple" sheetId="2" r:id="rIdSheet2" state="visible"/>"#));
    assert!(workbook.contains(r#"<sheet name="banana" sheetId="1" r:id="rIdSheet1" state="visible"/>"#));

    let rels = read_part(&out, "xl/_rels/workbook.xml.rels");
    for id in 1..=3 {
        assert!(rels.contains(&format!(r#"Id="rIdSheet{id}" Target="worksheets/sheet{id}.xml""#)));
    }

    let content_types = read_part(&out, "[Content_Types].xml");
    for id in 1..=3 {
        assert!(content_types.contains(&format!(r#"PartName="/xl/worksheets/sheet{id}.xml""#)));
    }
}

#[test]
fn test_rows_route_to_the_selected_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("routing.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.add_row(&Row::from_values(["one"])).unwrap();
    writer.select_sheet_by_name("Extras").unwrap();
    writer.add_row(&Row::from_values(["two"])).unwrap();
    writer.set_current_sheet(0).unwrap();
    writer.add_row(&Row::from_values(["three"])).unwrap();
    writer.close().unwrap();

    let first = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(first.contains("one"));
    assert!(first.contains("three"));
    assert!(!first.contains("two"));

    let second = read_part(&out, "xl/worksheets/sheet2.xml");
    assert!(second.contains("two"));
    assert!(second.contains(r#"<row r="1" spans="1:1">"#));
}

#[test]
fn test_hidden_sheets_keep_their_state() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("hidden.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.add_new_sheet().unwrap();
    writer
        .current_sheet_mut()
        .unwrap()
        .set_visibility(SheetVisibility::Hidden);
    writer.close().unwrap();

    let workbook = read_part(&out, "xl/workbook.xml");
    assert!(workbook.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rIdSheet1" state="visible"/>"#));
    assert!(workbook.contains(r#"<sheet name="Sheet2" sheetId="2" r:id="rIdSheet2" state="hidden"/>"#));
}

#[test]
fn test_set_row_splices_and_replaces() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("splice.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.add_row(&Row::from_values(["first"])).unwrap();
    writer.set_row(5, &Row::from_values(["fifth"])).unwrap();
    writer.add_row(&Row::from_values(["sixth"])).unwrap();
    writer.set_row(1, &Row::from_values(["replaced"])).unwrap();
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<row r="1""#));
    assert!(sheet.contains("replaced"));
    assert!(!sheet.contains("first"));
    assert!(sheet.contains(r#"<row r="5""#));
    assert!(sheet.contains(r#"<row r="6""#));
    assert!(!sheet.contains(r#"<row r="2""#));
}

#[test]
fn test_row_ceiling_starts_a_new_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("ceiling.xlsx");
    let mut writer = writer_in(dir.path());
    writer.open_to_file(&out).unwrap();

    writer.set_row(MAX_ROWS, &Row::from_values(["last"])).unwrap();
    writer.add_row(&Row::from_values(["overflow"])).unwrap();
    assert_eq!(writer.sheets().unwrap().len(), 2);
    writer.close().unwrap();

    let first = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(first.contains(&format!(r#"<row r="{MAX_ROWS}" spans="1:1">"#)));
    assert!(!first.contains("overflow"));

    // The overflowing row lands on the new sheet's first row.
    let second = read_part(&out, "xl/worksheets/sheet2.xml");
    assert!(second.contains(r#"<row r="1" spans="1:1">"#));
    assert!(second.contains("overflow"));
}

#[test]
fn test_row_ceiling_drops_rows_without_auto_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("full.xlsx");
    let mut writer = writer_in(dir.path());
    writer.set_auto_new_sheets(false).unwrap();
    writer.open_to_file(&out).unwrap();

    writer.set_row(MAX_ROWS, &Row::from_values(["last"])).unwrap();
    writer.add_row(&Row::from_values(["overflow"])).unwrap();
    assert_eq!(writer.sheets().unwrap().len(), 1);
    writer.close().unwrap();

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("last"));
    assert!(!sheet.contains("overflow"));
}
