//! Multi-pass sessions: suspend, resume, final assembly.

use std::path::Path;

use sheetforge_core::{Row, Style};
use sheetforge_xlsx::{CloseOutcome, LoopSettings, Writer};

use crate::read_part;

fn pass_writer(dir: &Path, name: &str, counter: u32, max: u32) -> Writer {
    let mut writer = Writer::new();
    writer.set_temp_folder(dir).unwrap();
    writer.set_temp_folder_name(name).unwrap();
    writer.set_loop_settings(LoopSettings { max, counter }).unwrap();
    writer
}

#[test]
fn test_three_pass_session_appends_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("loop.xlsx");

    let mut writer = pass_writer(dir.path(), "loop-session", 1, 3);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["one"])).unwrap();
    writer.add_row(&Row::from_values(["two"])).unwrap();
    assert_eq!(
        writer.close().unwrap(),
        CloseOutcome::Suspended("loop-session".to_string())
    );
    assert!(!out.exists());

    let mut writer = pass_writer(dir.path(), "loop-session", 2, 3);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["three"])).unwrap();
    assert!(matches!(writer.close().unwrap(), CloseOutcome::Suspended(_)));
    assert!(!out.exists());

    let mut writer = pass_writer(dir.path(), "loop-session", 3, 3);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["four"])).unwrap();
    assert_eq!(writer.close().unwrap(), CloseOutcome::Finished);

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    for (row, text) in [(1, "one"), (2, "two"), (3, "three"), (4, "four")] {
        assert!(sheet.contains(&format!(r#"<row r="{row}" spans="1:1">"#)));
        assert!(sheet.contains(text));
    }

    // The scratch folder was removed on the final pass.
    assert!(!dir.path().join("loop-session").exists());
}

#[test]
fn test_resumed_merge_ranges_land_on_absolute_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merges.xlsx");

    let mut writer = pass_writer(dir.path(), "merge-session", 1, 2);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["a", "b"])).unwrap();
    writer.add_row(&Row::from_values(["c", "d"])).unwrap();
    writer.close().unwrap();

    let mut writer = pass_writer(dir.path(), "merge-session", 2, 2);
    writer.open_to_file(&out).unwrap();
    // Declared relative to this pass, which starts below two existing rows.
    writer.current_sheet_mut().unwrap().add_merge_range("A1:B1");
    writer.add_row(&Row::from_values(["Spanning", ""])).unwrap();
    assert_eq!(writer.close().unwrap(), CloseOutcome::Finished);

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<mergeCell ref="A3:B3"/>"#));
    assert!(sheet.contains(r#"<row r="3" spans="1:2">"#));
}

#[test]
fn test_shared_strings_survive_a_resume() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("strings.xlsx");

    let mut writer = pass_writer(dir.path(), "string-session", 1, 2);
    writer.set_inline_strings(false).unwrap();
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["alpha"])).unwrap();
    writer.close().unwrap();

    let mut writer = pass_writer(dir.path(), "string-session", 2, 2);
    writer.set_inline_strings(false).unwrap();
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["beta"])).unwrap();
    writer.close().unwrap();

    let sst = read_part(&out, "xl/sharedStrings.xml");
    assert!(sst.contains(r#"count="2" uniqueCount="2""#));
    assert!(sst.contains("alpha"));
    assert!(sst.contains("beta"));

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="A1" s="1" t="s"><v>0</v></c>"#));
    // The resumed pass re-registers the plain row style under a fresh id;
    // it renders identically.
    assert!(sheet.contains(r#"<c r="A2" s="2" t="s"><v>1</v></c>"#));
}

#[test]
fn test_style_ids_stay_valid_across_a_resume() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("styles.xlsx");

    let mut writer = pass_writer(dir.path(), "style-session", 1, 2);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["plain"])).unwrap();
    writer
        .add_row(&Row::from_values(["loud"]).with_style(Style::new().bold(true)))
        .unwrap();
    writer.close().unwrap();

    let mut writer = pass_writer(dir.path(), "style-session", 2, 2);
    writer.open_to_file(&out).unwrap();
    writer.add_row(&Row::from_values(["more"])).unwrap();
    assert_eq!(writer.close().unwrap(), CloseOutcome::Finished);

    // Pass one stamped the bold row with s="2"; the final part must still
    // declare an xf at that position, bold included.
    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains(r#"<c r="A2" s="2" t="inlineStr"><is><t>loud</t></is></c>"#));
    let styles = read_part(&out, "xl/styles.xml");
    assert!(styles.contains(r#"<cellXfs count="4">"#));
    assert!(styles.contains("<b/>"));
}

#[test]
fn test_sheet_names_survive_a_resume() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("names.xlsx");

    let mut writer = pass_writer(dir.path(), "name-session", 1, 2);
    writer.open_to_file(&out).unwrap();
    writer.rename_sheet(0, "results").unwrap();
    writer.select_sheet_by_name("notes").unwrap();
    writer.close().unwrap();

    let mut writer = pass_writer(dir.path(), "name-session", 2, 2);
    writer.open_to_file(&out).unwrap();
    // Resuming restores both sheets; selection by name reuses them.
    let index = writer.select_sheet_by_name("results").unwrap();
    assert_eq!(index, 0);
    writer.add_row(&Row::from_values(["r"])).unwrap();
    writer.close().unwrap();

    let workbook = read_part(&out, "xl/workbook.xml");
    assert!(workbook.contains(r#"name="results""#));
    assert!(workbook.contains(r#"name="notes""#));

    let sheet = read_part(&out, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("r"));
}
