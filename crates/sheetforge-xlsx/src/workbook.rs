//! Workbook orchestration: sheet lifecycle, row routing and final assembly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::PathBuf;

use quick_xml::events::Event;
use quick_xml::Reader;
use sheetforge_core::{
    Error as CoreError, Row, Sheet, SheetNameRegistry, SheetVisibility, MAX_ROWS,
};

use crate::error::{XlsxError, XlsxResult};
use crate::fs::ScratchFs;
use crate::options::WriterOptions;
use crate::shared_strings::SharedStrings;
use crate::styles::{merge_styles, write_styles_xml, StyleRegistry};
use crate::worksheet::{Worksheet, WriteContext};

/// Owns everything a writing session needs: the scratch folder, the style
/// registry, the shared strings table and the open worksheets.
#[derive(Debug)]
pub(crate) struct WorkbookManager {
    fs: ScratchFs,
    options: WriterOptions,
    registry: StyleRegistry,
    shared_strings: SharedStrings,
    name_registry: SheetNameRegistry,
    worksheets: Vec<Worksheet>,
    current_worksheet_index: usize,
}

impl WorkbookManager {
    /// Starts a session. A continuation pass re-reads the styles, shared
    /// strings and sheet list left behind by the previous pass; a fresh
    /// session starts with one empty sheet unless `with_default_sheet`
    /// is off, in which case the first row or sheet operation creates it.
    pub fn open(mut options: WriterOptions, with_default_sheet: bool) -> XlsxResult<Self> {
        let (fs, folder_name) = ScratchFs::create(&options)?;
        options.temp_folder_name = Some(folder_name);

        let registry = StyleRegistry::open(&options.default_row_style, &fs.styles_path())?;
        let shared_strings = SharedStrings::open(&fs.xl_folder())?;

        let mut manager = WorkbookManager {
            fs,
            options,
            registry,
            shared_strings,
            name_registry: SheetNameRegistry::new(),
            worksheets: Vec::new(),
            current_worksheet_index: 0,
        };

        if manager.options.is_continuation() {
            manager.reload_worksheets()?;
        }
        if manager.worksheets.is_empty() && with_default_sheet {
            manager.add_worksheet()?;
        }
        manager.current_worksheet_index = manager.worksheets.len().saturating_sub(1);
        Ok(manager)
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    pub fn worksheets(&self) -> &[Worksheet] {
        &self.worksheets
    }

    pub fn current_worksheet(&self) -> XlsxResult<&Worksheet> {
        self.worksheets
            .get(self.current_worksheet_index)
            .ok_or_else(|| XlsxError::WriterState("workbook has no sheets yet".to_string()))
    }

    pub fn current_worksheet_mut(&mut self) -> XlsxResult<&mut Worksheet> {
        self.worksheets
            .get_mut(self.current_worksheet_index)
            .ok_or_else(|| XlsxError::WriterState("workbook has no sheets yet".to_string()))
    }

    /// Makes the sheet at `index` the target of subsequent rows.
    pub fn set_current_worksheet(&mut self, index: usize) -> XlsxResult<()> {
        if index >= self.worksheets.len() {
            return Err(XlsxError::Core(CoreError::SheetNotFound(format!(
                "no sheet at position {index}"
            ))));
        }
        self.current_worksheet_index = index;
        Ok(())
    }

    /// Position of the sheet named `name`, if any. Comparison is exact.
    pub fn worksheet_index_by_name(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|w| w.sheet().name() == name)
    }

    /// Appends a new sheet with the default name for its position.
    pub fn add_worksheet(&mut self) -> XlsxResult<usize> {
        let index = self.worksheets.len();
        let sheet = Sheet::new(index);
        self.name_registry.validate_and_claim(index, sheet.name())?;
        self.open_worksheet(sheet)?;
        Ok(index)
    }

    /// Appends a new sheet and routes subsequent rows to it.
    pub fn add_worksheet_and_make_current(&mut self) -> XlsxResult<usize> {
        let index = self.add_worksheet()?;
        self.current_worksheet_index = index;
        Ok(index)
    }

    /// Renames the sheet at `index` after validating the name against the
    /// others in this workbook.
    pub fn rename_worksheet(&mut self, index: usize, name: &str) -> XlsxResult<()> {
        if index >= self.worksheets.len() {
            return Err(XlsxError::Core(CoreError::SheetNotFound(format!(
                "no sheet at position {index}"
            ))));
        }
        // The registry is keyed by the sheet's stable creation index, which
        // can differ from the tab position once tabs have been sorted.
        let sheet_index = self.worksheets[index].sheet().index();
        self.name_registry.validate_and_claim(sheet_index, name)?;
        self.worksheets[index]
            .sheet_mut()
            .set_name_unchecked(name.to_string());
        Ok(())
    }

    /// Reorders the sheet tabs by name, case-insensitively.
    pub fn sort_worksheets_by_name(&mut self, reverse: bool) {
        self.worksheets
            .sort_by_key(|w| w.sheet().name().to_lowercase());
        if reverse {
            self.worksheets.reverse();
        }
    }

    /// Writes a row to the current sheet, appending or splicing at the
    /// explicit 1-based `row_index`.
    ///
    /// When appending past the row ceiling, either a new sheet is started
    /// automatically or the row is dropped with a warning, depending on
    /// the `auto_new_sheets` option.
    pub fn add_row(&mut self, row: &Row, row_index: Option<u32>) -> XlsxResult<()> {
        if self.worksheets.is_empty() {
            self.add_worksheet_and_make_current()?;
        }
        if row_index.is_none() && self.current_worksheet_reached_max_rows() {
            if !self.options.auto_new_sheets {
                log::warn!(
                    "sheet '{}' is full ({MAX_ROWS} rows); dropping row",
                    self.worksheets[self.current_worksheet_index].sheet().name()
                );
                return Ok(());
            }
            self.add_worksheet_and_make_current()?;
        }

        let mut row = row.clone();
        row.set_style(merge_styles(row.style(), &self.options.default_row_style));

        let num_cells = row.num_cells();
        let mut ctx = WriteContext {
            registry: &mut self.registry,
            shared_strings: &mut self.shared_strings,
            inline_strings: self.options.inline_strings,
        };
        let worksheet = &mut self.worksheets[self.current_worksheet_index];
        worksheet.add_row(&row, row_index, &mut ctx)?;
        worksheet.set_max_num_columns(num_cells);
        Ok(())
    }

    fn current_worksheet_reached_max_rows(&self) -> bool {
        self.worksheets[self.current_worksheet_index].last_written_row_index() >= MAX_ROWS
    }

    /// Finalizes every part and zips the package onto `output`, then
    /// removes the scratch folder.
    pub fn close<W: Write + Seek>(&mut self, output: W) -> XlsxResult<()> {
        self.write_parts()?;
        self.fs.zip_to_stream(output)?;
        self.fs.delete_root_folder()?;
        Ok(())
    }

    /// Finalizes every part but leaves the scratch folder in place so a
    /// later pass can resume from it.
    pub fn suspend(&mut self) -> XlsxResult<()> {
        self.write_parts()
    }

    /// Removes the scratch folder, abandoning any staged parts.
    pub fn delete_scratch(&self) -> XlsxResult<()> {
        self.fs.delete_root_folder()
    }

    fn write_parts(&mut self) -> XlsxResult<()> {
        self.shared_strings.close()?;

        let styles_file = File::create(self.fs.styles_path())?;
        let mut styles_writer = BufWriter::new(styles_file);
        write_styles_xml(&mut styles_writer, &self.registry)?;
        styles_writer.flush()?;

        for worksheet in &mut self.worksheets {
            worksheet.close()?;
        }

        self.fs.create_content_types(&self.worksheets)?;
        self.fs.create_workbook_file(&self.worksheets)?;
        self.fs.create_workbook_rels(&self.worksheets)?;
        Ok(())
    }

    fn open_worksheet(&mut self, sheet: Sheet) -> XlsxResult<()> {
        let file_path = self.worksheet_path(sheet.index());
        let worksheet =
            Worksheet::open(file_path, sheet, self.options.default_row_style.clone())?;
        self.worksheets.push(worksheet);
        Ok(())
    }

    fn worksheet_path(&self, sheet_index: usize) -> PathBuf {
        self.fs
            .worksheets_folder()
            .join(format!("sheet{}.xml", sheet_index + 1))
    }

    /// Rebuilds the worksheet list from the workbook part written by the
    /// previous pass.
    fn reload_worksheets(&mut self) -> XlsxResult<()> {
        let workbook_path = self.fs.workbook_path();
        if !workbook_path.exists() {
            return Ok(());
        }

        let file = File::open(&workbook_path)?;
        let mut reader = Reader::from_reader(BufReader::new(file));
        reader.trim_text(true);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"sheet" => {
                    let mut name = None;
                    let mut sheet_id = None;
                    let mut state = SheetVisibility::Visible;
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.local_name().as_ref() {
                            b"name" => name = Some(value),
                            b"sheetId" => sheet_id = value.parse::<u32>().ok(),
                            b"state" => {
                                if value == "hidden" {
                                    state = SheetVisibility::Hidden;
                                }
                            }
                            _ => {}
                        }
                    }
                    let (name, sheet_id) = match (name, sheet_id) {
                        (Some(n), Some(i)) if i >= 1 => (n, i),
                        _ => {
                            return Err(XlsxError::InvalidFormat(
                                "workbook.xml sheet entry is missing name or sheetId"
                                    .to_string(),
                            ))
                        }
                    };
                    let index = (sheet_id - 1) as usize;
                    self.name_registry.validate_and_claim(index, &name)?;
                    let mut sheet = Sheet::new(index);
                    sheet.set_name_unchecked(name);
                    sheet.set_visibility(state);
                    self.open_worksheet(sheet)?;
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(())
    }
}
