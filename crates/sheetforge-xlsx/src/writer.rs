//! Public writer facade.

use std::fs::File;
use std::path::{Path, PathBuf};

use sheetforge_core::{Row, Sheet, Style};

use crate::error::{XlsxError, XlsxResult};
use crate::options::{LoopSettings, WriterOptions};
use crate::workbook::WorkbookManager;

/// What `close` did with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The package was assembled and the scratch folder removed.
    Finished,
    /// An intermediate pass: parts were flushed and the scratch folder was
    /// left in place under this name for the next pass to resume from.
    Suspended(String),
}

/// Streaming XLSX writer.
///
/// Configure it, open it onto an output path, feed it rows, close it.
/// Configuration is frozen once the writer is opened.
///
/// ```no_run
/// use sheetforge_xlsx::Writer;
/// use sheetforge_core::Row;
///
/// # fn main() -> sheetforge_xlsx::XlsxResult<()> {
/// let mut writer = Writer::new();
/// writer.open_to_file("report.xlsx")?;
/// writer.add_row(&Row::from_values(["Name", "Amount"]))?;
///
/// let mut row = Row::from_values(["Widgets"]);
/// row.push_cell(12.5);
/// writer.add_row(&row)?;
/// writer.close()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    options: WriterOptions,
    session: Option<Session>,
}

#[derive(Debug)]
struct Session {
    workbook: WorkbookManager,
    output_path: PathBuf,
    /// Held open for the whole session; only a final pass has one.
    output: Option<File>,
}

impl Writer {
    pub fn new() -> Self {
        Writer::default()
    }

    pub fn with_options(options: WriterOptions) -> Self {
        Writer {
            options,
            session: None,
        }
    }

    /// Base folder for the scratch folder. Defaults to the system temp dir.
    pub fn set_temp_folder<P: Into<PathBuf>>(&mut self, folder: P) -> XlsxResult<()> {
        self.ensure_not_opened("set the temp folder")?;
        self.options.temp_folder = folder.into();
        Ok(())
    }

    /// Fixed scratch folder name, needed to resume a multi-pass session.
    pub fn set_temp_folder_name<S: Into<String>>(&mut self, name: S) -> XlsxResult<()> {
        self.ensure_not_opened("set the temp folder name")?;
        self.options.temp_folder_name = Some(name.into());
        Ok(())
    }

    /// Style merged under every written row's own style.
    ///
    /// The font size, color and name are pinned to their effective values
    /// so the default style always carries a complete font.
    pub fn set_default_row_style(&mut self, style: Style) -> XlsxResult<()> {
        self.ensure_not_opened("set the default row style")?;
        let size = style.effective_font_size();
        let color = style.effective_font_color();
        let name = style.effective_font_name().to_string();
        self.options.default_row_style =
            style.font_size(size).font_color(color).font_name(name);
        Ok(())
    }

    /// Whether a new sheet is started automatically at the row ceiling.
    pub fn set_auto_new_sheets(&mut self, auto: bool) -> XlsxResult<()> {
        self.ensure_not_opened("change sheet creation behavior")?;
        self.options.auto_new_sheets = auto;
        Ok(())
    }

    /// Whether strings are written inline rather than shared.
    pub fn set_inline_strings(&mut self, inline: bool) -> XlsxResult<()> {
        self.ensure_not_opened("change the string writing mode")?;
        self.options.inline_strings = inline;
        Ok(())
    }

    /// Declares this run as one pass of a multi-pass session.
    pub fn set_loop_settings(&mut self, settings: LoopSettings) -> XlsxResult<()> {
        self.ensure_not_opened("set loop settings")?;
        self.options.loop_settings = Some(settings);
        Ok(())
    }

    /// The scratch folder name in use; set once the writer is opened.
    pub fn temp_folder_name(&self) -> Option<&str> {
        match &self.session {
            Some(session) => session.workbook.options().temp_folder_name.as_deref(),
            None => self.options.temp_folder_name.as_deref(),
        }
    }

    /// Opens the writer onto `output_path`.
    ///
    /// The output file is only created on a final pass; intermediate
    /// passes of a loop session never touch it.
    pub fn open_to_file<P: AsRef<Path>>(&mut self, output_path: P) -> XlsxResult<()> {
        self.open(output_path.as_ref(), true)
    }

    /// Like [`open_to_file`](Self::open_to_file) but without creating the
    /// initial "Sheet1"; the first row write or sheet operation creates
    /// the first sheet instead.
    pub fn open_to_file_without_default_sheet<P: AsRef<Path>>(
        &mut self,
        output_path: P,
    ) -> XlsxResult<()> {
        self.open(output_path.as_ref(), false)
    }

    fn open(&mut self, output_path: &Path, with_default_sheet: bool) -> XlsxResult<()> {
        self.ensure_not_opened("open it again")?;
        let output_path = output_path.to_path_buf();
        let output = if self.options.is_final_pass() {
            Some(File::create(&output_path)?)
        } else {
            None
        };
        let workbook = WorkbookManager::open(self.options.clone(), with_default_sheet)?;
        self.session = Some(Session {
            workbook,
            output_path,
            output,
        });
        Ok(())
    }

    /// Appends a row to the current sheet.
    pub fn add_row(&mut self, row: &Row) -> XlsxResult<()> {
        self.guarded(|workbook| workbook.add_row(row, None))
    }

    /// Appends every row in the iterator.
    pub fn add_rows<'a, I>(&mut self, rows: I) -> XlsxResult<()>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        for row in rows {
            self.add_row(row)?;
        }
        Ok(())
    }

    /// Writes a row at an explicit 1-based index, replacing any row
    /// already there.
    pub fn set_row(&mut self, row_index: u32, row: &Row) -> XlsxResult<()> {
        self.guarded(|workbook| workbook.add_row(row, Some(row_index)))
    }

    /// The sheets of the workbook, in tab order.
    pub fn sheets(&self) -> XlsxResult<Vec<&Sheet>> {
        let session = self.opened()?;
        Ok(session
            .workbook
            .worksheets()
            .iter()
            .map(|w| w.sheet())
            .collect())
    }

    pub fn current_sheet(&self) -> XlsxResult<&Sheet> {
        Ok(self.opened()?.workbook.current_worksheet()?.sheet())
    }

    pub fn current_sheet_mut(&mut self) -> XlsxResult<&mut Sheet> {
        Ok(self.opened_mut()?.workbook.current_worksheet_mut()?.sheet_mut())
    }

    /// Routes subsequent rows to the sheet at `index` (tab order).
    pub fn set_current_sheet(&mut self, index: usize) -> XlsxResult<()> {
        self.opened_mut()?.workbook.set_current_worksheet(index)
    }

    /// Adds a sheet and routes subsequent rows to it.
    pub fn add_new_sheet(&mut self) -> XlsxResult<usize> {
        self.opened_mut()?.workbook.add_worksheet_and_make_current()
    }

    /// Makes the sheet named `name` current, creating and naming it first
    /// when no sheet has that name. Returns its position.
    pub fn select_sheet_by_name(&mut self, name: &str) -> XlsxResult<usize> {
        let session = self.opened_mut()?;
        let index = match session.workbook.worksheet_index_by_name(name) {
            Some(index) => index,
            None => {
                let index = session.workbook.add_worksheet()?;
                session.workbook.rename_worksheet(index, name)?;
                index
            }
        };
        session.workbook.set_current_worksheet(index)?;
        Ok(index)
    }

    /// Renames the sheet at `index` after validation.
    pub fn rename_sheet(&mut self, index: usize, name: &str) -> XlsxResult<()> {
        self.opened_mut()?.workbook.rename_worksheet(index, name)
    }

    /// Reorders sheet tabs by name, case-insensitively.
    pub fn sort_sheets_by_name(&mut self, reverse: bool) -> XlsxResult<()> {
        self.opened_mut()?.workbook.sort_worksheets_by_name(reverse);
        Ok(())
    }

    /// Finishes the session.
    ///
    /// A final pass assembles the package onto the output file and removes
    /// the scratch folder. An intermediate pass flushes every part and
    /// reports the scratch folder name to resume from.
    pub fn close(&mut self) -> XlsxResult<CloseOutcome> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| XlsxError::WriterState("writer is not opened".to_string()))?;

        match session.output.take() {
            Some(output) => {
                session.workbook.close(output)?;
                Ok(CloseOutcome::Finished)
            }
            None => {
                session.workbook.suspend()?;
                let name = session
                    .workbook
                    .options()
                    .temp_folder_name
                    .clone()
                    .unwrap_or_default();
                Ok(CloseOutcome::Suspended(name))
            }
        }
    }

    fn opened(&self) -> XlsxResult<&Session> {
        self.session
            .as_ref()
            .ok_or_else(|| XlsxError::WriterState("writer is not opened".to_string()))
    }

    fn opened_mut(&mut self) -> XlsxResult<&mut Session> {
        self.session
            .as_mut()
            .ok_or_else(|| XlsxError::WriterState("writer is not opened".to_string()))
    }

    /// Runs a row operation; on failure the session is abandoned and both
    /// the scratch folder and the partial output file are removed.
    fn guarded<F>(&mut self, op: F) -> XlsxResult<()>
    where
        F: FnOnce(&mut WorkbookManager) -> XlsxResult<()>,
    {
        let session = self.opened_mut()?;
        match op(&mut session.workbook) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.abandon();
                Err(err)
            }
        }
    }

    fn abandon(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.output.take();
            if let Err(cleanup_err) = session.workbook.delete_scratch() {
                log::warn!("could not remove scratch folder: {cleanup_err}");
            }
            if let Err(cleanup_err) = std::fs::remove_file(&session.output_path) {
                if cleanup_err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("could not remove partial output file: {cleanup_err}");
                }
            }
        }
    }

    fn ensure_not_opened(&self, operation: &str) -> XlsxResult<()> {
        if self.session.is_some() {
            return Err(XlsxError::already_opened(operation));
        }
        Ok(())
    }
}
