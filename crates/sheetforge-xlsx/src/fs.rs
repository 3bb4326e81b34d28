//! Scratch folder management and final package assembly.
//!
//! The workbook is staged as loose parts in a scratch folder under the
//! configured temp folder, then zipped onto the output stream on the
//! final close. Every filesystem operation is checked against the base
//! folder so a hostile temp folder name cannot escape it.

use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{XlsxError, XlsxResult};
use crate::escape::escape_attr;
use crate::options::WriterOptions;
use crate::worksheet::Worksheet;

pub const APP_NAME: &str = "Spout";

pub const CONTENT_TYPES_FILE_NAME: &str = "[Content_Types].xml";
pub const WORKBOOK_FILE_NAME: &str = "workbook.xml";
pub const WORKBOOK_RELS_FILE_NAME: &str = "workbook.xml.rels";
pub const STYLES_FILE_NAME: &str = "styles.xml";

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rIdWorkbook" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rIdCore" Type="http://schemas.openxmlformats.org/officedocument/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rIdApp" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

/// The staged package layout on disk.
#[derive(Debug)]
pub(crate) struct ScratchFs {
    base_folder: PathBuf,
    root_folder: PathBuf,
    continue_writing: bool,
}

impl ScratchFs {
    /// Creates (or re-enters, when continuing) the scratch folder tree and
    /// the static parts. Returns the scratch folder name actually used so
    /// a later pass can find it again.
    pub fn create(options: &WriterOptions) -> XlsxResult<(Self, String)> {
        let base_folder = options.temp_folder.canonicalize()?;
        let folder_name = options
            .temp_folder_name
            .clone()
            .unwrap_or_else(unique_folder_name);

        let root_folder = base_folder.join(&folder_name);
        let fs = ScratchFs {
            base_folder,
            root_folder,
            continue_writing: options.is_continuation(),
        };

        fs.create_folder(&fs.root_folder)?;
        fs.create_folder(&fs.root_folder.join("_rels"))?;
        fs.create_folder(&fs.root_folder.join("docProps"))?;
        fs.create_folder(&fs.xl_folder())?;
        fs.create_folder(&fs.xl_rels_folder())?;
        fs.create_folder(&fs.worksheets_folder())?;

        if !fs.continue_writing {
            fs.write_file(&fs.root_folder.join("_rels").join(".rels"), PACKAGE_RELS)?;
            fs.write_file(&fs.root_folder.join("docProps").join("app.xml"), &app_xml())?;
            fs.write_file(
                &fs.root_folder.join("docProps").join("core.xml"),
                &core_xml(),
            )?;
        }

        Ok((fs, folder_name))
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn xl_folder(&self) -> PathBuf {
        self.root_folder.join("xl")
    }

    fn xl_rels_folder(&self) -> PathBuf {
        self.xl_folder().join("_rels")
    }

    pub fn worksheets_folder(&self) -> PathBuf {
        self.xl_folder().join("worksheets")
    }

    pub fn styles_path(&self) -> PathBuf {
        self.xl_folder().join(STYLES_FILE_NAME)
    }

    pub fn workbook_path(&self) -> PathBuf {
        self.xl_folder().join(WORKBOOK_FILE_NAME)
    }

    /// Writes [Content_Types].xml covering every worksheet.
    pub fn create_content_types(&self, worksheets: &[Worksheet]) -> XlsxResult<()> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default ContentType="application/xml" Extension="xml"/><Default ContentType="application/vnd.openxmlformats-package.relationships+xml" Extension="rels"/><Override ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml" PartName="/xl/workbook.xml"/><Override ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml" PartName="/xl/styles.xml"/><Override ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml" PartName="/xl/sharedStrings.xml"/><Override ContentType="application/vnd.openxmlformats-package.core-properties+xml" PartName="/docProps/core.xml"/><Override ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml" PartName="/docProps/app.xml"/>"#,
        );
        for worksheet in worksheets {
            xml.push_str(&format!(
                r#"<Override ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml" PartName="/xl/worksheets/sheet{}.xml"/>"#,
                worksheet.id()
            ));
        }
        xml.push_str("</Types>");
        self.write_file(&self.root_folder.join(CONTENT_TYPES_FILE_NAME), &xml)
    }

    /// Writes xl/workbook.xml, rebuilding the sheet list so renames and
    /// reordering done during the session are reflected.
    pub fn create_workbook_file(&self, worksheets: &[Worksheet]) -> XlsxResult<()> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        for worksheet in worksheets {
            let sheet = worksheet.sheet();
            xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rIdSheet{}" state="{}"/>"#,
                escape_attr(sheet.name()),
                worksheet.id(),
                worksheet.id(),
                sheet.visibility().as_str()
            ));
        }
        xml.push_str("</sheets></workbook>");
        self.write_file(&self.workbook_path(), &xml)
    }

    /// Writes xl/_rels/workbook.xml.rels with the fixed styles and shared
    /// strings relationships plus one per worksheet.
    pub fn create_workbook_rels(&self, worksheets: &[Worksheet]) -> XlsxResult<()> {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rIdStyles" Target="styles.xml" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles"/><Relationship Id="rIdSharedStrings" Target="sharedStrings.xml" Type="http://purl.oclc.org/ooxml/officeDocument/relationships/sharedStrings"/>"#,
        );
        for worksheet in worksheets {
            xml.push_str(&format!(
                r#"<Relationship Id="rIdSheet{id}" Target="worksheets/sheet{id}.xml" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet"/>"#,
                id = worksheet.id()
            ));
        }
        xml.push_str("</Relationships>");
        self.write_file(
            &self.xl_rels_folder().join(WORKBOOK_RELS_FILE_NAME),
            &xml,
        )
    }

    /// Zips the scratch folder onto the output stream.
    ///
    /// [Content_Types].xml and at least two xl/ parts must come first for
    /// mime detection to identify the package, so those are added before
    /// the recursive walk.
    pub fn zip_to_stream<W: Write + Seek>(&self, output: W) -> XlsxResult<()> {
        let mut zip = ZipWriter::new(output);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut added: Vec<String> = Vec::new();

        for name in [
            CONTENT_TYPES_FILE_NAME.to_string(),
            format!("xl/{WORKBOOK_FILE_NAME}"),
            format!("xl/{STYLES_FILE_NAME}"),
        ] {
            self.add_zip_entry(&mut zip, &name, options)?;
            added.push(name);
        }

        self.add_folder_entries(&mut zip, &self.root_folder, &added, options)?;
        zip.finish()?;
        Ok(())
    }

    fn add_zip_entry<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        name: &str,
        options: SimpleFileOptions,
    ) -> XlsxResult<()> {
        zip.start_file(name, options)?;
        let mut file = std::fs::File::open(self.root_folder.join(name))?;
        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        zip.write_all(&contents)?;
        Ok(())
    }

    fn add_folder_entries<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        folder: &Path,
        skip: &[String],
        options: SimpleFileOptions,
    ) -> XlsxResult<()> {
        let mut entries: Vec<_> = std::fs::read_dir(folder)?.collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                self.add_folder_entries(zip, &path, skip, options)?;
                continue;
            }
            let relative = path
                .strip_prefix(&self.root_folder)
                .map_err(|_| XlsxError::PathEscape(path.clone()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if skip.iter().any(|s| s == &name) {
                continue;
            }
            self.add_zip_entry(zip, &name, options)?;
        }
        Ok(())
    }

    /// Removes the scratch folder and everything in it.
    pub fn delete_root_folder(&self) -> XlsxResult<()> {
        self.guard(&self.root_folder)?;
        std::fs::remove_dir_all(&self.root_folder)?;
        Ok(())
    }

    fn create_folder(&self, path: &Path) -> XlsxResult<()> {
        if let Some(parent) = path.parent() {
            self.guard(parent)?;
        }
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn write_file(&self, path: &Path, contents: &str) -> XlsxResult<()> {
        if let Some(parent) = path.parent() {
            self.guard(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rejects any operation whose resolved path leaves the base folder.
    fn guard(&self, path: &Path) -> XlsxResult<()> {
        let resolved = path
            .canonicalize()
            .map_err(|_| XlsxError::PathEscape(path.to_path_buf()))?;
        if !resolved.starts_with(&self.base_folder) {
            return Err(XlsxError::PathEscape(path.to_path_buf()));
        }
        Ok(())
    }
}

fn unique_folder_name() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("xlsx{}-{}", std::process::id(), nanos)
}

fn app_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
    <Application>{APP_NAME}</Application>
    <TotalTime>0</TotalTime>
</Properties>"#
    )
}

fn core_xml() -> String {
    let now = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
    <cp:revision>0</cp:revision>
</cp:coreProperties>"#
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn options_in(dir: &Path) -> WriterOptions {
        WriterOptions {
            temp_folder: dir.to_path_buf(),
            ..WriterOptions::default()
        }
    }

    #[test]
    fn create_lays_out_the_package_tree() {
        let dir = tempfile::tempdir().unwrap();
        let (fs, name) = ScratchFs::create(&options_in(dir.path())).unwrap();

        assert!(fs.root_folder().join("_rels").join(".rels").exists());
        assert!(fs.root_folder().join("docProps").join("app.xml").exists());
        assert!(fs.root_folder().join("docProps").join("core.xml").exists());
        assert!(fs.worksheets_folder().exists());
        assert!(!name.is_empty());

        let app = std::fs::read_to_string(fs.root_folder().join("docProps/app.xml")).unwrap();
        assert!(app.contains("<Application>Spout</Application>"));
        assert!(app.contains("<TotalTime>0</TotalTime>"));
    }

    #[test]
    fn fixed_folder_name_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.temp_folder_name = Some("session-a".to_string());

        let (fs, name) = ScratchFs::create(&options).unwrap();
        assert_eq!(name, "session-a");
        assert!(fs.root_folder().ends_with("session-a"));
    }

    #[test]
    fn continuation_does_not_clobber_static_parts() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options_in(dir.path());
        options.temp_folder_name = Some("session-b".to_string());
        let (fs, _) = ScratchFs::create(&options).unwrap();

        let core_path = fs.root_folder().join("docProps").join("core.xml");
        std::fs::write(&core_path, "sentinel").unwrap();

        options.loop_settings = Some(crate::options::LoopSettings { max: 2, counter: 2 });
        let (_fs2, _) = ScratchFs::create(&options).unwrap();
        assert_eq!(std::fs::read_to_string(&core_path).unwrap(), "sentinel");
    }

    #[test]
    fn escaping_folder_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("inner");
        std::fs::create_dir(&inner).unwrap();

        let mut options = options_in(&inner);
        options.temp_folder_name = Some("../outside".to_string());
        assert!(ScratchFs::create(&options).is_err());
    }
}
