//! The xl/sharedStrings.xml part.
//!
//! Strings are accumulated in memory and the part is written out when the
//! workbook closes or suspends. Ids are zero-based insertion indices; no
//! deduplication is attempted, so count and uniqueCount always agree. A
//! resumed session reloads the part first so ids written by earlier passes
//! stay valid.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::XlsxResult;
use crate::escape::{decode_control_sequences, escape};

pub const SHARED_STRINGS_FILE_NAME: &str = "sharedStrings.xml";

const SST_NAMESPACE: &str = "http://purl.oclc.org/ooxml/spreadsheetml/main";

/// Accumulates shared strings for a workbook.
#[derive(Debug)]
pub struct SharedStrings {
    path: PathBuf,
    strings: Vec<String>,
}

impl SharedStrings {
    /// Opens the shared strings table for the given xl folder, reloading
    /// any part left behind by a previous pass.
    pub fn open(xl_folder: &Path) -> XlsxResult<Self> {
        let path = xl_folder.join(SHARED_STRINGS_FILE_NAME);
        let strings = if path.exists() {
            let file = std::fs::File::open(&path)?;
            read_strings(std::io::BufReader::new(file))?
        } else {
            Vec::new()
        };
        Ok(SharedStrings { path, strings })
    }

    /// Adds a string and returns its zero-based id.
    pub fn write_string(&mut self, string: &str) -> u32 {
        self.strings.push(string.to_string());
        (self.strings.len() - 1) as u32
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Writes the part with final counts.
    pub fn close(&self) -> XlsxResult<()> {
        let mut file = std::io::BufWriter::new(std::fs::File::create(&self.path)?);
        write!(
            file,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="{}" count="{count}" uniqueCount="{count}">"#,
            SST_NAMESPACE,
            count = self.strings.len()
        )?;
        for string in &self.strings {
            write!(
                file,
                r#"<si><t xml:space="preserve">{}</t></si>"#,
                escape(string)
            )?;
        }
        file.write_all(b"</sst>")?;
        file.flush()?;
        Ok(())
    }
}

fn read_strings<R: BufRead>(reader: R) -> XlsxResult<Vec<String>> {
    let mut xml = Reader::from_reader(reader);
    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut in_t = false;
    let mut current = String::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(start) if start.local_name().as_ref() == b"t" => {
                in_t = true;
                current.clear();
            }
            Event::Empty(start) if start.local_name().as_ref() == b"t" => {
                strings.push(String::new());
            }
            Event::Text(text) if in_t => {
                current.push_str(&text.unescape()?);
            }
            Event::End(end) if end.local_name().as_ref() == b"t" => {
                in_t = false;
                strings.push(decode_control_sequences(&current));
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}
