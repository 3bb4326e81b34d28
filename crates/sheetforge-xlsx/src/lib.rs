//! # sheetforge-xlsx
//!
//! Streaming XLSX (Office Open XML) writer for sheetforge.
//!
//! Rows are serialized and flushed as they are added, so memory use stays
//! flat no matter how many rows a workbook holds. Sessions can also be
//! split across multiple process runs with [`LoopSettings`]: intermediate
//! passes park the staged package parts in a scratch folder and the final
//! pass assembles them into the output file.

pub mod error;
pub mod options;
pub mod writer;

mod escape;
mod fs;
mod shared_strings;
mod sheet_doc;
mod styles;
mod workbook;
mod worksheet;

pub use error::{XlsxError, XlsxResult};
pub use options::{LoopSettings, WriterOptions};
pub use writer::{CloseOutcome, Writer};
