//! Contracts for the byte-level parsers the derivation pipeline consumes.
//!
//! The pipeline only depends on these traits. A CSV summer and a PDF text
//! extractor ship here; audio transcription is supplied by the caller.

mod audio;
mod csv;
mod pdf;

pub use audio::Transcriber;
pub use csv::{ColumnSums, CsvColumnSummer, SimpleCsvSummer};
pub use pdf::{LopdfPageText, PdfPageText};
