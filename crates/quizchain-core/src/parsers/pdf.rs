use crate::{Error, Result};
use lopdf::Document;

/// Extracts the text of a single PDF page
pub trait PdfPageText: Send + Sync {
    /// Text of page `page` (1-based). A page past the end yields an empty string.
    fn page_text(&self, pdf_bytes: &[u8], page: usize) -> Result<String>;
}

/// [`PdfPageText`] backed by lopdf's content-stream text extraction
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfPageText;

impl PdfPageText for LopdfPageText {
    fn page_text(&self, pdf_bytes: &[u8], page: usize) -> Result<String> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| Error::Parse(format!("PDF load failed: {e}")))?;

        // page 0 is treated as the first page
        let number = u32::try_from(page.max(1))
            .map_err(|_| Error::Parse(format!("page {page} out of range")))?;
        if !doc.get_pages().contains_key(&number) {
            tracing::debug!("PDF has no page {}", number);
            return Ok(String::new());
        }

        doc.extract_text(&[number])
            .map_err(|e| Error::Parse(format!("PDF page {number} text extraction failed: {e}")))
    }
}
