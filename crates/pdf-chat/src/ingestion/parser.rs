//! PDF text extraction

use crate::error::{Error, Result};

/// Turns raw document bytes into plain text
pub trait TextExtractor: Send + Sync {
    /// Extract the text of a document; `filename` is used for error reporting
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String>;
}

/// Extractor backed by `pdf-extract`, with `lopdf` for the page check
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Count pages, failing on documents lopdf cannot load
    pub fn page_count(filename: &str, data: &[u8]) -> Result<usize> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;
        Ok(doc.get_pages().len())
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, filename: &str, data: &[u8]) -> Result<String> {
        let pages = Self::page_count(filename, data)?;
        if pages == 0 {
            return Err(Error::extraction(filename, "document has no pages"));
        }

        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::extraction(filename, e.to_string()))?;

        if content.trim().is_empty() {
            return Err(Error::extraction(filename, "no extractable text"));
        }

        tracing::debug!(
            "Extracted {} characters from '{}' ({} pages)",
            content.chars().count(),
            filename,
            pages
        );

        Ok(content)
    }
}
