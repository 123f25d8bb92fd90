use std::path::Path;
use tracing::warn;

use super::{Capability, ExtractionError, Extractor};

/// PDF files, read page by page
pub struct PdfExtractor;

impl Extractor for PdfExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::io(path, e))?;
        let pages = read_pages(&bytes)?;
        Ok(join_pages(&pages))
    }
}

type Backend = fn(&[u8]) -> Result<Vec<String>, ExtractionError>;

/// Backends in order of preference
const BACKENDS: [(Capability, Backend); 2] = [
    (Capability::PdfExtract, extract_with_pdf_extract),
    (Capability::Lopdf, extract_with_lopdf),
];

/// Try each compiled-in backend in turn; the last failure wins if all fail
fn read_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let mut last_error = None;

    for (capability, backend) in BACKENDS {
        if !capability.is_available() {
            continue;
        }
        match backend(bytes) {
            Ok(pages) => return Ok(pages),
            Err(e) => {
                warn!("{} failed, trying fallback: {}", capability.name(), e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| ExtractionError::missing("pdf", Capability::PdfExtract)))
}

/// Trim each page, drop empty ones and separate the rest with a blank line
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(feature = "pdf-extract")]
fn extract_with_pdf_extract(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf_extract can panic on complex PDFs
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(ExtractionError::parse("pdf", e)),
        Err(_) => Err(ExtractionError::parse("pdf", "pdf-extract crashed")),
    }
}

#[cfg(not(feature = "pdf-extract"))]
fn extract_with_pdf_extract(_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    Err(ExtractionError::missing("pdf", Capability::PdfExtract))
}

#[cfg(feature = "lopdf")]
fn extract_with_lopdf(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    use lopdf::Document;

    let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::parse("pdf", e))?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!("lopdf could not read page {}: {}", page_num, e),
        }
    }

    Ok(pages)
}

#[cfg(not(feature = "lopdf"))]
fn extract_with_lopdf(_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    Err(ExtractionError::missing("pdf", Capability::Lopdf))
}
