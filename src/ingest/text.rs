use std::path::Path;

use super::{ExtractionError, Extractor};

/// Plain text and markdown files
pub struct TextExtractor;

impl Extractor for TextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|e| ExtractionError::io(path, e))?;
        Ok(normalize_newlines(&decode_lenient(&bytes)).trim().to_string())
    }
}

/// Decode UTF-8, dropping any byte sequence that is not valid instead of failing
pub fn decode_lenient(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

/// Convert `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
