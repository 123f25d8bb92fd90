pub mod docx;
pub mod pdf;
pub mod pptx;
pub mod text;

#[cfg(any(feature = "docx", feature = "pptx"))]
mod ooxml;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single source file could not be turned into text
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The parsing backend for this format was not compiled in.
    #[error("{capability} is required to read .{format} files. Rebuild with `{hint}`.")]
    DependencyMissing {
        format: &'static str,
        capability: &'static str,
        hint: &'static str,
    },

    /// The file was readable but its contents could not be parsed.
    #[error("failed to parse .{format} file: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ExtractionError {
    pub fn parse(format: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Parse {
            format,
            message: message.to_string(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn missing(format: &'static str, capability: Capability) -> Self {
        Self::DependencyMissing {
            format,
            capability: capability.name(),
            hint: capability.install_hint(),
        }
    }
}

/// Turns one file into plain text
pub trait Extractor: Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Optional parsing backends, selected with cargo features
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Docx,
    Pptx,
    PdfExtract,
    Lopdf,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::Docx,
        Capability::Pptx,
        Capability::PdfExtract,
        Capability::Lopdf,
    ];

    pub fn is_available(self) -> bool {
        match self {
            Capability::Docx => cfg!(feature = "docx"),
            Capability::Pptx => cfg!(feature = "pptx"),
            Capability::PdfExtract => cfg!(feature = "pdf-extract"),
            Capability::Lopdf => cfg!(feature = "lopdf"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::Docx => "docx reader (zip + quick-xml)",
            Capability::Pptx => "pptx reader (zip + quick-xml)",
            Capability::PdfExtract => "pdf-extract",
            Capability::Lopdf => "lopdf",
        }
    }

    pub fn install_hint(self) -> &'static str {
        match self {
            Capability::Docx => "cargo install site-bundler --features docx",
            Capability::Pptx => "cargo install site-bundler --features pptx",
            Capability::PdfExtract | Capability::Lopdf => {
                "cargo install site-bundler --features pdf"
            }
        }
    }
}

/// Source formats with a registered extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Docx,
    Pdf,
    Pptx,
    Text,
    Markdown,
}

impl SourceKind {
    /// Match a file's extension, ignoring case. `None` means unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("docx") => Some(SourceKind::Docx),
            Some("pdf") => Some(SourceKind::Pdf),
            Some("pptx") => Some(SourceKind::Pptx),
            Some("txt") => Some(SourceKind::Text),
            Some("md") => Some(SourceKind::Markdown),
            _ => None,
        }
    }

    pub fn extractor(self) -> &'static dyn Extractor {
        match self {
            SourceKind::Docx => &docx::DocxExtractor,
            SourceKind::Pdf => &pdf::PdfExtractor,
            SourceKind::Pptx => &pptx::PptxExtractor,
            SourceKind::Text | SourceKind::Markdown => &text::TextExtractor,
        }
    }
}
