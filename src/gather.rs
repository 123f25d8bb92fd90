use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ingest::{ExtractionError, SourceKind};

/// Text pulled out of one source file
#[derive(Debug, Clone)]
pub struct SourceText {
    pub path: PathBuf,
    pub text: String,
}

/// A source file whose extractor failed
#[derive(Debug)]
pub struct SourceFailure {
    pub path: PathBuf,
    pub error: ExtractionError,
}

/// Every file of the source directory lands in exactly one of these
#[derive(Debug, Default)]
pub struct GatherReport {
    pub gathered: Vec<SourceText>,
    pub unsupported: Vec<PathBuf>,
    pub failures: Vec<SourceFailure>,
}

impl GatherReport {
    pub fn total(&self) -> usize {
        self.gathered.len() + self.unsupported.len() + self.failures.len()
    }
}

/// Extract every direct file of `dir`, in path order.
///
/// Subdirectories are ignored. A failing extractor only affects its own file.
pub fn gather_sources(dir: &Path) -> Result<GatherReport> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory: {:?}", dir))?
    {
        let path = entry
            .with_context(|| format!("Failed to read source directory: {:?}", dir))?
            .path();
        if !path.is_dir() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut report = GatherReport::default();

    for path in paths {
        let Some(kind) = SourceKind::from_path(&path) else {
            debug!("No extractor for {:?}", path);
            report.unsupported.push(path);
            continue;
        };

        debug!("Extracting {:?} as {:?}", path, kind);
        match kind.extractor().extract(&path) {
            Ok(text) => report.gathered.push(SourceText {
                text: text.trim().to_string(),
                path,
            }),
            Err(error) => {
                debug!("Extraction failed for {:?}: {}", path, error);
                report.failures.push(SourceFailure { path, error });
            }
        }
    }

    Ok(report)
}
