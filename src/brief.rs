use anyhow::{Context, Result};
use std::path::Path;

use crate::ingest::text::normalize_newlines;

/// Load the site brief, or an empty string if there is none yet
pub fn load_site_brief(path: &Path) -> Result<String> {
    if !path.exists() {
        return Ok(String::new());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read site brief: {:?}", path))?;
    Ok(normalize_newlines(&content).trim().to_string())
}
