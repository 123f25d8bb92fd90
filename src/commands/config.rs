use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::config::{Config, Settings};
use crate::ingest::Capability;

/// Print the resolved settings and which extraction backends are compiled in
pub fn show(settings: &Settings) {
    println!("\n{}", "Current Configuration:".bold());
    println!("{}", "─".repeat(30).dimmed());

    match &settings.config_path {
        Some(path) => println!("  Config file: {}", path.display().to_string().dimmed()),
        None => println!("  Config file: {}", "none (using defaults)".dimmed()),
    }

    println!("  Source directory: {}", settings.source_dir.display());
    println!("  Request file: {}", settings.request_file.display());
    println!("  Output: {}", settings.output.display());
    println!("  Title: {}", settings.title);

    println!("\n{}", "Extraction Backends:".bold());
    println!("{}", "─".repeat(30).dimmed());
    for capability in Capability::ALL {
        let status = if capability.is_available() {
            "available".green().to_string()
        } else {
            format!("missing ({})", capability.install_hint())
                .red()
                .to_string()
        };
        println!("  {}: {}", capability.name(), status);
    }
}

/// Write a config file with the defaults filled in
pub fn init(path: &Path) -> Result<()> {
    Config::with_defaults().save_new(path)?;
    println!("{} Config written to {}", "✓".green(), path.display());
    Ok(())
}
