use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use tracing::{debug, info};

use crate::brief::load_site_brief;
use crate::bundle::{BundleContext, build_bundle};
use crate::config::Settings;
use crate::gather::{GatherReport, gather_sources};

/// Gather the brief and sources, write the bundle and report what was skipped
pub fn run(settings: &Settings) -> Result<()> {
    let source_dir = &settings.source_dir;
    if !source_dir.is_dir() {
        anyhow::bail!("Source directory not found: {}", source_dir.display());
    }

    let brief = load_site_brief(&settings.request_file)?;
    if brief.is_empty() {
        debug!("No site brief at {:?}", settings.request_file);
    }

    let report = gather_sources(source_dir)?;
    info!(
        "Gathered {} of {} files ({} unsupported, {} failed)",
        report.gathered.len(),
        report.total(),
        report.unsupported.len(),
        report.failures.len()
    );

    let ctx = BundleContext {
        title: settings.title.clone(),
        brief_label: settings.request_file.display().to_string(),
        source_label: source_dir.display().to_string(),
        ..BundleContext::new(Utc::now())
    };
    let bundle = build_bundle(&brief, &report.gathered, &ctx);

    let output = &settings.output;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    std::fs::write(output, &bundle)
        .with_context(|| format!("Failed to write bundle to {:?}", output))?;

    let resolved = std::fs::canonicalize(output).unwrap_or_else(|_| output.clone());
    println!(
        "✅ Context bundle written to {}",
        resolved.display().to_string().cyan()
    );

    print_report(&report);

    Ok(())
}

fn print_report(report: &GatherReport) {
    if !report.unsupported.is_empty() {
        println!("{}", "⚠️  Unsupported files (skipped):".yellow());
        for path in &report.unsupported {
            println!("   • {}", display_name(path));
        }
    }

    if !report.failures.is_empty() {
        println!("{}", "❌ Files that could not be processed:".red());
        for failure in &report.failures {
            println!("   • {}: {}", display_name(&failure.path), failure.error);
        }
    }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
