//! Markdown rendering of the context bundle.
//!
//! The bundle is rebuilt from scratch on every run: a title and timestamp,
//! the site brief as a YAML block, then one section per gathered source file.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::gather::SourceText;

pub const DEFAULT_TITLE: &str = "Website Request Bundle";

/// Everything the rendered bundle needs besides the content itself
#[derive(Debug, Clone)]
pub struct BundleContext {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    /// How the brief file is referred to in headings and hints
    pub brief_label: String,
    /// How the source directory is referred to in hints
    pub source_label: String,
}

impl BundleContext {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            title: DEFAULT_TITLE.to_string(),
            brief_label: "request/site-brief.yaml".to_string(),
            source_label: "source".to_string(),
        }
    }

    fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Render the bundle. Same inputs and timestamp give byte-identical output.
pub fn build_bundle(brief: &str, sources: &[SourceText], ctx: &BundleContext) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", ctx.title));
    lines.push(format!("Generated: {}", ctx.timestamp()));
    lines.push(String::new());

    let brief_label = sanitize_heading(&ctx.brief_label);
    if brief.is_empty() {
        lines.push("## Site Brief".to_string());
        lines.push(format!(
            "_No site brief found. Fill out `{}` to capture your requirements._",
            brief_label
        ));
        lines.push(String::new());
    } else {
        lines.push(format!("## Site Brief (`{}`)", brief_label));
        push_fenced(&mut lines, "yaml", brief);
        lines.push(String::new());
    }

    lines.push("## Source Material".to_string());
    if sources.is_empty() {
        let source_label = sanitize_heading(ctx.source_label.trim_end_matches('/'));
        lines.push(format!(
            "_No supported source files discovered in the `{}/` directory._",
            source_label
        ));
    } else {
        for source in sources {
            let name = source
                .path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| source.path.display().to_string());
            lines.push(format!("### {}", sanitize_heading(&name)));

            if source.text.is_empty() {
                lines.push("_No extractable text content found._".to_string());
            } else {
                push_fenced(&mut lines, "text", &source.text);
            }
            lines.push(String::new());
        }
    }

    format!("{}\n", lines.join("\n").trim())
}

/// Backticks would close inline code in headings; swap them for ’
pub fn sanitize_heading(text: &str) -> String {
    text.replace('`', "\u{2019}")
}

fn push_fenced(lines: &mut Vec<String>, info: &str, body: &str) {
    let fence = fence_for(body);
    lines.push(format!("{}{}", fence, info));
    lines.push(body.to_string());
    lines.push(fence);
}

/// Three backticks, or one more than the longest backtick run in `body`
fn fence_for(body: &str) -> String {
    let mut longest = 0;
    let mut current = 0;
    for c in body.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    let width = if longest >= 3 { longest + 1 } else { 3 };
    "`".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::path::PathBuf;

    fn ctx() -> BundleContext {
        BundleContext::new(Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 5).unwrap())
    }

    fn source(name: &str, text: &str) -> SourceText {
        SourceText {
            path: PathBuf::from("source").join(name),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_header_and_timestamp() {
        let bundle = build_bundle("", &[], &ctx());
        assert!(bundle.starts_with(
            "# Website Request Bundle\nGenerated: 2026-10-19T12:30:05+00:00\n\n"
        ));
    }

    #[test]
    fn test_brief_in_yaml_block() {
        let bundle = build_bundle("goal: test", &[], &ctx());
        assert!(bundle.contains(
            "## Site Brief (`request/site-brief.yaml`)\n```yaml\ngoal: test\n```\n"
        ));
        assert!(!bundle.contains("No site brief found"));
    }

    #[test]
    fn test_missing_brief_placeholder() {
        let bundle = build_bundle("", &[source("a.txt", "x")], &ctx());
        assert!(bundle.contains(
            "_No site brief found. Fill out `request/site-brief.yaml` to capture your requirements._"
        ));
        assert!(!bundle.contains("```yaml"));
    }

    #[test]
    fn test_no_sources_placeholder() {
        let bundle = build_bundle("goal: test", &[], &ctx());
        assert!(bundle.ends_with(
            "## Source Material\n_No supported source files discovered in the `source/` directory._\n"
        ));
    }

    #[test]
    fn test_backtick_in_file_name() {
        let bundle = build_bundle("", &[source("a`b.txt", "hello")], &ctx());
        assert!(bundle.contains("### a\u{2019}b.txt\n```text\nhello\n```\n"));
        assert!(!bundle.contains("a`b"));
    }

    #[test]
    fn test_empty_source_text_placeholder() {
        let bundle = build_bundle("", &[source("blank.pdf", "")], &ctx());
        assert!(bundle.contains("### blank.pdf\n_No extractable text content found._\n"));
    }

    #[test]
    fn test_single_trailing_newline() {
        let bundle = build_bundle("", &[source("a.txt", "x"), source("b.txt", "y")], &ctx());
        assert!(bundle.ends_with("```\n"));
        assert!(!bundle.ends_with("\n\n"));
        assert!(bundle.find("### a.txt").unwrap() < bundle.find("### b.txt").unwrap());
    }

    #[test]
    fn test_only_timestamp_differs_between_runs() {
        let sources = vec![source("notes.txt", "Hi there")];
        let first = build_bundle("goal: test", &sources, &ctx());
        let later = BundleContext::new(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
        let second = build_bundle("goal: test", &sources, &later);

        let strip = |s: &str| -> Vec<String> {
            s.lines()
                .filter(|l| !l.starts_with("Generated: "))
                .map(str::to_string)
                .collect()
        };
        assert_ne!(first, second);
        assert_eq!(strip(&first), strip(&second));
        assert_eq!(first, build_bundle("goal: test", &sources, &ctx()));
    }

    #[test]
    fn test_fence_grows_past_embedded_fences() {
        let text = "Example:\n```rust\nfn main() {}\n```";
        let bundle = build_bundle("", &[source("readme.md", text)], &ctx());
        assert!(bundle.contains(&format!("````text\n{}\n````", text)));
    }

    #[test]
    fn test_custom_labels() {
        let mut ctx = ctx();
        ctx.title = "Docs Bundle".to_string();
        ctx.brief_label = "brief.yaml".to_string();
        ctx.source_label = "inputs/".to_string();

        let bundle = build_bundle("", &[], &ctx);
        assert!(bundle.starts_with("# Docs Bundle\n"));
        assert!(bundle.contains("Fill out `brief.yaml`"));
        assert!(bundle.contains("in the `inputs/` directory"));
    }
}
