use std::path::Path;

use super::{ExtractionError, Extractor};

/// Word documents: body paragraphs and table rows, in document order
pub struct DocxExtractor;

impl Extractor for DocxExtractor {
    #[cfg(feature = "docx")]
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let mut package = super::ooxml::Package::open(path, "docx")?;
        let xml = package.read_part("word/document.xml")?;
        Ok(document_text(&xml)?.join("\n"))
    }

    #[cfg(not(feature = "docx"))]
    fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
        Err(ExtractionError::missing("docx", super::Capability::Docx))
    }
}

/// Walk `word/document.xml` and return one line per non-empty paragraph or table row.
///
/// Only paragraphs directly in the body become lines. Paragraphs inside a
/// top-level table cell make up that cell's text; cells of a row are joined
/// with ` | `. Nested tables, text boxes and alternate-content fallbacks are
/// skipped so nothing is emitted twice.
#[cfg(feature = "docx")]
fn document_text(xml: &str) -> Result<Vec<String>, ExtractionError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();

    let mut table_depth = 0usize;
    let mut skip_depth = 0usize;
    let mut run_depth = 0usize;
    let mut in_text = false;
    let mut paragraph: Option<String> = None;
    let mut cell: Vec<String> = Vec::new();
    let mut row: Vec<String> = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::parse("docx", format!("XML error: {}", e)))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"Fallback" | b"txbxContent" => skip_depth += 1,
                _ if skip_depth > 0 => {}
                b"tbl" => table_depth += 1,
                b"tr" if table_depth == 1 => row.clear(),
                b"tc" if table_depth == 1 => cell.clear(),
                b"p" if table_depth <= 1 => paragraph = Some(String::new()),
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                _ if skip_depth > 0 => {}
                b"p" if table_depth == 1 => cell.push(String::new()),
                b"tab" if run_depth > 0 => push_text(&mut paragraph, "\t"),
                b"br" | b"cr" if run_depth > 0 => push_text(&mut paragraph, "\n"),
                _ => {}
            },
            Event::Text(e) => {
                if in_text && skip_depth == 0 {
                    let text = e
                        .unescape()
                        .map_err(|e| ExtractionError::parse("docx", format!("XML error: {}", e)))?;
                    push_text(&mut paragraph, &text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Fallback" | b"txbxContent" => skip_depth = skip_depth.saturating_sub(1),
                _ if skip_depth > 0 => {}
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                b"tr" if table_depth == 1 => {
                    let cells: Vec<&str> = row
                        .iter()
                        .map(|c| c.as_str())
                        .filter(|c| !c.is_empty())
                        .collect();
                    if !cells.is_empty() {
                        lines.push(cells.join(" | "));
                    }
                }
                b"tc" if table_depth == 1 => row.push(cell.join("\n").trim().to_string()),
                b"p" if table_depth <= 1 => {
                    if let Some(text) = paragraph.take() {
                        if table_depth == 1 {
                            cell.push(text);
                        } else {
                            let text = text.trim();
                            if !text.is_empty() {
                                lines.push(text.to_string());
                            }
                        }
                    }
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(lines)
}

#[cfg(feature = "docx")]
fn push_text(paragraph: &mut Option<String>, text: &str) {
    if let Some(buffer) = paragraph {
        buffer.push_str(text);
    }
}

#[cfg(all(test, feature = "docx"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:body>{}</w:body>
</w:document>"#,
            body
        )
    }

    fn write_docx(dir: &TempDir, name: &str, document_xml: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
        path
    }

    #[test]
    fn test_paragraphs_are_trimmed_and_empty_ones_dropped() {
        let xml = wrap(
            r#"<w:p><w:r><w:t xml:space="preserve">  Welcome to </w:t></w:r><w:r><w:t>Acme</w:t></w:r></w:p>
               <w:p/>
               <w:p><w:r><w:t>   </w:t></w:r></w:p>
               <w:p><w:r><w:t>Tom &amp; Jerry</w:t></w:r></w:p>"#,
        );
        let lines = document_text(&xml).unwrap();
        assert_eq!(lines, vec!["Welcome to Acme", "Tom & Jerry"]);
    }

    #[test]
    fn test_table_rows_join_non_empty_cells() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Pricing</w:t></w:r></w:p>
               <w:tbl>
                 <w:tr>
                   <w:tc><w:p><w:r><w:t>Plan</w:t></w:r></w:p></w:tc>
                   <w:tc><w:p/></w:tc>
                   <w:tc><w:p><w:r><w:t> Price </w:t></w:r></w:p></w:tc>
                 </w:tr>
                 <w:tr>
                   <w:tc><w:p/></w:tc>
                 </w:tr>
                 <w:tr>
                   <w:tc><w:p><w:r><w:t>Basic</w:t></w:r></w:p></w:tc>
                   <w:tc><w:p><w:r><w:t>$10</w:t></w:r></w:p></w:tc>
                 </w:tr>
               </w:tbl>
               <w:p><w:r><w:t>Contact us</w:t></w:r></w:p>"#,
        );
        let lines = document_text(&xml).unwrap();
        assert_eq!(
            lines,
            vec!["Pricing", "Plan | Price", "Basic | $10", "Contact us"]
        );
    }

    #[test]
    fn test_tabs_and_breaks_inside_runs() {
        let xml = wrap(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
               <w:r><w:t>Name</w:t><w:tab/><w:t>Role</w:t><w:br/><w:t>Next</w:t></w:r></w:p>"#,
        );
        let lines = document_text(&xml).unwrap();
        assert_eq!(lines, vec!["Name\tRole\nNext"]);
    }

    #[test]
    fn test_alternate_content_fallback_is_skipped() {
        let xml = wrap(
            r#"<w:p><w:r><w:t>Shown</w:t></w:r>
               <mc:AlternateContent xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006">
                 <mc:Choice Requires="wps"><w:r><w:t> once</w:t></w:r></mc:Choice>
                 <mc:Fallback><w:r><w:t> twice</w:t></w:r></mc:Fallback>
               </mc:AlternateContent></w:p>"#,
        );
        let lines = document_text(&xml).unwrap();
        assert_eq!(lines, vec!["Shown once"]);
    }

    #[test]
    fn test_extract_reads_archive() {
        let dir = TempDir::new().unwrap();
        let path = write_docx(
            &dir,
            "brief.docx",
            &wrap(r#"<w:p><w:r><w:t>This is a test DOCX document.</w:t></w:r></w:p>"#),
        );

        let text = DocxExtractor.extract(&path).unwrap();
        assert_eq!(text, "This is a test DOCX document.");
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.docx");
        std::fs::write(&path, "not a zip").unwrap();

        let err = DocxExtractor.extract(&path).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { format: "docx", .. }));
    }
}
