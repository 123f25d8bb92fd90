use std::path::Path;

use super::{ExtractionError, Extractor};

/// PowerPoint decks: one `Slide N:` block per slide that carries text
pub struct PptxExtractor;

impl Extractor for PptxExtractor {
    #[cfg(feature = "pptx")]
    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let mut package = super::ooxml::Package::open(path, "pptx")?;
        let mut blocks = Vec::new();

        // N counts every slide in the deck, including the ones we leave out.
        for (index, part) in slide_parts(&mut package)?.iter().enumerate() {
            let xml = package.read_part(part)?;
            let shapes = shape_texts(&xml)?;
            if !shapes.is_empty() {
                blocks.push(format!("Slide {}:\n{}", index + 1, shapes.join("\n")));
            }
        }

        Ok(blocks.join("\n\n"))
    }

    #[cfg(not(feature = "pptx"))]
    fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
        Err(ExtractionError::missing("pptx", super::Capability::Pptx))
    }
}

#[cfg(feature = "pptx")]
const PRESENTATION: &str = "ppt/presentation.xml";
#[cfg(feature = "pptx")]
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

/// Archive paths of the slides, in presentation order.
///
/// The order comes from `p:sldIdLst` resolved through the presentation's
/// relationships. Packages without those parts fall back to the numeric
/// order of `ppt/slides/slideN.xml`.
#[cfg(feature = "pptx")]
fn slide_parts(package: &mut super::ooxml::Package) -> Result<Vec<String>, ExtractionError> {
    if !package.has_part(PRESENTATION) || !package.has_part(PRESENTATION_RELS) {
        return Ok(numbered_slide_parts(&package.part_names()));
    }

    let ids = slide_relationship_ids(&package.read_part(PRESENTATION)?)?;
    let targets = relationship_targets(&package.read_part(PRESENTATION_RELS)?)?;

    ids.iter()
        .map(|id| {
            targets
                .iter()
                .find(|(rel_id, _)| rel_id == id)
                .map(|(_, target)| resolve_target(target))
                .ok_or_else(|| {
                    ExtractionError::parse("pptx", format!("slide relationship {} not found", id))
                })
        })
        .collect()
}

#[cfg(feature = "pptx")]
fn numbered_slide_parts(names: &[String]) -> Vec<String> {
    let mut slides: Vec<(u32, &String)> = names
        .iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix("ppt/slides/slide")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name))
        })
        .collect();
    slides.sort();
    slides.into_iter().map(|(_, name)| name.clone()).collect()
}

/// Relationship targets are relative to `ppt/` unless they start with `/`
#[cfg(feature = "pptx")]
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

#[cfg(feature = "pptx")]
fn slide_relationship_ids(xml: &str) -> Result<Vec<String>, ExtractionError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut ids = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                if let Some(id) = super::ooxml::attribute(&e, b"id", true) {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ids)
}

#[cfg(feature = "pptx")]
fn relationship_targets(xml: &str) -> Result<Vec<(String, String)>, ExtractionError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut targets = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = super::ooxml::attribute(&e, b"Id", false);
                let target = super::ooxml::attribute(&e, b"Target", false);
                if let (Some(id), Some(target)) = (id, target) {
                    targets.push((id, target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(targets)
}

/// Trimmed, non-empty text of each top-level shape on a slide.
///
/// A shape's text is its paragraphs joined by newlines. Group shapes,
/// pictures and graphic frames carry no text of their own and are skipped.
#[cfg(feature = "pptx")]
fn shape_texts(xml: &str) -> Result<Vec<String>, ExtractionError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();

    let mut group_depth = 0usize;
    let mut shape: Option<Vec<String>> = None;
    let mut paragraph: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth += 1,
                b"sp" if group_depth == 0 => shape = Some(Vec::new()),
                b"p" if shape.is_some() => paragraph = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraphs) = shape.as_mut() {
                        paragraphs.push(String::new());
                    }
                }
                b"br" => {
                    if let Some(buffer) = paragraph.as_mut() {
                        buffer.push('\n');
                    }
                }
                _ => {}
            },
            Event::Text(e) => {
                if in_text {
                    if let Some(buffer) = paragraph.as_mut() {
                        buffer.push_str(&e.unescape().map_err(xml_error)?);
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"grpSp" => group_depth = group_depth.saturating_sub(1),
                b"sp" if group_depth == 0 => {
                    if let Some(paragraphs) = shape.take() {
                        let text = paragraphs.join("\n");
                        let text = text.trim();
                        if !text.is_empty() {
                            texts.push(text.to_string());
                        }
                    }
                }
                b"p" => {
                    if let (Some(paragraphs), Some(text)) = (shape.as_mut(), paragraph.take()) {
                        paragraphs.push(text);
                    }
                }
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(texts)
}

#[cfg(feature = "pptx")]
fn xml_error(e: quick_xml::Error) -> ExtractionError {
    ExtractionError::parse("pptx", format!("XML error: {}", e))
}
