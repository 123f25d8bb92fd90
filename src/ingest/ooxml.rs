//! Shared plumbing for the Office Open XML formats (docx, pptx): both are ZIP
//! archives whose text lives in XML parts.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::BytesStart;
use zip::ZipArchive;

use super::ExtractionError;

pub struct Package {
    archive: ZipArchive<File>,
    format: &'static str,
}

impl Package {
    pub fn open(path: &Path, format: &'static str) -> Result<Self, ExtractionError> {
        let file = File::open(path).map_err(|e| ExtractionError::io(path, e))?;
        let archive = ZipArchive::new(file)
            .map_err(|e| ExtractionError::parse(format, format!("not a valid archive: {}", e)))?;
        Ok(Self { archive, format })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.file_names().any(|n| n == name)
    }

    pub fn part_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Read one XML part of the package as UTF-8 text
    pub fn read_part(&mut self, name: &str) -> Result<String, ExtractionError> {
        let format = self.format;
        let mut part = self
            .archive
            .by_name(name)
            .map_err(|e| ExtractionError::parse(format, format!("missing {}: {}", name, e)))?;

        let mut xml = String::new();
        part.read_to_string(&mut xml)
            .map_err(|e| ExtractionError::parse(format, format!("unreadable {}: {}", name, e)))?;
        Ok(xml)
    }
}

/// Value of the attribute whose local name is `local`, optionally requiring a prefix
pub fn attribute(element: &BytesStart<'_>, local: &[u8], prefixed: bool) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr: &Attribute<'_>| {
            attr.key.local_name().as_ref() == local && attr.key.prefix().is_some() == prefixed
        })
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}
