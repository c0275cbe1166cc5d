//! Package relationships (`_rels/.rels`) parsing
//!
//! Only used to locate the main document part; templates whose root
//! relationships are missing fall back to `word/document.xml`.

use crate::error::{TemplateError, TemplateResult};
use crate::xml::XmlParser;
use quick_xml::events::Event;

/// Relationship type of the main document part
pub const OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Default location of the main document part
pub const DEFAULT_DOCUMENT_PART: &str = "word/document.xml";

/// A single relationship in a .rels file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the package root for `_rels/.rels`)
    pub target: String,
}

/// Collection of relationships from a .rels file, in file order
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    relationships: Vec<Relationship>,
}

impl Relationships {
    /// Parse a .rels file from its XML content
    pub fn parse(content: &str) -> TemplateResult<Self> {
        let mut result = Self::default();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    if XmlParser::matches_element(e.name().as_ref(), "Relationship") {
                        let id = XmlParser::get_attribute(e, b"Id").ok_or_else(|| {
                            TemplateError::InvalidStructure("Relationship missing Id".into())
                        })?;
                        let rel_type = XmlParser::get_attribute(e, b"Type").ok_or_else(|| {
                            TemplateError::InvalidStructure("Relationship missing Type".into())
                        })?;
                        let target = XmlParser::get_attribute(e, b"Target").ok_or_else(|| {
                            TemplateError::InvalidStructure("Relationship missing Target".into())
                        })?;

                        result.relationships.push(Relationship { id, rel_type, target });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(TemplateError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Get a relationship by type
    pub fn get_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.rel_type == rel_type)
    }

    /// Archive path of the main document part.
    ///
    /// Targets in the root rels are package-relative; a leading `/` is dropped
    /// because ZIP entry names never carry one.
    pub fn main_document_path(&self) -> Option<String> {
        self.get_by_type(OFFICE_DOCUMENT)
            .map(|rel| rel.target.trim_start_matches('/').to_string())
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
