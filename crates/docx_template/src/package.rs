//! DOCX package reading and writing
//!
//! A template is read fully into memory: every ZIP entry is kept, in
//! archive order, together with its compression method. Writing the
//! package back replaces only the main document part.

use crate::body::DocumentBody;
use crate::error::{TemplateError, TemplateResult};
use crate::relationships::{Relationships, DEFAULT_DOCUMENT_PART};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";

/// One entry of the ZIP archive
#[derive(Debug, Clone)]
struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// A DOCX template loaded into memory, with its main document part parsed
#[derive(Debug, Clone)]
pub struct TemplateDocument {
    entries: Vec<PackageEntry>,
    main_part: String,
    body: DocumentBody,
}

impl TemplateDocument {
    /// Read a template from disk. The file is read in one go and closed
    /// before parsing starts.
    pub fn open(path: &Path) -> TemplateResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Parse a template from an in-memory DOCX
    pub fn from_bytes(bytes: &[u8]) -> TemplateResult<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Parse a template from any seekable reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> TemplateResult<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut file = archive.by_index(index)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                compression: file.compression(),
                is_dir: file.is_dir(),
                data,
            });
        }

        let find = |name: &str| entries.iter().find(|e| e.name == name);

        if find(CONTENT_TYPES_PART).is_none() {
            return Err(TemplateError::MissingPart(CONTENT_TYPES_PART.to_string()));
        }

        let main_part = match find(ROOT_RELS_PART) {
            Some(rels) => {
                let rels = Relationships::parse(&String::from_utf8(rels.data.clone())?)?;
                rels.main_document_path()
                    .unwrap_or_else(|| DEFAULT_DOCUMENT_PART.to_string())
            }
            None => DEFAULT_DOCUMENT_PART.to_string(),
        };

        let document = find(main_part.as_str())
            .ok_or_else(|| TemplateError::MissingPart(main_part.clone()))?;
        let xml = String::from_utf8(document.data.clone())?;
        let body = DocumentBody::parse(&xml)?;

        tracing::debug!(
            part = %main_part,
            entries = entries.len(),
            paragraphs = body.paragraphs().len(),
            tables = body.tables().len(),
            "Loaded DOCX template"
        );

        Ok(Self {
            entries,
            main_part,
            body,
        })
    }

    /// Archive path of the main document part
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Names of all archive entries, in archive order
    pub fn part_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut DocumentBody {
        &mut self.body
    }

    /// Serialize the package into a new DOCX byte buffer
    pub fn to_bytes(&self) -> TemplateResult<Vec<u8>> {
        let document_xml = self.body.to_xml()?;
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            let options = SimpleFileOptions::default().compression_method(
                match entry.compression {
                    CompressionMethod::Stored => CompressionMethod::Stored,
                    _ => CompressionMethod::Deflated,
                },
            );

            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), options)?;
                continue;
            }

            zip.start_file(entry.name.as_str(), options)?;
            if entry.name == self.main_part {
                zip.write_all(&document_xml)?;
            } else {
                zip.write_all(&entry.data)?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
