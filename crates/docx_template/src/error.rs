//! Error types for template operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, editing, or writing a DOCX template
#[derive(Debug, Error)]
pub enum TemplateError {
    /// IO error (permission denied, truncated read, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// XML parsing or writing error
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Invalid DOCX structure
    #[error("Invalid DOCX structure: {0}")]
    InvalidStructure(String),

    /// Missing required part
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// UTF-8 encoding error
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::Error> for TemplateError {
    fn from(err: quick_xml::Error) -> Self {
        TemplateError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for TemplateError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        TemplateError::XmlParse(format!("Attribute error: {}", err))
    }
}

/// Result type for template operations
pub type TemplateResult<T> = std::result::Result<T, TemplateError>;

/// The two failures a caller of [`crate::fill_template`] has to tell apart
#[derive(Debug, Error)]
pub enum FillError {
    /// The template path does not resolve to an existing file
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// Anything else that went wrong while loading, substituting, or serializing
    #[error("{0}")]
    Unexpected(#[from] TemplateError),
}

impl FillError {
    /// Whether this is the missing-template condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, FillError::TemplateNotFound { .. })
    }
}
