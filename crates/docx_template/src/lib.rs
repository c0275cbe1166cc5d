//! DOCX Templates
//!
//! Loads a Word document that contains `{{key}}` placeholders, replaces the
//! placeholders with values, and returns the filled document as bytes.
//!
//! # Structure
//!
//! - [`TemplateDocument`] holds every part of the DOCX package in memory and
//!   parses the main document part into a [`DocumentBody`] of paragraphs,
//!   tables, and runs.
//! - [`Substitutions`] maps placeholder tokens to values.
//! - [`fill_template`] runs the whole load → substitute → serialize pass.
//!
//! # Example
//!
//! ```no_run
//! use docx_template::{fill_template, Substitutions};
//!
//! let subs = Substitutions::from_pairs([("comprador_nome", "Ana Silva")]);
//! match fill_template(&subs, "contrato.docx") {
//!     Ok(filled) => std::fs::write("Contrato_Ana_Silva.docx", filled.bytes()).unwrap(),
//!     Err(e) if e.is_not_found() => eprintln!("missing template: {}", e),
//!     Err(e) => eprintln!("generation failed: {}", e),
//! }
//! ```

mod body;
mod error;
mod fill;
mod package;
mod relationships;
mod xml;

pub use body::{DocumentBody, Paragraph, RunId, Table, TableCell, TableRow};
pub use error::{FillError, TemplateError, TemplateResult};
pub use fill::{fill_document, fill_template, FillReport, FilledDocument, Substitutions};
pub use package::TemplateDocument;

/// MIME type of a Word document
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
