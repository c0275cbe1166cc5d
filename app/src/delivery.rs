//! Handing a generated contract to the user

use contract_form::FieldMapping;
use docx_template::{FilledDocument, DOCX_MIME_TYPE};
use std::path::{Path, PathBuf};

/// Buyer placeholder used in the file name when no buyer name was entered
const FALLBACK_BUYER: &str = "comprador";

/// `Contrato_<buyer name>.docx`, spaces in the name replaced by underscores
pub fn download_file_name(mapping: &FieldMapping) -> String {
    let buyer = mapping.buyer_name().unwrap_or(FALLBACK_BUYER);
    format!("Contrato_{}.docx", buyer.replace(' ', "_"))
}

fn disk_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// A generated contract ready to be saved or served
#[derive(Debug, Clone)]
pub struct Download {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    pub fn new(mapping: &FieldMapping, document: FilledDocument) -> Self {
        Self {
            file_name: download_file_name(mapping),
            mime_type: DOCX_MIME_TYPE,
            bytes: document.into_bytes(),
        }
    }

    /// Write the file into `dir`, creating it if needed.
    ///
    /// The file always lands directly inside `dir`: characters that would
    /// form a path or are not allowed in file names are written as `_`.
    pub fn save_into(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(disk_file_name(&self.file_name));
        std::fs::write(&path, &self.bytes)?;
        tracing::debug!(bytes = self.bytes.len(), "Wrote {}", path.display());
        Ok(path)
    }
}
