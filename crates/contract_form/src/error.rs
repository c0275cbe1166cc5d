//! Error types for form collection

use thiserror::Error;

/// Errors that can occur while loading submitted form values
#[derive(Debug, Error)]
pub enum FormError {
    /// IO error reading a values file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing JSON data
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Well-formed JSON that is not a flat object of scalars
    #[error("Invalid form values: {0}")]
    InvalidValues(String),
}

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;
