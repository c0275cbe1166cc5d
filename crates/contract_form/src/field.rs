//! Form field definitions

use serde::Serialize;

/// One text input of the contract form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDef {
    /// Mapping key, also the placeholder name in the template
    pub key: &'static str,
    /// Label shown next to the input
    pub label: &'static str,
    /// Value the input starts with
    pub default: &'static str,
}

impl FieldDef {
    pub const fn new(key: &'static str, label: &'static str, default: &'static str) -> Self {
        Self { key, label, default }
    }

    /// The `{{key}}` token this field fills
    pub fn placeholder(&self) -> String {
        format!("{{{{{}}}}}", self.key)
    }
}
