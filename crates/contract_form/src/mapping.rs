//! Field mapping: the values collected from one form submission

use crate::sections::catalog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the buyer's name, used for the download file name
pub const BUYER_NAME_KEY: &str = "comprador_nome";

/// Key → string value for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    values: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping holding the default value of every catalog field
    pub fn with_defaults() -> Self {
        catalog()
            .into_iter()
            .map(|field| (field.key, field.default))
            .collect()
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The buyer's name, if one was entered
    pub fn buyer_name(&self) -> Option<&str> {
        self.get(BUYER_NAME_KEY).filter(|name| !name.is_empty())
    }

    /// Add every entry of `other` whose key is not set yet
    pub fn merge_missing(&mut self, other: FieldMapping) {
        for (key, value) in other.values {
            self.values.entry(key).or_insert(value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_covers_catalog() {
        let mapping = FieldMapping::with_defaults();
        assert_eq!(mapping.len(), 76);
        assert_eq!(mapping.get("vendedor_1_nome"), Some("JOSÉ"));
        assert_eq!(mapping.get("data_assinatura"), Some("06 de maio de 2000"));
    }

    #[test]
    fn test_buyer_name() {
        let mut mapping = FieldMapping::new();
        assert_eq!(mapping.buyer_name(), None);

        mapping.insert(BUYER_NAME_KEY, "");
        assert_eq!(mapping.buyer_name(), None);

        mapping.insert(BUYER_NAME_KEY, "Ana Silva");
        assert_eq!(mapping.buyer_name(), Some("Ana Silva"));
    }

    #[test]
    fn test_merge_missing_keeps_existing() {
        let mut mapping: FieldMapping = [("a", "1")].into_iter().collect();
        mapping.merge_missing([("a", "x"), ("b", "2")].into_iter().collect());
        assert_eq!(mapping.get("a"), Some("1"));
        assert_eq!(mapping.get("b"), Some("2"));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let mapping: FieldMapping = [("uf_contrato", "PR")].into_iter().collect();
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"uf_contrato":"PR"}"#);

        let parsed: FieldMapping = serde_json::from_str(r#"{"uf_contrato":"SP"}"#).unwrap();
        assert_eq!(parsed.get("uf_contrato"), Some("SP"));
    }
}
