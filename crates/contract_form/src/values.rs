//! Submitted values loading
//!
//! A submission is a flat JSON object of field keys to values. Strings are
//! taken as they are, other scalars are written out as text, and `null`
//! becomes the empty string.

use crate::error::{FormError, Result};
use crate::mapping::FieldMapping;
use crate::sections::{find_field, render_form};
use crate::surface::PresetSurface;
use serde_json::{Map, Value as JsonValue};
use std::path::Path;

/// Parse submitted values from a JSON file
pub fn load_values_file(path: impl AsRef<Path>) -> Result<FieldMapping> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    tracing::debug!("Loading form values from {}", path.display());
    parse_values(&content)
}

/// Parse submitted values from a JSON string
pub fn parse_values(content: &str) -> Result<FieldMapping> {
    let json: JsonValue = serde_json::from_str(content)?;
    match json {
        JsonValue::Object(obj) => values_from_object(obj),
        other => Err(FormError::InvalidValues(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn values_from_object(obj: Map<String, JsonValue>) -> Result<FieldMapping> {
    let mut mapping = FieldMapping::new();

    for (key, value) in obj {
        let text = match value {
            JsonValue::String(s) => s,
            JsonValue::Number(n) => n.to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Null => String::new(),
            other => {
                return Err(FormError::InvalidValues(format!(
                    "value of '{}' must be a scalar, found {}",
                    key,
                    json_kind(&other)
                )));
            }
        };

        if find_field(&key).is_none() {
            tracing::warn!(key = %key, "Submitted value does not belong to any form field");
        }
        mapping.insert(key, text);
    }

    Ok(mapping)
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Run the form against submitted values.
///
/// Fields the submission leaves out get their defaults; submitted keys
/// that no field asks for are kept as they are.
pub fn collect_submission(values: FieldMapping) -> FieldMapping {
    let mut surface = PresetSurface::new(values);
    let mut mapping = render_form(&mut surface);
    tracing::debug!(answered = surface.answered(), "Collected submitted values");
    mapping.merge_missing(surface.into_values());
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_strings() {
        let mapping = parse_values(r#"{"comprador_nome": "Ana Silva", "uf_contrato": "SP"}"#).unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("comprador_nome"), Some("Ana Silva"));
    }

    #[test]
    fn test_scalars_are_stringified() {
        let mapping = parse_values(
            r#"{"imovel_prazo_financiamento_meses": 420, "imovel_area_privativa": 99.95, "x": true, "numero_registro": null}"#,
        )
        .unwrap();
        assert_eq!(mapping.get("imovel_prazo_financiamento_meses"), Some("420"));
        assert_eq!(mapping.get("imovel_area_privativa"), Some("99.95"));
        assert_eq!(mapping.get("x"), Some("true"));
        assert_eq!(mapping.get("numero_registro"), Some(""));
    }

    #[test]
    fn test_nested_values_are_rejected() {
        let err = parse_values(r#"{"comprador_nome": {"first": "Ana"}}"#).unwrap_err();
        assert!(matches!(err, FormError::InvalidValues(ref msg) if msg.contains("comprador_nome")));

        assert!(matches!(
            parse_values(r#"{"testemunhas": ["VICTOR", "SOFIA"]}"#),
            Err(FormError::InvalidValues(_))
        ));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(matches!(
            parse_values(r#"["comprador_nome"]"#),
            Err(FormError::InvalidValues(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_values("{not json"), Err(FormError::JsonParse(_))));
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let mapping = parse_values(r#"{"campo_extra": "valor"}"#).unwrap();
        assert_eq!(mapping.get("campo_extra"), Some("valor"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"comprador_nome": "Ana Silva"}}"#).unwrap();

        let mapping = load_values_file(file.path()).unwrap();
        assert_eq!(mapping.buyer_name(), Some("Ana Silva"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_values_file("/nonexistent/valores.json"),
            Err(FormError::Io(_))
        ));
    }

    #[test]
    fn test_collect_submission_fills_gaps_with_defaults() {
        let values: FieldMapping = [("comprador_nome", "Ana Silva"), ("campo_extra", "x")]
            .into_iter()
            .collect();
        let mapping = collect_submission(values);

        assert_eq!(mapping.len(), 77);
        assert_eq!(mapping.get("comprador_nome"), Some("Ana Silva"));
        assert_eq!(mapping.get("vendedor_1_nome"), Some("JOSÉ"));
        assert_eq!(mapping.get("campo_extra"), Some("x"));
    }
}
