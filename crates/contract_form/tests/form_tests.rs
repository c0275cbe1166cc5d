//! Form collection from the outside: surfaces, submissions, and the catalog

use contract_form::{
    catalog, collect_submission, form_outline, load_values_file, render_form, DefaultsSurface,
    FieldDef, FieldMapping, FormSurface,
};
use std::collections::VecDeque;
use tempfile::TempDir;

/// Answers inputs from a queue, falling back to the default once it runs dry
struct ScriptedSurface {
    answers: VecDeque<&'static str>,
    asked: Vec<&'static str>,
}

impl FormSurface for ScriptedSurface {
    fn text_input(&mut self, field: &FieldDef) -> String {
        self.asked.push(field.key);
        match self.answers.pop_front() {
            Some(answer) => answer.to_string(),
            None => field.default.to_string(),
        }
    }
}

#[test]
fn test_custom_surface_is_asked_in_catalog_order() {
    let mut surface = ScriptedSurface {
        answers: VecDeque::from(["MARCOS", "português"]),
        asked: Vec::new(),
    };
    let mapping = render_form(&mut surface);

    let catalog_keys: Vec<&str> = catalog().iter().map(|f| f.key).collect();
    assert_eq!(surface.asked, catalog_keys);
    assert_eq!(mapping.get("vendedor_1_nome"), Some("MARCOS"));
    assert_eq!(mapping.get("vendedor_1_nacionalidade"), Some("português"));
    assert_eq!(mapping.get("vendedor_1_estado_civil"), Some("convivente"));
}

#[test]
fn test_submission_file_round() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("valores.json");
    std::fs::write(
        &path,
        r#"{"comprador_nome": "Ana Silva", "imovel_prazo_financiamento_meses": 360}"#,
    )
    .unwrap();

    let mapping = collect_submission(load_values_file(&path).unwrap());

    assert_eq!(mapping.len(), 76);
    assert_eq!(mapping.buyer_name(), Some("Ana Silva"));
    assert_eq!(mapping.get("imovel_prazo_financiamento_meses"), Some("360"));
    assert_eq!(mapping.get("cidade_contrato"), Some("Maringá"));
}

#[test]
fn test_mapping_serializes_every_key() {
    let mapping = render_form(&mut DefaultsSurface);
    let json = serde_json::to_value(&mapping).unwrap();
    let obj = json.as_object().unwrap();

    assert_eq!(obj.len(), 76);
    assert_eq!(obj["pagamento_parcela_2_favorecido"], "Richard");

    let back: FieldMapping = serde_json::from_value(json).unwrap();
    assert_eq!(back, mapping);
}

#[test]
fn test_outline_matches_catalog() {
    let outline = form_outline();
    let outline_keys: Vec<&str> = outline
        .groups
        .iter()
        .flat_map(|g| g.blocks.iter())
        .flat_map(|b| b.fields.iter())
        .map(|f| f.field.key)
        .collect();
    let catalog_keys: Vec<&str> = catalog().iter().map(|f| f.key).collect();
    assert_eq!(outline_keys, catalog_keys);
}
