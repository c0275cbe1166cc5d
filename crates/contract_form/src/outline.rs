//! Serializable description of the form, for external presentation layers

use crate::field::FieldDef;
use crate::sections::render_form;
use crate::surface::FormSurface;
use serde::Serialize;

/// The whole form as nested groups
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormOutline {
    pub groups: Vec<OutlineGroup>,
}

/// Sections sharing a heading
#[derive(Debug, Clone, Serialize)]
pub struct OutlineGroup {
    pub heading: String,
    pub blocks: Vec<OutlineBlock>,
}

/// One expander with its inputs
#[derive(Debug, Clone, Serialize)]
pub struct OutlineBlock {
    pub column: usize,
    pub title: String,
    pub expanded: bool,
    pub fields: Vec<OutlineField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineField {
    #[serde(flatten)]
    pub field: FieldDef,
    /// A divider is drawn above this input
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub divider_before: bool,
}

impl FormOutline {
    pub fn field_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| g.blocks.iter())
            .map(|b| b.fields.len())
            .sum()
    }
}

/// Builds a [`FormOutline`] from the surface calls of one render pass
#[derive(Debug, Default)]
struct OutlineSurface {
    outline: FormOutline,
    column: usize,
    pending_divider: bool,
}

impl OutlineSurface {
    fn current_group(&mut self) -> &mut OutlineGroup {
        if self.outline.groups.is_empty() {
            self.outline.groups.push(OutlineGroup {
                heading: String::new(),
                blocks: Vec::new(),
            });
        }
        let last = self.outline.groups.len() - 1;
        &mut self.outline.groups[last]
    }
}

impl FormSurface for OutlineSurface {
    fn heading(&mut self, title: &str) {
        self.outline.groups.push(OutlineGroup {
            heading: title.to_string(),
            blocks: Vec::new(),
        });
    }

    fn column(&mut self, index: usize) {
        self.column = index;
    }

    fn expander(&mut self, title: &str, expanded: bool) {
        let column = self.column;
        self.pending_divider = false;
        self.current_group().blocks.push(OutlineBlock {
            column,
            title: title.to_string(),
            expanded,
            fields: Vec::new(),
        });
    }

    fn divider(&mut self) {
        self.pending_divider = true;
    }

    fn text_input(&mut self, field: &FieldDef) -> String {
        let divider_before = std::mem::take(&mut self.pending_divider);
        if let Some(block) = self.current_group().blocks.last_mut() {
            block.fields.push(OutlineField {
                field: *field,
                divider_before,
            });
        }
        field.default.to_string()
    }
}

/// Describe the form layout, sections, and fields
pub fn form_outline() -> FormOutline {
    let mut surface = OutlineSurface::default();
    render_form(&mut surface);
    surface.outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_structure() {
        let outline = form_outline();
        assert_eq!(outline.field_count(), 76);

        let headings: Vec<&str> = outline.groups.iter().map(|g| g.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "Partes Envolvidas",
                "Dados do Imóvel e Contrato",
                "Cláusulas Adicionais e Assinaturas"
            ]
        );

        let last_group = &outline.groups[2];
        let columns: Vec<(usize, &str)> = last_group
            .blocks
            .iter()
            .map(|b| (b.column, b.title.as_str()))
            .collect();
        assert_eq!(
            columns,
            vec![
                (0, "Responsabilidades (IPTU e Financiamento)"),
                (1, "Testemunhas"),
                (1, "Dados Gerais do Contrato"),
            ]
        );
    }

    #[test]
    fn test_dividers_are_attached_to_following_input() {
        let outline = form_outline();
        let witnesses = outline.groups[2]
            .blocks
            .iter()
            .find(|b| b.title == "Testemunhas")
            .unwrap();
        let marks: Vec<(&str, bool)> = witnesses
            .fields
            .iter()
            .map(|f| (f.field.key, f.divider_before))
            .collect();
        assert_eq!(
            marks,
            vec![
                ("testemunha_1_nome", false),
                ("testemunha_1_cpf", false),
                ("testemunha_2_nome", true),
                ("testemunha_2_cpf", false),
            ]
        );
    }

    #[test]
    fn test_outline_json_shape() {
        let json = serde_json::to_value(form_outline()).unwrap();
        let first = &json["groups"][0]["blocks"][0]["fields"][0];
        assert_eq!(first["key"], "vendedor_1_nome");
        assert_eq!(first["label"], "Nome do Vendedor 1");
        assert_eq!(first["default"], "JOSÉ");
        assert!(first.get("divider_before").is_none());
    }
}
