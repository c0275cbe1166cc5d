//! Presentation surfaces the form renders into
//!
//! A [`FormSurface`] receives the form one element at a time, in display
//! order. Layout calls (`heading`, `column`, `expander`, `divider`) carry no
//! data and default to doing nothing; `text_input` returns the value for a
//! field and is the only call a surface must implement.

use crate::field::FieldDef;
use crate::mapping::FieldMapping;

/// Rendering target for the contract form
pub trait FormSurface {
    /// A section group heading
    fn heading(&mut self, _title: &str) {}

    /// Following elements belong to the column at `index`
    fn column(&mut self, _index: usize) {}

    /// Following inputs are grouped under a collapsible block
    fn expander(&mut self, _title: &str, _expanded: bool) {}

    /// A horizontal separator between input groups
    fn divider(&mut self) {}

    /// Show an input for `field` and return its value
    fn text_input(&mut self, field: &FieldDef) -> String;
}

/// Answers every input with the field's default value
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsSurface;

impl FormSurface for DefaultsSurface {
    fn text_input(&mut self, field: &FieldDef) -> String {
        field.default.to_string()
    }
}

/// Answers inputs from previously submitted values.
///
/// Fields missing from the submission get their default.
#[derive(Debug, Clone, Default)]
pub struct PresetSurface {
    values: FieldMapping,
    answered: usize,
}

impl PresetSurface {
    pub fn new(values: FieldMapping) -> Self {
        Self { values, answered: 0 }
    }

    /// Number of inputs answered from the submission rather than defaults
    pub fn answered(&self) -> usize {
        self.answered
    }

    /// The submitted values, including keys no input asked for
    pub fn into_values(self) -> FieldMapping {
        self.values
    }
}

impl FormSurface for PresetSurface {
    fn text_input(&mut self, field: &FieldDef) -> String {
        match self.values.get(field.key) {
            Some(value) => {
                self.answered += 1;
                value.to_string()
            }
            None => field.default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELD: FieldDef = FieldDef::new("comprador_nome", "Nome do Comprador", "JOÃO");

    #[test]
    fn test_defaults_surface() {
        assert_eq!(DefaultsSurface.text_input(&FIELD), "JOÃO");
    }

    #[test]
    fn test_preset_surface_prefers_submitted_value() {
        let values: FieldMapping = [("comprador_nome", "Ana Silva")].into_iter().collect();
        let mut surface = PresetSurface::new(values);
        assert_eq!(surface.text_input(&FIELD), "Ana Silva");
        assert_eq!(surface.answered(), 1);
    }

    #[test]
    fn test_preset_surface_falls_back_to_default() {
        let mut surface = PresetSurface::new(FieldMapping::new());
        assert_eq!(surface.text_input(&FIELD), "JOÃO");
        assert_eq!(surface.answered(), 0);
    }

    #[test]
    fn test_preset_surface_keeps_empty_submission() {
        let values: FieldMapping = [("comprador_nome", "")].into_iter().collect();
        let mut surface = PresetSurface::new(values);
        assert_eq!(surface.text_input(&FIELD), "");
    }
}
