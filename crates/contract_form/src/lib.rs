//! Contract Form
//!
//! The fields of a "contrato particular de compromisso de compra e venda",
//! grouped into sections, and the machinery to collect their values.
//!
//! Sections render into a [`FormSurface`]; the values the surface returns
//! accumulate into a [`FieldMapping`] whose keys match the `{{key}}`
//! placeholders of the contract template.

mod error;
mod field;
mod mapping;
mod outline;
mod sections;
mod surface;
mod values;

pub use error::{FormError, Result};
pub use field::FieldDef;
pub use mapping::{FieldMapping, BUYER_NAME_KEY};
pub use outline::{form_outline, FormOutline, OutlineBlock, OutlineField, OutlineGroup};
pub use sections::{
    catalog, find_field, render_form, sections, BuyerSection, Expander, FinancingSection,
    FormSection, GeneralDataSection, PaymentSection, Placement, PropertySection,
    ResponsibilitiesSection, SellerSection, WitnessesSection, LAYOUT,
};
pub use surface::{DefaultsSurface, FormSurface, PresetSurface};
pub use values::{collect_submission, load_values_file, parse_values};
