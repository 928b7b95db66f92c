//! Form schema helpers for the Discord-to-GitHub issue bridge.
//! This crate encodes field identities, projects option sources, builds
//! modal form descriptions, and renders them into Discord modal payloads.

pub mod field_codec;
pub mod form_builder;
pub mod issue_category;
pub mod modal_render;
pub mod option_projector;
pub mod submitted_form;

use thiserror::Error;

pub use field_codec::{decode_field_id, encode_field_id, DecodedFieldId, EncodedFieldId};
pub use form_builder::{
    build_form, FieldKind, FieldSpec, FormDescription, RenderedControl, RenderedField,
    MAX_FORM_FIELDS,
};
pub use issue_category::IssueCategory;
pub use modal_render::render_modal;
pub use option_projector::{project_options, FormOption, OptionSource, MAX_SELECT_OPTIONS};
pub use submitted_form::{SubmittedForm, SubmittedValue};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Enumerates failures raised while building forms.
pub enum FormError {
    #[error("invalid field name '{name}': must not contain '{marker}'")]
    InvalidFieldName { name: String, marker: char },
}
