//! Builds renderable form descriptions from ordered field specifications.

use crate::field_codec::{encode_field_id, EncodedFieldId};
use crate::option_projector::{project_options, FormOption};
use crate::FormError;

/// Discord's limit on top-level components in one modal.
pub const MAX_FORM_FIELDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    TextShort,
    TextLong,
    ChoiceSingle,
    ChoiceMultiple,
}

impl FieldKind {
    pub fn is_choice(self) -> bool {
        matches!(self, Self::ChoiceSingle | Self::ChoiceMultiple)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A logical field to render; the kind is fixed at construction.
pub struct FieldSpec {
    pub logical_name: String,
    pub required: bool,
    pub kind: FieldKind,
    pub default_value: Option<String>,
    pub options: Vec<FormOption>,
}

impl FieldSpec {
    fn text(logical_name: &str, required: bool, kind: FieldKind) -> Self {
        Self {
            logical_name: logical_name.to_string(),
            required,
            kind,
            default_value: None,
            options: Vec::new(),
        }
    }

    fn choice(
        logical_name: &str,
        required: bool,
        kind: FieldKind,
        options: Vec<FormOption>,
    ) -> Self {
        Self {
            logical_name: logical_name.to_string(),
            required,
            kind,
            default_value: None,
            options,
        }
    }

    pub fn text_short(logical_name: &str, required: bool) -> Self {
        Self::text(logical_name, required, FieldKind::TextShort)
    }

    pub fn text_long(logical_name: &str, required: bool) -> Self {
        Self::text(logical_name, required, FieldKind::TextLong)
    }

    pub fn choice_single(logical_name: &str, required: bool, options: Vec<FormOption>) -> Self {
        Self::choice(logical_name, required, FieldKind::ChoiceSingle, options)
    }

    pub fn choice_multiple(logical_name: &str, required: bool, options: Vec<FormOption>) -> Self {
        Self::choice(logical_name, required, FieldKind::ChoiceMultiple, options)
    }

    /// Default text for text fields; ignored for choice fields.
    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        if !self.kind.is_choice() {
            self.default_value = Some(value.into());
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedControl {
    TextInput {
        long: bool,
        default_value: Option<String>,
    },
    Select {
        options: Vec<FormOption>,
        min_values: usize,
        max_values: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    pub label: String,
    pub id: EncodedFieldId,
    pub required: bool,
    pub control: RenderedControl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescription {
    pub form_id: String,
    pub title: String,
    pub fields: Vec<RenderedField>,
}

impl FormDescription {
    /// Return the rendered field whose encoded id decodes to `logical_name`.
    pub fn field(&self, logical_name: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|field| {
            crate::field_codec::decode_field_id(field.id.as_str()).logical_name == logical_name
        })
    }
}

/// Build a form from fields in caller order.
///
/// Absent fields and choice fields without options are skipped. Only the
/// first [`MAX_FORM_FIELDS`] renderable fields are kept; later ones are
/// dropped without error, and a form with no fields is still valid.
pub fn build_form(
    form_id: &str,
    title: &str,
    fields: Vec<(String, Option<FieldSpec>)>,
) -> Result<FormDescription, FormError> {
    let mut rendered = Vec::new();
    for (label, spec) in fields {
        if rendered.len() >= MAX_FORM_FIELDS {
            break;
        }
        let Some(spec) = spec else {
            continue;
        };
        if let Some(field) = render_field(label, spec)? {
            rendered.push(field);
        }
    }
    Ok(FormDescription {
        form_id: form_id.to_string(),
        title: title.to_string(),
        fields: rendered,
    })
}

fn render_field(label: String, spec: FieldSpec) -> Result<Option<RenderedField>, FormError> {
    let id = encode_field_id(&spec.logical_name, spec.required)?;
    let control = match spec.kind {
        FieldKind::TextShort | FieldKind::TextLong => RenderedControl::TextInput {
            long: spec.kind == FieldKind::TextLong,
            default_value: spec.default_value,
        },
        FieldKind::ChoiceSingle | FieldKind::ChoiceMultiple => {
            let options = project_options(&spec.options);
            if options.is_empty() {
                return Ok(None);
            }
            let max_values = if spec.kind == FieldKind::ChoiceMultiple {
                options.len()
            } else {
                1
            };
            RenderedControl::Select {
                options,
                min_values: usize::from(spec.required),
                max_values,
            }
        }
    };
    Ok(Some(RenderedField {
        label,
        id,
        required: spec.required,
        control,
    }))
}
