//! Discord modal payload rendering for built forms.

use serde_json::{json, Map, Value};

use crate::form_builder::{FormDescription, RenderedControl, RenderedField};
use crate::option_projector::truncate_chars;

const COMPONENT_TYPE_STRING_SELECT: u8 = 3;
const COMPONENT_TYPE_TEXT_INPUT: u8 = 4;
const COMPONENT_TYPE_LABEL: u8 = 18;
const TEXT_INPUT_STYLE_SHORT: u8 = 1;
const TEXT_INPUT_STYLE_PARAGRAPH: u8 = 2;
const MAX_MODAL_TITLE_CHARS: usize = 45;
const MAX_LABEL_CHARS: usize = 45;
const MAX_TEXT_VALUE_CHARS: usize = 4_000;

/// Render a form as the `data` object of a Discord MODAL interaction response.
pub fn render_modal(form: &FormDescription) -> Value {
    json!({
        "custom_id": form.form_id,
        "title": truncate_chars(&form.title, MAX_MODAL_TITLE_CHARS),
        "components": form.fields.iter().map(render_field).collect::<Vec<_>>(),
    })
}

fn render_field(field: &RenderedField) -> Value {
    let component = match &field.control {
        RenderedControl::TextInput {
            long,
            default_value,
        } => {
            let mut input = Map::new();
            input.insert("type".to_string(), json!(COMPONENT_TYPE_TEXT_INPUT));
            input.insert("custom_id".to_string(), json!(field.id.as_str()));
            input.insert(
                "style".to_string(),
                json!(if *long {
                    TEXT_INPUT_STYLE_PARAGRAPH
                } else {
                    TEXT_INPUT_STYLE_SHORT
                }),
            );
            input.insert("required".to_string(), json!(field.required));
            if let Some(value) = default_value.as_deref().filter(|value| !value.is_empty()) {
                input.insert(
                    "value".to_string(),
                    json!(truncate_chars(value, MAX_TEXT_VALUE_CHARS)),
                );
            }
            Value::Object(input)
        }
        RenderedControl::Select {
            options,
            min_values,
            max_values,
        } => {
            let options = options
                .iter()
                .map(|option| {
                    let mut rendered = json!({
                        "label": option.display_name,
                        "value": option.value,
                    });
                    if let Some(description) = option.description.as_deref() {
                        rendered["description"] = json!(description);
                    }
                    rendered
                })
                .collect::<Vec<_>>();
            json!({
                "type": COMPONENT_TYPE_STRING_SELECT,
                "custom_id": field.id.as_str(),
                "options": options,
                "min_values": min_values,
                "max_values": max_values,
                "required": field.required,
            })
        }
    };
    json!({
        "type": COMPONENT_TYPE_LABEL,
        "label": truncate_chars(&field.label, MAX_LABEL_CHARS),
        "component": component,
    })
}
