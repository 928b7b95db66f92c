use std::collections::BTreeMap;

use crate::field_codec::decode_field_id;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmittedValue {
    Text(String),
    Choices(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Values entered in one submitted form, keyed by logical field name.
pub struct SubmittedForm {
    values: BTreeMap<String, SubmittedValue>,
}

impl SubmittedForm {
    /// Decode `(encoded field id, value)` pairs as delivered by the platform.
    pub fn decode<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (String, SubmittedValue)>,
    {
        let values = raw
            .into_iter()
            .map(|(encoded_id, value)| (decode_field_id(&encoded_id).logical_name, value))
            .collect();
        Self { values }
    }

    /// Text entered in a text field; empty when the field is absent.
    pub fn text(&self, logical_name: &str) -> String {
        match self.values.get(logical_name) {
            Some(SubmittedValue::Text(text)) => text.clone(),
            Some(SubmittedValue::Choices(choices)) => choices.join(", "),
            None => String::new(),
        }
    }

    /// Selected values of a choice field; empty when the field is absent.
    pub fn choices(&self, logical_name: &str) -> Vec<String> {
        match self.values.get(logical_name) {
            Some(SubmittedValue::Choices(choices)) => choices.clone(),
            Some(SubmittedValue::Text(text)) if !text.is_empty() => vec![text.clone()],
            _ => Vec::new(),
        }
    }

    /// First selected value of a single-select field.
    pub fn single_choice(&self, logical_name: &str) -> Option<String> {
        self.choices(logical_name).into_iter().next()
    }
}
