use std::fmt;

use crate::FormError;

/// Trailing marker that flags a field as required on the wire.
pub const REQUIRED_MARKER: char = '*';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Wire-level custom id carrying a logical field name and its required flag.
pub struct EncodedFieldId(String);

impl EncodedFieldId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFieldId {
    pub logical_name: String,
    pub required: bool,
}

/// Encode a logical field name, appending the required marker when `required` is set.
pub fn encode_field_id(logical_name: &str, required: bool) -> Result<EncodedFieldId, FormError> {
    if logical_name.contains(REQUIRED_MARKER) {
        return Err(FormError::InvalidFieldName {
            name: logical_name.to_string(),
            marker: REQUIRED_MARKER,
        });
    }
    let mut encoded = logical_name.to_string();
    if required {
        encoded.push(REQUIRED_MARKER);
    }
    Ok(EncodedFieldId(encoded))
}

/// Decode a submitted custom id back into its logical name and required flag.
pub fn decode_field_id(raw: &str) -> DecodedFieldId {
    match raw.strip_suffix(REQUIRED_MARKER) {
        Some(logical_name) => DecodedFieldId {
            logical_name: logical_name.to_string(),
            required: true,
        },
        None => DecodedFieldId {
            logical_name: raw.to_string(),
            required: false,
        },
    }
}
