//! Required-field validation.
//!
//! The required set depends on the save-the-date classification: an
//! announcement flyer legitimately lacks venue and time, so only the three
//! load-bearing fields are demanded. All gaps are collected, not just the
//! first, so the client can show the user everything at once.

use serde_json::{Map, Value};

/// Fields required for every record.
const ALWAYS_REQUIRED: &[&str] = &["description", "eventName", "eventDate"];

/// Fields required when the record is not a save-the-date announcement.
const FULL_DETAIL_REQUIRED: &[&str] = &[
    "description",
    "eventName",
    "eventDate",
    "eventTime",
    "venueName",
    "city",
    "state",
];

/// Does this value count as filled?
///
/// Mirrors the loose truthiness of the model's JSON: missing, null, empty
/// string, `false`, and zero all count as absent.
pub(crate) fn is_field_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Every required field that is absent from the map, in declaration order.
///
/// Empty result means the record is valid for its classification.
pub fn missing_required_fields(
    map: &Map<String, Value>,
    is_save_the_date: bool,
) -> Vec<&'static str> {
    let required = if is_save_the_date {
        ALWAYS_REQUIRED
    } else {
        FULL_DETAIL_REQUIRED
    };

    required
        .iter()
        .copied()
        .filter(|field| !is_field_present(map.get(*field)))
        .collect()
}
