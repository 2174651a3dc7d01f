//! Save-the-date classification.
//!
//! The model under-reports this classification badly, so the pipeline never
//! trusts a single signal path: the corrector forces the fields from phrase
//! matches, and this classifier independently re-derives the answer from
//! three signals before validation.

use serde_json::{Map, Value};

/// Flag or enum say save-the-date, without looking at the description.
///
/// This narrower check is what the failure-envelope path uses, since a
/// partial record may omit the description entirely.
pub(crate) fn has_save_the_date_signal(map: &Map<String, Value>) -> bool {
    map.get("containsSaveTheDateText").and_then(Value::as_bool) == Some(true)
        || map.get("eventType").and_then(Value::as_str) == Some("SAVE_THE_DATE")
}

/// Is this record a save-the-date announcement?
///
/// True if the flag is set, the event type says so, or the description
/// itself contains the phrase (case-insensitive). Intentionally redundant
/// with the corrector's override so validation survives a field map that
/// never went through correction.
pub fn is_save_the_date(map: &Map<String, Value>) -> bool {
    has_save_the_date_signal(map)
        || map
            .get("description")
            .and_then(Value::as_str)
            .is_some_and(|text| text.to_lowercase().contains("save the date"))
}
