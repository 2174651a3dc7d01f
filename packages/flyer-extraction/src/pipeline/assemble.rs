//! Outcome assembly - the pipeline entry point.
//!
//! Takes the raw model text and the provider identifier, runs unwrap →
//! correct → classify → validate, and shapes the result into one
//! [`ExtractionOutcome`]. Also handles the model-signaled failure envelope
//! (`error: "EXTRACTION_FAILED"` + `partialData`), including the one
//! deliberate relaxation: a save-the-date flyer is accepted from a failure
//! envelope once its name and date are present, since venue and time
//! legitimately do not exist yet.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::ExtractionFailure;
use crate::pipeline::classify::{has_save_the_date_signal, is_save_the_date};
use crate::pipeline::correct::correct_fields;
use crate::pipeline::unwrap::unwrap_response;
use crate::pipeline::validate::{is_field_present, missing_required_fields};
use crate::types::outcome::ExtractionOutcome;
use crate::types::record::ExtractedRecord;

/// Warning attached when a model-signaled failure is escalated to success
/// for a save-the-date flyer.
pub const SAVE_THE_DATE_WARNING: &str =
    "Save-the-date flyer: venue and time details are expected to be announced later.";

/// Fallback message when the model reports failure without saying why.
const GENERIC_INCOMPLETE_MESSAGE: &str =
    "The flyer did not contain enough information to build an event record.";

/// The model's self-reported failure marker.
const EXTRACTION_FAILED: &str = "EXTRACTION_FAILED";

/// Turn one raw model response into an extraction outcome.
///
/// `provider` identifies which model produced the text and is echoed on the
/// success body. Pure and synchronous: same inputs, same outcome.
pub fn extract_record(raw: &str, provider: &str) -> ExtractionOutcome {
    let map = match unwrap_response(raw) {
        Ok(map) => map,
        Err(err) => {
            warn!(provider, error = %err, "model response was not parseable JSON");
            return ExtractionFailure::parse_error(format!(
                "Failed to parse model response as JSON: {err}"
            ))
            .into();
        }
    };

    if map.get("error").and_then(Value::as_str) == Some(EXTRACTION_FAILED) {
        return assemble_failure_envelope(&map, provider);
    }

    let corrected = correct_fields(map);
    let save_the_date = is_save_the_date(&corrected);
    let missing = missing_required_fields(&corrected, save_the_date);

    if !missing.is_empty() {
        debug!(provider, missing = ?missing, "extraction missing required fields");
        return ExtractionFailure::incomplete(
            format!("Missing required fields: {}", missing.join(", ")),
            Some(corrected),
        )
        .into();
    }

    ExtractionOutcome::Success {
        record: ExtractedRecord::from_fields(&corrected),
        provider: provider.to_string(),
        warning: None,
    }
}

/// Handle a model-signaled failure envelope.
///
/// The classification here reads only the flag and the enum from the
/// embedded partial data - a failure envelope may omit the description, so
/// there is no content re-scan on this path.
fn assemble_failure_envelope(map: &Map<String, Value>, provider: &str) -> ExtractionOutcome {
    let partial = map.get("partialData").and_then(Value::as_object).cloned();

    if let Some(partial_map) = partial.as_ref() {
        if has_save_the_date_signal(partial_map)
            && is_field_present(partial_map.get("eventName"))
            && is_field_present(partial_map.get("eventDate"))
        {
            warn!(
                provider,
                "model reported failure on a save-the-date flyer, accepting with warning"
            );
            return ExtractionOutcome::Success {
                record: ExtractedRecord::from_fields(partial_map),
                provider: provider.to_string(),
                warning: Some(SAVE_THE_DATE_WARNING.to_string()),
            };
        }
    }

    let message = map
        .get("message")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .unwrap_or(GENERIC_INCOMPLETE_MESSAGE)
        .to_string();

    warn!(provider, %message, "model signaled extraction failure");
    ExtractionFailure::incomplete(message, partial).into()
}
