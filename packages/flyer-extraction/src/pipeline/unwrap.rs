//! Unwrap the raw model response into a loose field map.
//!
//! Vision models routinely wrap their JSON in markdown code fences even when
//! told not to. This stage strips the fences and parses whatever remains.
//! The output is deliberately an untyped `Map<String, Value>` - the record
//! is only promoted to a typed struct after correction and validation, so
//! partial data survives every failure path.

use serde_json::{Map, Value};

/// Strip an optional markdown code fence (```` ```json ```` or ```` ``` ````)
/// from around the response text.
pub(crate) fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse the raw model text into a field map.
///
/// Fails if the text is not a JSON object after fence stripping. That
/// failure is fatal for the request: no structure means no partial data.
pub fn unwrap_response(raw: &str) -> Result<Map<String, Value>, serde_json::Error> {
    serde_json::from_str(strip_code_fences(raw))
}
