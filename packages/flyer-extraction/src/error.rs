//! Typed failure values for the extraction pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`). These types double as
//! the downstream wire shape: a failure serializes to
//! `{ "error": <kind>, "message": ..., "partialData": ... }` so the HTTP
//! layer can hand partial data straight to a manual-entry form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The two ways an extraction request can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// The model's text could not be parsed into any structure at all.
    /// Fatal: there is no partial data to offer.
    #[serde(rename = "PARSE_ERROR")]
    ParseError,

    /// Structure was obtained but required fields are missing, or the model
    /// self-reported failure. Always carries whatever partial data exists.
    #[serde(rename = "INCOMPLETE_FLYER_DATA")]
    IncompleteFlyerData,
}

/// A failed extraction, with whatever partial data survived.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ExtractionFailure {
    /// Failure classification.
    #[serde(rename = "error")]
    pub kind: FailureKind,

    /// Human-readable explanation for the client UI.
    pub message: String,

    /// Partial field map for pre-filling a manual-entry form.
    ///
    /// Always `None` for [`FailureKind::ParseError`].
    #[serde(rename = "partialData")]
    pub partial_record: Option<Map<String, Value>>,
}

impl ExtractionFailure {
    /// A fatal parse failure. No partial data exists by definition.
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::ParseError,
            message: message.into(),
            partial_record: None,
        }
    }

    /// An incomplete-data failure carrying the surviving field map.
    pub fn incomplete(message: impl Into<String>, partial: Option<Map<String, Value>>) -> Self {
        Self {
            kind: FailureKind::IncompleteFlyerData,
            message: message.into(),
            partial_record: partial,
        }
    }
}
