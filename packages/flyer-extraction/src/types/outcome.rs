//! Extraction outcome - what the pipeline hands to the HTTP layer.

use serde::Serialize;

use crate::error::{ExtractionFailure, FailureKind};
use crate::types::record::ExtractedRecord;

/// The result of one extraction request.
///
/// Serializes directly to the downstream wire bodies: a success becomes
/// `{ "record": ..., "provider": ..., "warning": ... }` (2xx), a failure
/// becomes `{ "error": ..., "message": ..., "partialData": ... }` (4xx).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ExtractionOutcome {
    Success {
        record: ExtractedRecord,
        /// Which model/provider produced the raw text (caller-supplied).
        provider: String,
        /// Set only on the relaxed save-the-date acceptance path.
        warning: Option<String>,
    },
    Failure(ExtractionFailure),
}

impl ExtractionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if this outcome is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    /// The extracted record, if this outcome is a success.
    pub fn record(&self) -> Option<&ExtractedRecord> {
        match self {
            Self::Success { record, .. } => Some(record),
            Self::Failure(_) => None,
        }
    }
}

impl From<ExtractionFailure> for ExtractionOutcome {
    fn from(failure: ExtractionFailure) -> Self {
        Self::Failure(failure)
    }
}
