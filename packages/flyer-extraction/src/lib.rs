//! Flyer Extraction Response Pipeline
//!
//! Turns the free-form JSON a vision-language model produces for an event
//! flyer into a trustworthy, validated event record. The model is treated
//! as an unreliable narrator: its output is parsed into a loose field map,
//! corrected by deterministic rules (save-the-date override, city/state
//! backfill, state normalization, name cleanup), independently
//! re-classified, and validated against a classification-dependent
//! required-field set before anything is promoted to a typed record.
//!
//! # Design Philosophy
//!
//! - Loose map in, typed record out: partial data survives every failure
//!   path so the caller can pre-fill a manual-entry form.
//! - Corrections are best-effort and never fail; only unwrap and validate
//!   can produce a failure.
//! - Pure and synchronous: one raw string + provider name in, one
//!   [`ExtractionOutcome`] out. No I/O, no shared state, trivially safe to
//!   call concurrently.
//!
//! # Usage
//!
//! ```rust
//! use flyer_extraction::extract_record;
//!
//! let raw = r#"{
//!   "description": "SAVE THE DATE! Class reunion weekend, ATLANTA GA",
//!   "eventName": "Class Reunion",
//!   "eventDate": "June 2026"
//! }"#;
//!
//! let outcome = extract_record(raw, "vision-model-1");
//! assert!(outcome.is_success());
//! ```
//!
//! # Modules
//!
//! - [`pipeline`] - unwrap, correct, classify, validate, assemble
//! - [`types`] - [`ExtractedRecord`] and [`ExtractionOutcome`]
//! - [`states`] - US state name lookup table
//! - [`error`] - failure kinds and the failure wire shape

pub mod error;
pub mod pipeline;
pub mod states;
pub mod types;

pub use error::{ExtractionFailure, FailureKind};
pub use pipeline::{extract_record, SAVE_THE_DATE_WARNING};
pub use types::{Contact, EventType, ExtractedRecord, ExtractionOutcome, TicketPrice};
