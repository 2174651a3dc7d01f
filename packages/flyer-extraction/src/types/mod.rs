//! Data types for flyer extraction.

pub mod outcome;
pub mod record;

pub use outcome::ExtractionOutcome;
pub use record::{Contact, EventType, ExtractedRecord, TicketPrice};
