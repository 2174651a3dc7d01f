//! The extraction pipeline - the core of the library.
//!
//! Stages, in order:
//! - Unwrap (fence stripping + JSON parse into a loose field map)
//! - Correct (save-the-date override, location backfill, state
//!   normalization, name cleanup)
//! - Classify (independent save-the-date re-derivation)
//! - Validate (classification-dependent required fields)
//! - Assemble (shape into success / failure, envelope handling)

pub mod assemble;
pub mod classify;
pub mod correct;
pub mod unwrap;
pub mod validate;

pub use assemble::{extract_record, SAVE_THE_DATE_WARNING};
pub use classify::is_save_the_date;
pub use correct::correct_fields;
pub use unwrap::unwrap_response;
pub use validate::missing_required_fields;
