//! US state name lookup table.
//!
//! Maps full state names (as printed on flyers) to their 2-letter postal
//! codes. Used both for normalizing a model-supplied `state` field and for
//! recognizing full state names during city/state backfill.

use std::collections::HashMap;
use std::sync::LazyLock;

/// All 50 states: lowercase full name → 2-letter postal code.
const STATES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

static STATE_ABBREVIATIONS: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| STATES.iter().copied().collect());

/// Look up the 2-letter postal code for a full state name.
///
/// Case-insensitive. Returns `None` for anything that is not one of the
/// 50 full state names (the caller decides what to do with a miss).
pub fn abbreviate_state(name: &str) -> Option<&'static str> {
    STATE_ABBREVIATIONS
        .get(name.trim().to_lowercase().as_str())
        .copied()
}

/// Iterate the full state names (lowercase), for regex construction.
pub fn state_names() -> impl Iterator<Item = &'static str> {
    STATES.iter().map(|(name, _)| *name)
}
