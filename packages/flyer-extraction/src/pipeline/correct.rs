//! Deterministic field correction.
//!
//! An ordered pipeline of four pure `map -> map` steps applied to the raw
//! field map before classification and validation. Order matters: later
//! steps read fields earlier steps may have filled. Corrections never fail;
//! when the text gives nothing to work with they leave the map alone.
//!
//! 1. Save-the-date override from trigger phrases in the description.
//! 2. City/state backfill from description + address text.
//! 3. State normalization to a 2-letter code.
//! 4. Event-name whitespace cleanup.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::debug;

use crate::pipeline::validate::is_field_present;
use crate::states;

/// Phrases that mark a flyer as a save-the-date announcement, matched
/// case-insensitively against the description. The model under-reports
/// this classification, so any hit overrides whatever it answered.
const SAVE_THE_DATE_PHRASES: &[&str] = &[
    "save the date",
    "save-the-date",
    "savethedate",
    "details to follow",
    "more info coming",
    "more info to come",
    "hotel link and more info to come",
];

/// Street-suffix words that must never be captured as a city name.
const STREET_SUFFIXES: &[&str] = &[
    "street",
    "avenue",
    "ave",
    "road",
    "rd",
    "boulevard",
    "blvd",
    "drive",
    "dr",
    "lane",
    "ln",
    "way",
    "court",
    "ct",
];

// "Toledo, OH" style: capitalized word run, comma, 2-letter code.
static RE_CITY_STATE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\s*,\s*([A-Z]{2})\b").unwrap()
});

// "Toledo, Ohio" style: same city capture, state is a full state name.
static RE_CITY_STATE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    let names = states::state_names()
        .map(|name| name.replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*)\s*,\s*((?i:{names}))\b"
    ))
    .unwrap()
});

// "ATLANTA GA" style: no comma, all-caps city of 3+ letters, 2-letter code.
static RE_ALLCAPS_CITY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{3,})\s+([A-Z]{2})\b").unwrap());

/// Apply all four correction steps in order.
pub fn correct_fields(map: Map<String, Value>) -> Map<String, Value> {
    let map = override_save_the_date(map);
    let map = backfill_location(map);
    let map = normalize_state(map);
    clean_event_name(map)
}

/// Step 1: force the save-the-date classification when the description
/// contains a trigger phrase, overwriting whatever the model supplied.
fn override_save_the_date(mut map: Map<String, Value>) -> Map<String, Value> {
    let Some(description) = map.get("description").and_then(Value::as_str) else {
        return map;
    };

    let lowered = description.to_lowercase();
    if SAVE_THE_DATE_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        debug!("save-the-date phrasing found in description, overriding classification");
        map.insert("containsSaveTheDateText".to_string(), Value::Bool(true));
        map.insert(
            "eventType".to_string(),
            Value::String("SAVE_THE_DATE".to_string()),
        );
    }
    map
}

/// Step 2: backfill a missing city and/or state from the flyer text.
///
/// Three patterns are tried in priority order against the concatenated
/// description and address. The first pattern that matches at all claims
/// the scan: its matches are walked until one fills a field, and no later
/// pattern is consulted - even when every match of the winning pattern is
/// rejected and nothing gets filled.
fn backfill_location(mut map: Map<String, Value>) -> Map<String, Value> {
    if is_field_present(map.get("city")) && is_field_present(map.get("state")) {
        return map;
    }

    let search = [
        map.get("description").and_then(Value::as_str).unwrap_or(""),
        map.get("address").and_then(Value::as_str).unwrap_or(""),
    ]
    .join(" ");

    let patterns: [&LazyLock<Regex>; 3] = [
        &RE_CITY_STATE_CODE,
        &RE_CITY_STATE_NAME,
        &RE_ALLCAPS_CITY_CODE,
    ];

    for pattern in patterns {
        let mut any_match = false;

        for caps in pattern.captures_iter(&search) {
            any_match = true;

            let city_candidate = caps[1].trim();
            if STREET_SUFFIXES
                .iter()
                .any(|suffix| city_candidate.eq_ignore_ascii_case(suffix))
            {
                continue;
            }

            let state_candidate = normalize_state_candidate(&caps[2]);

            let mut filled = false;
            if !is_field_present(map.get("city")) && city_candidate.chars().count() >= 3 {
                let city = title_case(city_candidate);
                debug!(%city, "backfilled city from flyer text");
                map.insert("city".to_string(), Value::String(city));
                filled = true;
            }
            if !is_field_present(map.get("state")) && state_candidate.chars().count() == 2 {
                let state = state_candidate.to_uppercase();
                debug!(%state, "backfilled state from flyer text");
                map.insert("state".to_string(), Value::String(state));
                filled = true;
            }

            // One usable match ends the scan, as does having both fields.
            if filled || (is_field_present(map.get("city")) && is_field_present(map.get("state"))) {
                return map;
            }
        }

        if any_match {
            break;
        }
    }

    map
}

/// Step 3: normalize a full state name to its 2-letter code. Unknown
/// values are left as-is rather than fabricated.
fn normalize_state(mut map: Map<String, Value>) -> Map<String, Value> {
    let Some(state) = map.get("state").and_then(Value::as_str) else {
        return map;
    };

    if state.chars().count() > 2 {
        if let Some(code) = states::abbreviate_state(&collapse_whitespace(state)) {
            map.insert("state".to_string(), Value::String(code.to_string()));
        }
    }
    map
}

/// Step 4: collapse whitespace runs in the event name and trim it.
fn clean_event_name(mut map: Map<String, Value>) -> Map<String, Value> {
    if let Some(name) = map.get("eventName").and_then(Value::as_str) {
        let cleaned = collapse_whitespace(name);
        map.insert("eventName".to_string(), Value::String(cleaned));
    }
    map
}

/// Reduce a captured state token to a 2-letter code where possible:
/// full names go through the lookup table, anything else passes through.
fn normalize_state_candidate(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    if collapsed.chars().count() > 2 {
        if let Some(code) = states::abbreviate_state(&collapsed) {
            return code.to_string();
        }
    }
    collapsed
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First letter upper, rest lower.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn str_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        map.get(key).and_then(Value::as_str)
    }

    #[test]
    fn test_save_the_date_override_is_unconditional() {
        for phrase in SAVE_THE_DATE_PHRASES {
            let map = as_map(json!({
                "description": format!("Big party! {} - see you there", phrase.to_uppercase()),
                "containsSaveTheDateText": false,
                "eventType": "FREE_EVENT"
            }));

            let corrected = correct_fields(map);
            assert_eq!(
                corrected["containsSaveTheDateText"], true,
                "phrase {phrase:?} should force the flag"
            );
            assert_eq!(corrected["eventType"], "SAVE_THE_DATE");
        }
    }

    #[test]
    fn test_no_override_without_trigger_phrase() {
        let map = as_map(json!({
            "description": "Annual fundraiser dinner, doors at 6",
            "eventType": "TICKETED_EVENT"
        }));

        let corrected = correct_fields(map);
        assert_eq!(corrected["eventType"], "TICKETED_EVENT");
        assert!(corrected.get("containsSaveTheDateText").is_none());
    }

    #[test]
    fn test_backfill_city_comma_code() {
        let map = as_map(json!({
            "description": "Join us in Toledo, OH for a night of jazz",
            "city": null,
            "state": null
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Toledo"));
        assert_eq!(str_field(&corrected, "state"), Some("OH"));
    }

    #[test]
    fn test_backfill_city_comma_full_state_name() {
        let map = as_map(json!({
            "description": "Live at the Valentine Theatre, Toledo, Ohio"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Toledo"));
        assert_eq!(str_field(&corrected, "state"), Some("OH"));
    }

    #[test]
    fn test_backfill_allcaps_style() {
        let map = as_map(json!({
            "description": "HOMECOMING WEEKEND ATLANTA GA OCTOBER 2025"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Atlanta"));
        assert_eq!(str_field(&corrected, "state"), Some("GA"));
    }

    #[test]
    fn test_backfill_searches_address_too() {
        let map = as_map(json!({
            "description": "Doors at 8",
            "address": "450 Peach Hall, Macon, GA 31201"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Macon"));
        assert_eq!(str_field(&corrected, "state"), Some("GA"));
    }

    #[test]
    fn test_backfill_never_overwrites_existing_fields() {
        let map = as_map(json!({
            "description": "Party in Memphis, TN all weekend",
            "city": "Nashville",
            "state": null
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Nashville"));
        assert_eq!(str_field(&corrected, "state"), Some("TN"));
    }

    #[test]
    fn test_backfill_skipped_when_both_present() {
        let map = as_map(json!({
            "description": "Party in Memphis, TN",
            "city": "Nashville",
            "state": "KY"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "state"), Some("KY"));
    }

    #[test]
    fn test_street_suffix_not_captured_as_city() {
        let map = as_map(json!({
            "description": "123 Main Street, Drive City"
        }));

        let corrected = correct_fields(map);
        assert_ne!(str_field(&corrected, "city"), Some("Street"));
    }

    #[test]
    fn test_street_suffix_match_rejected_entirely() {
        let map = as_map(json!({
            "description": "On the Boulevard, CA side of town"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), None);
        assert_eq!(str_field(&corrected, "state"), None);
    }

    #[test]
    fn test_first_matching_pattern_claims_the_scan() {
        // Pattern 1 matches garbage only; pattern 3 would have matched a
        // real city. Observed behavior: no fallthrough.
        let map = as_map(json!({
            "description": "Corner of the Avenue, TX stage - MEMPHIS TN"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), None);
        assert_eq!(str_field(&corrected, "state"), None);
    }

    #[test]
    fn test_backfill_iterates_past_rejected_match() {
        // First comma-code match is a street suffix, second is real.
        let map = as_map(json!({
            "description": "Avenue, TX is the theme. Hosted in Austin, TX this year."
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Austin"));
        assert_eq!(str_field(&corrected, "state"), Some("TX"));
    }

    #[test]
    fn test_short_city_candidate_not_assigned() {
        let map = as_map(json!({
            "description": "At the Ox, TX ranch"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), None);
        // The state from the same match still lands.
        assert_eq!(str_field(&corrected, "state"), Some("TX"));
    }

    #[test]
    fn test_state_normalization_full_name() {
        let map = as_map(json!({
            "description": "x",
            "state": "Ohio"
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "state"), Some("OH"));
    }

    #[test]
    fn test_state_normalization_leaves_two_letter_codes() {
        let map = as_map(json!({ "state": "oh" }));
        let corrected = correct_fields(map);
        // Exactly 2 characters: not touched by normalization.
        assert_eq!(str_field(&corrected, "state"), Some("oh"));
    }

    #[test]
    fn test_state_normalization_leaves_unknown_values() {
        let map = as_map(json!({ "state": "Ontario" }));
        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "state"), Some("Ontario"));
    }

    #[test]
    fn test_event_name_whitespace_collapse() {
        let map = as_map(json!({
            "eventName": "  Spring \n\t  Gala  2025  "
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "eventName"), Some("Spring Gala 2025"));
    }

    #[test]
    fn test_scenario_allcaps_save_the_date() {
        let map = as_map(json!({
            "description": "SAVE THE DATE ... ATLANTA GA ... details to follow",
            "city": null,
            "state": null
        }));

        let corrected = correct_fields(map);
        assert_eq!(str_field(&corrected, "city"), Some("Atlanta"));
        assert_eq!(str_field(&corrected, "state"), Some("GA"));
        assert_eq!(corrected["eventType"], "SAVE_THE_DATE");
        assert_eq!(corrected["containsSaveTheDateText"], true);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("ATLANTA"), "Atlanta");
        assert_eq!(title_case("toledo"), "Toledo");
        assert_eq!(title_case(""), "");
    }

    proptest! {
        // Every full state name normalizes to its code in any letter case,
        // whether it arrives in the state field or via the backfill cascade.
        #[test]
        fn prop_state_normalization_is_total(
            idx in 0usize..50,
            upper_mask in proptest::collection::vec(any::<bool>(), 0..32),
        ) {
            let (name, code) = (
                crate::states::state_names().nth(idx).unwrap(),
                crate::states::abbreviate_state(
                    crate::states::state_names().nth(idx).unwrap(),
                )
                .unwrap(),
            );

            let mangled: String = name
                .chars()
                .enumerate()
                .map(|(i, c)| {
                    if upper_mask.get(i % upper_mask.len().max(1)).copied().unwrap_or(false) {
                        c.to_ascii_uppercase()
                    } else {
                        c
                    }
                })
                .collect();

            let map = as_map(json!({ "state": mangled }));
            let corrected = correct_fields(map);
            prop_assert_eq!(str_field(&corrected, "state"), Some(code));
        }

        // Corrections never panic on arbitrary description text.
        #[test]
        fn prop_corrections_tolerate_any_description(text in ".{0,200}") {
            let map = as_map(json!({ "description": text }));
            let corrected = correct_fields(map);
            prop_assert!(corrected.contains_key("description"));
        }
    }
}
