//! Typed event record - the promoted output of a successful extraction.
//!
//! The pipeline works on a loose `serde_json::Map` until validation has
//! passed; only then is the map promoted to an [`ExtractedRecord`]. Promotion
//! is field-by-field and lenient: a wrong-typed optional field degrades to
//! `None` instead of failing the whole request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Event classification as reported (or corrected) on the flyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EventType {
    #[default]
    #[serde(rename = "FREE_EVENT")]
    FreeEvent,

    #[serde(rename = "TICKETED_EVENT")]
    TicketedEvent,

    /// Announcement flyer preceding full event details. Gets a relaxed
    /// required-field bar (venue/time legitimately unknown).
    #[serde(rename = "SAVE_THE_DATE")]
    SaveTheDate,
}

impl EventType {
    fn from_field(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("TICKETED_EVENT") => Self::TicketedEvent,
            Some("SAVE_THE_DATE") => Self::SaveTheDate,
            _ => Self::FreeEvent,
        }
    }
}

/// A contact person listed on the flyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub social_media: Option<String>,
}

/// A ticket price tier.
///
/// Always empty at this layer - pricing text stays inside `description` -
/// but the field is part of the downstream wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPrice {
    pub label: String,
    #[serde(default)]
    pub amount: Option<String>,
}

/// The structured result of a flyer extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecord {
    /// Full transcribed flyer text, long-form.
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub event_name: String,

    /// Verbatim as printed on the flyer - never reformatted into a
    /// calendar date by this pipeline.
    #[serde(default)]
    pub event_date: String,

    #[serde(default)]
    pub event_end_date: Option<String>,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub event_end_time: Option<String>,
    #[serde(default)]
    pub event_timezone: Option<String>,

    #[serde(default)]
    pub venue_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// 2-letter postal code once normalized.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default)]
    pub host_organizer: Option<String>,

    #[serde(default)]
    pub contacts: Vec<Contact>,

    #[serde(default)]
    pub ticket_prices: Vec<TicketPrice>,

    #[serde(default)]
    pub age_restriction: Option<String>,
    #[serde(default)]
    pub special_notes: Option<String>,

    #[serde(default)]
    pub contains_save_the_date_text: bool,

    #[serde(default)]
    pub event_type: EventType,

    #[serde(default)]
    pub categories: HashSet<String>,
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ExtractedRecord {
    /// Promote a corrected field map into a typed record.
    ///
    /// Lenient on purpose: optional fields with missing or wrong-typed
    /// values become `None`, malformed contact entries are skipped. The
    /// required fields have already been checked by the validator by the
    /// time this runs.
    pub fn from_fields(map: &Map<String, Value>) -> Self {
        let contacts = map
            .get("contacts")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();

        let categories = map
            .get("categories")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            description: string_field(map, "description").unwrap_or_default(),
            event_name: string_field(map, "eventName").unwrap_or_default(),
            event_date: string_field(map, "eventDate").unwrap_or_default(),
            event_end_date: string_field(map, "eventEndDate"),
            event_time: string_field(map, "eventTime"),
            event_end_time: string_field(map, "eventEndTime"),
            event_timezone: string_field(map, "eventTimezone"),
            venue_name: string_field(map, "venueName"),
            address: string_field(map, "address"),
            city: string_field(map, "city"),
            state: string_field(map, "state"),
            zip_code: string_field(map, "zipCode"),
            host_organizer: string_field(map, "hostOrganizer"),
            contacts,
            // Pricing text lives inside `description` at this layer.
            ticket_prices: Vec::new(),
            age_restriction: string_field(map, "ageRestriction"),
            special_notes: string_field(map, "specialNotes"),
            contains_save_the_date_text: map
                .get("containsSaveTheDateText")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            event_type: EventType::from_field(map.get("eventType")),
            categories,
        }
    }
}
