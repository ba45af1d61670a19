//! Appointment records as delivered by the hosting platform's calendar API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The calendar an appointment belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One appointment as returned by the calendar API.
///
/// Only the fields the announcement module reads are modeled; the API
/// returns more and the extra keys are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub calendar: Calendar,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Convenience constructor; the optional fields start out empty.
    pub fn new(id: i64, calendar_id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            calendar: Calendar {
                id: calendar_id,
                name: None,
            },
            title: title.into(),
            subtitle: None,
            description: None,
            start_date: None,
        }
    }
}
