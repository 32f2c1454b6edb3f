//! Calendar API wire types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Event time specification. All-day events carry `date`; timed events
/// carry `dateTime`. Well-formed data has exactly one of the two, but
/// readers tolerate events with neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    /// For all-day events (YYYY-MM-DD format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// For timed events (ISO 8601 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
}

/// A Google Calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    pub description: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    pub color_id: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
}

impl CalendarEvent {
    /// The day this event belongs to in date-bucketed views.
    ///
    /// All-day events use `date`; timed events use the date part of
    /// `dateTime`. Events with neither are un-datable and yield `None`.
    pub fn start_date(&self) -> Option<NaiveDate> {
        if let Some(date) = &self.start.date {
            return NaiveDate::parse_from_str(date, "%Y-%m-%d").ok();
        }
        if let Some(date_time) = &self.start.date_time {
            return date_time
                .split('T')
                .next()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
        }
        None
    }
}

/// Entry in the user's calendar list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    pub description: Option<String>,
    #[serde(default)]
    pub primary: bool,
    pub background_color: Option<String>,
    pub foreground_color: Option<String>,
}

/// A Google Calendar resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    pub description: Option<String>,
    pub time_zone: Option<String>,
}

/// Response from the calendar list API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

/// Response from the events list API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
    pub next_page_token: Option<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_all_day_event_start_date() {
        let json = r#"{
            "id": "e1",
            "summary": "Run",
            "start": {"date": "2026-01-15"},
            "end": {"date": "2026-01-15"},
            "colorId": "2"
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.start_date(),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
        assert_eq!(event.color_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_timed_event_start_date() {
        let json = r#"{
            "id": "e2",
            "summary": "Meeting",
            "start": {"dateTime": "2026-01-15T10:00:00+02:00"},
            "end": {"dateTime": "2026-01-15T11:00:00+02:00"}
        }"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event.start_date(),
            NaiveDate::from_ymd_opt(2026, 1, 15)
        );
    }

    #[test]
    fn test_event_without_times_is_undatable() {
        let json = r#"{"id": "e3"}"#;

        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.start_date(), None);
        assert_eq!(event.summary, "");
    }

    #[test]
    fn test_event_time_serializes_one_side_only() {
        let time = EventTime {
            date: Some("2026-01-15".to_string()),
            date_time: None,
        };
        let json = serde_json::to_value(&time).unwrap();
        assert_eq!(json, serde_json::json!({"date": "2026-01-15"}));
    }

    #[test]
    fn test_list_response_without_items() {
        let response: EventListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.items.is_empty());
    }
}
