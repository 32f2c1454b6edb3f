//! Google Calendar integration for Cairn.
//!
//! Provides the Calendar API client, the persisted calendar reference,
//! and the month-view helpers.

pub mod client;
pub mod colors;
pub mod error;
pub mod month;
pub mod store;
pub mod types;

pub use client::{CalendarClient, CAIRN_CALENDAR_NAME};
pub use colors::{event_color, DEFAULT_EVENT_COLOR};
pub use error::CalendarError;
pub use month::{events_by_date, month_bounds, month_grid};
pub use store::CalendarRefStore;
pub use types::{
    Calendar, CalendarEvent, CalendarListEntry, CalendarListResponse, EventListResponse,
    EventTime,
};
