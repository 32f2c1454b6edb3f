//! Persisted reference to the Cairn calendar.
//!
//! The calendar id is resolved once per account and cached here; it is
//! not re-derived unless absent.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use cairn_core::StateStore;

const CALENDAR_STATE_KEY: &str = "cairn-calendar";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCalendar {
    calendar_id: Option<String>,
}

pub struct CalendarRefStore {
    store: StateStore,
}

impl CalendarRefStore {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// The cached calendar id, if one was resolved before.
    pub fn calendar_id(&self) -> Result<Option<String>> {
        let persisted: PersistedCalendar = self
            .store
            .load(CALENDAR_STATE_KEY)?
            .unwrap_or_default();
        Ok(persisted.calendar_id)
    }

    pub fn set_calendar_id(&self, id: &str) -> Result<()> {
        self.store.save(
            CALENDAR_STATE_KEY,
            &PersistedCalendar {
                calendar_id: Some(id.to_string()),
            },
        )
    }

    pub fn clear(&self) -> Result<()> {
        self.store.delete(CALENDAR_STATE_KEY)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_roundtrip_and_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CalendarRefStore::new(StateStore::at(tmp.path()).unwrap());

        assert!(store.calendar_id().unwrap().is_none());

        store.set_calendar_id("cal@group.calendar.google.com").unwrap();
        assert_eq!(
            store.calendar_id().unwrap().as_deref(),
            Some("cal@group.calendar.google.com")
        );

        store.clear().unwrap();
        assert!(store.calendar_id().unwrap().is_none());
    }

    #[test]
    fn test_persisted_shape_matches_wire_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let state_store = StateStore::at(tmp.path()).unwrap();
        let store = CalendarRefStore::new(state_store.clone());

        store.set_calendar_id("cal1").unwrap();

        let raw: serde_json::Value = state_store.load("cairn-calendar").unwrap().unwrap();
        assert_eq!(raw["calendarId"], "cal1");
    }
}
