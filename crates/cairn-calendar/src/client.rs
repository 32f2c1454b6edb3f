//! Google Calendar API client.
//!
//! Every operation first obtains a valid access token through the
//! refresh engine; with none available it fails as `AuthExpired`
//! without touching the network. A 401 from the API clears the session
//! before the error propagates, so callers only have to redirect.

use chrono::{Duration, NaiveDate, NaiveTime};
use tracing::instrument;

use cairn_auth::TokenRefresher;

use crate::error::CalendarError;
use crate::types::*;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Display name of the calendar Cairn logs into.
pub const CAIRN_CALENDAR_NAME: &str = "Cairn";

const CALENDAR_DESCRIPTION: &str = "Habit tracking calendar created by Cairn app";
const EVENT_DESCRIPTION: &str = "Logged via Cairn";

pub struct CalendarClient {
    http: reqwest::Client,
    base_url: String,
    refresher: TokenRefresher,
}

impl CalendarClient {
    pub fn new(refresher: TokenRefresher) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: CALENDAR_API_BASE.to_string(),
            refresher,
        }
    }

    #[cfg(test)]
    pub fn new_with_base_url(refresher: TokenRefresher, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            refresher,
        }
    }

    async fn access_token(&self) -> Result<String, CalendarError> {
        self.refresher
            .valid_access_token()
            .await
            .ok_or(CalendarError::AuthExpired)
    }

    /// Map a response to the error taxonomy, passing 2xx through.
    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let details = response.json::<serde_json::Value>().await.ok();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.refresher.session().clear();
            return Err(CalendarError::AuthExpired);
        }

        Err(CalendarError::api(status, details))
    }

    /// Returns the id of the calendar with the given name, creating it
    /// if necessary.
    #[instrument(skip(self), level = "info")]
    pub async fn get_or_create_calendar(&self, name: &str) -> Result<String, CalendarError> {
        let token = self.access_token().await?;

        let url = format!("{}/users/me/calendarList", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CalendarError::network("Failed to get or create Cairn calendar", e))?;

        let response = self.check_status(response).await?;
        let list: CalendarListResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::network("Failed to get or create Cairn calendar", e))?;

        if let Some(existing) = list.items.iter().find(|cal| cal.summary == name) {
            return Ok(existing.id.clone());
        }

        let url = format!("{}/calendars", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "summary": name,
                "description": CALENDAR_DESCRIPTION,
            }))
            .send()
            .await
            .map_err(|e| CalendarError::network("Failed to get or create Cairn calendar", e))?;

        let response = self.check_status(response).await?;
        let created: Calendar = response
            .json()
            .await
            .map_err(|e| CalendarError::network("Failed to get or create Cairn calendar", e))?;

        tracing::info!("Created calendar {}", created.id);
        Ok(created.id)
    }

    /// List events within a date range (end date inclusive), expanding
    /// recurring events and ordering by start time.
    #[instrument(skip(self), level = "info")]
    pub async fn list_events(
        &self,
        calendar_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let token = self.access_token().await?;

        let time_min = start.and_time(NaiveTime::MIN).and_utc();
        let time_max = end.and_time(NaiveTime::MIN).and_utc() + Duration::days(1);

        let url = format!(
            "{}/calendars/{}/events?timeMin={}&timeMax={}&singleEvents=true&orderBy=startTime",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(&time_min.to_rfc3339()),
            urlencoding::encode(&time_max.to_rfc3339()),
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CalendarError::network("Failed to list events", e))?;

        let response = self.check_status(response).await?;
        let list: EventListResponse = response
            .json()
            .await
            .map_err(|e| CalendarError::network("Failed to list events", e))?;

        Ok(list.items)
    }

    /// Create an all-day event on the given date.
    #[instrument(skip(self), level = "info")]
    pub async fn create_all_day_event(
        &self,
        calendar_id: &str,
        summary: &str,
        date: NaiveDate,
        color_id: &str,
    ) -> Result<CalendarEvent, CalendarError> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id),
        );

        let day = date.format("%Y-%m-%d").to_string();
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&serde_json::json!({
                "summary": summary,
                "description": EVENT_DESCRIPTION,
                "start": { "date": day },
                "end": { "date": day },
                "colorId": color_id,
            }))
            .send()
            .await
            .map_err(|e| CalendarError::network("Failed to create event", e))?;

        let response = self.check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CalendarError::network("Failed to create event", e))
    }

    /// Delete an event. The API answers 204 No Content on success.
    #[instrument(skip(self), level = "info")]
    pub async fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<(), CalendarError> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/calendars/{}/events/{}",
            self.base_url,
            urlencoding::encode(calendar_id),
            urlencoding::encode(event_id),
        );

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CalendarError::network("Failed to delete event", e))?;

        self.check_status(response).await?;
        Ok(())
    }
}
