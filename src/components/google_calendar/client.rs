use super::models::{CalendarEvent, CreatedEvent};
use super::token::TokenManager;
use crate::config::CalendarIdentity;
use crate::error::{google_calendar_error, BookingResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Capability to create events on a remote calendar
#[async_trait]
pub trait CalendarClient: Send + Sync {
    /// Create an event on the calendar named by `identity`
    async fn create_event(
        &self,
        identity: CalendarIdentity<'_>,
        event: &CalendarEvent,
    ) -> BookingResult<CreatedEvent>;
}

/// Calendar client backed by the Google Calendar REST API
#[derive(Clone)]
pub struct GoogleCalendarClient {
    client: Client,
    token_manager: TokenManager,
    api_base: Url,
}

impl GoogleCalendarClient {
    pub fn new() -> BookingResult<Self> {
        let client = Client::new();
        let token_manager = TokenManager::new(client.clone());
        Self::with_endpoints(client, token_manager, GOOGLE_CALENDAR_API_BASE)
    }

    pub fn with_endpoints(
        client: Client,
        token_manager: TokenManager,
        api_base: &str,
    ) -> BookingResult<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        if api_base.cannot_be_a_base() {
            return Err(google_calendar_error("Calendar API URL cannot be a base"));
        }

        Ok(Self {
            client,
            token_manager,
            api_base,
        })
    }

    /// URL of the events collection of a calendar
    fn events_url(&self, calendar_id: &str) -> Url {
        let mut url = self.api_base.clone();
        // Checked in the constructor
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["calendars", calendar_id, "events"]);
        }
        url
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn create_event(
        &self,
        identity: CalendarIdentity<'_>,
        event: &CalendarEvent,
    ) -> BookingResult<CreatedEvent> {
        let access_token = self.token_manager.get_token(identity.credential).await?;
        let url = self.events_url(identity.calendar_id);

        debug!("Creating calendar event on {}", identity.calendar_id);

        let response = self
            .client
            .post(url)
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json::<CreatedEvent>()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))
    }
}
