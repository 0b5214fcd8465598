use super::models::{CalendarEvent, CalendarList, CalendarListEntry, EventsPage};
use super::provider::{CalendarProvider, EventQuery, SendUpdates};
use super::token::TokenProvider;
use crate::error::{google_calendar_error, BridgeResult};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Google Calendar v3 REST client
#[derive(Clone)]
pub struct GoogleCalendarClient {
    api_base: Url,
    client: Client,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleCalendarClient {
    /// Create a client against `api_base`, e.g. `https://www.googleapis.com/calendar/v3`
    pub fn new(api_base: &str, client: Client, tokens: Arc<dyn TokenProvider>) -> BridgeResult<Self> {
        let api_base = Url::parse(api_base)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        if api_base.cannot_be_a_base() {
            return Err(google_calendar_error(&format!(
                "API base is not a base URL: {}",
                api_base
            )));
        }

        Ok(Self {
            api_base,
            client,
            tokens,
        })
    }

    /// Build an endpoint URL from path segments, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> BridgeResult<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| google_calendar_error("API base cannot take path segments"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, url: Url) -> BridgeResult<RequestBuilder> {
        let access_token = self.tokens.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(access_token))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> BridgeResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to {}: {}", action, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to {}: HTTP {} - {}",
                action, status, error_body
            )));
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> BridgeResult<T> {
        self.send(request, action)
            .await?
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse response to {}: {}", action, e)))
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> BridgeResult<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["calendars", calendar_id, "events"])?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair(
                    "timeMin",
                    &query.time_min.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
                pairs.append_pair(
                    "timeMax",
                    &query.time_max.to_rfc3339_opts(SecondsFormat::Secs, true),
                );
                pairs.append_pair("singleEvents", if query.single_events { "true" } else { "false" });
                if query.order_by_start_time {
                    pairs.append_pair("orderBy", "startTime");
                }
                if let Some(token) = &page_token {
                    pairs.append_pair("pageToken", token);
                }
            }

            let page: EventsPage = self
                .send_json(self.request(Method::GET, url).await?, "fetch events")
                .await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(calendar_id, count = events.len(), "Listed events");
        Ok(events)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
        send_updates: SendUpdates,
    ) -> BridgeResult<CalendarEvent> {
        let mut url = self.endpoint(&["calendars", calendar_id, "events"])?;
        url.query_pairs_mut()
            .append_pair("sendUpdates", send_updates.as_str());

        let request = self.request(Method::POST, url).await?.json(event);
        self.send_json(request, "insert event").await
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<CalendarEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id])?;
        self.send_json(self.request(Method::GET, url).await?, "fetch event")
            .await
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> BridgeResult<CalendarEvent> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id])?;
        let request = self.request(Method::PUT, url).await?.json(event);
        self.send_json(request, "update event").await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<()> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id])?;
        self.send(self.request(Method::DELETE, url).await?, "delete event")
            .await?;
        Ok(())
    }

    async fn list_calendars(&self, limit: u32) -> BridgeResult<Vec<CalendarListEntry>> {
        let mut url = self.endpoint(&["users", "me", "calendarList"])?;
        url.query_pairs_mut()
            .append_pair("maxResults", &limit.to_string());

        let list: CalendarList = self
            .send_json(self.request(Method::GET, url).await?, "list calendars")
            .await?;
        Ok(list.items)
    }
}
