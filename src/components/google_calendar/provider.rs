use super::models::{CalendarEvent, CalendarListEntry};
use crate::error::BridgeResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Who gets notified about an inserted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendUpdates {
    All,
    None,
}

impl SendUpdates {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendUpdates::All => "all",
            SendUpdates::None => "none",
        }
    }
}

/// Events listing request over the half-open window `[time_min, time_max)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub single_events: bool,
    /// Ask the provider to order results by start time
    pub order_by_start_time: bool,
}

impl EventQuery {
    /// Recurring events expanded, ordered by start time
    pub fn window(time_min: DateTime<Utc>, time_max: DateTime<Utc>) -> Self {
        Self {
            time_min,
            time_max,
            single_events: true,
            order_by_start_time: true,
        }
    }
}

/// Capability over one external calendar account
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events overlapping the query window
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> BridgeResult<Vec<CalendarEvent>>;

    /// Insert an event and return it as stored by the provider
    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
        send_updates: SendUpdates,
    ) -> BridgeResult<CalendarEvent>;

    /// Fetch a single event
    async fn get_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<CalendarEvent>;

    /// Replace an event
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> BridgeResult<CalendarEvent>;

    /// Delete an event
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<()>;

    /// Calendars visible to the authenticated account
    async fn list_calendars(&self, limit: u32) -> BridgeResult<Vec<CalendarListEntry>>;
}
