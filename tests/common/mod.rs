#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;
use voice_calendar_bridge::components::google_calendar::{
    CalendarEvent, CalendarListEntry, CalendarProvider, EventDateTime, EventQuery, SendUpdates,
};
use voice_calendar_bridge::error::{google_calendar_error, BridgeResult};

/// Detail that must never reach a spoken result
pub const PROVIDER_SECRET: &str = "backend-trace-7f3a";

/// A call the mock received
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListEvents {
        calendar_id: String,
        query: EventQuery,
    },
    InsertEvent {
        calendar_id: String,
        event: CalendarEvent,
        send_updates: SendUpdates,
    },
    GetEvent {
        calendar_id: String,
        event_id: String,
    },
    UpdateEvent {
        calendar_id: String,
        event_id: String,
        event: CalendarEvent,
    },
    DeleteEvent {
        calendar_id: String,
        event_id: String,
    },
    ListCalendars {
        limit: u32,
    },
}

/// In-memory calendar that records every call
#[derive(Debug, Default)]
pub struct MockCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    calls: Mutex<Vec<Call>>,
    failing: AtomicBool,
    next_id: AtomicUsize,
}

impl MockCalendar {
    /// Create an empty mock calendar
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock calendar holding `events`
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            ..Default::default()
        }
    }

    /// Create a mock calendar whose every call fails
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.failing.store(true, Ordering::SeqCst);
        mock
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().await.clone()
    }

    async fn record(&self, call: Call) -> BridgeResult<()> {
        self.calls.lock().await.push(call);
        if self.failing.load(Ordering::SeqCst) {
            return Err(google_calendar_error(&format!(
                "HTTP 500 Internal Server Error - {}",
                PROVIDER_SECRET
            )));
        }
        Ok(())
    }
}

fn bounds(event: &CalendarEvent) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = event.start.as_ref()?.resolve(&chrono_tz::UTC)?;
    let end = event.end.as_ref()?.resolve(&chrono_tz::UTC)?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

fn not_found(event_id: &str) -> voice_calendar_bridge::error::Error {
    google_calendar_error(&format!("HTTP 404 Not Found - no event {}", event_id))
}

#[async_trait]
impl CalendarProvider for MockCalendar {
    async fn list_events(&self, calendar_id: &str, query: &EventQuery) -> BridgeResult<Vec<CalendarEvent>> {
        self.record(Call::ListEvents {
            calendar_id: calendar_id.to_string(),
            query: query.clone(),
        })
        .await?;

        let events = self.events.lock().await;
        let mut overlapping: Vec<CalendarEvent> = events
            .iter()
            .filter(|event| match bounds(event) {
                Some((start, end)) => start < query.time_max && end > query.time_min,
                None => false,
            })
            .cloned()
            .collect();
        overlapping.sort_by_key(|event| bounds(event).map(|(start, _)| start));
        Ok(overlapping)
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &CalendarEvent,
        send_updates: SendUpdates,
    ) -> BridgeResult<CalendarEvent> {
        self.record(Call::InsertEvent {
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
            send_updates,
        })
        .await?;

        let id = format!("evt-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut stored = event.clone();
        stored.id = Some(id.clone());
        stored.html_link = Some(format!("https://calendar.example.com/event?eid={}", id));
        self.events.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn get_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<CalendarEvent> {
        self.record(Call::GetEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })
        .await?;

        self.events
            .lock()
            .await
            .iter()
            .find(|e| e.id.as_deref() == Some(event_id))
            .cloned()
            .ok_or_else(|| not_found(event_id))
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        event: &CalendarEvent,
    ) -> BridgeResult<CalendarEvent> {
        self.record(Call::UpdateEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            event: event.clone(),
        })
        .await?;

        let mut events = self.events.lock().await;
        let slot = events
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(event_id))
            .ok_or_else(|| not_found(event_id))?;
        *slot = event.clone();
        Ok(slot.clone())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> BridgeResult<()> {
        self.record(Call::DeleteEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
        })
        .await?;

        let mut events = self.events.lock().await;
        let before = events.len();
        events.retain(|e| e.id.as_deref() != Some(event_id));
        if events.len() == before {
            return Err(not_found(event_id));
        }
        Ok(())
    }

    async fn list_calendars(&self, limit: u32) -> BridgeResult<Vec<CalendarListEntry>> {
        self.record(Call::ListCalendars { limit }).await?;

        Ok(vec![CalendarListEntry {
            id: "primary".to_string(),
            summary: Some("Test Calendar".to_string()),
            access_role: Some("owner".to_string()),
            primary: Some(true),
            ..Default::default()
        }])
    }
}

/// A timed event between two RFC 3339 instants
pub fn timed_event(id: &str, summary: &str, start: &str, end: &str) -> CalendarEvent {
    CalendarEvent {
        id: Some(id.to_string()),
        summary: Some(summary.to_string()),
        start: Some(EventDateTime {
            date_time: Some(start.to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(end.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
