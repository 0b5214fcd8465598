use crate::components::google_calendar::{CalendarEvent, CalendarProvider};
use crate::utils::time::{parse_date, parse_time, speech_time, zoned_instant};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Serialize;

// Export submodules
pub mod args;
pub mod availability;
pub mod cancel;
pub mod create;
pub mod messages;
pub mod update;

pub use availability::{check_availability, check_window, AvailabilityArgs, AvailabilityRequest};
pub use cancel::{cancel_event, remove_event, CancelEventArgs, CancelRequest};
pub use create::{book_event, create_event, CreateEventArgs, CreateRequest};
pub use update::{reschedule_event, update_event, UpdateEventArgs, UpdateRequest};

/// Longest event the bridge will book, in minutes
pub const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// Duration used when none is given, in minutes
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// How many busy events are read out before summarizing the rest
const MAX_LISTED_EVENTS: usize = 5;

/// Shared context for all commands
#[derive(Clone, Copy)]
pub struct CommandContext<'a> {
    pub calendar: &'a dyn CalendarProvider,
    pub calendar_id: &'a str,
    pub timezone: Tz,
}

/// What a command tells the voice agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandOutcome {
    /// Text meant to be spoken back to the caller
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_link: Option<String>,
}

impl CommandOutcome {
    /// Outcome carrying only a spoken message
    pub fn say(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
            event_id: None,
            event_link: None,
        }
    }

    pub fn with_event_id(mut self, event_id: Option<String>) -> Self {
        self.event_id = event_id;
        self
    }

    pub fn with_event_link(mut self, event_link: Option<String>) -> Self {
        self.event_link = event_link;
        self
    }
}

/// Resolve a requested date and time, or the message explaining why not
fn resolve_start(date: &str, time: &str, timezone: &Tz) -> Result<DateTime<Tz>, &'static str> {
    let date = parse_date(date).ok_or(messages::INVALID_DATE)?;
    let (hour, minute) = parse_time(time).ok_or(messages::INVALID_TIME)?;
    zoned_instant(date, hour, minute, timezone).map_err(|_| messages::NONEXISTENT_TIME)
}

/// Parse a duration in minutes; whole numbers between 1 and a day
fn parse_duration(value: &str) -> Option<i64> {
    let minutes = value.trim().parse::<f64>().ok()?;
    if !minutes.is_finite() || minutes.fract() != 0.0 {
        return None;
    }
    let minutes = minutes as i64;
    (1..=MAX_DURATION_MINUTES).contains(&minutes).then_some(minutes)
}

/// Speak a list of events, e.g. "Dentist at 9:00 AM and Standup at 9:30 AM"
fn describe_events(events: &[CalendarEvent], timezone: &Tz) -> String {
    let mut parts: Vec<String> = events
        .iter()
        .take(MAX_LISTED_EVENTS)
        .map(|event| {
            let title = event
                .summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or("Busy");

            match &event.start {
                Some(start) if start.is_all_day() => format!("{} (all day)", title),
                Some(start) => match start.resolve(timezone) {
                    Some(dt) => format!("{} at {}", title, speech_time(&dt)),
                    None => title.to_string(),
                },
                None => title.to_string(),
            }
        })
        .collect();

    if events.len() > MAX_LISTED_EVENTS {
        parts.push(format!("{} more", events.len() - MAX_LISTED_EVENTS));
    }

    match parts.len() {
        0 => String::new(),
        1 => parts.remove(0),
        2 => format!("{} and {}", parts[0], parts[1]),
        n => format!("{}, and {}", parts[..n - 1].join(", "), parts[n - 1]),
    }
}

/// "1 event" / "3 events"
fn count_events(count: usize) -> String {
    if count == 1 {
        "1 event".to_string()
    } else {
        format!("{} events", count)
    }
}
