use super::args::lenient_string;
use super::{
    count_events, describe_events, messages, parse_duration, resolve_start, CommandContext,
    CommandOutcome, DEFAULT_DURATION_MINUTES,
};
use crate::components::google_calendar::models::Attendee;
use crate::components::google_calendar::{
    CalendarEvent, EventDateTime, EventQuery, Reminders, SendUpdates,
};
use crate::utils::time::{speech_date, speech_duration, speech_time};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, error, info, warn};

/// Arguments of an event creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventArgs {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    /// Minutes, defaults to an hour
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub attendee_email: Option<String>,
}

/// A validated booking in the configured zone
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Minutes
    pub duration: i64,
    pub description: Option<String>,
    pub attendee_email: Option<String>,
}

impl CreateEventArgs {
    /// Check presence and format of every field without touching the calendar
    pub fn validate(&self, timezone: &Tz) -> Result<CreateRequest, CommandOutcome> {
        let (Some(title), Some(date), Some(start_time)) = (
            self.title.as_deref(),
            self.date.as_deref(),
            self.start_time.as_deref(),
        ) else {
            debug!("Event creation missing required fields");
            return Err(CommandOutcome::say(messages::CREATE_MISSING_FIELDS));
        };

        let duration = match self.duration.as_deref() {
            Some(value) => {
                parse_duration(value).ok_or_else(|| CommandOutcome::say(messages::INVALID_DURATION))?
            }
            None => DEFAULT_DURATION_MINUTES,
        };

        if let Some(email) = self.attendee_email.as_deref() {
            if !email.contains('@') {
                return Err(CommandOutcome::say(messages::CREATE_INVALID_EMAIL));
            }
        }

        let start = resolve_start(date, start_time, timezone).map_err(CommandOutcome::say)?;

        Ok(CreateRequest {
            title: title.to_string(),
            start,
            end: start + Duration::minutes(duration),
            duration,
            description: self.description.clone(),
            attendee_email: self.attendee_email.clone(),
        })
    }
}

/// Book an event unless something already occupies its slot
pub async fn create_event(ctx: &CommandContext<'_>, args: &CreateEventArgs) -> CommandOutcome {
    match args.validate(&ctx.timezone) {
        Ok(request) => book_event(ctx, &request).await,
        Err(outcome) => outcome,
    }
}

/// Insert a validated booking after checking its slot is empty
pub async fn book_event(ctx: &CommandContext<'_>, request: &CreateRequest) -> CommandOutcome {
    let CreateRequest { start, end, .. } = request;

    // The check and the insert are separate calls; a concurrent booking can
    // still land between them.
    let query = EventQuery::window(start.with_timezone(&Utc), end.with_timezone(&Utc));
    let conflicts = match ctx.calendar.list_events(ctx.calendar_id, &query).await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to check for conflicts before creating event: {}", e);
            return CommandOutcome::say(messages::CREATE_FAILED);
        }
    };

    if !conflicts.is_empty() {
        info!(%start, %end, conflicts = conflicts.len(), "Refusing to double-book");
        return CommandOutcome::say(format!(
            "That time is already booked. You have {} between {} and {} on {}: {}. Would you like to pick a different time?",
            count_events(conflicts.len()),
            speech_time(start),
            speech_time(end),
            speech_date(start),
            describe_events(&conflicts, &ctx.timezone)
        ));
    }

    let attendees: Vec<Attendee> = request
        .attendee_email
        .iter()
        .map(|email| Attendee {
            email: email.clone(),
            ..Default::default()
        })
        .collect();
    let send_updates = if attendees.is_empty() {
        SendUpdates::None
    } else {
        SendUpdates::All
    };

    let event = CalendarEvent {
        summary: Some(request.title.clone()),
        description: request.description.clone(),
        start: Some(EventDateTime::zoned(start)),
        end: Some(EventDateTime::zoned(end)),
        attendees,
        reminders: Some(Reminders::standard()),
        ..Default::default()
    };

    let created = match ctx
        .calendar
        .insert_event(ctx.calendar_id, &event, send_updates)
        .await
    {
        Ok(created) => created,
        Err(e) => {
            error!("Failed to create event: {}", e);
            return CommandOutcome::say(messages::CREATE_FAILED);
        }
    };

    match &created.id {
        Some(id) => info!(event_id = %id, %start, %end, "Created event"),
        None => warn!("Provider returned created event without an id"),
    }

    let mut result = format!(
        "I've scheduled \"{}\" for {} at {}, lasting {}.",
        request.title,
        speech_date(start),
        speech_time(start),
        speech_duration(request.duration)
    );
    if let Some(email) = request.attendee_email.as_deref() {
        result.push_str(&format!(" An invitation has been sent to {}.", email));
    }

    CommandOutcome::say(result)
        .with_event_id(created.id)
        .with_event_link(created.html_link)
}
