use super::args::lenient_string;
use super::{messages, parse_duration, CommandContext, CommandOutcome, DEFAULT_DURATION_MINUTES};
use crate::components::google_calendar::EventDateTime;
use crate::utils::time::{parse_date, parse_time, speech_date, speech_duration, speech_time, zoned_instant};
use chrono::{Duration, NaiveDate, Timelike};
use serde::Deserialize;
use tracing::{debug, error, info};

/// Arguments of an event update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventArgs {
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub new_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub new_time: Option<String>,
    /// Minutes
    #[serde(default, deserialize_with = "lenient_string")]
    pub new_duration: Option<String>,
}

/// A validated change to an existing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub event_id: String,
    pub new_date: Option<NaiveDate>,
    /// Hour and minute
    pub new_time: Option<(u32, u32)>,
    /// Minutes
    pub new_duration: Option<i64>,
}

impl UpdateEventArgs {
    /// Check presence and format of every supplied field without touching the calendar
    pub fn validate(&self) -> Result<UpdateRequest, CommandOutcome> {
        let Some(event_id) = self.event_id.as_deref() else {
            debug!("Event update missing event id");
            return Err(CommandOutcome::say(messages::UPDATE_MISSING_FIELDS));
        };
        if self.new_date.is_none() && self.new_time.is_none() && self.new_duration.is_none() {
            debug!(event_id, "Event update has nothing to change");
            return Err(CommandOutcome::say(messages::UPDATE_MISSING_FIELDS));
        }

        let new_date = self
            .new_date
            .as_deref()
            .map(|value| parse_date(value).ok_or_else(|| CommandOutcome::say(messages::INVALID_DATE)))
            .transpose()?;
        let new_time = self
            .new_time
            .as_deref()
            .map(|value| parse_time(value).ok_or_else(|| CommandOutcome::say(messages::INVALID_TIME)))
            .transpose()?;
        let new_duration = self
            .new_duration
            .as_deref()
            .map(|value| {
                parse_duration(value).ok_or_else(|| CommandOutcome::say(messages::INVALID_DURATION))
            })
            .transpose()?;

        Ok(UpdateRequest {
            event_id: event_id.to_string(),
            new_date,
            new_time,
            new_duration,
        })
    }
}

/// Move or resize an event; unspecified fields keep their current values
pub async fn update_event(ctx: &CommandContext<'_>, args: &UpdateEventArgs) -> CommandOutcome {
    match args.validate() {
        Ok(request) => reschedule_event(ctx, &request).await,
        Err(outcome) => outcome,
    }
}

/// Apply a validated change to the stored event
pub async fn reschedule_event(ctx: &CommandContext<'_>, request: &UpdateRequest) -> CommandOutcome {
    let event_id = request.event_id.as_str();

    let mut event = match ctx.calendar.get_event(ctx.calendar_id, event_id).await {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to fetch event {} for update: {}", event_id, e);
            return CommandOutcome::say(messages::UPDATE_FAILED);
        }
    };

    let Some(current_start) = event.start.as_ref().and_then(|s| s.resolve(&ctx.timezone)) else {
        error!("Event {} has no usable start time", event_id);
        return CommandOutcome::say(messages::UPDATE_FAILED);
    };
    let all_day = event.start.as_ref().is_some_and(|s| s.is_all_day());

    // All-day events have no meaningful length in minutes
    let current_duration = if all_day {
        DEFAULT_DURATION_MINUTES
    } else {
        event
            .end
            .as_ref()
            .and_then(|e| e.resolve(&ctx.timezone))
            .map(|end| (end - current_start).num_minutes())
            .filter(|minutes| *minutes > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES)
    };

    let date = request.new_date.unwrap_or_else(|| current_start.date_naive());
    let (hour, minute) = request.new_time.unwrap_or((current_start.hour(), current_start.minute()));
    let duration = request.new_duration.unwrap_or(current_duration);

    let start = match zoned_instant(date, hour, minute, &ctx.timezone) {
        Ok(start) => start,
        Err(_) => return CommandOutcome::say(messages::NONEXISTENT_TIME),
    };
    let end = start + Duration::minutes(duration);

    event.start = Some(EventDateTime::zoned(&start));
    event.end = Some(EventDateTime::zoned(&end));

    if let Err(e) = ctx
        .calendar
        .update_event(ctx.calendar_id, event_id, &event)
        .await
    {
        error!("Failed to update event {}: {}", event_id, e);
        return CommandOutcome::say(messages::UPDATE_FAILED);
    }

    info!(event_id, %start, %end, "Updated event");

    let subject = match event.summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(title) => format!("\"{}\"", title),
        None => "the event".to_string(),
    };

    CommandOutcome::say(format!(
        "I've moved {} to {} at {}, lasting {}.",
        subject,
        speech_date(&start),
        speech_time(&start),
        speech_duration(duration)
    ))
    .with_event_id(Some(event_id.to_string()))
}
