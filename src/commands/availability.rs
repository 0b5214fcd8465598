use super::args::lenient_string;
use super::{count_events, describe_events, messages, resolve_start, CommandContext, CommandOutcome};
use crate::components::google_calendar::EventQuery;
use crate::utils::time::{speech_date, speech_time};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, error, info};

/// Arguments of an availability check
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityArgs {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_time: Option<String>,
}

/// A validated availability window in the configured zone
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRequest {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl AvailabilityArgs {
    /// Check presence and format of every field without touching the calendar
    pub fn validate(&self, timezone: &Tz) -> Result<AvailabilityRequest, CommandOutcome> {
        let (Some(date), Some(start_time), Some(end_time)) = (
            self.date.as_deref(),
            self.start_time.as_deref(),
            self.end_time.as_deref(),
        ) else {
            debug!("Availability check missing required fields");
            return Err(CommandOutcome::say(messages::AVAILABILITY_MISSING_FIELDS));
        };

        let start = resolve_start(date, start_time, timezone).map_err(CommandOutcome::say)?;
        let end = resolve_start(date, end_time, timezone).map_err(CommandOutcome::say)?;
        if end <= start {
            return Err(CommandOutcome::say(messages::AVAILABILITY_END_BEFORE_START));
        }

        Ok(AvailabilityRequest { start, end })
    }
}

/// Report whether the calendar is free in `[start, end)` on the given date
pub async fn check_availability(ctx: &CommandContext<'_>, args: &AvailabilityArgs) -> CommandOutcome {
    match args.validate(&ctx.timezone) {
        Ok(request) => check_window(ctx, &request).await,
        Err(outcome) => outcome,
    }
}

/// Look up a validated window and describe what occupies it
pub async fn check_window(ctx: &CommandContext<'_>, request: &AvailabilityRequest) -> CommandOutcome {
    let AvailabilityRequest { start, end } = request;

    let query = EventQuery::window(start.with_timezone(&Utc), end.with_timezone(&Utc));
    let events = match ctx.calendar.list_events(ctx.calendar_id, &query).await {
        Ok(events) => events,
        Err(e) => {
            error!("Failed to check availability: {}", e);
            return CommandOutcome::say(messages::AVAILABILITY_FAILED);
        }
    };

    info!(%start, %end, busy = events.len(), "Checked availability");

    if events.is_empty() {
        CommandOutcome::say(format!(
            "Good news, you're free on {} from {} to {}.",
            speech_date(start),
            speech_time(start),
            speech_time(end)
        ))
    } else {
        CommandOutcome::say(format!(
            "You have {} between {} and {} on {}: {}.",
            count_events(events.len()),
            speech_time(start),
            speech_time(end),
            speech_date(start),
            describe_events(&events, &ctx.timezone)
        ))
    }
}
