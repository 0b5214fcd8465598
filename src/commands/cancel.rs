use super::args::lenient_string;
use super::{messages, CommandContext, CommandOutcome};
use serde::Deserialize;
use tracing::{debug, error, info};

/// Arguments of an event cancellation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelEventArgs {
    #[serde(default, deserialize_with = "lenient_string")]
    pub event_id: Option<String>,
}

/// A validated cancellation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub event_id: String,
}

impl CancelEventArgs {
    pub fn validate(&self) -> Result<CancelRequest, CommandOutcome> {
        match self.event_id.as_deref() {
            Some(event_id) => Ok(CancelRequest {
                event_id: event_id.to_string(),
            }),
            None => {
                debug!("Event cancellation missing event id");
                Err(CommandOutcome::say(messages::CANCEL_MISSING_FIELDS))
            }
        }
    }
}

/// Delete an event
pub async fn cancel_event(ctx: &CommandContext<'_>, args: &CancelEventArgs) -> CommandOutcome {
    match args.validate() {
        Ok(request) => remove_event(ctx, &request).await,
        Err(outcome) => outcome,
    }
}

/// Delete a validated event id with a single provider call
pub async fn remove_event(ctx: &CommandContext<'_>, request: &CancelRequest) -> CommandOutcome {
    let event_id = request.event_id.as_str();

    match ctx.calendar.delete_event(ctx.calendar_id, event_id).await {
        Ok(()) => {
            info!(event_id, "Cancelled event");
            CommandOutcome::say(messages::CANCEL_SUCCEEDED)
        }
        Err(e) => {
            error!("Failed to cancel event {}: {}", event_id, e);
            CommandOutcome::say(messages::CANCEL_FAILED)
        }
    }
}
