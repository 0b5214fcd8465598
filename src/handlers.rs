use crate::commands::args::parse_args;
use crate::commands::{
    book_event, check_window, messages, remove_event, reschedule_event, AvailabilityArgs,
    CancelEventArgs, CommandOutcome, CreateEventArgs, UpdateEventArgs,
};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::any::Any;
use std::convert::Infallible;
use tracing::{error, warn};

/// Name reported by the info endpoint
pub const SERVICE_NAME: &str = "voice-calendar-bridge";

/// Operation arguments taken from the `args` envelope of a request body.
///
/// Never rejects: a missing or malformed body becomes empty arguments.
pub struct Args<T>(pub T);

impl<S, T> FromRequest<S> for Args<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Bytes::from_request(req, state).await {
            Ok(body) => Ok(Args(parse_args(&body))),
            Err(e) => {
                warn!("Failed to read request body: {}", e);
                Ok(Args(T::default()))
            }
        }
    }
}

fn not_ready() -> Json<CommandOutcome> {
    warn!("Operation requested before the calendar is ready");
    Json(CommandOutcome::say(messages::NOT_READY))
}

/// Handler for the service info endpoint
pub async fn index_handler() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "GET /ready",
            "POST /check-availability",
            "POST /create-event",
            "POST /update-event",
            "POST /cancel-event"
        ]
    }))
}

/// Liveness: always 200 once the server is listening
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let calendar = json!({
        "initialized": state.calendar().is_some(),
        "calendarId": state.config.google_calendar_id,
        "timezone": state.config.timezone.name(),
        "error": state.init_failure().map(|f| f.kind),
    });

    Json(json!({
        "status": "healthy",
        "uptimeSeconds": state.uptime_secs(),
        "calendar": calendar,
    }))
}

/// Readiness: 503 until the calendar handle exists (and, if enabled, answers)
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let Some(calendar) = state.calendar() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "ready": false, "message": "Calendar is not initialized" })),
        );
    };

    if state.config.readiness_probe {
        if let Err(e) = calendar.list_calendars(1).await {
            error!("Readiness probe failed: {}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "ready": false, "message": "Calendar connection check failed" })),
            );
        }
    }

    (
        StatusCode::OK,
        Json(json!({ "ready": true, "message": "Calendar connection ready" })),
    )
}

// Operation handlers validate before checking readiness.

/// Handler for availability checks
pub async fn check_availability_handler(
    State(state): State<AppState>,
    Args(args): Args<AvailabilityArgs>,
) -> Json<CommandOutcome> {
    let request = match args.validate(&state.config.timezone) {
        Ok(request) => request,
        Err(outcome) => return Json(outcome),
    };
    let Some(ctx) = state.command_context() else {
        return not_ready();
    };
    Json(check_window(&ctx, &request).await)
}

/// Handler for event creation
pub async fn create_event_handler(
    State(state): State<AppState>,
    Args(args): Args<CreateEventArgs>,
) -> Json<CommandOutcome> {
    let request = match args.validate(&state.config.timezone) {
        Ok(request) => request,
        Err(outcome) => return Json(outcome),
    };
    let Some(ctx) = state.command_context() else {
        return not_ready();
    };
    Json(book_event(&ctx, &request).await)
}

/// Handler for event updates
pub async fn update_event_handler(
    State(state): State<AppState>,
    Args(args): Args<UpdateEventArgs>,
) -> Json<CommandOutcome> {
    let request = match args.validate() {
        Ok(request) => request,
        Err(outcome) => return Json(outcome),
    };
    let Some(ctx) = state.command_context() else {
        return not_ready();
    };
    Json(reschedule_event(&ctx, &request).await)
}

/// Handler for event cancellation
pub async fn cancel_event_handler(
    State(state): State<AppState>,
    Args(args): Args<CancelEventArgs>,
) -> Json<CommandOutcome> {
    let request = match args.validate() {
        Ok(request) => request,
        Err(outcome) => return Json(outcome),
    };
    let Some(ctx) = state.command_context() else {
        return not_ready();
    };
    Json(remove_event(&ctx, &request).await)
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found", "path": uri.path() })),
    )
}

/// Turn a handler panic into a generic 500 so the connection gets an answer
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("Request handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(CommandOutcome::say(messages::INTERNAL_ERROR)),
    )
        .into_response()
}
