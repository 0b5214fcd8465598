pub mod commands;
pub mod components;
pub mod config;
pub mod error;
pub mod handlers;
pub mod shutdown;
pub mod startup;
pub mod state;
pub mod utils;

use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::handlers::{
    cancel_event_handler, check_availability_handler, create_event_handler, health_handler,
    index_handler, not_found_handler, panic_handler, ready_handler, update_event_handler,
};
use crate::state::AppState;

/// Build the HTTP router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/check-availability", post(check_availability_handler))
        .route("/create-event", post(create_event_handler))
        .route("/update-event", post(update_event_handler))
        .route("/cancel-event", post(cancel_event_handler))
        .fallback(not_found_handler)
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    request_id = %Uuid::new_v4(),
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
