use crate::build_router;
use crate::components::google_calendar::{self, CalendarProvider};
use crate::config::{Config, LogFormat};
use crate::error::Error;
use crate::shutdown;
use crate::state::{AppState, InitFailure};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Initialize logging with environment-based configuration
pub fn init_logging(format: LogFormat) -> miette::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    // Panics inside spawned tasks do not stop the process; make sure they are seen
    std::panic::set_hook(Box::new(|panic| {
        error!("Unhandled panic: {}", panic);
    }));

    Ok(())
}

/// Load the application config; runs before logging, so errors surface through miette
pub fn load_config() -> miette::Result<Config> {
    Ok(Config::load()?)
}

/// Build the calendar handle; failure leaves the service running but not ready
pub fn init_calendar(config: Arc<Config>) -> AppState {
    match google_calendar::connect(&config) {
        Ok(client) => {
            info!(
                calendar_id = %config.google_calendar_id,
                timezone = %config.timezone.name(),
                "Calendar handle initialized"
            );
            let calendar: Arc<dyn CalendarProvider> = Arc::new(client);
            AppState::ready(config, calendar)
        }
        Err(e) => {
            error!("Failed to initialize calendar, serving in not-ready mode: {}", e);
            AppState::not_ready(config, InitFailure::from(&e))
        }
    }
}

/// Serve HTTP until a termination signal, then drain within the grace period
pub async fn start_server(config: Config) -> miette::Result<()> {
    let config = Arc::new(config);
    let state = init_calendar(Arc::clone(&config));
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(Error::from)?;
    info!("Listening on {}", addr);

    // Create shutdown token
    let shutdown_token = CancellationToken::new();

    // Spawn signal handler task
    tokio::spawn(shutdown::handle_signals(shutdown_token.clone()));

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_token.clone().cancelled_owned())
        .into_future();

    // Wait for either the server to drain or the grace period to run out
    tokio::select! {
        result = server => {
            result.map_err(Error::from)?;
            info!("Server shut down gracefully");
        }
        _ = shutdown::grace_period_elapsed(shutdown_token, config.shutdown_grace) => {
            info!("Server shut down after grace period");
        }
    }

    Ok(())
}
