use tracing::info;
use voice_calendar_bridge::startup;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Load configuration
    let config = startup::load_config()?;

    // Initialize logging
    startup::init_logging(config.log_format)?;

    info!("Starting voice calendar bridge");

    // Serve until shutdown
    startup::start_server(config).await
}
