mod client;
pub mod credentials;
pub mod models;
mod provider;
pub mod token;

pub use client::GoogleCalendarClient;
pub use credentials::{Credentials, ServiceAccountKey};
pub use models::{CalendarEvent, CalendarListEntry, EventDateTime, Reminders};
pub use provider::{CalendarProvider, EventQuery, SendUpdates};
pub use token::{ServiceAccountTokenManager, StaticToken, TokenProvider};

use crate::config::Config;
use crate::error::{google_calendar_error, BridgeResult};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Timeout applied to every request made to Google
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the calendar handle from configured credentials.
///
/// Only parses and validates credentials; no network call is made, so a
/// handle can exist before Google has ever been reached.
pub fn connect(config: &Config) -> BridgeResult<GoogleCalendarClient> {
    let credentials = Credentials::load(&config.credentials)?;

    let http = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| google_calendar_error(&format!("Failed to build HTTP client: {}", e)))?;

    let tokens: Arc<dyn TokenProvider> = match credentials {
        Credentials::ServiceAccount(key) => {
            let manager =
                ServiceAccountTokenManager::new(key, config.impersonate_user.clone(), http.clone())?;
            info!(client_email = %manager.client_email(), "Using service account credentials");
            Arc::new(manager)
        }
        Credentials::AccessToken(token) => {
            info!("Using static access token credentials");
            Arc::new(StaticToken::new(token))
        }
    };

    GoogleCalendarClient::new(&config.api_base, http, tokens)
}
