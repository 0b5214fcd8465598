use crate::error::{config_error, BridgeResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default Google Calendar REST endpoint
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Default calendar when none is configured
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Default grace period before a forced exit on shutdown
pub const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Where the Google credentials come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Service account key JSON supplied inline
    Inline(String),
    /// Path to a service account key JSON file
    File(PathBuf),
    /// Pre-issued OAuth bearer token, for local development
    AccessToken(String),
    /// Nothing configured
    Missing,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Main configuration structure for the bridge
#[derive(Debug, Clone)]
pub struct Config {
    /// Where to load Google credentials from
    pub credentials: CredentialSource,
    /// Optional user to impersonate with domain-wide delegation
    pub impersonate_user: Option<String>,
    /// Google Calendar ID to operate on
    pub google_calendar_id: String,
    /// Base URL of the Google Calendar REST API
    pub api_base: String,
    /// Timezone for all local dates and times in requests
    pub timezone: Tz,
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// How long in-flight requests get to finish after a termination signal
    pub shutdown_grace: Duration,
    /// Whether /ready verifies the calendar with a live call
    pub readiness_probe: bool,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the environment, honoring a `.env` file
    pub fn load() -> BridgeResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> BridgeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = if let Some(json) = var("GOOGLE_SERVICE_ACCOUNT_JSON") {
            CredentialSource::Inline(json)
        } else if let Some(path) = var("GOOGLE_APPLICATION_CREDENTIALS") {
            CredentialSource::File(PathBuf::from(path))
        } else if let Some(token) = var("GOOGLE_ACCESS_TOKEN") {
            CredentialSource::AccessToken(token)
        } else {
            CredentialSource::Missing
        };

        let timezone_name = var("TIMEZONE").unwrap_or_else(|| String::from("UTC"));
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|_| config_error(&format!("Invalid TIMEZONE: {}", timezone_name)))?;

        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| config_error(&format!("Invalid PORT: {}", p)))?,
            None => DEFAULT_PORT,
        };

        let grace_secs = match var("SHUTDOWN_GRACE_SECS") {
            Some(s) => s
                .parse::<u64>()
                .map_err(|_| config_error(&format!("Invalid SHUTDOWN_GRACE_SECS: {}", s)))?,
            None => DEFAULT_SHUTDOWN_GRACE_SECS,
        };

        let readiness_probe = var("READINESS_PROBE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let log_format = match var("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            credentials,
            impersonate_user: var("GOOGLE_IMPERSONATE_USER"),
            google_calendar_id: var("GOOGLE_CALENDAR_ID")
                .unwrap_or_else(|| DEFAULT_CALENDAR_ID.to_string()),
            api_base: var("GOOGLE_CALENDAR_API_BASE")
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            timezone,
            host: var("HOST").unwrap_or_else(|| String::from("0.0.0.0")),
            port,
            shutdown_grace: Duration::from_secs(grace_secs),
            readiness_probe,
            log_format,
        })
    }

    /// Address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
