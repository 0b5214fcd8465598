use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the bridge
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(bridge::config),
        help("check the variables in your environment or .env file")
    )]
    Config(String),

    #[error("Credentials error: {0}")]
    #[diagnostic(
        code(bridge::credentials),
        help("set GOOGLE_SERVICE_ACCOUNT_JSON or GOOGLE_APPLICATION_CREDENTIALS")
    )]
    Credentials(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(bridge::google_calendar))]
    GoogleCalendar(String),

    #[error("Validation error: {0}")]
    #[diagnostic(code(bridge::validation))]
    Validation(String),

    #[error(transparent)]
    #[diagnostic(code(bridge::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(bridge::other))]
    Other(String),
}

impl Error {
    /// Short machine-readable name of the error kind, safe to expose in health output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Credentials(_) => "credentials",
            Error::GoogleCalendar(_) => "google_calendar",
            Error::Validation(_) => "validation",
            Error::Io(_) => "io",
            Error::Other(_) => "other",
        }
    }
}

/// Type alias for Result with our Error type
pub type BridgeResult<T> = Result<T, Error>;

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create credentials errors
pub fn credentials_error(message: &str) -> Error {
    Error::Credentials(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create validation errors
pub fn validation_error(message: &str) -> Error {
    Error::Validation(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
