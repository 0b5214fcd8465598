use crate::commands::CommandContext;
use crate::components::google_calendar::CalendarProvider;
use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use std::time::Instant;

/// Why the calendar handle could not be built
#[derive(Debug, Clone)]
pub struct InitFailure {
    /// Error kind, safe to expose
    pub kind: &'static str,
    /// Full error text, for logs only
    pub detail: String,
}

impl From<&Error> for InitFailure {
    fn from(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }
}

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    calendar: Option<Arc<dyn CalendarProvider>>,
    init_failure: Option<InitFailure>,
    started_at: Instant,
}

impl AppState {
    /// State with a working calendar handle
    pub fn ready(config: Arc<Config>, calendar: Arc<dyn CalendarProvider>) -> Self {
        Self {
            config,
            calendar: Some(calendar),
            init_failure: None,
            started_at: Instant::now(),
        }
    }

    /// State after calendar initialization failed
    pub fn not_ready(config: Arc<Config>, failure: InitFailure) -> Self {
        Self {
            config,
            calendar: None,
            init_failure: Some(failure),
            started_at: Instant::now(),
        }
    }

    /// The calendar handle, if initialization succeeded
    pub fn calendar(&self) -> Option<&dyn CalendarProvider> {
        self.calendar.as_deref()
    }

    pub fn init_failure(&self) -> Option<&InitFailure> {
        self.init_failure.as_ref()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Context for running a command, or `None` while the calendar is unavailable
    pub fn command_context(&self) -> Option<CommandContext<'_>> {
        self.calendar().map(|calendar| CommandContext {
            calendar,
            calendar_id: &self.config.google_calendar_id,
            timezone: self.config.timezone,
        })
    }
}
