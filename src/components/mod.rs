// Export components
pub mod google_calendar;

// Re-export the calendar capability
pub use google_calendar::{CalendarProvider, GoogleCalendarClient};
