//! Fixed phrases returned to the voice agent.
//!
//! These are spoken to callers as-is, so none of them carry error detail.

pub const NOT_READY: &str =
    "The calendar service is still starting up. Please try again in a moment.";

pub const INVALID_DATE: &str =
    "I couldn't understand that date. Please give it as year, month and day, like 2024-06-01.";

pub const INVALID_TIME: &str =
    "I couldn't understand that time. Please give it in 24-hour format, like 14:30.";

pub const NONEXISTENT_TIME: &str =
    "That time is skipped by a daylight saving change. Please choose a different time.";

pub const INVALID_DURATION: &str =
    "The duration should be a whole number of minutes, up to one day.";

pub const AVAILABILITY_MISSING_FIELDS: &str =
    "I need a date, a start time and an end time to check availability.";

pub const AVAILABILITY_END_BEFORE_START: &str = "The end time needs to be after the start time.";

pub const AVAILABILITY_FAILED: &str =
    "I'm having trouble checking the calendar right now. Please try again in a moment.";

pub const CREATE_MISSING_FIELDS: &str =
    "I need a title, a date and a start time to schedule an event.";

pub const CREATE_INVALID_EMAIL: &str =
    "That attendee email address doesn't look right. Could you repeat it?";

pub const CREATE_FAILED: &str =
    "I couldn't create the event right now. Please try again in a moment.";

pub const UPDATE_MISSING_FIELDS: &str =
    "I need the event ID and a new date, time or duration to update an event.";

pub const UPDATE_FAILED: &str =
    "I couldn't update that event. Please check the event ID and try again.";

pub const CANCEL_MISSING_FIELDS: &str = "I need the event ID to cancel an event.";

pub const CANCEL_SUCCEEDED: &str = "The event has been cancelled.";

pub const CANCEL_FAILED: &str =
    "I couldn't cancel that event. Please check the event ID and try again.";

pub const INTERNAL_ERROR: &str = "Something went wrong on my end. Please try again in a moment.";
