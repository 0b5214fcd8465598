use chrono::{Duration, Utc};
use voice_calendar_bridge::components::google_calendar::{self, CalendarProvider, EventQuery};
use voice_calendar_bridge::config::Config;
use voice_calendar_bridge::error::other_error;

/// Verify that the configured credentials can reach the configured calendar
#[tokio::main]
async fn main() -> miette::Result<()> {
    // Load configuration
    let config = Config::load()?;

    // Build the same handle the server uses
    let client = google_calendar::connect(&config)?;

    println!("Listing calendars visible to these credentials...");
    let calendars = client.list_calendars(10).await?;
    if calendars.is_empty() {
        return Err(other_error("No calendars are visible to these credentials").into());
    }

    for calendar in &calendars {
        println!(
            "  {} - {} ({}){}",
            calendar.id,
            calendar.summary.as_deref().unwrap_or("untitled"),
            calendar.access_role.as_deref().unwrap_or("unknown role"),
            if calendar.primary == Some(true) { " [primary]" } else { "" }
        );
    }

    // Make sure the target calendar itself answers
    let now = Utc::now();
    let events = client
        .list_events(
            &config.google_calendar_id,
            &EventQuery::window(now, now + Duration::days(1)),
        )
        .await?;

    println!(
        "Calendar '{}' is reachable: {} event(s) in the next 24 hours (timezone {}).",
        config.google_calendar_id,
        events.len(),
        config.timezone.name()
    );

    Ok(())
}
