use crate::error::{validation_error, BridgeResult};
use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Parse date string in YYYY-MM-DD format
pub fn parse_date(date_str: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").ok()
}

/// Combine a calendar date and a wall-clock time in `timezone`.
///
/// Ambiguous times (clocks falling back) resolve to the earlier instant;
/// times skipped by a DST jump are rejected.
pub fn zoned_instant(date: NaiveDate, hour: u32, minute: u32, timezone: &Tz) -> BridgeResult<DateTime<Tz>> {
    let naive = date
        .and_hms_opt(hour, minute, 0)
        .ok_or_else(|| validation_error("Failed to create datetime"))?;

    match timezone.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => Ok(dt),
        chrono::LocalResult::Ambiguous(earlier, _) => Ok(earlier),
        chrono::LocalResult::None => Err(validation_error(&format!(
            "{} does not exist in {}",
            naive,
            timezone.name()
        ))),
    }
}

/// Time of day as it should be spoken, e.g. "9:00 AM"
pub fn speech_time<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%-I:%M %p").to_string()
}

/// Date as it should be spoken, e.g. "Saturday, June 1"
pub fn speech_date<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%A, %B %-d").to_string()
}

/// Duration as it should be spoken, e.g. "1 hour and 30 minutes"
pub fn speech_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;

    let hours_part = match hours {
        0 => None,
        1 => Some("1 hour".to_string()),
        n => Some(format!("{} hours", n)),
    };
    let minutes_part = match rest {
        0 => None,
        1 => Some("1 minute".to_string()),
        n => Some(format!("{} minutes", n)),
    };

    match (hours_part, minutes_part) {
        (Some(h), Some(m)) => format!("{} and {}", h, m),
        (Some(h), None) => h,
        (None, Some(m)) => m,
        (None, None) => "0 minutes".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn local_instant(date: &str, time: &str, tz: &Tz) -> BridgeResult<DateTime<Tz>> {
        let (hour, minute) = parse_time(time).unwrap();
        zoned_instant(parse_date(date).unwrap(), hour, minute, tz)
    }

    #[test]
    fn test_parse_time() {
        // Valid cases
        assert_eq!(parse_time("00:00"), Some((0, 0)));
        assert_eq!(parse_time("12:30"), Some((12, 30)));
        assert_eq!(parse_time("23:59"), Some((23, 59)));
        assert_eq!(parse_time("9:05"), Some((9, 5)));

        // Invalid cases
        assert_eq!(parse_time("24:00"), None); // Hour out of range
        assert_eq!(parse_time("12:60"), None); // Minute out of range
        assert_eq!(parse_time("12:30:45"), None); // Too many parts
        assert_eq!(parse_time("12"), None); // Too few parts
        assert_eq!(parse_time("12:ab"), None); // Invalid minute
        assert_eq!(parse_time("ab:30"), None); // Invalid hour
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-06-01"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("06/01/2024"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn test_local_instant_uses_timezone() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let dt = local_instant("2024-06-01", "09:00", &tz).unwrap();
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.with_timezone(&Utc).hour(), 13);
    }

    #[test]
    fn test_dst_gap_and_overlap() {
        let tz: Tz = "America/New_York".parse().unwrap();

        // 2:30 AM does not exist on spring-forward day
        assert!(local_instant("2024-03-10", "02:30", &tz).is_err());

        // 1:30 AM happens twice on fall-back day; take the first (EDT)
        let dt = local_instant("2024-11-03", "01:30", &tz).unwrap();
        assert_eq!(dt.with_timezone(&Utc).hour(), 5);
    }

    #[test]
    fn test_speech_formatting() {
        let tz: Tz = "UTC".parse().unwrap();
        let dt = local_instant("2024-06-01", "09:00", &tz).unwrap();
        assert_eq!(speech_time(&dt), "9:00 AM");
        assert_eq!(speech_date(&dt), "Saturday, June 1");

        let dt = local_instant("2024-12-25", "14:30", &tz).unwrap();
        assert_eq!(speech_time(&dt), "2:30 PM");
        assert_eq!(speech_date(&dt), "Wednesday, December 25");
    }

    #[test]
    fn test_speech_duration() {
        assert_eq!(speech_duration(30), "30 minutes");
        assert_eq!(speech_duration(60), "1 hour");
        assert_eq!(speech_duration(90), "1 hour and 30 minutes");
        assert_eq!(speech_duration(121), "2 hours and 1 minute");
    }
}
