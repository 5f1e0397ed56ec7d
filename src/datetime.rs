//! Date/time utilities for Parlor.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Format used for the `time` field of chat messages.
pub const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Format a DateTime<Utc> in the specified timezone.
///
/// Falls back to UTC when the timezone name is unknown.
pub fn format_utc_datetime(dt: &DateTime<Utc>, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return dt.format(format).to_string(),
    };
    dt.with_timezone(&tz).format(format).to_string()
}

/// Format a timestamp as the `HH:MM:SS` wall-clock time shown on messages.
pub fn format_clock_time(dt: &DateTime<Utc>, timezone: &str) -> String {
    format_utc_datetime(dt, timezone, CLOCK_FORMAT)
}
