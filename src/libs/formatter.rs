//! Time formatting for console tables.
//!
//! ```rust
//! use ttrack::libs::formatter::format_duration;
//! use chrono::TimeDelta;
//!
//! assert_eq!(format_duration(&TimeDelta::seconds(3725)), "01:02:05");
//! ```

use chrono::{NaiveDateTime, TimeDelta};

/// Formats a duration as `HH:MM:SS`. Negative durations render as zero.
///
/// Hours are not wrapped, so a 30 hour span renders as `30:00:00`.
pub fn format_duration(duration: &TimeDelta) -> String {
    let total = duration.num_seconds().max(0);
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

/// Formats the time-of-day part of a timestamp as `HH:MM:SS`.
pub fn format_time(time: &NaiveDateTime) -> String {
    time.format("%H:%M:%S").to_string()
}
