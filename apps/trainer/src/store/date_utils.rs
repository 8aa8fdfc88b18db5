//! Date utilities for the study day and persisted date formats.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

/// Format of `last_review`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format of history timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get adjusted "today" based on daily_reset_hour.
///
/// If the current hour is before the reset hour, "today" is actually "yesterday"
/// from a study perspective, so a late-night session counts towards the
/// previous day.
pub fn adjusted_today(daily_reset_hour: u32) -> NaiveDate {
    let now = Local::now();

    if now.hour() < daily_reset_hour {
        (now - Duration::days(1)).date_naive()
    } else {
        now.date_naive()
    }
}

/// Current local time truncated to whole seconds, as logged in the history.
pub fn now_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}
