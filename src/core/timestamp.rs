//! Timestamp formatting utilities
//!
//! Log timestamps keep the UTC offset that was in effect when the entry was
//! created, so day boundaries (and therefore file rotation) are evaluated in
//! the entry's own time zone. Formats are strftime-compatible patterns.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime};
use std::fmt::Write;

/// Default date pattern, used in rotated file names: `2025-01-08`
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default date-time pattern, used in rendered records: `2025-01-08 10:30:45.123`
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Current local time with its offset attached
#[inline]
pub fn now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Check that `pattern` is a usable strftime pattern
///
/// # Examples
///
/// ```
/// use rust_buffered_logger::core::timestamp::is_valid_pattern;
///
/// assert!(is_valid_pattern("%Y-%m-%d"));
/// assert!(!is_valid_pattern("%Y-%Q"));
/// ```
#[must_use]
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Format `datetime` with `pattern`
///
/// Falls back to RFC 3339 when the pattern cannot be rendered, so a bad
/// pattern never aborts a log call.
#[must_use]
pub fn format_with(datetime: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::with_capacity(32);
    if write!(out, "{}", datetime.format(pattern)).is_err() {
        out.clear();
        out.push_str(&datetime.to_rfc3339());
    }
    out
}

/// Last representable instant of the calendar day containing `datetime`,
/// evaluated in `datetime`'s own offset: `startOfDay + 24h - 1ns`
#[must_use]
pub fn end_of_day(datetime: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let start = datetime
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_local_timezone(*datetime.offset())
        .single()
        .unwrap_or(*datetime);
    start + Duration::days(1) - Duration::nanoseconds(1)
}
