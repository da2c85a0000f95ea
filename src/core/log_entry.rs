//! Log entry structure

use super::entry_pool::Recycle;
use super::log_level::LogLevel;
use super::timestamp;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One log record
///
/// Created once per log call and never mutated after it has been handed to a
/// writer; writers receive it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<FixedOffset>,
    /// `file:line` of the call site, empty when caller capture is disabled
    pub caller: String,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            message: String::new(),
            timestamp: DateTime::<Utc>::default().fixed_offset(),
            caller: String::new(),
        }
    }
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        let mut entry = Self {
            level,
            message: message.into(),
            timestamp: timestamp::now(),
            caller: String::new(),
        };
        entry.sanitize_message();
        entry
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = caller.into();
        self
    }

    /// Escape line breaks and tabs in place so one entry always renders as
    /// exactly one line.
    pub(crate) fn sanitize_message(&mut self) {
        if self.message.contains(['\n', '\r', '\t']) {
            self.message = self
                .message
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t");
        }
    }

    /// Render as `[LEVEL] [DATETIME] : CALLER -> MESSAGE\n`
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_buffered_logger::{LogEntry, LogLevel};
    /// use chrono::{FixedOffset, TimeZone};
    ///
    /// let ts = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    /// let entry = LogEntry::new(LogLevel::Info, "ready")
    ///     .with_timestamp(ts)
    ///     .with_caller("src/main.rs:10");
    ///
    /// assert_eq!(
    ///     entry.render("%Y-%m-%d %H:%M:%S"),
    ///     "[Info ] [2024-01-01 08:00:00] : src/main.rs:10 -> ready\n"
    /// );
    /// ```
    #[must_use]
    pub fn render(&self, datetime_format: &str) -> String {
        let mut line = String::with_capacity(self.message.len() + self.caller.len() + 48);
        self.render_into(&mut line, datetime_format);
        line
    }

    /// Append the rendered record to `buf`
    pub fn render_into(&self, buf: &mut String, datetime_format: &str) {
        // Writing to a String cannot fail.
        let _ = writeln!(
            buf,
            "[{:<5.5}] [{}] : {} -> {}",
            self.level,
            timestamp::format_with(&self.timestamp, datetime_format),
            self.caller,
            self.message
        );
    }
}

impl Recycle for LogEntry {
    fn recycle(&mut self) {
        self.level = LogLevel::Debug;
        self.message.clear();
        self.caller.clear();
        self.timestamp = DateTime::<Utc>::default().fixed_offset();
    }
}
