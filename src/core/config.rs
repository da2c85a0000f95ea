//! Logger and writer configuration
//!
//! [`LoggerConfig`] is shared by every log call and updated through `&self`
//! setters: scalar fields are atomics and format strings sit behind an
//! `RwLock`, so a concurrent reader sees either the old or the new value of
//! a field, never a torn one. [`WriterConfig`] is a plain value consumed when
//! a writer is constructed.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::timestamp::{is_valid_pattern, DEFAULT_DATETIME_FORMAT, DEFAULT_DATE_FORMAT};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::time::Duration;

/// Default number of entries a file writer buffers before flushing inline
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default period of the background flush timer
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(3);

/// Default number of flush-and-retry rounds on queue overflow
pub const DEFAULT_OVERFLOW_RETRIES: u32 = 3;

fn validate_pattern(component: &str, pattern: &str) -> Result<()> {
    if is_valid_pattern(pattern) {
        Ok(())
    } else {
        Err(LoggerError::config(
            component,
            format!("invalid strftime pattern '{}'", pattern),
        ))
    }
}

/// Runtime settings of a [`Logger`](crate::Logger)
#[derive(Debug)]
pub struct LoggerConfig {
    min_level: AtomicU8,
    print_enabled: AtomicBool,
    print_color: AtomicBool,
    print_caller_path: AtomicBool,
    caller_skip_depth: AtomicUsize,
    date_format: RwLock<String>,
    date_time_format: RwLock<String>,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self {
            min_level: AtomicU8::new(LogLevel::Debug.as_u8()),
            print_enabled: AtomicBool::new(true),
            print_color: AtomicBool::new(true),
            print_caller_path: AtomicBool::new(true),
            caller_skip_depth: AtomicUsize::new(0),
            date_format: RwLock::new(DEFAULT_DATE_FORMAT.to_string()),
            date_time_format: RwLock::new(DEFAULT_DATETIME_FORMAT.to_string()),
        }
    }

    #[inline]
    pub fn min_level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::Relaxed))
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.min_level.store(level.as_u8(), Ordering::Relaxed);
    }

    #[inline]
    pub fn print_enabled(&self) -> bool {
        self.print_enabled.load(Ordering::Relaxed)
    }

    pub fn set_print_enabled(&self, enabled: bool) {
        self.print_enabled.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn print_color(&self) -> bool {
        self.print_color.load(Ordering::Relaxed)
    }

    pub fn set_print_color(&self, enabled: bool) {
        self.print_color.store(enabled, Ordering::Relaxed);
    }

    #[inline]
    pub fn print_caller_path(&self) -> bool {
        self.print_caller_path.load(Ordering::Relaxed)
    }

    pub fn set_print_caller_path(&self, enabled: bool) {
        self.print_caller_path.store(enabled, Ordering::Relaxed);
    }

    /// Number of leading path components stripped from captured caller paths
    #[inline]
    pub fn caller_skip_depth(&self) -> usize {
        self.caller_skip_depth.load(Ordering::Relaxed)
    }

    pub fn set_caller_skip_depth(&self, depth: usize) {
        self.caller_skip_depth.store(depth, Ordering::Relaxed);
    }

    pub fn date_format(&self) -> String {
        self.date_format.read().clone()
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `pattern` is not a valid strftime pattern
    pub fn set_date_format(&self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        validate_pattern("LoggerConfig.date_format", &pattern)?;
        *self.date_format.write() = pattern;
        Ok(())
    }

    pub fn date_time_format(&self) -> String {
        self.date_time_format.read().clone()
    }

    /// Run `f` with the current date-time pattern without cloning it
    pub fn with_date_time_format<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.date_time_format.read())
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `pattern` is not a valid strftime pattern
    pub fn set_date_time_format(&self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        validate_pattern("LoggerConfig.date_time_format", &pattern)?;
        *self.date_time_format.write() = pattern;
        Ok(())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis().min(u128::from(u64::MAX)) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Settings of one [`FileWriter`](crate::writers::FileWriter)
///
/// # Examples
///
/// ```
/// use rust_buffered_logger::{LogLevel, WriterConfig};
/// use std::time::Duration;
///
/// let config = WriterConfig::new()
///     .with_level(LogLevel::Warn)
///     .with_rotation(true)
///     .with_queue_capacity(256)
///     .with_flush_interval(Duration::from_millis(500));
/// assert!(config.validate().is_ok());
///
/// let parsed = WriterConfig::from_json(r#"{ "level": "Error", "flush_interval_ms": 250 }"#).unwrap();
/// assert_eq!(parsed.level, LogLevel::Error);
/// assert_eq!(parsed.flush_interval, Duration::from_millis(250));
/// assert_eq!(parsed.queue_capacity, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Entries below this level are discarded by the writer
    pub level: LogLevel,
    /// Switch to a new dated file at each calendar-day boundary
    pub rotate: bool,
    /// Bounded queue capacity
    pub queue_capacity: usize,
    /// Period of the background flush timer
    #[serde(rename = "flush_interval_ms", with = "duration_ms")]
    pub flush_interval: Duration,
    /// strftime pattern for the date in rotated file names
    pub date_format: String,
    /// strftime pattern for the date-time field of each record
    pub date_time_format: String,
    /// Flush-and-retry rounds on overflow before an entry is reported lost
    pub overflow_retries: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Debug,
            rotate: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            date_time_format: DEFAULT_DATETIME_FORMAT.to_string(),
            overflow_retries: DEFAULT_OVERFLOW_RETRIES,
        }
    }
}

impl WriterConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns `JsonError` on malformed input and `InvalidConfiguration` if the
    /// parsed values fail [`WriterConfig::validate`]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_date_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_time_format = pattern.into();
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_overflow_retries(mut self, retries: u32) -> Self {
        self.overflow_retries = retries;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for a zero capacity, a zero flush
    /// interval or an unusable format pattern
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "WriterConfig.queue_capacity",
                "capacity must be greater than zero",
            ));
        }
        if self.flush_interval.is_zero() {
            return Err(LoggerError::config(
                "WriterConfig.flush_interval",
                "interval must be greater than zero",
            ));
        }
        validate_pattern("WriterConfig.date_format", &self.date_format)?;
        validate_pattern("WriterConfig.date_time_format", &self.date_time_format)
    }
}
