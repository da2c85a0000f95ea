//! Main logger implementation
//!
//! Every log call is format-then-fan-out: the message is rendered once into
//! a pooled [`LogEntry`], printed to the console if the logger's own level
//! allows it, then handed to every registered writer. Writers apply their
//! own level threshold, so one writer can keep only errors while another
//! keeps everything.

use super::{
    config::{LoggerConfig, WriterConfig},
    entry_pool::{release, ENTRY_POOL},
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    printer::{detect_printer, PlainPrinter, Printer},
    timestamp,
    writer::{LogWriter, WriteStatus},
};
use crate::writers::FileWriter;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt::{self, Write as _};
use std::io::Write as _;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct Logger {
    config: LoggerConfig,
    writers: RwLock<Vec<Box<dyn LogWriter>>>,
    /// Chosen once at construction from terminal detection
    printer: Box<dyn Printer>,
    /// Used while colour output is switched off
    plain_printer: PlainPrinter,
    metrics: LoggerMetrics,
    closed: AtomicBool,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Drop `skip` leading components of a source path; keeps at least the file name
fn trim_leading_components(path: &str, skip: usize) -> &str {
    let is_sep = |c: char| c == '/' || c == '\\';
    if skip == 0 {
        return path;
    }
    match path.match_indices(is_sep).nth(skip - 1) {
        Some((idx, sep)) => &path[idx + sep.len()..],
        None => path.rfind(is_sep).map_or(path, |idx| &path[idx + 1..]),
    }
}

impl Logger {
    /// Logger at `Debug` with console printing on and no writers
    #[must_use]
    pub fn new() -> Self {
        Self::with_printer(detect_printer())
    }

    /// Logger using a specific console printer
    #[must_use]
    pub fn with_printer(printer: Box<dyn Printer>) -> Self {
        Self {
            config: LoggerConfig::new(),
            writers: RwLock::new(Vec::new()),
            printer,
            plain_printer: PlainPrinter,
            metrics: LoggerMetrics::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// Logger with a minimum console level and one writer
    #[must_use]
    pub fn with_writer<W: LogWriter + 'static>(min_level: LogLevel, writer: W) -> Self {
        let logger = Self::new();
        logger.set_min_level(min_level);
        logger.add_writer(Box::new(writer));
        logger
    }

    pub fn add_writer(&self, writer: Box<dyn LogWriter>) {
        self.writers.write().push(writer);
    }

    /// Register a [`FileWriter`] whose date formats follow this logger's
    ///
    /// # Errors
    ///
    /// Propagates the writer's construction errors (missing directory, ...)
    pub fn add_file_writer(
        &self,
        dir: impl AsRef<Path>,
        file_name: &str,
        level: LogLevel,
        rotate: bool,
    ) -> Result<()> {
        let config = WriterConfig::new()
            .with_level(level)
            .with_rotation(rotate)
            .with_date_format(self.config.date_format())
            .with_date_time_format(self.config.date_time_format());
        let writer = FileWriter::with_config(dir, file_name, config)?;
        self.add_writer(Box::new(writer));
        Ok(())
    }

    pub fn writer_count(&self) -> usize {
        self.writers.read().len()
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn set_min_level(&self, level: LogLevel) {
        self.config.set_min_level(level);
    }

    pub fn set_print_enabled(&self, enabled: bool) {
        self.config.set_print_enabled(enabled);
    }

    pub fn set_print_color(&self, enabled: bool) {
        self.config.set_print_color(enabled);
    }

    pub fn set_print_caller_path(&self, enabled: bool) {
        self.config.set_print_caller_path(enabled);
    }

    pub fn set_caller_skip_depth(&self, depth: usize) {
        self.config.set_caller_skip_depth(depth);
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid strftime pattern
    pub fn set_date_format(&self, pattern: impl Into<String>) -> Result<()> {
        self.config.set_date_format(pattern)
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid strftime pattern
    pub fn set_date_time_format(&self, pattern: impl Into<String>) -> Result<()> {
        self.config.set_date_time_format(pattern)
    }

    /// Log `message` at `level`
    ///
    /// `message` is only rendered if the console or a writer whose
    /// [`level`](LogWriter::level) admits `level` will see it,
    /// so passing `format_args!` (as the macros do) costs nothing when
    /// logging is fully disabled.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        let print = self.config.print_enabled() && level >= self.config.min_level();
        let writers = self.writers.read();
        let wanted = writers.iter().any(|writer| level >= writer.level());
        if !print && !wanted {
            return;
        }

        let mut entry = ENTRY_POOL.acquire();
        entry.level = level;
        entry.timestamp = timestamp::now();
        // A failing Display impl leaves whatever it wrote so far.
        let _ = write!(entry.message, "{}", message);
        entry.sanitize_message();
        if self.config.print_caller_path() {
            let location = Location::caller();
            let file = trim_leading_components(location.file(), self.config.caller_skip_depth());
            let _ = write!(entry.caller, "{}:{}", file, location.line());
        }

        if print {
            self.print(&entry);
        }

        if !wanted {
            ENTRY_POOL.put(entry);
            return;
        }

        let entry = Arc::new(entry);
        self.dispatch(&writers, &entry);
        release(entry);
    }

    /// Render on the console; failures fall back to uncoloured stderr output
    fn print(&self, entry: &LogEntry) {
        let line = self.config.with_date_time_format(|pattern| entry.render(pattern));
        let printer: &dyn Printer = if self.config.print_color() {
            self.printer.as_ref()
        } else {
            &self.plain_printer
        };

        let result = catch_unwind(AssertUnwindSafe(|| printer.print(entry.level, &line)));
        if !matches!(result, Ok(Ok(()))) {
            self.metrics.record_print_fallback();
            let _ = std::io::stderr().write_all(line.as_bytes());
        }
    }

    /// Hand `entry` to every writer, isolating failures and panics per writer
    fn dispatch(&self, writers: &[Box<dyn LogWriter>], entry: &Arc<LogEntry>) {
        self.metrics.record_dispatched();

        for (idx, writer) in writers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| writer.write(Arc::clone(entry))));

            let failure = match result {
                Ok(Ok(WriteStatus::OverflowFlushed)) => {
                    self.metrics.record_overflow_flush();
                    None
                }
                Ok(Ok(_)) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(panic_info) => Some(format!("panicked: {}", panic_message(panic_info.as_ref()))),
            };

            if let Some(reason) = failure {
                let previous = self.metrics.record_writer_error();
                // Alert on the first failure and periodically thereafter
                if previous == 0 || (previous + 1) % 1000 == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Writer #{} '{}' failed: {} ({} writer errors so far)",
                        idx,
                        writer.name(),
                        reason,
                        previous + 1
                    );
                }
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use rust_buffered_logger::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.set_print_enabled(false);
    /// logger.info("nobody listens");
    ///
    /// assert_eq!(logger.metrics().dispatched(), 0);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Force every writer to persist what it has buffered
    ///
    /// # Errors
    ///
    /// Every writer is flushed even if an earlier one fails; the failures are
    /// returned together.
    pub fn flush(&self) -> Result<()> {
        let writers = self.writers.read();
        let errors: Vec<LoggerError> = writers
            .iter()
            .filter_map(|writer| writer.flush().err())
            .collect();
        LoggerError::from_many(errors)
    }

    /// Close every writer in registration order
    ///
    /// A failing writer does not stop the others from being closed. Each
    /// failure is reported on stderr and all of them are returned. Closing
    /// an already closed logger is a no-op.
    ///
    /// # Errors
    ///
    /// The failure of a single writer, or `Aggregate` when several failed
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let writers = self.writers.read();
        let mut errors = Vec::new();
        for (idx, writer) in writers.iter().enumerate() {
            let result = catch_unwind(AssertUnwindSafe(|| writer.close()));
            let error = match result {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e,
                Err(panic_info) => LoggerError::writer(format!(
                    "close panicked: {}",
                    panic_message(panic_info.as_ref())
                )),
            };
            eprintln!(
                "[LOGGER ERROR] Failed to close writer #{} '{}': {}",
                idx,
                writer.name(),
                error
            );
            errors.push(error);
        }
        LoggerError::from_many(errors)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Failures were already reported by close()
        let _ = self.close();
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_buffered_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Info)
///     .print_color(false)
///     .print_caller_path(false)
///     .date_time_format("%H:%M:%S")
///     .build()
///     .unwrap();
/// logger.info("ready");
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    print_enabled: bool,
    print_color: bool,
    print_caller_path: bool,
    caller_skip_depth: usize,
    date_format: Option<String>,
    date_time_format: Option<String>,
    printer: Option<Box<dyn Printer>>,
    writers: Vec<Box<dyn LogWriter>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Debug,
            print_enabled: true,
            print_color: true,
            print_caller_path: true,
            caller_skip_depth: 0,
            date_format: None,
            date_time_format: None,
            printer: None,
            writers: Vec::new(),
        }
    }

    /// Set minimum console level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_enabled(mut self, enabled: bool) -> Self {
        self.print_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_color(mut self, enabled: bool) -> Self {
        self.print_color = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_caller_path(mut self, enabled: bool) -> Self {
        self.print_caller_path = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_skip_depth(mut self, depth: usize) -> Self {
        self.caller_skip_depth = depth;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = Some(pattern.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn date_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_time_format = Some(pattern.into());
        self
    }

    /// Replace the detected console printer
    #[must_use = "builder methods return a new value"]
    pub fn printer<P: Printer + 'static>(mut self, printer: P) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    /// Add a writer
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: LogWriter + 'static>(mut self, writer: W) -> Self {
        self.writers.push(Box::new(writer));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a date pattern is invalid
    pub fn build(self) -> Result<Logger> {
        let logger = match self.printer {
            Some(printer) => Logger::with_printer(printer),
            None => Logger::new(),
        };

        let config = logger.config();
        config.set_min_level(self.min_level);
        config.set_print_enabled(self.print_enabled);
        config.set_print_color(self.print_color);
        config.set_print_caller_path(self.print_caller_path);
        config.set_caller_skip_depth(self.caller_skip_depth);
        if let Some(pattern) = self.date_format {
            config.set_date_format(pattern)?;
        }
        if let Some(pattern) = self.date_time_format {
            config.set_date_time_format(pattern)?;
        }

        for writer in self.writers {
            logger.add_writer(writer);
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
