//! Asynchronous buffered file writer
//!
//! Producers push entries into a bounded queue without blocking. A dedicated
//! worker thread, driven by a ticker, periodically drains the queue and
//! appends the rendered records to the current log file. When the queue is
//! full the producer flushes synchronously and retries.
//!
//! All flushes (timer, overflow, explicit and final) run under one mutex that
//! also guards the rotation state, so two flushes never interleave writes to
//! the same file.
//!
//! ```text
//! Open --close()--> Draining --final flush--> Closed
//! ```

use super::rotation::RotationState;
use crate::core::{
    entry_pool::release,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::WriterMetrics,
    timestamp::{self, is_valid_pattern},
    writer::{LogWriter, WriteStatus},
    WriterConfig,
};
use chrono::{DateTime, FixedOffset};
use crossbeam_channel::{bounded, select, tick, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Lifecycle of a [`FileWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    Open,
    Draining,
    Closed,
}

impl WriterState {
    const fn as_u8(self) -> u8 {
        match self {
            WriterState::Open => 0,
            WriterState::Draining => 1,
            WriterState::Closed => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => WriterState::Open,
            1 => WriterState::Draining,
            _ => WriterState::Closed,
        }
    }
}

/// State only touched while holding the flush lock
struct FlushState {
    rotation: RotationState,
    /// Entries dequeued by a failed cycle, written first by the next one
    carry_over: VecDeque<Arc<LogEntry>>,
    render_buf: String,
    date_time_format: String,
}

struct Shared {
    name: String,
    /// Construction settings; level and formats live in `level` and `flush`
    config: WriterConfig,
    level: AtomicU8,
    sender: Sender<Arc<LogEntry>>,
    receiver: Receiver<Arc<LogEntry>>,
    state: AtomicU8,
    /// Producers between their open-check and the end of their enqueue
    in_flight: AtomicUsize,
    flush: Mutex<FlushState>,
    metrics: WriterMetrics,
}

/// Decrements the in-flight counter when a write finishes
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Report the first occurrence of a repeated failure, then every 1000th
fn should_report(previous: u64) -> bool {
    previous == 0 || (previous + 1) % 1000 == 0
}

impl Shared {
    fn state(&self) -> WriterState {
        WriterState::from_u8(self.state.load(Ordering::SeqCst))
    }

    fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    fn flush(&self) -> Result<usize> {
        let mut state = self.flush.lock();
        self.flush_locked(&mut state)
    }

    /// One flush cycle: take the carry-over plus what is queued right now,
    /// persist it, and keep anything that could not be written.
    fn flush_locked(&self, state: &mut FlushState) -> Result<usize> {
        let pending = self.receiver.len();
        if pending == 0 && state.carry_over.is_empty() {
            return Ok(0);
        }

        let mut batch = std::mem::take(&mut state.carry_over);
        batch.reserve(pending);
        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(entry) => batch.push_back(entry),
                Err(_) => break,
            }
        }

        self.metrics.record_flush_cycle();
        let result = self.persist(state, &mut batch);

        if !batch.is_empty() {
            self.metrics.record_flush_failure();
            self.keep_for_retry(state, batch);
        }
        result
    }

    /// Write `batch` front to back, one file open per target path. Entries
    /// are popped only after their segment reached the file.
    fn persist(&self, state: &mut FlushState, batch: &mut VecDeque<Arc<LogEntry>>) -> Result<usize> {
        let mut written = 0;

        while let Some(first) = batch.front() {
            state.rotation.advance(&first.timestamp);

            state.render_buf.clear();
            let mut segment = 0;
            for entry in batch.iter() {
                if segment > 0 && state.rotation.crosses(&entry.timestamp) {
                    break;
                }
                entry.render_into(&mut state.render_buf, &state.date_time_format);
                segment += 1;
            }

            if let Err(e) = append(state.rotation.current_path(), &state.render_buf) {
                self.metrics.record_written(written as u64);
                return Err(e);
            }

            for entry in batch.drain(..segment) {
                release(entry);
            }
            written += segment;
        }

        self.metrics.record_written(written as u64);
        Ok(written)
    }

    /// Park unwritten entries in order. The carry-over holds at most one
    /// queue's worth; older entries beyond that are reported lost.
    fn keep_for_retry(&self, state: &mut FlushState, mut batch: VecDeque<Arc<LogEntry>>) {
        let limit = self.config.queue_capacity;
        if batch.len() > limit {
            let excess = batch.len() - limit;
            for entry in batch.drain(..excess) {
                release(entry);
            }
            self.metrics.record_lost(excess as u64);
            eprintln!(
                "[LOGGER ERROR] Writer '{}' could not persist {} entries after repeated flush failures; \
                 they are lost.",
                self.name, excess
            );
        }
        state.carry_over = batch;
    }

    /// Queue full: flush on the caller's thread, then retry a bounded number
    /// of times.
    fn write_overflow(&self, mut entry: Arc<LogEntry>) -> Result<WriteStatus> {
        self.metrics.record_overflow_flush();

        let attempts = self.config.overflow_retries.max(1);
        for _ in 0..attempts {
            if let Err(e) = self.flush() {
                eprintln!(
                    "[LOGGER ERROR] Writer '{}' overflow flush failed: {}",
                    self.name, e
                );
            }
            match self.sender.try_send(entry) {
                Ok(()) => {
                    self.metrics.record_enqueued();
                    return Ok(WriteStatus::OverflowFlushed);
                }
                Err(TrySendError::Full(rejected)) | Err(TrySendError::Disconnected(rejected)) => {
                    entry = rejected;
                }
            }
        }

        release(entry);
        let previous = self.metrics.record_lost(1);
        if should_report(previous) {
            eprintln!(
                "[LOGGER WARNING] Writer '{}' queue still full after {} flush attempts, {} entries lost. \
                 Consider increasing the queue capacity.",
                self.name,
                attempts,
                previous + 1
            );
        }
        Err(LoggerError::queue_overflow(self.config.queue_capacity, 1))
    }
}

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

/// Open `path` for appending, write `data`, close
fn append(path: &Path, data: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::file_open(path.display().to_string(), e))?;

    file.write_all(data.as_bytes()).map_err(|e| {
        LoggerError::io_operation(
            "appending log records",
            format!("Failed to write '{}'", path.display()),
            e,
        )
    })
}

/// File sink with a bounded queue, a background flush worker and optional
/// daily rotation
///
/// # Examples
///
/// ```no_run
/// use rust_buffered_logger::writers::FileWriter;
/// use rust_buffered_logger::{LogLevel, WriterConfig};
///
/// // Appends to /var/log/myapp/server_<date>.log, Info and above
/// let config = WriterConfig::new().with_level(LogLevel::Info).with_rotation(true);
/// let writer = FileWriter::with_config("/var/log/myapp", "server", config).unwrap();
/// ```
pub struct FileWriter {
    shared: Arc<Shared>,
    stop: Mutex<Option<Sender<()>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl FileWriter {
    /// Create a writer with default settings
    ///
    /// # Errors
    ///
    /// See [`FileWriter::with_config`]
    pub fn new(dir: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        Self::with_config(dir, file_name, WriterConfig::default())
    }

    /// Create a writer appending to `<dir>/<file_name>.log`, or to
    /// `<dir>/<file_name>_<date>.log` when rotation is enabled
    ///
    /// # Errors
    ///
    /// - `PathNotFound` if `dir` does not exist or is not a directory;
    ///   directories are never created
    /// - `InvalidConfiguration` for an empty file name or invalid `config`
    /// - `IoOperation` if the worker thread cannot be spawned
    pub fn with_config(dir: impl AsRef<Path>, file_name: &str, config: WriterConfig) -> Result<Self> {
        Self::with_config_at(dir, file_name, config, &timestamp::now())
    }

    /// Like [`FileWriter::with_config`], with `start` selecting the first
    /// dated file and rotation boundary instead of the current time
    pub(crate) fn with_config_at(
        dir: impl AsRef<Path>,
        file_name: &str,
        config: WriterConfig,
        start: &DateTime<FixedOffset>,
    ) -> Result<Self> {
        config.validate()?;
        if file_name.is_empty() {
            return Err(LoggerError::config("FileWriter", "file name must not be empty"));
        }

        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoggerError::path_not_found(dir.display().to_string()));
        }

        let rotation = RotationState::new(
            dir.join(file_name),
            config.rotate,
            config.date_format.clone(),
            start,
        );
        let (sender, receiver) = bounded(config.queue_capacity);
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let interval = config.flush_interval;

        let shared = Arc::new(Shared {
            name: file_name.to_string(),
            level: AtomicU8::new(config.level.as_u8()),
            sender,
            receiver,
            state: AtomicU8::new(WriterState::Open.as_u8()),
            in_flight: AtomicUsize::new(0),
            flush: Mutex::new(FlushState {
                rotation,
                carry_over: VecDeque::new(),
                render_buf: String::with_capacity(4096),
                date_time_format: config.date_time_format.clone(),
            }),
            config,
            metrics: WriterMetrics::new(),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(format!("log-writer-{}", file_name))
            .spawn(move || {
                let ticker = tick(interval);
                let mut failures: u64 = 0;
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            if let Err(e) = worker_shared.flush() {
                                if should_report(failures) {
                                    eprintln!(
                                        "[LOGGER ERROR] Writer '{}' flush failed: {} ({} timer flush failures so far)",
                                        worker_shared.name,
                                        e,
                                        failures + 1
                                    );
                                }
                                failures += 1;
                            }
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }
            })
            .map_err(|e| {
                LoggerError::io_operation(
                    "starting flush worker",
                    format!("Failed to spawn worker for '{}'", file_name),
                    e,
                )
            })?;

        Ok(Self {
            shared,
            stop: Mutex::new(Some(stop_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Run one flush cycle now, returns the number of entries written
    ///
    /// Does no file I/O when nothing is pending.
    pub fn flush_pending(&self) -> Result<usize> {
        self.shared.flush()
    }

    /// Entries currently waiting in the queue
    #[must_use]
    pub fn queued(&self) -> usize {
        self.shared.receiver.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.config.queue_capacity
    }

    #[must_use]
    pub fn state(&self) -> WriterState {
        self.shared.state()
    }

    /// File the next flush appends to
    #[must_use]
    pub fn current_path(&self) -> PathBuf {
        self.shared.flush.lock().rotation.current_path().to_path_buf()
    }

    /// Current settings, including changes made through the setters
    #[must_use]
    pub fn config(&self) -> WriterConfig {
        let state = self.shared.flush.lock();
        WriterConfig {
            level: self.shared.level(),
            date_format: state.rotation.date_format().to_string(),
            date_time_format: state.date_time_format.clone(),
            ..self.shared.config.clone()
        }
    }

    /// Change the threshold; applies to the next `write`
    pub fn set_level(&self, level: LogLevel) {
        self.shared.level.store(level.as_u8(), Ordering::Relaxed);
    }

    /// Change the date pattern of rotated file names
    ///
    /// A rotating writer renames its current day's file target at once;
    /// entries already on disk stay where they are.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid strftime pattern
    pub fn set_date_format(&self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        validate_pattern("FileWriter.date_format", &pattern)?;
        self.shared.flush.lock().rotation.set_date_format(pattern);
        Ok(())
    }

    /// Change the date-time pattern of rendered records, from the next flush on
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid strftime pattern
    pub fn set_date_time_format(&self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        validate_pattern("FileWriter.date_time_format", &pattern)?;
        self.shared.flush.lock().date_time_format = pattern;
        Ok(())
    }

    #[must_use]
    pub fn metrics(&self) -> &WriterMetrics {
        &self.shared.metrics
    }

    fn stop_worker(&self) {
        // Dropping the sender wakes the worker's select.
        drop(self.stop.lock().take());
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                eprintln!(
                    "[LOGGER ERROR] Flush worker of writer '{}' panicked",
                    self.shared.name
                );
            }
        }
    }
}

impl LogWriter for FileWriter {
    fn write(&self, entry: Arc<LogEntry>) -> Result<WriteStatus> {
        let shared = &self.shared;
        if entry.level < shared.level() {
            shared.metrics.record_filtered();
            release(entry);
            return Ok(WriteStatus::Filtered);
        }

        let _guard = InFlight::enter(&shared.in_flight);
        if shared.state() != WriterState::Open {
            release(entry);
            return Err(LoggerError::writer_closed(&shared.name));
        }

        match shared.sender.try_send(entry) {
            Ok(()) => {
                shared.metrics.record_enqueued();
                Ok(WriteStatus::Queued)
            }
            Err(TrySendError::Full(entry)) => shared.write_overflow(entry),
            Err(TrySendError::Disconnected(entry)) => {
                release(entry);
                Err(LoggerError::writer_closed(&shared.name))
            }
        }
    }

    fn flush(&self) -> Result<()> {
        self.flush_pending().map(|_| ())
    }

    /// Stop the timer, wait for in-progress writes, drain everything and
    /// refuse further writes. Blocks for as long as the final flush takes.
    fn close(&self) -> Result<()> {
        let shared = &self.shared;
        if shared
            .state
            .compare_exchange(
                WriterState::Open.as_u8(),
                WriterState::Draining.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            return Err(LoggerError::writer_closed(&shared.name));
        }

        self.stop_worker();

        // Writers that passed the open check before the transition finish
        // their enqueue; everyone after it sees Draining and is rejected.
        while shared.in_flight.load(Ordering::SeqCst) > 0 {
            thread::yield_now();
        }

        let mut errors = Vec::new();
        let mut state = shared.flush.lock();
        if let Err(e) = shared.flush_locked(&mut state) {
            errors.push(e);
        }

        let unwritten = state.carry_over.len() as u64;
        if unwritten > 0 {
            for entry in state.carry_over.drain(..) {
                release(entry);
            }
            shared.metrics.record_lost(unwritten);
            eprintln!(
                "[LOGGER ERROR] Writer '{}' closed with {} unpersisted entries",
                shared.name, unwritten
            );
            errors.push(LoggerError::entries_lost(&shared.name, unwritten));
        }

        shared
            .state
            .store(WriterState::Closed.as_u8(), Ordering::SeqCst);
        LoggerError::from_many(errors)
    }

    fn name(&self) -> &str {
        &self.shared.name
    }

    fn level(&self) -> LogLevel {
        self.shared.level()
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if self.state() == WriterState::Open {
            if let Err(e) = self.close() {
                eprintln!("[LOGGER ERROR] Failed to close writer '{}' on drop: {}", self.shared.name, e);
            }
        } else {
            self.stop_worker();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone};
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    /// Timer effectively disabled so tests control every flush
    fn manual_config() -> WriterConfig {
        WriterConfig::new().with_flush_interval(Duration::from_secs(3600))
    }

    fn entry(level: LogLevel, msg: &str) -> Arc<LogEntry> {
        Arc::new(LogEntry::new(level, msg).with_caller("tests.rs:1"))
    }

    fn entry_at(msg: &str, ts: DateTime<FixedOffset>) -> Arc<LogEntry> {
        Arc::new(LogEntry::new(LogLevel::Info, msg).with_timestamp(ts))
    }

    fn read_lines(path: &Path) -> Vec<String> {
        fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = FileWriter::new(&missing, "app");
        assert!(matches!(result, Err(LoggerError::PathNotFound { .. })));
        assert!(!missing.exists());
    }

    #[test]
    fn test_empty_name_and_bad_config_fail() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            FileWriter::new(dir.path(), ""),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            FileWriter::with_config(dir.path(), "app", WriterConfig::new().with_queue_capacity(0)),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_fifo_order() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "fifo", manual_config()).unwrap();

        for i in 0..200 {
            writer.write(entry(LogLevel::Info, &format!("msg {}", i))).unwrap();
        }
        writer.close().unwrap();

        let lines = read_lines(&dir.path().join("fifo.log"));
        assert_eq!(lines.len(), 200);
        for (i, line) in lines.iter().enumerate() {
            assert!(line.ends_with(&format!("-> msg {}", i)), "line {} was {}", i, line);
        }
    }

    #[test]
    fn test_record_format() {
        let dir = tempdir().unwrap();
        let config = manual_config().with_date_time_format("%H:%M");
        let writer = FileWriter::with_config(dir.path(), "fmt", config).unwrap();

        let ts = DateTime::parse_from_rfc3339("2024-05-06T07:08:09+00:00").unwrap();
        writer
            .write(Arc::new(
                LogEntry::new(LogLevel::Warn, "careful")
                    .with_timestamp(ts)
                    .with_caller("src/lib.rs:7"),
            ))
            .unwrap();
        writer.close().unwrap();

        let content = fs::read_to_string(dir.path().join("fmt.log")).unwrap();
        assert_eq!(content, "[Warn ] [07:08] : src/lib.rs:7 -> careful\n");
    }

    #[test]
    fn test_level_threshold() {
        let dir = tempdir().unwrap();
        let config = manual_config().with_level(LogLevel::Warn);
        let writer = FileWriter::with_config(dir.path(), "errors", config).unwrap();

        assert_eq!(writer.write(entry(LogLevel::Debug, "d")).unwrap(), WriteStatus::Filtered);
        assert_eq!(writer.write(entry(LogLevel::Info, "i")).unwrap(), WriteStatus::Filtered);
        assert_eq!(writer.write(entry(LogLevel::Warn, "w")).unwrap(), WriteStatus::Queued);
        assert_eq!(writer.write(entry(LogLevel::Error, "e")).unwrap(), WriteStatus::Queued);
        writer.close().unwrap();

        let lines = read_lines(&dir.path().join("errors.log"));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[Warn ]"));
        assert!(lines[1].starts_with("[Error]"));
        assert_eq!(writer.metrics().filtered(), 2);
    }

    #[test]
    fn test_empty_flush_does_no_io() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "idle", manual_config()).unwrap();

        assert_eq!(writer.flush_pending().unwrap(), 0);
        writer.close().unwrap();

        assert!(!dir.path().join("idle.log").exists());
        assert_eq!(writer.metrics().flush_cycles(), 0);
    }

    #[test]
    fn test_overflow_flushes_on_caller_thread() {
        let dir = tempdir().unwrap();
        let capacity = 8;
        let config = manual_config().with_queue_capacity(capacity);
        let writer = FileWriter::with_config(dir.path(), "burst", config).unwrap();
        let path = dir.path().join("burst.log");

        for i in 0..capacity {
            let status = writer.write(entry(LogLevel::Info, &format!("m{}", i))).unwrap();
            assert_eq!(status, WriteStatus::Queued);
            assert!(writer.queued() <= writer.capacity());
        }
        assert!(!path.exists());

        let status = writer.write(entry(LogLevel::Info, "overflow")).unwrap();
        assert_eq!(status, WriteStatus::OverflowFlushed);
        assert_eq!(writer.metrics().overflow_flushes(), 1);
        assert_eq!(read_lines(&path).len(), capacity);
        assert_eq!(writer.queued(), 1);

        writer.close().unwrap();
        let lines = read_lines(&path);
        assert_eq!(lines.len(), capacity + 1);
        assert!(lines[capacity].ends_with("-> overflow"));
        assert_eq!(writer.metrics().lost(), 0);
    }

    #[test]
    fn test_timer_flushes_periodically() {
        let dir = tempdir().unwrap();
        let config = WriterConfig::new().with_flush_interval(Duration::from_millis(20));
        let writer = FileWriter::with_config(dir.path(), "timer", config).unwrap();

        writer.write(entry(LogLevel::Info, "tick")).unwrap();

        let path = dir.path().join("timer.log");
        let mut waited = 0;
        while read_lines(&path).is_empty() && waited < 100 {
            std::thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        assert_eq!(read_lines(&path).len(), 1);
        assert_eq!(writer.state(), WriterState::Open);
    }

    #[test]
    fn test_close_drains_then_rejects() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "close", manual_config()).unwrap();

        for i in 0..10 {
            writer.write(entry(LogLevel::Error, &format!("e{}", i))).unwrap();
        }
        writer.close().unwrap();
        assert_eq!(writer.state(), WriterState::Closed);
        assert_eq!(read_lines(&dir.path().join("close.log")).len(), 10);

        let err = writer.write(entry(LogLevel::Error, "late")).unwrap_err();
        assert!(err.is_closed());
        assert!(writer.close().unwrap_err().is_closed());
        assert_eq!(read_lines(&dir.path().join("close.log")).len(), 10);
    }

    #[test]
    fn test_rotation_across_midnight() {
        let dir = tempdir().unwrap();
        let writer =
            FileWriter::with_config(dir.path(), "daily", manual_config().with_rotation(true)).unwrap();

        // Two future days relative to the writer's construction date
        let tomorrow = timestamp::end_of_day(&timestamp::now()) + ChronoDuration::nanoseconds(1);
        let late = tomorrow + ChronoDuration::seconds(86_399);
        let early = late + ChronoDuration::seconds(2);

        writer.write(entry_at("before midnight", late)).unwrap();
        writer.write(entry_at("after midnight", early)).unwrap();
        writer.flush_pending().unwrap();

        let first = dir
            .path()
            .join(format!("daily_{}.log", late.format("%Y-%m-%d")));
        let second = dir
            .path()
            .join(format!("daily_{}.log", early.format("%Y-%m-%d")));
        assert_ne!(first, second);
        assert_eq!(read_lines(&first).len(), 1);
        assert!(read_lines(&first)[0].ends_with("before midnight"));
        assert_eq!(read_lines(&second).len(), 1);
        assert!(read_lines(&second)[0].ends_with("after midnight"));
        assert_eq!(writer.current_path(), second);
    }

    #[test]
    fn test_rotation_on_fixed_dates() {
        let dir = tempdir().unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let start = utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let writer =
            FileWriter::with_config_at(dir.path(), "app", manual_config().with_rotation(true), &start)
                .unwrap();
        assert_eq!(writer.current_path(), dir.path().join("app_2024-01-01.log"));

        writer
            .write(entry_at("late", utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap()))
            .unwrap();
        writer
            .write(entry_at("early", utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 1).unwrap()))
            .unwrap();
        writer.close().unwrap();

        let first = read_lines(&dir.path().join("app_2024-01-01.log"));
        let second = read_lines(&dir.path().join("app_2024-01-02.log"));
        assert_eq!(first.len(), 1);
        assert!(first[0].ends_with("-> late"));
        assert_eq!(second.len(), 1);
        assert!(second[0].ends_with("-> early"));
    }

    #[test]
    fn test_set_level_changes_filtering() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "lvl", manual_config()).unwrap();

        assert_eq!(writer.write(entry(LogLevel::Info, "kept")).unwrap(), WriteStatus::Queued);
        writer.set_level(LogLevel::Error);
        assert_eq!(writer.level(), LogLevel::Error);
        assert_eq!(writer.config().level, LogLevel::Error);
        assert_eq!(writer.write(entry(LogLevel::Warn, "dropped")).unwrap(), WriteStatus::Filtered);
        writer.set_level(LogLevel::Debug);
        assert_eq!(writer.write(entry(LogLevel::Debug, "kept too")).unwrap(), WriteStatus::Queued);
        writer.close().unwrap();

        let lines = read_lines(&dir.path().join("lvl.log"));
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("-> kept too"));
    }

    #[test]
    fn test_format_setters_apply_on_next_flush() {
        let dir = tempdir().unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let start = utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let config = manual_config().with_rotation(true).with_date_time_format("%H:%M");
        let writer = FileWriter::with_config_at(dir.path(), "fmt", config, &start).unwrap();
        let ts = utc.with_ymd_and_hms(2024, 6, 1, 13, 14, 15).unwrap();

        writer.write(entry_at("before", ts)).unwrap();
        writer.flush_pending().unwrap();

        writer.set_date_format("%Y@%m@%d").unwrap();
        writer.set_date_time_format("%H-%M-%S").unwrap();
        assert!(matches!(
            writer.set_date_time_format("%Q"),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
        writer.write(entry_at("after", ts)).unwrap();
        writer.close().unwrap();

        let old = read_lines(&dir.path().join("fmt_2024-06-01.log"));
        let new = read_lines(&dir.path().join("fmt_2024@06@01.log"));
        assert_eq!(old, vec!["[Info ] [13:14] :  -> before"]);
        assert_eq!(new, vec!["[Info ] [13-14-15] :  -> after"]);

        let config = writer.config();
        assert_eq!(config.date_format, "%Y@%m@%d");
        assert_eq!(config.date_time_format, "%H-%M-%S");
    }

    #[test]
    fn test_repeated_failures_are_rate_limited() {
        assert!(should_report(0));
        assert!(!should_report(1));
        assert!(!should_report(500));
        assert!(should_report(999));
        assert!(!should_report(1000));
        assert!(should_report(1999));
    }

    #[test]
    fn test_open_failure_keeps_entries_for_next_cycle() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "blocked", manual_config()).unwrap();
        let path = dir.path().join("blocked.log");

        // A directory where the log file should be makes every open fail.
        fs::create_dir(&path).unwrap();
        writer.write(entry(LogLevel::Info, "one")).unwrap();
        writer.write(entry(LogLevel::Info, "two")).unwrap();
        assert!(matches!(writer.flush_pending(), Err(LoggerError::FileOpen { .. })));
        assert_eq!(writer.metrics().flush_failures(), 1);
        assert_eq!(writer.metrics().lost(), 0);

        fs::remove_dir(&path).unwrap();
        writer.write(entry(LogLevel::Info, "three")).unwrap();
        assert_eq!(writer.flush_pending().unwrap(), 3);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("one"));
        assert!(lines[2].ends_with("three"));
        writer.close().unwrap();
    }

    #[test]
    fn test_close_reports_unwritable_entries() {
        let dir = tempdir().unwrap();
        let writer = FileWriter::with_config(dir.path(), "stuck", manual_config()).unwrap();
        fs::create_dir(dir.path().join("stuck.log")).unwrap();

        writer.write(entry(LogLevel::Info, "doomed")).unwrap();
        let err = writer.close().unwrap_err();
        match err {
            LoggerError::Aggregate(errors) => {
                assert!(errors.iter().any(|e| matches!(e, LoggerError::FileOpen { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, LoggerError::EntriesLost { count: 1, .. })));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(writer.metrics().lost(), 1);
        assert_eq!(writer.state(), WriterState::Closed);
    }

    #[test]
    fn test_drop_closes_writer() {
        let dir = tempdir().unwrap();
        {
            let writer = FileWriter::with_config(dir.path(), "dropped", manual_config()).unwrap();
            writer.write(entry(LogLevel::Info, "kept")).unwrap();
        }
        assert_eq!(read_lines(&dir.path().join("dropped.log")).len(), 1);
    }
}
