//! Logger and writer metrics for observability
//!
//! Plain atomic counters. `Clone` takes a snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by the [`Logger`](crate::Logger) dispatch path
///
/// # Example
///
/// ```
/// use rust_buffered_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_writer_error();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.writer_errors(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Entries handed to the writers
    dispatched: AtomicU64,

    /// Writer calls that returned an error
    writer_errors: AtomicU64,

    /// Writer calls that had to flush on the caller's thread
    overflow_flushes: AtomicU64,

    /// Console prints that fell back to unformatted output
    print_fallbacks: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            writer_errors: AtomicU64::new(0),
            overflow_flushes: AtomicU64::new(0),
            print_fallbacks: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writer_errors(&self) -> u64 {
        self.writer_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overflow_flushes(&self) -> u64 {
        self.overflow_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn print_fallbacks(&self) -> u64 {
        self.print_fallbacks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a failed writer call, returns the previous count
    #[inline]
    pub fn record_writer_error(&self) -> u64 {
        self.writer_errors.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_overflow_flush(&self) -> u64 {
        self.overflow_flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_print_fallback(&self) -> u64 {
        self.print_fallbacks.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.dispatched.store(0, Ordering::Relaxed);
        self.writer_errors.store(0, Ordering::Relaxed);
        self.overflow_flushes.store(0, Ordering::Relaxed);
        self.print_fallbacks.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            writer_errors: AtomicU64::new(self.writer_errors()),
            overflow_flushes: AtomicU64::new(self.overflow_flushes()),
            print_fallbacks: AtomicU64::new(self.print_fallbacks()),
        }
    }
}

/// Counters kept by a [`FileWriter`](crate::writers::FileWriter)
#[derive(Debug)]
pub struct WriterMetrics {
    /// Entries accepted into the queue
    enqueued: AtomicU64,

    /// Entries below the writer's level threshold
    filtered: AtomicU64,

    /// Entries appended to a log file
    written: AtomicU64,

    /// Entries that could not be persisted and were reported lost
    lost: AtomicU64,

    /// Flush cycles that did file I/O
    flush_cycles: AtomicU64,

    /// Flushes run on a producer thread because the queue was full
    overflow_flushes: AtomicU64,

    /// Flush cycles aborted by an I/O error
    flush_failures: AtomicU64,
}

impl WriterMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            written: AtomicU64::new(0),
            lost: AtomicU64::new(0),
            flush_cycles: AtomicU64::new(0),
            overflow_flushes: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lost(&self) -> u64 {
        self.lost.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_cycles(&self) -> u64 {
        self.flush_cycles.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overflow_flushes(&self) -> u64 {
        self.overflow_flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_written(&self, count: u64) {
        self.written.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns the previous lost count
    #[inline]
    pub(crate) fn record_lost(&self, count: u64) -> u64 {
        self.lost.fetch_add(count, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_flush_cycle(&self) {
        self.flush_cycles.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_overflow_flush(&self) -> u64 {
        self.overflow_flushes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_flush_failure(&self) {
        self.flush_failures.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for WriterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WriterMetrics {
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            filtered: AtomicU64::new(self.filtered()),
            written: AtomicU64::new(self.written()),
            lost: AtomicU64::new(self.lost()),
            flush_cycles: AtomicU64::new(self.flush_cycles()),
            overflow_flushes: AtomicU64::new(self.overflow_flushes()),
            flush_failures: AtomicU64::new(self.flush_failures()),
        }
    }
}
