//! Writer trait for persistent log destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};
use std::sync::Arc;

/// Outcome of a successful [`LogWriter::write`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Entry accepted without blocking the caller
    Queued,
    /// Entry is below the writer's level threshold and was discarded
    Filtered,
    /// Queue was full; a flush ran on the caller's thread, then the entry was
    /// accepted
    OverflowFlushed,
}

/// A persistent sink with its own level threshold and lifecycle
///
/// Writers are shared between producer threads, so every method takes
/// `&self`. `write` must not block indefinitely: it either accepts the entry
/// or fails fast.
///
/// # Example
///
/// ```
/// use rust_buffered_logger::core::{release, LogEntry, LogLevel, LogWriter, Result, WriteStatus};
/// use parking_lot::Mutex;
/// use std::sync::Arc;
///
/// struct MemoryWriter {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl LogWriter for MemoryWriter {
///     fn write(&self, entry: Arc<LogEntry>) -> Result<WriteStatus> {
///         self.lines.lock().push(entry.message.clone());
///         release(entry);
///         Ok(WriteStatus::Queued)
///     }
///
///     fn close(&self) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "memory"
///     }
/// }
/// ```
pub trait LogWriter: Send + Sync {
    /// Accept one entry. Implementations must pass every entry they are done
    /// with to [`release`](crate::core::release).
    fn write(&self, entry: Arc<LogEntry>) -> Result<WriteStatus>;

    /// Persist whatever is buffered
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Drain and permanently disable the writer
    fn close(&self) -> Result<()>;

    fn name(&self) -> &str;

    /// Lowest level this writer persists
    fn level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
