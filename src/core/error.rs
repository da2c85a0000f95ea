//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Target directory of a file writer is missing or not a directory
    #[error("Log directory does not exist: '{path}'")]
    PathNotFound { path: String },

    /// A log file could not be opened during a flush cycle
    #[error("Failed to open log file '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (configuration) error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Entry could not be queued even after flushing on the caller's thread
    #[error("Log queue overflow (capacity {capacity}): {dropped} entries lost")]
    QueueOverflow { capacity: usize, dropped: u64 },

    /// Entries were dequeued but could not be persisted before close
    #[error("Writer '{writer}' lost {count} unpersisted entries")]
    EntriesLost { writer: String, count: u64 },

    /// Write or close attempted on a writer that is already closed
    #[error("Writer '{writer}' is already closed")]
    WriterClosed { writer: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// A writer failed in a way not covered above (custom writers, panics)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Console rendering failed
    #[error("Printer error: {0}")]
    Printer(String),

    /// Several independent operations failed (e.g. closing writers)
    #[error("{} operation(s) failed: {}", .0.len(), join_errors(.0))]
    Aggregate(Vec<LoggerError>),
}

fn join_errors(errors: &[LoggerError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl LoggerError {
    /// Create a missing-directory error
    pub fn path_not_found(path: impl Into<String>) -> Self {
        LoggerError::PathNotFound { path: path.into() }
    }

    /// Create a file-open error
    pub fn file_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a queue overflow error
    pub fn queue_overflow(capacity: usize, dropped: u64) -> Self {
        LoggerError::QueueOverflow { capacity, dropped }
    }

    /// Create a lost-entries error
    pub fn entries_lost(writer: impl Into<String>, count: u64) -> Self {
        LoggerError::EntriesLost {
            writer: writer.into(),
            count,
        }
    }

    /// Create a closed-writer error
    pub fn writer_closed(writer: impl Into<String>) -> Self {
        LoggerError::WriterClosed {
            writer: writer.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic writer error
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a printer error
    pub fn printer<S: Into<String>>(msg: S) -> Self {
        LoggerError::Printer(msg.into())
    }

    /// Collapse a list of failures: `Ok` when empty, the error itself when
    /// there is exactly one, `Aggregate` otherwise.
    pub fn from_many(mut errors: Vec<LoggerError>) -> Result<()> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(LoggerError::Aggregate(errors)),
        }
    }

    /// Whether this error means the target writer no longer accepts entries
    pub fn is_closed(&self) -> bool {
        matches!(self, LoggerError::WriterClosed { .. })
    }
}
