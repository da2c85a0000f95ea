//! Core logger types and traits

pub mod config;
pub mod entry_pool;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod printer;
pub mod timestamp;
pub mod writer;

pub use config::{
    LoggerConfig, WriterConfig, DEFAULT_FLUSH_INTERVAL, DEFAULT_OVERFLOW_RETRIES,
    DEFAULT_QUEUE_CAPACITY,
};
pub use entry_pool::{release, Pool, Recycle, ENTRY_POOL};
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::{LoggerMetrics, WriterMetrics};
#[cfg(feature = "console")]
pub use printer::AnsiPrinter;
#[cfg(all(windows, feature = "console"))]
pub use printer::WindowsConsolePrinter;
pub use printer::{detect_printer, PlainPrinter, Printer};
pub use writer::{LogWriter, WriteStatus};
