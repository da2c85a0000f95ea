//! # Rust Buffered Logger
//!
//! A leveled logger that prints coloured records to the console and fans
//! every record out to any number of writers. The bundled [`FileWriter`]
//! buffers records in a bounded queue, persists them from a background
//! thread on a timer and rotates its file at local midnight.
//!
//! ## Features
//!
//! - **Non-blocking writes**: producers only enqueue; a full queue is
//!   flushed on the caller's thread instead of dropping records
//! - **Daily rotation**: `<name>_<date>.log`, switched by record timestamp
//! - **Per-writer levels**: the console and each writer filter independently
//! - **Pooled entries**: record buffers are recycled once every writer is done
//!
//! ## Example
//!
//! ```no_run
//! use rust_buffered_logger::prelude::*;
//! use rust_buffered_logger::info;
//!
//! # fn main() -> rust_buffered_logger::Result<()> {
//! let logger = Logger::new();
//! logger.add_file_writer("/var/log/myapp", "server", LogLevel::Info, true)?;
//!
//! info!(logger, "listening on port {}", 8080);
//! logger.close()?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        LogEntry, LogLevel, LogWriter, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, PlainPrinter, Printer, Result, WriteStatus, WriterConfig,
    };
    pub use crate::writers::FileWriter;
}

pub use core::{
    LogEntry, LogLevel, LogWriter, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Printer, Result, WriteStatus, WriterConfig, WriterMetrics,
};
pub use writers::{FileWriter, WriterState};
