//! Basic logger usage example
//!
//! Demonstrates console logging at different levels and the console settings.
//!
//! Run with: cargo run --example basic_usage

use rust_buffered_logger::prelude::*;
use rust_buffered_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Rust Buffered Logger - Basic Usage Example ===\n");

    let logger = Logger::new();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Raising the console level to Warn:");
    logger.set_min_level(LogLevel::Warn);
    logger.debug("Debug message (hidden)");
    logger.info("Info message (hidden)");
    logger.warn("Warning message (visible)");

    println!("\n3. Formatting macros:");
    logger.set_min_level(LogLevel::Debug);
    let port = 8080;
    info!(logger, "Server listening on port {}", port);
    warn!(logger, "{} of {} workers busy", 7, 8);

    println!("\n4. Custom timestamp, no colour, short caller path:");
    logger.set_date_time_format("%H:%M:%S")?;
    logger.set_print_color(false);
    logger.set_caller_skip_depth(1);
    logger.info("Compact record");

    println!("\n5. Caller path disabled:");
    logger.set_print_caller_path(false);
    logger.info("No caller on this line");

    logger.close()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
