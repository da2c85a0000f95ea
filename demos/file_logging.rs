//! File logging example
//!
//! Demonstrates logging to the console and to two file writers with
//! different levels, one of them rotating daily.
//!
//! Run with: cargo run --example file_logging

use rust_buffered_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Rust Buffered Logger - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("rust_buffered_logger_demo");
    std::fs::create_dir_all(&dir)?;

    let logger = Logger::new();
    logger.set_min_level(LogLevel::Info);

    // Everything, rotated at midnight: app_<date>.log
    logger.add_file_writer(&dir, "app", LogLevel::Debug, true)?;
    // Errors only, single file: errors.log
    logger.add_file_writer(&dir, "errors", LogLevel::Error, false)?;

    logger.info("Application started");
    logger.debug("Loading configuration... (file only)");
    logger.warn("Using default settings for some options");
    logger.error("Failed to load optional plugin");
    logger.info("Application initialization complete");

    // Records are buffered; close() persists everything that was accepted.
    logger.close()?;

    println!("\nLog files written to {}:", dir.display());
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        let lines = std::fs::read_to_string(&path)?.lines().count();
        println!("  {} ({} lines)", path.display(), lines);
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
