//! Buffered file writer example
//!
//! Demonstrates using a FileWriter directly: a small queue that overflows,
//! the background timer flush, and writer metrics.
//!
//! Run with: cargo run --example buffered_writer

use rust_buffered_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Buffered Logger - Buffered Writer Example ===\n");

    let dir = std::env::temp_dir();
    let config = WriterConfig::new()
        .with_queue_capacity(32)
        .with_flush_interval(Duration::from_millis(200));
    let writer = Arc::new(FileWriter::with_config(&dir, "buffered_demo", config)?);
    println!("Writing to {}", writer.current_path().display());

    println!("\n1. Four producers, 32-entry queue:");
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let writer = Arc::clone(&writer);
            thread::spawn(move || {
                for i in 0..250 {
                    let entry = LogEntry::new(LogLevel::Info, format!("producer {} entry {}", t, i));
                    if let Err(e) = writer.write(Arc::new(entry)) {
                        eprintln!("write failed: {}", e);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    println!("\n2. Waiting for the timer flush:");
    thread::sleep(Duration::from_millis(300));
    println!("   still queued: {}", writer.queued());

    writer.close()?;

    let metrics = writer.metrics();
    println!("\n3. Metrics:");
    println!("   enqueued:         {}", metrics.enqueued());
    println!("   written:          {}", metrics.written());
    println!("   overflow flushes: {}", metrics.overflow_flushes());
    println!("   flush cycles:     {}", metrics.flush_cycles());
    println!("   lost:             {}", metrics.lost());

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
