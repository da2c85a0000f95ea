//! Stress tests for the bounded queue and overflow flushing
//!
//! These tests verify:
//! - No entry is lost when producers outrun a tiny queue
//! - Per-producer FIFO order survives concurrent overflow flushes
//! - Close while producers are still writing never loses accepted entries

use rust_buffered_logger::core::log_level::LogLevel;
use rust_buffered_logger::core::logger::Logger;
use rust_buffered_logger::writers::file::FileWriter;
use rust_buffered_logger::{LogEntry, LogWriter, LoggerError, WriteStatus, WriterConfig};
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;
/// Enough rounds that contention alone never exhausts them
const RETRIES: u32 = 100_000;

/// Parse "... -> t<thread> m<seq>" lines into per-thread sequences
fn sequences(content: &str) -> HashMap<usize, Vec<usize>> {
    let mut map: HashMap<usize, Vec<usize>> = HashMap::new();
    for line in content.lines() {
        let message = line.rsplit(" -> ").next().unwrap();
        let mut parts = message.split(' ');
        let thread: usize = parts.next().unwrap()[1..].parse().unwrap();
        let seq: usize = parts.next().unwrap()[1..].parse().unwrap();
        map.entry(thread).or_default().push(seq);
    }
    map
}

#[test]
fn test_tiny_queue_loses_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = WriterConfig::new()
        .with_queue_capacity(4)
        .with_overflow_retries(RETRIES)
        .with_flush_interval(Duration::from_secs(3600));
    let writer = Arc::new(FileWriter::with_config(temp_dir.path(), "tiny", config).unwrap());
    let overflowed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let writer = Arc::clone(&writer);
            let overflowed = Arc::clone(&overflowed);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let entry = LogEntry::new(LogLevel::Info, format!("t{} m{}", t, i));
                    match writer.write(Arc::new(entry)) {
                        Ok(WriteStatus::OverflowFlushed) => {
                            overflowed.fetch_add(1, Ordering::Relaxed);
                        }
                        Ok(_) => {}
                        Err(e) => panic!("write failed: {}", e),
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Producer panicked");
    }
    writer.close().unwrap();

    assert!(overflowed.load(Ordering::Relaxed) > 0);
    assert_eq!(writer.metrics().lost(), 0);
    assert_eq!(writer.metrics().written(), (THREADS * PER_THREAD) as u64);

    let content = fs::read_to_string(temp_dir.path().join("tiny.log")).unwrap();
    let per_thread = sequences(&content);
    assert_eq!(per_thread.len(), THREADS);
    for (thread, seqs) in per_thread {
        let expected: Vec<usize> = (0..PER_THREAD).collect();
        assert_eq!(seqs, expected, "thread {} out of order", thread);
    }
}

#[test]
fn test_logger_fan_out_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(Logger::new());
    logger.set_print_enabled(false);
    for name in ["first", "second"] {
        let config = WriterConfig::new()
            .with_queue_capacity(16)
            .with_overflow_retries(RETRIES)
            .with_flush_interval(Duration::from_millis(5));
        logger.add_writer(Box::new(
            FileWriter::with_config(temp_dir.path(), name, config).unwrap(),
        ));
    }

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(format!("t{} m{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Producer panicked");
    }
    logger.close().unwrap();

    assert_eq!(logger.metrics().writer_errors(), 0);
    for name in ["first", "second"] {
        let content = fs::read_to_string(temp_dir.path().join(format!("{}.log", name))).unwrap();
        assert_eq!(content.lines().count(), THREADS * PER_THREAD);
        for seqs in sequences(&content).values() {
            assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_close_races_with_producers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = WriterConfig::new()
        .with_queue_capacity(8)
        .with_overflow_retries(RETRIES);
    let writer = Arc::new(FileWriter::with_config(temp_dir.path(), "race", config).unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let writer = Arc::clone(&writer);
            let accepted = Arc::clone(&accepted);
            std::thread::spawn(move || {
                for i in 0..10_000 {
                    let entry = LogEntry::new(LogLevel::Info, format!("t{} m{}", t, i));
                    match writer.write(Arc::new(entry)) {
                        Ok(_) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(LoggerError::WriterClosed { .. }) => break,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
            })
        })
        .collect();

    std::thread::sleep(Duration::from_millis(5));
    writer.close().unwrap();
    for handle in handles {
        handle.join().expect("Producer panicked");
    }

    let content = fs::read_to_string(temp_dir.path().join("race.log")).unwrap_or_default();
    assert_eq!(content.lines().count(), accepted.load(Ordering::SeqCst));
}
