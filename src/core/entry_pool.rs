//! Object pool for log entries
//!
//! Entries are recycled instead of reallocated on every log call. An entry
//! goes back to the pool only through [`release`], which succeeds only for
//! the holder of the last `Arc` reference: while any writer can still read
//! an entry it cannot be reused.

use super::log_entry::LogEntry;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Maximum number of idle entries kept by the global entry pool
pub const DEFAULT_POOL_CAPACITY: usize = 4096;

/// Types that can be reset to a blank, reusable state
pub trait Recycle: Default {
    /// Clear all content while keeping allocations that can be reused
    fn recycle(&mut self);
}

/// A bounded, thread-safe pool of reusable values of one type
///
/// # Example
///
/// ```
/// use rust_buffered_logger::core::entry_pool::{Pool, Recycle};
///
/// #[derive(Default)]
/// struct Buffer(Vec<u8>);
///
/// impl Recycle for Buffer {
///     fn recycle(&mut self) {
///         self.0.clear();
///     }
/// }
///
/// let pool: Pool<Buffer> = Pool::new(8);
/// let mut buf = pool.acquire();
/// buf.0.extend_from_slice(b"hello");
/// pool.put(buf);
///
/// assert_eq!(pool.idle(), 1);
/// assert!(pool.acquire().0.is_empty());
/// ```
pub struct Pool<T: Recycle> {
    idle: Mutex<Vec<T>>,
    max_idle: usize,
    reused: AtomicU64,
    allocated: AtomicU64,
}

impl<T: Recycle> Pool<T> {
    pub const fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
            reused: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
        }
    }

    /// Take a blank value, reusing an idle one when available
    pub fn acquire(&self) -> T {
        match self.idle.lock().pop() {
            Some(value) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                value
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                T::default()
            }
        }
    }

    /// Return a value; it is recycled first and discarded if the pool is full
    pub fn put(&self, mut value: T) {
        value.recycle();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(value);
        }
    }

    /// Number of values currently waiting for reuse
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }

    /// Number of `acquire` calls served from idle values
    pub fn reused(&self) -> u64 {
        self.reused.load(Ordering::Relaxed)
    }

    /// Number of `acquire` calls that had to allocate
    pub fn allocated(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }
}

/// Process-wide pool of log entries
pub static ENTRY_POOL: Pool<LogEntry> = Pool::new(DEFAULT_POOL_CAPACITY);

/// Release one reference to a shared entry
///
/// The entry returns to [`ENTRY_POOL`] only when `entry` was the last
/// reference; otherwise this just drops the reference.
#[inline]
pub fn release(entry: Arc<LogEntry>) {
    if let Some(entry) = Arc::into_inner(entry) {
        ENTRY_POOL.put(entry);
    }
}
