//! Clock Module
//!
//! Time source used by the cache engine. Production code reads the wall
//! clock; tests drive a `ManualClock` to simulate the passage of time.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

// == Clock Trait ==
/// Source of Unix timestamps in milliseconds.
pub trait Clock: Debug + Send + Sync {
    /// Returns the current time in Unix milliseconds.
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Wall clock backed by `chrono::Utc::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        current_timestamp_ms()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a manual clock starting at `start_ms`.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
        }
    }

    /// Moves the clock forward by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// Clamps to 0 for clocks set before the epoch.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
