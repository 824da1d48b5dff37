//! Clock Module
//!
//! Wall-clock sources used for record access timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Supplies the current Unix time in whole seconds.
pub trait Clock {
    fn now(&self) -> i64;
}

// == System Clock ==
/// Reads the host wall clock through chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

// == Manual Clock ==
/// A settable clock. Clones share the same underlying instant, so a test can
/// keep one handle and advance the time seen by a cache holding another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Creates a clock frozen at `start` seconds.
    pub fn new(start: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Moves the clock forward by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    /// Sets the clock to an absolute timestamp.
    pub fn set(&self, now: i64) {
        self.now.store(now, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
