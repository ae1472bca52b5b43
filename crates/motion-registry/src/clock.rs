//! Session-relative monotonic time.
//!
//! Ingestion stamps every record with [`Clock::now`]; inactivity checks
//! compare against the same clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A monotonic source of seconds since the session started.
pub trait Clock: Send + Sync {
    fn now(&self) -> f64;
}

/// Wall-time clock started when the session is created.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    start: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SessionClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Stores the current time as `f64` bits so it can be shared across threads
/// without a lock.
#[derive(Debug, Default)]
pub struct ManualClock {
    bits: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.set(self.now() + by.as_secs_f64());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
