//! Clock abstraction for the controllers.
//!
//! This module provides:
//! - `TimeSource` trait for abstracting the monotonic clock
//! - `RealTime` implementation backed by `std::time::Instant`
//! - `VirtualTime` implementation for deterministic tests

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Abstraction over a monotonic clock supporting both real and virtual time.
///
/// Controllers never sleep or spawn timers; they only read the clock when the
/// sender asks for a window size. Timestamps handed to a controller
/// (`send_timestamp_ms`, `receiver_timestamp_ms`, ...) are expected to come from
/// the same time source.
pub trait TimeSource: Send + Sync + Clone + 'static {
    /// Returns the current time as nanoseconds since an arbitrary epoch.
    fn now_nanos(&self) -> u64;

    /// Returns the current time as a Duration since an arbitrary epoch.
    fn now(&self) -> Duration {
        Duration::from_nanos(self.now_nanos())
    }

    /// Returns the current time in whole milliseconds since the epoch.
    fn now_millis(&self) -> u64 {
        self.now_nanos() / 1_000_000
    }
}

/// Wall-clock time source. The epoch is the moment of construction.
#[derive(Clone)]
pub struct RealTime {
    epoch: Instant,
}

impl Default for RealTime {
    fn default() -> Self {
        Self::new()
    }
}

impl RealTime {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl TimeSource for RealTime {
    fn now_nanos(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }
}

/// Virtual time for deterministic tests.
///
/// Time only advances when explicitly stepped via `advance()` or `advance_to()`.
/// Clones share the same clock.
#[derive(Clone, Debug)]
pub struct VirtualTime {
    current_nanos: Arc<AtomicU64>,
}

impl Default for VirtualTime {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTime {
    /// Creates a new virtual time starting at 0.
    pub fn new() -> Self {
        Self::with_initial_time(0)
    }

    /// Creates a new virtual time starting at the given nanoseconds.
    pub fn with_initial_time(initial_nanos: u64) -> Self {
        Self {
            current_nanos: Arc::new(AtomicU64::new(initial_nanos)),
        }
    }

    /// Advances time by the given duration.
    pub fn advance(&self, duration: Duration) {
        let step = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.current_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(step))
            })
            .ok();
    }

    /// Advances time by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Moves time forward to the given absolute nanoseconds.
    ///
    /// Virtual time never goes backwards; targets in the past are ignored.
    pub fn advance_to(&self, target_nanos: u64) {
        self.current_nanos.fetch_max(target_nanos, Ordering::SeqCst);
    }
}

impl TimeSource for VirtualTime {
    fn now_nanos(&self) -> u64 {
        self.current_nanos.load(Ordering::SeqCst)
    }
}
