use crate::{SystemClock, TimeSource};
use core::time::Duration;
use std::time::Instant;

/// Reads the wall clock once, at construction, and advances it with
/// `Instant` afterwards, so NTP steps never move it backward.
///
/// Clones share the same anchor. Two processes each create their own anchor,
/// so their readings may drift apart slowly; prefer [`SystemClock`] when
/// several processes coordinate on a shared state file.
///
/// # Example
///
/// ```
/// use tempoid::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_time();
/// let b = clock.current_time();
/// assert!(b >= a);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    anchor: Duration,
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Creates a clock anchored to the current system time.
    pub fn new() -> Self {
        Self {
            anchor: SystemClock.current_time(),
            start: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn current_time(&self) -> Duration {
        self.anchor + self.start.elapsed()
    }
}
