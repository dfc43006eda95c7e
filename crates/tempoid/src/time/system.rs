use crate::TimeSource;
use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// The operating system's wall clock.
///
/// Every call performs a `SystemTime::now()` syscall, so independent processes
/// on the same host observe the same time buckets. This is the default clock
/// of every generator.
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_time(&self) -> Duration {
        // A clock set before 1970 reads as the Unix epoch; epoch validation
        // then rejects it as a future start time.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}
