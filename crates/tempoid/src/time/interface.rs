use core::time::Duration;
use std::sync::Arc;

/// Where generators read "now" from.
///
/// The returned value is the time elapsed since 1970-01-01 00:00:00 UTC at
/// whatever resolution the source offers. Generators derive their own units
/// (milliseconds, 10 ms ticks, microseconds, 100 ns intervals) from it.
///
/// # Example
///
/// ```
/// use core::time::Duration;
/// use tempoid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_time(&self) -> Duration {
///         Duration::from_millis(1234)
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time as a duration since the Unix epoch.
    fn current_time(&self) -> Duration;

    /// Returns the current time in whole milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64 {
        crate::time::as_millis(self.current_time())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_time(&self) -> Duration {
        (**self).current_time()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_time(&self) -> Duration {
        (**self).current_time()
    }
}
