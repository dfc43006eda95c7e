mod epoch;
mod interface;
mod mono_clock;
mod system;

pub use epoch::*;
pub use interface::*;
pub use mono_clock::*;
pub use system::*;

use chrono::{DateTime, Utc};
use core::time::Duration;

/// Converts a duration since the Unix epoch into a UTC date-time.
pub(crate) fn to_datetime(since_unix: Duration) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(since_unix.as_secs()).ok()?;
    DateTime::from_timestamp(secs, since_unix.subsec_nanos())
}

/// Saturating conversion of a duration into whole milliseconds.
pub(crate) fn as_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
