mod interface;
mod snowflake;
mod sonyflake;
mod tbsl;
#[cfg(test)]
mod tests;
mod ulid;
mod uuid;

pub use interface::*;
pub use snowflake::*;
pub use sonyflake::*;
pub use tbsl::*;
pub use ulid::*;
pub use uuid::*;

use crate::time::to_datetime;
use core::time::Duration;

/// UTC calendar day (`yyyymmdd`) of a Unix millisecond timestamp, used to
/// partition the state files of the daily-rotated families.
pub(crate) fn day_partition(unix_ms: u64) -> Option<String> {
    to_datetime(Duration::from_millis(unix_ms)).map(|t| t.format("%Y%m%d").to_string())
}
