mod parsed;
mod snowflake;
mod sonyflake;
mod tbsl;
mod ulid;
mod uuid;

pub use parsed::*;
pub use snowflake::*;
pub use sonyflake::*;
pub use tbsl::*;
pub use ulid::*;
pub use uuid::*;

/// Parses the decimal form of a 63-bit integer identifier.
///
/// Accepts 1 to 19 ASCII digits whose value leaves the reserved top bit clear.
pub(crate) fn parse_decimal_63(s: &str) -> Option<u64> {
    if s.is_empty() || s.len() > 19 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|v| v >> 63 == 0)
}
