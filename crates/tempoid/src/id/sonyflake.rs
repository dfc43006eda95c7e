use crate::{Epoch, ParseError, Parsed, time::to_datetime};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr, time::Duration};

/// A 64-bit Sonyflake ID
///
/// - 1 bit reserved
/// - 39 bits timestamp (10 ms units since the configured [`Epoch`])
/// - 16 bits machine ID
/// - 8 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            24 23              8 7              0
///              +--------------+----------------+-----------------+---------------+
///  Field:      | reserved (1) | timestamp (39) | machine ID (16) | sequence (8)  |
///              +--------------+----------------+-----------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ------------>|
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SonyflakeId {
    id: u64,
}

/// The decoded components of a [`SonyflakeId`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SonyflakeInfo {
    pub time: DateTime<Utc>,
    pub machine_id: u64,
    pub sequence: u64,
}

impl SonyflakeId {
    /// Length of one timestamp unit.
    pub const UNIT_MILLIS: u64 = 10;

    pub const TIMESTAMP_BITS: u32 = 39;
    pub const MACHINE_ID_BITS: u32 = 16;
    pub const SEQUENCE_BITS: u32 = 8;

    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const MACHINE_ID_MASK: u64 = (1 << Self::MACHINE_ID_BITS) - 1;
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    pub const SEQUENCE_SHIFT: u32 = 0;
    pub const MACHINE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const TIMESTAMP_SHIFT: u32 = Self::MACHINE_ID_SHIFT + Self::MACHINE_ID_BITS;

    pub const fn from(timestamp: u64, machine_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let machine_id = (machine_id & Self::MACHINE_ID_MASK) << Self::MACHINE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | machine_id | sequence,
        }
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Timestamp field, in 10 ms units since the epoch.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Reconstructs the wall-clock time.
    ///
    /// The epoch is truncated to whole 10 ms units, matching the way the
    /// generator derives the field from the absolute unit count.
    pub fn time(&self, epoch: Epoch) -> Option<DateTime<Utc>> {
        let units = epoch.as_millis() / Self::UNIT_MILLIS + self.timestamp();
        to_datetime(Duration::from_millis(units.checked_mul(Self::UNIT_MILLIS)?))
    }

    pub fn decode(&self, epoch: Epoch) -> Option<SonyflakeInfo> {
        Some(SonyflakeInfo {
            time: self.time(epoch)?,
            machine_id: self.machine_id(),
            sequence: self.sequence(),
        })
    }

    /// Checks that `s` is the decimal form of a 63-bit integer.
    pub fn is_valid(s: &str) -> bool {
        super::parse_decimal_63(s).is_some()
    }

    pub fn parse(s: &str, epoch: Epoch) -> Parsed<SonyflakeInfo> {
        match s.parse::<Self>() {
            Ok(id) => Parsed::from_option(s, id.decode(epoch)),
            Err(_) => Parsed::invalid(s),
        }
    }
}

impl FromStr for SonyflakeId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parse_decimal_63(s)
            .map(Self::from_raw)
            .ok_or_else(|| ParseError::format("Sonyflake", s))
    }
}

impl fmt::Display for SonyflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SonyflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SonyflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("machine_id", &self.machine_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
