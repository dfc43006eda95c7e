use crate::{
    ParseError, Parsed, SystemClock, TimeSource,
    base32::{U128_CHARS, decode_u128, encode_u128},
    time::to_datetime,
};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr, time::Duration};

/// A 128-bit ULID: 48-bit Unix millisecond timestamp followed by 80 random
/// bits, written as 26 Crockford base32 characters.
///
/// ```text
///  Bit Index:  127            80 79           0
///              +----------------+-------------+
///  Field:      | timestamp (48) | random (80) |
///              +----------------+-------------+
///              |<-- MSB -- 128 bits -- LSB -->|
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid {
    id: u128,
}

/// The decoded components of a [`Ulid`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UlidInfo {
    pub time: DateTime<Utc>,
    pub random: u128,
}

impl Ulid {
    pub const TIMESTAMP_BITS: u32 = 48;
    pub const RANDOM_BITS: u32 = 80;

    pub const RANDOM_SHIFT: u32 = 0;
    pub const TIMESTAMP_SHIFT: u32 = Self::RANDOM_SHIFT + Self::RANDOM_BITS;

    pub const TIMESTAMP_MASK: u128 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const RANDOM_MASK: u128 = (1 << Self::RANDOM_BITS) - 1;

    /// Length of the textual form.
    pub const LEN: usize = U128_CHARS;

    /// How far past the current time a decoded timestamp may lie before
    /// [`Ulid::get_time`] rejects it.
    pub const MAX_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 10);

    #[must_use]
    pub const fn from(timestamp: u64, random: u128) -> Self {
        let t = ((timestamp as u128) & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let r = (random & Self::RANDOM_MASK) << Self::RANDOM_SHIFT;
        Self { id: t | r }
    }

    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Milliseconds since the Unix epoch.
    pub const fn timestamp(&self) -> u64 {
        ((self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK) as u64
    }

    pub const fn random(&self) -> u128 {
        (self.id >> Self::RANDOM_SHIFT) & Self::RANDOM_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK as u64
    }

    /// Returns `true` if the random part can be incremented without carrying
    /// into the timestamp.
    pub const fn has_random_room(&self) -> bool {
        self.random() < Self::RANDOM_MASK
    }

    /// Returns the ID with its random part incremented by one.
    #[must_use]
    pub const fn increment_random(&self) -> Self {
        Self::from(self.timestamp(), self.random() + 1)
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        to_datetime(Duration::from_millis(self.timestamp()))
    }

    pub fn decode(&self) -> Option<UlidInfo> {
        Some(UlidInfo {
            time: self.time()?,
            random: self.random(),
        })
    }

    /// Checks the structure: 26 characters of the canonical alphabet, the
    /// first one in `0..=7` so the value fits 128 bits.
    pub fn is_valid(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == Self::LEN
            && matches!(bytes[0], b'0'..=b'7')
            && bytes.iter().all(|&b| crate::base32::char_value(b).is_some())
    }

    /// Extracts the timestamp of a ULID string.
    ///
    /// Fails on malformed input and on timestamps more than
    /// [`Ulid::MAX_FUTURE`] ahead of the system clock.
    pub fn get_time(s: &str) -> Result<DateTime<Utc>, ParseError> {
        Self::get_time_at(s, &SystemClock)
    }

    /// Like [`Ulid::get_time`], judging plausibility against `clock`.
    pub fn get_time_at(s: &str, clock: &impl TimeSource) -> Result<DateTime<Utc>, ParseError> {
        let id: Self = s.parse()?;
        let ts = Duration::from_millis(id.timestamp());
        if ts > clock.current_time() + Self::MAX_FUTURE {
            return Err(ParseError::TimestampOutOfRange { family: "ULID" });
        }
        to_datetime(ts).ok_or(ParseError::TimestampOutOfRange { family: "ULID" })
    }

    pub fn parse(s: &str) -> Parsed<UlidInfo> {
        match s.parse::<Self>() {
            Ok(id) => Parsed::from_option(s, id.decode()),
            Err(_) => Parsed::invalid(s),
        }
    }
}

impl FromStr for Ulid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(s) {
            return Err(ParseError::format("ULID", s));
        }
        decode_u128(s)
            .map(Self::from_raw)
            .ok_or_else(|| ParseError::format("ULID", s))
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0_u8; U128_CHARS];
        encode_u128(self.id, &mut buf);
        // SAFETY: the buffer only ever holds ASCII alphabet characters
        f.write_str(unsafe { core::str::from_utf8_unchecked(&buf) })
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ulid")
            .field("id", &format_args!("{self}"))
            .field("timestamp", &self.timestamp())
            .field("random", &self.random())
            .finish()
    }
}
