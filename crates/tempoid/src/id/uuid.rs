use crate::{ParseError, Parsed};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr};

/// Offset between the Gregorian epoch (1582-10-15) and the Unix epoch, in
/// 100 ns intervals.
pub const GREGORIAN_OFFSET: u64 = 0x01b2_1dd2_1381_4000;

/// 100 ns intervals per second.
pub const INTERVALS_PER_SEC: u64 = 10_000_000;

/// 100 ns intervals per millisecond.
pub const INTERVALS_PER_MILLI: u64 = 10_000;

const MASK_48: u128 = (1 << 48) - 1;
const MASK_56: u128 = (1 << 56) - 1;
const MASK_62: u128 = (1 << 62) - 1;
const VERSION_SHIFT: u32 = 76;
const VARIANT_SHIFT: u32 = 62;
const VARIANT_RFC: u128 = 0b10;

/// The version nibble of a [`Uuid`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UuidVersion {
    /// The all-zero UUID.
    Nil,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
}

impl UuidVersion {
    pub const fn number(&self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V3 => 3,
            Self::V4 => 4,
            Self::V5 => 5,
            Self::V6 => 6,
            Self::V7 => 7,
            Self::V8 => 8,
        }
    }

    /// Maps a version nibble to a version; `0` is only used by the nil UUID.
    pub const fn from_number(n: u8) -> Option<Self> {
        Some(match n {
            0 => Self::Nil,
            1 => Self::V1,
            2 => Self::V2,
            3 => Self::V3,
            4 => Self::V4,
            5 => Self::V5,
            6 => Self::V6,
            7 => Self::V7,
            8 => Self::V8,
            _ => return None,
        })
    }

    /// Number of trailing node bytes carried by the time-based versions.
    pub const fn node_len(&self) -> Option<usize> {
        match self {
            Self::V1 => Some(6),
            Self::V6 => Some(8),
            Self::V7 => Some(10),
            Self::V8 => Some(7),
            Self::Nil | Self::V2 | Self::V3 | Self::V4 | Self::V5 => None,
        }
    }

    pub const fn is_time_based(&self) -> bool {
        self.node_len().is_some()
    }
}

impl fmt::Display for UuidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            v => write!(f, "v{}", v.number()),
        }
    }
}

/// The fields of a UUID, by version.
///
/// Versions without a timestamp keep their 122 payload bits opaque in
/// `Opaque`; the version and variant bits are not part of `bits`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UuidFields {
    Nil,
    /// Gregorian 100 ns timestamp, least significant part first.
    V1 {
        timestamp: u64,
        clock_seq: u16,
        node: u64,
    },
    /// Gregorian 100 ns timestamp, most significant part first.
    V6 {
        timestamp: u64,
        clock_seq: u16,
        node: u64,
    },
    /// Unix milliseconds and 74 random bits.
    V7 {
        unix_ms: u64,
        rand_a: u16,
        rand_b: u64,
    },
    /// Unix milliseconds, a 14-bit sub-millisecond fraction, 4 random bits
    /// and a 56-bit node.
    V8 {
        unix_ms: u64,
        sub_ms: u16,
        rand: u8,
        node: u64,
    },
    Opaque {
        version: UuidVersion,
        bits: u128,
    },
}

impl UuidFields {
    pub const fn version(&self) -> UuidVersion {
        match self {
            Self::Nil => UuidVersion::Nil,
            Self::V1 { .. } => UuidVersion::V1,
            Self::V6 { .. } => UuidVersion::V6,
            Self::V7 { .. } => UuidVersion::V7,
            Self::V8 { .. } => UuidVersion::V8,
            Self::Opaque { version, .. } => *version,
        }
    }

    /// Packs the fields, masking each to its width and setting the version
    /// and RFC variant bits.
    pub const fn encode(&self) -> Uuid {
        let payload = match *self {
            Self::Nil => return Uuid::NIL,
            Self::V1 {
                timestamp,
                clock_seq,
                node,
            } => {
                let ts = timestamp as u128;
                ((ts & 0xFFFF_FFFF) << 96)
                    | (((ts >> 32) & 0xFFFF) << 80)
                    | (((ts >> 48) & 0xFFF) << 64)
                    | (((clock_seq as u128) & 0x3FFF) << 48)
                    | ((node as u128) & MASK_48)
            }
            Self::V6 {
                timestamp,
                clock_seq,
                node,
            } => {
                let ts = timestamp as u128;
                (((ts >> 12) & MASK_48) << 80)
                    | ((ts & 0xFFF) << 64)
                    | (((clock_seq as u128) & 0x3FFF) << 48)
                    | ((node as u128) & MASK_48)
            }
            Self::V7 {
                unix_ms,
                rand_a,
                rand_b,
            } => {
                (((unix_ms as u128) & MASK_48) << 80)
                    | (((rand_a as u128) & 0xFFF) << 64)
                    | ((rand_b as u128) & MASK_62)
            }
            Self::V8 {
                unix_ms,
                sub_ms,
                rand,
                node,
            } => {
                let sub = (sub_ms as u128) & 0x3FFF;
                (((unix_ms as u128) & MASK_48) << 80)
                    | ((sub >> 2) << 64)
                    | ((sub & 0b11) << 60)
                    | (((rand as u128) & 0xF) << 56)
                    | ((node as u128) & MASK_56)
            }
            Self::Opaque { bits, .. } => {
                bits & !(0xF << VERSION_SHIFT) & !(0b11 << VARIANT_SHIFT)
            }
        };
        Uuid::from_raw(
            payload
                | ((self.version().number() as u128) << VERSION_SHIFT)
                | (VARIANT_RFC << VARIANT_SHIFT),
        )
    }

    /// Splits a UUID into its fields.
    ///
    /// Returns `None` for version nibbles outside `1..=8` and for a variant
    /// other than RFC 4122, except for the nil UUID.
    pub const fn decode(uuid: &Uuid) -> Option<Self> {
        let v = uuid.to_raw();
        if v == 0 {
            return Some(Self::Nil);
        }
        if (v >> VARIANT_SHIFT) & 0b11 != VARIANT_RFC {
            return None;
        }
        let version = match UuidVersion::from_number(((v >> VERSION_SHIFT) & 0xF) as u8) {
            Some(UuidVersion::Nil) | None => return None,
            Some(version) => version,
        };
        let high = ((v >> 80) & MASK_48) as u64;
        let mid = ((v >> 64) & 0xFFF) as u64;
        let clock_seq = ((v >> 48) & 0x3FFF) as u16;
        let node48 = (v & MASK_48) as u64;
        Some(match version {
            UuidVersion::V1 => Self::V1 {
                timestamp: (mid << 48) | ((high & 0xFFFF) << 32) | (high >> 16),
                clock_seq,
                node: node48,
            },
            UuidVersion::V6 => Self::V6 {
                timestamp: (high << 12) | mid,
                clock_seq,
                node: node48,
            },
            UuidVersion::V7 => Self::V7 {
                unix_ms: high,
                rand_a: mid as u16,
                rand_b: (v & MASK_62) as u64,
            },
            UuidVersion::V8 => Self::V8 {
                unix_ms: high,
                sub_ms: ((mid << 2) | ((v >> 60) & 0b11) as u64) as u16,
                rand: ((v >> 56) & 0xF) as u8,
                node: (v & MASK_56) as u64,
            },
            UuidVersion::Nil
            | UuidVersion::V2
            | UuidVersion::V3
            | UuidVersion::V4
            | UuidVersion::V5 => Self::Opaque {
                version,
                bits: v & !(0xF << VERSION_SHIFT) & !(0b11 << VARIANT_SHIFT),
            },
        })
    }

    /// Time since the Unix epoch in 100 ns intervals, for the time-based
    /// versions. Negative for v1/v6 timestamps before 1970.
    pub const fn unix_intervals(&self) -> Option<i128> {
        match *self {
            Self::V1 { timestamp, .. } | Self::V6 { timestamp, .. } => {
                Some(timestamp as i128 - GREGORIAN_OFFSET as i128)
            }
            Self::V7 { unix_ms, .. } => Some(unix_ms as i128 * INTERVALS_PER_MILLI as i128),
            Self::V8 { unix_ms, sub_ms, .. } => {
                // ceil(sub_ms * 10_000 / 2^14), the exact inverse of the
                // encoding's floor.
                let sub = (sub_ms as u64 * INTERVALS_PER_MILLI).div_ceil(1 << 14);
                Some((unix_ms * INTERVALS_PER_MILLI + sub) as i128)
            }
            Self::Nil | Self::Opaque { .. } => None,
        }
    }
}

/// Sub-millisecond fraction stored by v8: `((intervals % 10_000) << 14) / 10_000`.
pub const fn v8_sub_ms(unix_intervals: u64) -> u16 {
    (((unix_intervals % INTERVALS_PER_MILLI) << 14) / INTERVALS_PER_MILLI) as u16
}

/// A 128-bit UUID, written in the canonical lower-case `8-4-4-4-12` form.
///
/// ```
/// use tempoid::{Uuid, UuidVersion};
///
/// let s = "1ec9414c-232a-6b00-b3c8-9e6bdeced846";
/// assert!(Uuid::is_valid(s));
/// let info = Uuid::parse(s).into_info().unwrap();
/// assert_eq!(info.version, UuidVersion::V6);
/// assert_eq!(info.node.as_deref(), Some("b3c89e6bdeced846"));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Uuid {
    id: u128,
}

/// The decoded components of a [`Uuid`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UuidInfo {
    pub version: UuidVersion,
    /// Embedded time, for v1, v6, v7 and v8.
    pub time: Option<DateTime<Utc>>,
    /// Trailing node bytes as lower-case hex, for v1, v6, v7 and v8.
    pub node: Option<String>,
}

impl Uuid {
    pub const NIL: Self = Self { id: 0 };
    /// Length of the textual form.
    pub const LEN: usize = 36;

    const HYPHENS: [usize; 4] = [8, 13, 18, 23];

    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    pub const fn fields(&self) -> Option<UuidFields> {
        UuidFields::decode(self)
    }

    pub fn version(&self) -> Option<UuidVersion> {
        self.fields().map(|f| f.version())
    }

    /// Embedded time of a time-based UUID.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        intervals_to_datetime(self.fields()?.unix_intervals()?)
    }

    /// The trailing node bytes of a time-based UUID, as lower-case hex.
    pub fn node_hex(&self) -> Option<String> {
        let len = self.version()?.node_len()?;
        let mask = (1_u128 << (len * 8)) - 1;
        Some(format!("{:0width$x}", self.id & mask, width = len * 2))
    }

    pub fn decode(&self) -> Option<UuidInfo> {
        let version = self.version()?;
        Some(UuidInfo {
            version,
            time: if version.is_time_based() { Some(self.time()?) } else { None },
            node: self.node_hex(),
        })
    }

    /// Checks the canonical `8-4-4-4-12` hex form (either case), a version in
    /// `1..=8` and the RFC variant. The nil UUID is accepted.
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }

    /// Extracts the embedded time.
    ///
    /// Fails on malformed input and with [`ParseError::UnsupportedVersion`]
    /// for versions without a timestamp.
    pub fn get_time(s: &str) -> Result<DateTime<Utc>, ParseError> {
        let uuid: Self = s.parse()?;
        let fields = uuid.fields().ok_or_else(|| ParseError::format("UUID", s))?;
        let intervals = fields
            .unix_intervals()
            .ok_or(ParseError::UnsupportedVersion(fields.version().number()))?;
        intervals_to_datetime(intervals).ok_or(ParseError::TimestampOutOfRange { family: "UUID" })
    }

    pub fn parse(s: &str) -> Parsed<UuidInfo> {
        match s.parse::<Self>() {
            Ok(uuid) => Parsed::from_option(s, uuid.decode()),
            Err(_) => Parsed::invalid(s),
        }
    }
}

/// Converts signed 100 ns intervals since the Unix epoch to a date-time.
fn intervals_to_datetime(intervals: i128) -> Option<DateTime<Utc>> {
    let per_sec = i128::from(INTERVALS_PER_SEC);
    let secs = i64::try_from(intervals.div_euclid(per_sec)).ok()?;
    let nanos = u32::try_from(intervals.rem_euclid(per_sec) * 100).ok()?;
    DateTime::from_timestamp(secs, nanos)
}

impl FromStr for Uuid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::format("UUID", s);
        let bytes = s.as_bytes();
        if bytes.len() != Self::LEN {
            return Err(err());
        }
        let mut id = 0_u128;
        for (i, &b) in bytes.iter().enumerate() {
            if Self::HYPHENS.contains(&i) {
                if b != b'-' {
                    return Err(err());
                }
                continue;
            }
            let nibble = char::from(b).to_digit(16).ok_or_else(err)?;
            id = (id << 4) | u128::from(nibble);
        }
        let uuid = Self::from_raw(id);
        match uuid.fields() {
            Some(_) => Ok(uuid),
            None => Err(err()),
        }
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.id;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            v >> 96,
            (v >> 80) & 0xFFFF,
            (v >> 64) & 0xFFFF,
            (v >> 48) & 0xFFFF,
            v & MASK_48
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Uuid").field(&format_args!("{self}")).finish()
    }
}
