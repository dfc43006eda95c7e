use crate::{ParseError, Parsed, time::to_datetime};
use chrono::{DateTime, Utc};
use core::{fmt, str::FromStr, time::Duration};

/// A 20-character TBSL identifier.
///
/// The head is the decimal number `secs ‖ micros ‖ machine`, where `micros`
/// is zero-padded to 6 digits and `machine` to 2, printed as 15 upper-case
/// hex characters. The tail holds 20 bits, printed as 5 hex characters: a
/// coordinated sequence or random bits, depending on the generator.
///
/// ```text
///  |<-------- head: 15 hex -------->|<-- tail: 5 hex -->|
///  |  hex(secs ‖ micros ‖ machine)  |  sequence/random  |
/// ```
///
/// Ordering follows the string form: head first, then tail.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TbslId {
    head: u64,
    tail: u32,
}

/// The decoded components of a [`TbslId`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TbslInfo {
    /// Time with microsecond precision.
    pub time: DateTime<Utc>,
    pub machine_id: u8,
    pub tail: u32,
}

impl TbslId {
    pub const LEN: usize = 20;
    pub const HEAD_CHARS: usize = 15;
    pub const TAIL_BITS: u32 = 20;
    pub const TAIL_MASK: u32 = (1 << Self::TAIL_BITS) - 1;
    /// Largest machine id that fits the two decimal digits.
    pub const MAX_MACHINE_ID: u8 = 99;
    /// Whole seconds must stay below this bound so that the head fits 15 hex
    /// characters.
    pub const MAX_SECS: u64 = 10_000_000_000;

    const MICROS_PER_SEC: u64 = 1_000_000;

    /// Builds an identifier from microseconds since the Unix epoch.
    ///
    /// Returns `None` if the time is past [`Self::MAX_SECS`] or the machine
    /// id exceeds [`Self::MAX_MACHINE_ID`].
    pub fn from_micros(micros: u64, machine_id: u8, tail: u32) -> Option<Self> {
        if machine_id > Self::MAX_MACHINE_ID || micros / Self::MICROS_PER_SEC >= Self::MAX_SECS {
            return None;
        }
        Some(Self {
            head: micros * 100 + u64::from(machine_id),
            tail: tail & Self::TAIL_MASK,
        })
    }

    /// The decimal head value `secs ‖ micros ‖ machine`.
    pub const fn head(&self) -> u64 {
        self.head
    }

    pub const fn tail(&self) -> u32 {
        self.tail
    }

    /// Microseconds since the Unix epoch.
    pub const fn micros(&self) -> u64 {
        self.head / 100
    }

    pub const fn machine_id(&self) -> u8 {
        (self.head % 100) as u8
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        to_datetime(Duration::from_micros(self.micros()))
    }

    pub fn decode(&self) -> Option<TbslInfo> {
        Some(TbslInfo {
            time: self.time()?,
            machine_id: self.machine_id(),
            tail: self.tail,
        })
    }

    /// Checks that `s` is 20 upper-case hex characters whose head holds a
    /// seconds field below 10^10. Agrees with [`TbslId::parse`].
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }

    fn has_shape(s: &str) -> bool {
        s.len() == Self::LEN && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F'))
    }

    pub fn parse(s: &str) -> Parsed<TbslInfo> {
        match s.parse::<Self>() {
            Ok(id) => Parsed::from_option(s, id.decode()),
            Err(_) => Parsed::invalid(s),
        }
    }
}

impl FromStr for TbslId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::has_shape(s) {
            return Err(ParseError::format("TBSL", s));
        }
        let (head, tail) = s.split_at(Self::HEAD_CHARS);
        let head = u64::from_str_radix(head, 16).map_err(|_| ParseError::format("TBSL", s))?;
        let tail = u32::from_str_radix(tail, 16).map_err(|_| ParseError::format("TBSL", s))?;
        if head / 100 / Self::MICROS_PER_SEC >= Self::MAX_SECS {
            return Err(ParseError::format("TBSL", s));
        }
        Ok(Self { head, tail })
    }
}

impl fmt::Display for TbslId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:015X}{:05X}", self.head, self.tail)
    }
}

impl fmt::Debug for TbslId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TbslId")
            .field("id", &format_args!("{self}"))
            .field("micros", &self.micros())
            .field("machine_id", &self.machine_id())
            .field("tail", &self.tail)
            .finish()
    }
}
