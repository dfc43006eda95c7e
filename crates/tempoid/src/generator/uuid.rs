use crate::{
    Error, GREGORIAN_OFFSET, INTERVALS_PER_MILLI, IdGenStatus, IdGenerator, RandSource, Result,
    SystemClock, ThreadRandom, TimeSource, Uuid, UuidFields, UuidVersion, mutex::Mutex, v8_sub_ms,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Last timestamps handed out per monotonic version.
#[derive(Debug, Default)]
struct UuidState {
    /// 100 ns intervals since the Unix epoch.
    v6: u64,
    /// Unix milliseconds.
    v7: u64,
    /// 100 ns intervals since the Unix epoch.
    v8: u64,
}

/// The versions [`UuidGenerator`] can produce through [`IdGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Produced {
    V1,
    V4,
    V6,
    V7,
    V8,
}

impl Produced {
    const fn version(self) -> UuidVersion {
        match self {
            Self::V1 => UuidVersion::V1,
            Self::V4 => UuidVersion::V4,
            Self::V6 => UuidVersion::V6,
            Self::V7 => UuidVersion::V7,
            Self::V8 => UuidVersion::V8,
        }
    }
}

/// Generates UUIDs of the time-based versions 1, 6, 7 and 8, and random v4.
///
/// Versions 6, 7 and 8 are monotonic per generator: each uses
/// `max(now, last + 1)` in its own unit (100 ns for v6 and v8, 1 ms for v7),
/// so successive identifiers of one version never share a timestamp. Version
/// 1 is stateless and relies on its random clock sequence.
///
/// Every time-based method takes an optional node. Its required length is
/// [`UuidVersion::node_len`]: 6 bytes for v1, 8 for v6, 10 for v7 and 7 for
/// v8. Without one, random bytes are used.
///
/// # Example
///
/// ```
/// use tempoid::{Uuid, UuidGenerator, UuidVersion};
///
/// let generator = UuidGenerator::new();
/// let a = generator.v7(None).unwrap();
/// let b = generator.v7(None).unwrap();
/// assert!(a.to_string() < b.to_string());
///
/// let node = [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF];
/// let v1 = generator.v1(Some(&node[..])).unwrap();
/// let info = Uuid::parse(&v1.to_string()).into_info().unwrap();
/// assert_eq!(info.version, UuidVersion::V1);
/// assert_eq!(info.node.as_deref(), Some("aabbccddeeff"));
/// ```
#[derive(Debug)]
pub struct UuidGenerator<T = SystemClock, R = ThreadRandom> {
    version: Produced,
    state: Mutex<UuidState>,
    time: T,
    rng: R,
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidGenerator {
    /// Creates a generator whose [`IdGenerator`] implementation produces v7.
    pub fn new() -> Self {
        Self::from_components(SystemClock, ThreadRandom)
    }
}

impl<T, R> UuidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    pub fn from_components(time: T, rng: R) -> Self {
        Self {
            version: Produced::V7,
            state: Mutex::new(UuidState::default()),
            time,
            rng,
        }
    }

    /// Selects the version produced through [`IdGenerator`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for versions this generator cannot
    /// produce (nil, 2, 3 and 5).
    pub fn with_version(mut self, version: UuidVersion) -> Result<Self> {
        self.version = match version {
            UuidVersion::V1 => Produced::V1,
            UuidVersion::V4 => Produced::V4,
            UuidVersion::V6 => Produced::V6,
            UuidVersion::V7 => Produced::V7,
            UuidVersion::V8 => Produced::V8,
            UuidVersion::Nil | UuidVersion::V2 | UuidVersion::V3 | UuidVersion::V5 => {
                return Err(Error::invalid(
                    "version",
                    format!("{version} UUIDs are not generated"),
                ));
            }
        };
        Ok(self)
    }

    pub const fn version(&self) -> UuidVersion {
        self.version.version()
    }

    /// Gregorian timestamp, random clock sequence, 6-byte node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `node` is not 6 bytes long.
    pub fn v1(&self, node: Option<&[u8]>) -> Result<Uuid> {
        let node = self.node(UuidVersion::V1, node)?;
        let timestamp = self.now_intervals() + GREGORIAN_OFFSET;
        Ok(UuidFields::V1 {
            timestamp,
            clock_seq: self.rng.rand() as u16,
            node: node as u64,
        }
        .encode())
    }

    /// Random UUID.
    pub fn v4(&self) -> Uuid {
        UuidFields::Opaque {
            version: UuidVersion::V4,
            bits: self.rng.rand(),
        }
        .encode()
    }

    /// Gregorian timestamp, most significant first, with an 8-byte node whose
    /// first two bytes become the clock sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `node` is not 8 bytes long.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn v6(&self, node: Option<&[u8]>) -> Result<Uuid> {
        let node = self.node(UuidVersion::V6, node)?;
        let intervals = self.monotonic(|s| &mut s.v6, self.now_intervals())?;
        Ok(UuidFields::V6 {
            timestamp: intervals + GREGORIAN_OFFSET,
            clock_seq: (node >> 48) as u16,
            node: node as u64,
        }
        .encode())
    }

    /// Unix milliseconds with a 10-byte node filling `rand_a` and `rand_b`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `node` is not 10 bytes long.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn v7(&self, node: Option<&[u8]>) -> Result<Uuid> {
        let node = self.node(UuidVersion::V7, node)?;
        let unix_ms = self.monotonic(|s| &mut s.v7, self.time.current_millis())?;
        Ok(UuidFields::V7 {
            unix_ms,
            rand_a: (node >> 64) as u16,
            rand_b: node as u64,
        }
        .encode())
    }

    /// Unix milliseconds plus a 14-bit sub-millisecond fraction, 4 random
    /// bits and a 7-byte node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `node` is not 7 bytes long.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn v8(&self, node: Option<&[u8]>) -> Result<Uuid> {
        let node = self.node(UuidVersion::V8, node)?;
        let intervals = self.monotonic(|s| &mut s.v8, self.now_intervals())?;
        Ok(UuidFields::V8 {
            unix_ms: intervals / INTERVALS_PER_MILLI,
            sub_ms: v8_sub_ms(intervals),
            rand: self.rng.rand() as u8,
            node: node as u64,
        }
        .encode())
    }

    /// 100 ns intervals since the Unix epoch.
    fn now_intervals(&self) -> u64 {
        u64::try_from(self.time.current_time().as_nanos() / 100).unwrap_or(u64::MAX)
    }

    /// Applies `max(now, last + 1)` to the slot selected by `slot`.
    fn monotonic(&self, slot: impl FnOnce(&mut UuidState) -> &mut u64, now: u64) -> Result<u64> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };
        let last = slot(&mut *state);
        let next = if now <= *last { *last + 1 } else { now };
        *last = next;
        Ok(next)
    }

    /// The node as a big-endian integer, or random bits of the same width.
    fn node(&self, version: UuidVersion, node: Option<&[u8]>) -> Result<u128> {
        let len = version.node_len().unwrap_or_default();
        match node {
            Some(bytes) if bytes.len() == len => Ok(bytes
                .iter()
                .fold(0_u128, |acc, &b| (acc << 8) | u128::from(b))),
            Some(bytes) => Err(Error::invalid(
                "node",
                format!("{version} needs {len} bytes, got {}", bytes.len()),
            )),
            None => Ok(self.rng.rand() & ((1_u128 << (len * 8)) - 1)),
        }
    }
}

impl<T, R> IdGenerator for UuidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    type Id = Uuid;

    fn try_next_id(&self) -> Result<IdGenStatus<Uuid>> {
        let id = match self.version {
            Produced::V1 => self.v1(None)?,
            Produced::V4 => self.v4(),
            Produced::V6 => self.v6(None)?,
            Produced::V7 => self.v7(None)?,
            Produced::V8 => self.v8(None)?,
        };
        Ok(IdGenStatus::Ready { id })
    }
}
