use crate::{
    Error, Family, FileSequenceStore, IdGenStatus, IdGenerator, RandSource, Result, SequenceStatus,
    SequenceStore, ShardKey, SystemClock, TbslId, ThreadRandom, TimeSource, mutex::Mutex,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// What fills the 5 hex tail characters of a [`TbslId`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TailMode {
    /// A sequence allocated by the [`SequenceStore`] for the microsecond, so
    /// processes sharing a machine id never collide.
    #[default]
    Sequenced,
    /// 20 random bits.
    Random,
}

/// A TBSL generator.
///
/// The head is derived from the current time in microseconds; within one
/// generator it is strictly increasing (`max(now, last + 1)`), so successive
/// identifiers compare greater both numerically and as strings.
///
/// # Example
///
/// ```
/// use tempoid::{IdGenerator, TbslGenerator, TbslId};
///
/// let generator = TbslGenerator::new(7).unwrap();
/// let a = generator.next_id().unwrap().to_string();
/// let b = generator.next_id().unwrap().to_string();
/// assert!(a < b);
/// assert_eq!(TbslId::parse(&b).into_info().unwrap().machine_id, 7);
/// ```
#[derive(Debug)]
pub struct TbslGenerator<S = FileSequenceStore, T = SystemClock, R = ThreadRandom> {
    machine_id: u8,
    tail_mode: TailMode,
    last_micros: Mutex<u64>,
    store: S,
    time: T,
    rng: R,
}

impl TbslGenerator {
    /// Creates a generator with a sequenced tail, the default
    /// [`FileSequenceStore`] and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `machine_id` exceeds 99.
    pub fn new(machine_id: u8) -> Result<Self> {
        Self::from_components(machine_id, FileSequenceStore::default(), SystemClock, ThreadRandom)
    }
}

impl<S, T, R> TbslGenerator<S, T, R>
where
    S: SequenceStore,
    T: TimeSource,
    R: RandSource<u64>,
{
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `machine_id` exceeds 99.
    pub fn from_components(machine_id: u8, store: S, time: T, rng: R) -> Result<Self> {
        if machine_id > TbslId::MAX_MACHINE_ID {
            return Err(Error::invalid(
                "machine_id",
                format!("{machine_id} exceeds {}", TbslId::MAX_MACHINE_ID),
            ));
        }
        Ok(Self {
            machine_id,
            tail_mode: TailMode::default(),
            last_micros: Mutex::new(0),
            store,
            time,
            rng,
        })
    }

    #[must_use]
    pub fn with_tail_mode(mut self, tail_mode: TailMode) -> Self {
        self.tail_mode = tail_mode;
        self
    }

    pub const fn tail_mode(&self) -> TailMode {
        self.tail_mode
    }

    pub const fn machine_id(&self) -> u8 {
        self.machine_id
    }

    fn build(&self, micros: u64, tail: u32) -> Result<TbslId> {
        TbslId::from_micros(micros, self.machine_id, tail).ok_or_else(|| {
            Error::invalid("time", format!("{micros} µs exceeds the 10-digit seconds range"))
        })
    }
}

impl<S, T, R> IdGenerator for TbslGenerator<S, T, R>
where
    S: SequenceStore,
    T: TimeSource,
    R: RandSource<u64>,
{
    type Id = TbslId;

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_next_id(&self) -> Result<IdGenStatus<TbslId>> {
        let mut last = {
            #[cfg(feature = "parking-lot")]
            {
                self.last_micros.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.last_micros.lock()?
            }
        };
        let now = u64::try_from(self.time.current_time().as_micros()).unwrap_or(u64::MAX);
        let mut micros = now.max(*last + 1);

        let status = match self.tail_mode {
            TailMode::Random => IdGenStatus::Ready {
                id: self.build(micros, self.rng.rand() as u32)?,
            },
            TailMode::Sequenced => {
                let key = ShardKey::new(Family::Tbsl, self.machine_id);
                let allocation = loop {
                    let allocation = self.store.advance(&key, micros)?;
                    match allocation.status {
                        SequenceStatus::Exact(seq) if seq > u64::from(TbslId::TAIL_MASK) => {
                            micros = allocation.bucket + 1;
                        }
                        _ => break allocation,
                    }
                };
                micros = allocation.bucket;
                let id = self.build(micros, allocation.value() as u32)?;
                IdGenStatus::from_sequence(allocation.status, id)
            }
        };
        *last = micros;
        Ok(status)
    }
}
