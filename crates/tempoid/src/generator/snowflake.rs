use super::day_partition;
use crate::{
    Epoch, Error, Family, FileSequenceStore, IdGenStatus, IdGenerator, Parsed, Result,
    SequenceStatus, SequenceStore, ShardKey, SnowflakeId, SnowflakeInfo, SystemClock, TimeSource,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A Snowflake generator that coordinates its sequence field through a
/// [`SequenceStore`].
///
/// Each call reads the clock in milliseconds and asks the store for the next
/// sequence of that millisecond, keyed by `(datacenter, worker, UTC day)`.
/// When the returned sequence exceeds [`max_sequence`], the generator moves
/// on to the next millisecond and asks again, so a burst never waits for the
/// clock and never reuses a value.
///
/// ## Features
/// - ✅ Thread-safe and process-safe with a [`FileSequenceStore`]
/// - ✅ Configurable epoch and sequence ceiling
/// - ⚠️ Returns [`IdGenStatus::Degraded`] when the state file lock could not be
///   obtained
///
/// # Example
///
/// ```
/// use tempoid::{IdGenerator, SnowflakeGenerator};
///
/// let mut generator = SnowflakeGenerator::new(0, 1).unwrap();
/// generator.set_start_timestamp("2024-01-01 00:00:00").unwrap();
/// let id = generator.next_id().unwrap();
/// let info = generator.parse(&id.to_string()).into_info().unwrap();
/// assert_eq!(info.worker_id, 1);
/// ```
///
/// [`max_sequence`]: SnowflakeGenerator::max_sequence
#[derive(Debug)]
pub struct SnowflakeGenerator<S = FileSequenceStore, T = SystemClock> {
    datacenter_id: u64,
    worker_id: u64,
    epoch: Epoch,
    max_sequence: u64,
    store: S,
    time: T,
}

impl SnowflakeGenerator {
    /// Creates a generator using the default [`FileSequenceStore`] and the
    /// system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either id exceeds 31.
    pub fn new(datacenter_id: u64, worker_id: u64) -> Result<Self> {
        Self::with_store_and_time(datacenter_id, worker_id, FileSequenceStore::default(), SystemClock)
    }
}

impl<S, T> SnowflakeGenerator<S, T>
where
    S: SequenceStore,
    T: TimeSource,
{
    /// Creates a generator with an explicit sequence store and time source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either id exceeds 31.
    pub fn with_store_and_time(datacenter_id: u64, worker_id: u64, store: S, time: T) -> Result<Self> {
        if datacenter_id > SnowflakeId::DATACENTER_ID_MASK {
            return Err(Error::invalid(
                "datacenter_id",
                format!("{datacenter_id} exceeds {}", SnowflakeId::DATACENTER_ID_MASK),
            ));
        }
        if worker_id > SnowflakeId::WORKER_ID_MASK {
            return Err(Error::invalid(
                "worker_id",
                format!("{worker_id} exceeds {}", SnowflakeId::WORKER_ID_MASK),
            ));
        }
        Ok(Self {
            datacenter_id,
            worker_id,
            epoch: Epoch::default(),
            max_sequence: SnowflakeId::SEQUENCE_MASK,
            store,
            time,
        })
    }

    /// Sets the epoch from a start time such as `"2020-01-01 00:00:00"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clock`] if the string cannot be parsed, names an
    /// instant in the future, or lies so far back that the elapsed time no
    /// longer fits 41 bits.
    pub fn set_start_timestamp(&mut self, start: &str) -> Result<()> {
        self.set_epoch(Epoch::parse(start)?)
    }

    /// Sets the epoch.
    ///
    /// # Errors
    ///
    /// See [`SnowflakeGenerator::set_start_timestamp`].
    pub fn set_epoch(&mut self, epoch: Epoch) -> Result<()> {
        epoch.validate(&self.time, 1, SnowflakeId::TIMESTAMP_BITS)?;
        self.epoch = epoch;
        Ok(())
    }

    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Lowers the sequence ceiling, after which the generator advances to the
    /// next millisecond. Degraded pseudo-sequences are folded into
    /// `1..=max_sequence` as well.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `1 <= max_sequence <= 4095`.
    pub fn set_max_sequence(&mut self, max_sequence: u64) -> Result<()> {
        if !(1..=SnowflakeId::SEQUENCE_MASK).contains(&max_sequence) {
            return Err(Error::invalid(
                "max_sequence",
                format!("{max_sequence} is outside 1..={}", SnowflakeId::SEQUENCE_MASK),
            ));
        }
        self.max_sequence = max_sequence;
        Ok(())
    }

    pub const fn max_sequence(&self) -> u64 {
        self.max_sequence
    }

    pub const fn datacenter_id(&self) -> u64 {
        self.datacenter_id
    }

    pub const fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Decodes `s` relative to this generator's epoch.
    pub fn parse(&self, s: &str) -> Parsed<SnowflakeInfo> {
        SnowflakeId::parse(s, self.epoch)
    }

    fn shard_key(&self, bucket: u64) -> ShardKey {
        let key = ShardKey::new(
            Family::Snowflake,
            format!("{}-{}", self.datacenter_id, self.worker_id),
        );
        match day_partition(bucket) {
            Some(day) => key.with_partition(day),
            None => key,
        }
    }
}

impl<S, T> IdGenerator for SnowflakeGenerator<S, T>
where
    S: SequenceStore,
    T: TimeSource,
{
    type Id = SnowflakeId;

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_next_id(&self) -> Result<IdGenStatus<SnowflakeId>> {
        let mut bucket = self.time.current_millis();
        let allocation = loop {
            let allocation = self.store.advance(&self.shard_key(bucket), bucket)?;
            match allocation.status {
                SequenceStatus::Exact(seq) if seq > self.max_sequence => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(bucket = allocation.bucket, seq, "sequence exhausted; advancing to the next millisecond");
                    bucket = allocation.bucket + 1;
                }
                _ => break allocation,
            }
        };

        let sequence = match allocation.status {
            SequenceStatus::Exact(seq) => seq,
            SequenceStatus::Degraded(seq) => (seq - 1) % self.max_sequence + 1,
        };
        let timestamp = self
            .epoch
            .elapsed_units(allocation.bucket, 1, SnowflakeId::TIMESTAMP_BITS)?;
        let id = SnowflakeId::from(timestamp, self.datacenter_id, self.worker_id, sequence);
        Ok(IdGenStatus::from_sequence(allocation.status, id))
    }
}
