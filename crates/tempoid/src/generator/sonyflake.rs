use super::day_partition;
use crate::{
    Epoch, Error, Family, FileSequenceStore, IdGenStatus, IdGenerator, Parsed, Result,
    SequenceStatus, SequenceStore, ShardKey, SonyflakeId, SonyflakeInfo, SystemClock, TimeSource,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A Sonyflake generator that coordinates its sequence field through a
/// [`SequenceStore`].
///
/// The clock is read in 10 ms units. The same unit is used both as the
/// coordination bucket (absolute, since 1970) and for the encoded timestamp
/// (relative to the epoch, truncated to whole units), so the two never
/// disagree about which tick an identifier belongs to.
///
/// With 8 sequence bits a tick holds 255 identifiers; further calls in the
/// same tick move on to the next one.
#[derive(Debug)]
pub struct SonyflakeGenerator<S = FileSequenceStore, T = SystemClock> {
    machine_id: u64,
    epoch: Epoch,
    store: S,
    time: T,
}

impl SonyflakeGenerator {
    /// Creates a generator using the default [`FileSequenceStore`] and the
    /// system clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `machine_id` exceeds 65535.
    pub fn new(machine_id: u64) -> Result<Self> {
        Self::with_store_and_time(machine_id, FileSequenceStore::default(), SystemClock)
    }
}

impl<S, T> SonyflakeGenerator<S, T>
where
    S: SequenceStore,
    T: TimeSource,
{
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `machine_id` exceeds 65535.
    pub fn with_store_and_time(machine_id: u64, store: S, time: T) -> Result<Self> {
        if machine_id > SonyflakeId::MACHINE_ID_MASK {
            return Err(Error::invalid(
                "machine_id",
                format!("{machine_id} exceeds {}", SonyflakeId::MACHINE_ID_MASK),
            ));
        }
        Ok(Self {
            machine_id,
            epoch: Epoch::default(),
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
    /// longer fits 39 bits of 10 ms units.
    pub fn set_start_timestamp(&mut self, start: &str) -> Result<()> {
        self.set_epoch(Epoch::parse(start)?)
    }

    /// # Errors
    ///
    /// See [`SonyflakeGenerator::set_start_timestamp`].
    pub fn set_epoch(&mut self, epoch: Epoch) -> Result<()> {
        epoch.validate(&self.time, SonyflakeId::UNIT_MILLIS, SonyflakeId::TIMESTAMP_BITS)?;
        self.epoch = epoch;
        Ok(())
    }

    pub const fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub const fn machine_id(&self) -> u64 {
        self.machine_id
    }

    /// Decodes `s` relative to this generator's epoch.
    pub fn parse(&self, s: &str) -> Parsed<SonyflakeInfo> {
        SonyflakeId::parse(s, self.epoch)
    }

    fn shard_key(&self, tick: u64) -> ShardKey {
        let key = ShardKey::new(Family::Sonyflake, self.machine_id);
        match day_partition(tick.saturating_mul(SonyflakeId::UNIT_MILLIS)) {
            Some(day) => key.with_partition(day),
            None => key,
        }
    }
}

impl<S, T> IdGenerator for SonyflakeGenerator<S, T>
where
    S: SequenceStore,
    T: TimeSource,
{
    type Id = SonyflakeId;

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_next_id(&self) -> Result<IdGenStatus<SonyflakeId>> {
        let mut tick = self.time.current_millis() / SonyflakeId::UNIT_MILLIS;
        let allocation = loop {
            let allocation = self.store.advance(&self.shard_key(tick), tick)?;
            match allocation.status {
                SequenceStatus::Exact(seq) if seq > SonyflakeId::SEQUENCE_MASK => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(tick = allocation.bucket, seq, "sequence exhausted; advancing to the next tick");
                    tick = allocation.bucket + 1;
                }
                _ => break allocation,
            }
        };

        let unit = SonyflakeId::UNIT_MILLIS;
        let timestamp = Epoch::from_millis(self.epoch.as_millis() / unit * unit).elapsed_units(
            allocation.bucket * unit,
            unit,
            SonyflakeId::TIMESTAMP_BITS,
        )?;
        let id = SonyflakeId::from(timestamp, self.machine_id, allocation.value());
        Ok(IdGenStatus::from_sequence(allocation.status, id))
    }
}
