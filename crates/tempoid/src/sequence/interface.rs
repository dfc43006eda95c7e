use crate::{Result, StateFormat};
use core::fmt;
use std::sync::Arc;

/// The first sequence value handed out in a fresh time bucket.
pub const FIRST_SEQUENCE: u64 = 1;

/// Identifier families that coordinate their sequence field through a
/// [`SequenceStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Family {
    /// 41-bit millisecond timestamp, 5-bit datacenter, 5-bit worker, 12-bit
    /// sequence.
    Snowflake,
    /// 39-bit 10 ms timestamp, 16-bit machine, 8-bit sequence.
    Sonyflake,
    /// 20 hex characters: microsecond timestamp, 2-digit machine, 5 hex tail.
    Tbsl,
}

impl Family {
    /// Short tag used in state file names.
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Snowflake => "snf",
            Self::Sonyflake => "sof",
            Self::Tbsl => "tbsl",
        }
    }

    /// Width of the family's sequence field.
    pub const fn sequence_bits(&self) -> u32 {
        match self {
            Self::Snowflake => 12,
            Self::Sonyflake => 8,
            Self::Tbsl => 20,
        }
    }

    /// Largest value the sequence field can hold: `2^bits - 1`.
    pub const fn max_sequence(&self) -> u64 {
        (1 << self.sequence_bits()) - 1
    }

    /// How the family persists its coordination state.
    ///
    /// Families whose generator may run ahead of the clock after a sequence
    /// overflow keep one counter per bucket, so that returning to the real
    /// bucket later does not restart a counter that was already used.
    pub const fn state_format(&self) -> StateFormat {
        match self {
            Self::Snowflake | Self::Sonyflake => StateFormat::BucketMap,
            Self::Tbsl => StateFormat::Counter,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Names one coordination counter: a family, a shard, and an optional
/// partition (Snowflake and Sonyflake partition by UTC calendar day).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardKey {
    family: Family,
    shard: String,
    partition: Option<String>,
}

impl ShardKey {
    /// Creates a key for `shard` within `family`.
    pub fn new(family: Family, shard: impl fmt::Display) -> Self {
        Self {
            family,
            shard: shard.to_string(),
            partition: None,
        }
    }

    /// Returns this key scoped to an additional partition.
    #[must_use]
    pub fn with_partition(mut self, partition: impl fmt::Display) -> Self {
        self.partition = Some(partition.to_string());
        self
    }

    pub const fn family(&self) -> Family {
        self.family
    }

    pub fn shard(&self) -> &str {
        &self.shard
    }

    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }

    /// Deterministic state file name, e.g. `uid-snf-1-7-20250102.seq`.
    ///
    /// Characters other than ASCII alphanumerics, `-` and `_` are replaced so
    /// that a key can never escape the store directory.
    pub fn file_name(&self) -> String {
        let sanitize = |s: &str| -> String {
            s.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect()
        };
        match &self.partition {
            Some(p) => format!(
                "uid-{}-{}-{}.seq",
                self.family.tag(),
                sanitize(&self.shard),
                sanitize(p)
            ),
            None => format!("uid-{}-{}.seq", self.family.tag(), sanitize(&self.shard)),
        }
    }
}

/// Outcome of [`SequenceStore::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SequenceStatus {
    /// The value was allocated under the store's exclusive lock.
    Exact(u64),
    /// The lock could not be obtained; the value is derived from the process
    /// id, masked to the family's sequence width, and may collide with values
    /// issued to other processes.
    Degraded(u64),
}

impl SequenceStatus {
    pub const fn value(&self) -> u64 {
        match self {
            Self::Exact(v) | Self::Degraded(v) => *v,
        }
    }

    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

/// The result of one [`SequenceStore::advance`]: a sequence value and the
/// bucket it belongs to.
///
/// `bucket` is never below the requested one. It is above it when the request
/// arrived after the store had already moved past the requested bucket, e.g.
/// because the caller read the clock and then waited on the lock. Callers
/// encode `bucket`, not the value they asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Allocation {
    /// The bucket the sequence was allocated in.
    pub bucket: u64,
    /// The allocated sequence value.
    pub status: SequenceStatus,
}

impl Allocation {
    pub const fn exact(bucket: u64, sequence: u64) -> Self {
        Self {
            bucket,
            status: SequenceStatus::Exact(sequence),
        }
    }

    pub const fn degraded(bucket: u64, sequence: u64) -> Self {
        Self {
            bucket,
            status: SequenceStatus::Degraded(sequence),
        }
    }

    /// The allocated sequence value.
    pub const fn value(&self) -> u64 {
        self.status.value()
    }
}

/// A shared, monotonic per-bucket counter.
///
/// For a fixed key, every exact allocation returns a `(bucket, sequence)`
/// pair that no earlier allocation returned, across every caller sharing the
/// backend. Within one bucket the sequence increases by one per call,
/// starting at [`FIRST_SEQUENCE`]. A request for a bucket the store may
/// already have forgotten is served in a bucket it still tracks (see
/// [`Allocation::bucket`]).
///
/// [`FileSequenceStore`] shares counters between processes on one host;
/// [`MemorySequenceStore`] shares them between threads of one process. A
/// multi-host backend only needs an atomic compare-and-swap over the same
/// record.
///
/// [`FileSequenceStore`]: crate::FileSequenceStore
/// [`MemorySequenceStore`]: crate::MemorySequenceStore
pub trait SequenceStore {
    /// Allocates the next sequence value of `key` for `bucket`, or for a
    /// later bucket when `bucket` is stale.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Lock`] if the backing resource cannot be used
    /// at all. Contention is never an error.
    fn advance(&self, key: &ShardKey, bucket: u64) -> Result<Allocation>;
}

impl<S: SequenceStore + ?Sized> SequenceStore for &S {
    fn advance(&self, key: &ShardKey, bucket: u64) -> Result<Allocation> {
        (**self).advance(key, bucket)
    }
}

impl<S: SequenceStore + ?Sized> SequenceStore for Arc<S> {
    fn advance(&self, key: &ShardKey, bucket: u64) -> Result<Allocation> {
        (**self).advance(key, bucket)
    }
}
