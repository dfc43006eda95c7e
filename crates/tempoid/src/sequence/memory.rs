use crate::{
    Allocation, Result, SequenceRecord, SequenceStore, ShardKey, mutex::Mutex,
};
use std::collections::HashMap;

/// A [`SequenceStore`] that keeps its counters in process memory.
///
/// Useful when a single process owns a shard, and in tests. Counters follow
/// the same [`StateFormat`] rules as the file-backed store, but nothing is
/// shared with other processes.
///
/// [`StateFormat`]: crate::StateFormat
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    records: Mutex<HashMap<ShardKey, SequenceRecord>>,
}

impl MemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SequenceStore for MemorySequenceStore {
    fn advance(&self, key: &ShardKey, bucket: u64) -> Result<Allocation> {
        let mut records = {
            #[cfg(feature = "parking-lot")]
            {
                self.records.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.records.lock()?
            }
        };
        let record = records
            .entry(key.clone())
            .or_insert_with(|| SequenceRecord::empty(key.family().state_format()));
        let (bucket, sequence) = record.advance(bucket);
        Ok(Allocation::exact(bucket, sequence))
    }
}
