use crate::FIRST_SEQUENCE;
use std::collections::BTreeMap;

/// How many buckets behind the requested one a [`StateFormat::BucketMap`]
/// keeps before pruning: one second of Snowflake milliseconds, ten seconds of
/// Sonyflake ticks. Later requests for pruned buckets are served in the
/// oldest retained one.
pub const BUCKET_RETENTION: u64 = 1_000;

/// On-disk layout of a sequence state file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateFormat {
    /// A single CSV record `bucket,counter`.
    Counter,
    /// A JSON object mapping bucket to its counter, e.g. `{"1700000000000":3}`.
    BucketMap,
}

/// The persisted coordination state of one shard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceRecord {
    /// Last bucket and the counter reached within it.
    Counter {
        /// The bucket of the most recent allocation.
        last_bucket: u64,
        /// The value handed out for `last_bucket`.
        counter: u64,
    },
    /// Counter per bucket.
    BucketMap(BTreeMap<u64, u64>),
}

impl SequenceRecord {
    /// An empty record of the given format.
    pub fn empty(format: StateFormat) -> Self {
        match format {
            StateFormat::Counter => Self::Counter {
                last_bucket: 0,
                counter: 0,
            },
            StateFormat::BucketMap => Self::BucketMap(BTreeMap::new()),
        }
    }

    /// Decodes persisted state. Empty or unreadable content yields an empty
    /// record, which the next write replaces with a consistent one.
    pub fn decode(format: StateFormat, contents: &str) -> Self {
        let contents = contents.trim();
        if contents.is_empty() {
            return Self::empty(format);
        }
        let decoded = match format {
            StateFormat::Counter => contents.split_once(',').and_then(|(bucket, counter)| {
                Some(Self::Counter {
                    last_bucket: bucket.trim().trim_matches('"').parse().ok()?,
                    counter: counter.trim().trim_matches('"').parse().ok()?,
                })
            }),
            StateFormat::BucketMap => serde_json::from_str::<BTreeMap<u64, u64>>(contents)
                .ok()
                .map(Self::BucketMap),
        };
        decoded.unwrap_or_else(|| {
            #[cfg(feature = "tracing")]
            tracing::warn!(?format, "discarding unreadable sequence state");
            Self::empty(format)
        })
    }

    /// Records an allocation for `bucket` and returns the bucket actually used
    /// together with the allocated value.
    ///
    /// A record never allocates below the oldest bucket it still remembers:
    /// for `Counter` that is the last bucket, for `BucketMap` the oldest
    /// retained key. Older requests are served in that bucket instead, so a
    /// pair handed out before a bucket was forgotten is never handed out
    /// again.
    pub fn advance(&mut self, bucket: u64) -> (u64, u64) {
        match self {
            Self::Counter {
                last_bucket,
                counter,
            } => {
                if *counter >= FIRST_SEQUENCE && bucket <= *last_bucket {
                    *counter += 1;
                } else {
                    *last_bucket = bucket;
                    *counter = FIRST_SEQUENCE;
                }
                (*last_bucket, *counter)
            }
            Self::BucketMap(map) => {
                let bucket = match map.first_key_value() {
                    Some((&oldest, _)) if bucket < oldest => oldest,
                    _ => bucket,
                };
                let floor = bucket.saturating_sub(BUCKET_RETENTION);
                map.retain(|b, _| *b >= floor);
                let counter = map.entry(bucket).or_insert(FIRST_SEQUENCE - 1);
                *counter += 1;
                (bucket, *counter)
            }
        }
    }

    /// Encodes the record in its on-disk form.
    pub fn encode(&self) -> String {
        match self {
            Self::Counter {
                last_bucket,
                counter,
            } => format!("{last_bucket},{counter}\n"),
            Self::BucketMap(map) => {
                // Keys are integers; serialization cannot fail.
                serde_json::to_string(map).unwrap_or_else(|_| String::from("{}"))
            }
        }
    }
}
