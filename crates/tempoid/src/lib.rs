//! Time-ordered identifiers that stay unique across threads and processes.
//!
//! `tempoid` generates Snowflake, Sonyflake, TBSL, ULID and time-based UUID
//! (v1, v6, v7, v8) identifiers. Families that carry a sequence field
//! (Snowflake, Sonyflake, TBSL) coordinate that field through a
//! [`SequenceStore`], by default a [`FileSequenceStore`] that keeps one small
//! lock-protected state file per shard in the system temporary directory, so
//! independent processes on one host never hand out the same sequence for the
//! same tick.
//!
//! ```
//! use tempoid::{IdGenerator, SnowflakeGenerator, SnowflakeId};
//!
//! let generator = SnowflakeGenerator::new(1, 7).unwrap();
//! let id: SnowflakeId = generator.next_id().unwrap();
//! assert_eq!(id.datacenter_id(), 1);
//! assert_eq!(id.worker_id(), 7);
//! assert!(SnowflakeId::is_valid(&id.to_string()));
//! ```
mod base32;
mod error;
mod generator;
mod id;
mod mutex;
mod rand;
mod sequence;
#[cfg(feature = "serde")]
mod serialize;
mod status;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::rand::*;
pub use crate::sequence::*;
pub use crate::status::*;
pub use crate::time::*;
