//! The mutex guarding in-process generator state: `parking_lot` with the
//! `parking-lot` feature, `std` otherwise (whose poisoning surfaces as
//! [`crate::Error::LockPoisoned`]).
#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::Mutex;
#[cfg(not(feature = "parking-lot"))]
pub(crate) use std::sync::Mutex;
