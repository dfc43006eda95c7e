use crate::RandSource;
use rand::{Rng, rng};

/// Draws from `rand`'s thread-local generator on every call.
///
/// Holds no state of its own, so one value can sit inside a generator shared
/// by many threads; each thread ends up reading its own RNG.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}

impl RandSource<u128> for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}
