use crate::{
    IdGenStatus, IdGenerator, RandSource, Result, SystemClock, ThreadRandom, TimeSource, Ulid,
    mutex::Mutex,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A monotonic ULID generator.
///
/// Keeps the last identifier it produced. When the clock has not moved past
/// that identifier's millisecond, the next identifier reuses the millisecond
/// and increments the random part by one. If the random part is already all
/// ones, the timestamp is advanced by one millisecond and a fresh random part
/// is drawn instead.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Strictly increasing within one generator
/// - ✅ Never waits for the clock
///
/// # Example
///
/// ```
/// use tempoid::{IdGenerator, Ulid, UlidGenerator};
///
/// let generator = UlidGenerator::new();
/// let a = generator.next_id().unwrap();
/// let b = generator.next_id().unwrap();
/// assert!(b > a);
/// assert!(Ulid::is_valid(&b.to_string()));
/// ```
#[derive(Debug)]
pub struct UlidGenerator<T = SystemClock, R = ThreadRandom> {
    last: Mutex<Option<Ulid>>,
    time: T,
    rng: R,
}

impl Default for UlidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UlidGenerator {
    pub fn new() -> Self {
        Self::from_components(SystemClock, ThreadRandom)
    }
}

impl<T, R> UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    pub fn from_components(time: T, rng: R) -> Self {
        Self {
            last: Mutex::new(None),
            time,
            rng,
        }
    }

    fn next_after(&self, last: Option<Ulid>) -> Ulid {
        let now = self.time.current_millis();
        match last {
            Some(prev) if now <= prev.timestamp() => {
                if prev.has_random_room() {
                    prev.increment_random()
                } else {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(timestamp = prev.timestamp(), "random part exhausted; advancing the timestamp");
                    Ulid::from(prev.timestamp() + 1, self.rng.rand())
                }
            }
            _ => Ulid::from(now, self.rng.rand()),
        }
    }
}

impl<T, R> IdGenerator for UlidGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u128>,
{
    type Id = Ulid;

    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn try_next_id(&self) -> Result<IdGenStatus<Ulid>> {
        let mut last = {
            #[cfg(feature = "parking-lot")]
            {
                self.last.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.last.lock()?
            }
        };
        let id = self.next_after(*last);
        *last = Some(id);
        Ok(IdGenStatus::Ready { id })
    }
}
