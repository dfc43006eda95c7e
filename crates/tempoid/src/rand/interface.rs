/// Supplies the random bits of ULIDs, UUIDs and random TBSL tails.
///
/// Generators are generic over it so tests can pin the random part. Each
/// generator asks for the widest integer it needs and keeps the low bits.
///
/// ```
/// use tempoid::{RandSource, Ulid, UlidGenerator, IdGenerator, SystemClock};
///
/// struct Zeros;
/// impl RandSource<u128> for Zeros {
///     fn rand(&self) -> u128 {
///         0
///     }
/// }
///
/// let generator = UlidGenerator::from_components(SystemClock, Zeros);
/// let id: Ulid = generator.next_id().unwrap();
/// assert_eq!(id.random(), 0);
/// ```
pub trait RandSource<T> {
    fn rand(&self) -> T;
}

impl<T, R: RandSource<T> + ?Sized> RandSource<T> for &R {
    fn rand(&self) -> T {
        (**self).rand()
    }
}
