use crate::SequenceStatus;

/// Represents the result of generating a new identifier.
///
/// - [`IdGenStatus::Ready`] indicates the identifier was produced under the
///   full uniqueness guarantee of its family.
/// - [`IdGenStatus::Degraded`] means the sequence coordinator could not obtain
///   its lock in time and fell back to a pseudo-sequence derived from the
///   process id. The identifier is well formed but may collide with one issued
///   by another process in the same tick.
///
/// Generators that never consult a coordinator (ULID, UUID) only return
/// [`IdGenStatus::Ready`].
///
/// # Example
///
/// ```
/// use tempoid::{IdGenStatus, IdGenerator, SonyflakeGenerator};
///
/// let generator = SonyflakeGenerator::new(42).unwrap();
/// match generator.try_next_id().unwrap() {
///     IdGenStatus::Ready { id } => println!("ID: {id}"),
///     IdGenStatus::Degraded { id } => eprintln!("ID {id} may not be unique"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<T> {
    /// A unique identifier was generated and is ready to use.
    Ready {
        /// The generated identifier.
        id: T,
    },
    /// An identifier was generated from the lock-unobtainable fallback.
    Degraded {
        /// The generated identifier.
        id: T,
    },
}

impl<T> IdGenStatus<T> {
    /// Returns the identifier regardless of the uniqueness level.
    pub fn into_id(self) -> T {
        match self {
            Self::Ready { id } | Self::Degraded { id } => id,
        }
    }

    /// Returns `true` when the identifier came from the pseudo-sequence
    /// fallback.
    pub const fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Wraps `id` with the uniqueness level of the sequence it was built
    /// from.
    pub(crate) fn from_sequence(status: SequenceStatus, id: T) -> Self {
        match status {
            SequenceStatus::Exact(_) => Self::Ready { id },
            SequenceStatus::Degraded(_) => Self::Degraded { id },
        }
    }
}
