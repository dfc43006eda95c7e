use crate::{IdGenStatus, Result};

/// A minimal interface shared by every identifier generator.
///
/// Generators take `&self`: their mutable state sits behind a mutex or in the
/// [`SequenceStore`], so a single generator can be shared between threads.
///
/// [`SequenceStore`]: crate::SequenceStore
pub trait IdGenerator {
    /// The identifier type produced.
    type Id;

    /// Generates the next identifier, reporting whether it carries the
    /// family's full uniqueness guarantee.
    ///
    /// # Errors
    ///
    /// Fails when the clock is outside the configured epoch's range, when the
    /// sequence state file is unusable, or when a std mutex was poisoned.
    fn try_next_id(&self) -> Result<IdGenStatus<Self::Id>>;

    /// Generates the next identifier, accepting degraded uniqueness.
    ///
    /// # Errors
    ///
    /// See [`IdGenerator::try_next_id`].
    fn next_id(&self) -> Result<Self::Id> {
        self.try_next_id().map(IdGenStatus::into_id)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    type Id = G::Id;

    fn try_next_id(&self) -> Result<IdGenStatus<Self::Id>> {
        (**self).try_next_id()
    }
}
