use std::{io, path::PathBuf};

/// A result type defaulting to the crate-wide [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `tempoid` can emit.
///
/// Lock *contention* on a sequence state file is never reported here: it is
/// resolved by retrying, by stale-lock recovery, or by the degraded
/// pseudo-sequence (see [`IdGenStatus::Degraded`]). Only a state file that
/// cannot be used at all surfaces as [`Error::Lock`].
///
/// [`IdGenStatus::Degraded`]: crate::IdGenStatus::Degraded
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A caller-supplied argument is outside of its allowed range.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// The offending argument.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: String,
    },

    /// The configured epoch or the system clock cannot be represented.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// The sequence state file could not be opened, read or written.
    #[error("sequence state {path:?} is unusable: {source}")]
    Lock {
        /// Location of the state file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// An identifier string was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The in-process generator state was poisoned by a panicking thread.
    ///
    /// Only produced with the std mutex; `parking_lot` mutexes do not poison.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator state lock poisoned")]
    LockPoisoned,
}

impl Error {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while configuring an epoch or reading the clock.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ClockError {
    /// The epoch lies after the current time.
    #[error("the start time {epoch_ms} ms cannot be in the future (now {now_ms} ms)")]
    EpochInFuture {
        /// Requested epoch, in Unix milliseconds.
        epoch_ms: u64,
        /// Current time, in Unix milliseconds.
        now_ms: u64,
    },

    /// The time elapsed since the epoch no longer fits the timestamp field.
    #[error("elapsed time {elapsed} exceeds the {bits}-bit timestamp field; reset the start time")]
    EpochOutOfRange {
        /// Elapsed time in the family's timestamp unit.
        elapsed: u64,
        /// Width of the timestamp field.
        bits: u32,
    },

    /// The epoch string could not be understood.
    #[error("unrecognised start time {0:?}")]
    InvalidEpoch(String),
}

/// Errors raised while decoding an identifier string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The input does not match the family's structural pattern.
    #[error("invalid {family} string: {input:?}")]
    InvalidFormat {
        /// Identifier family, e.g. `"ULID"`.
        family: &'static str,
        /// The rejected input.
        input: String,
    },

    /// The UUID version carries no timestamp.
    #[error("unsupported UUID version {0} (applicable: 1, 6, 7, 8)")]
    UnsupportedVersion(u8),

    /// The decoded timestamp is implausibly far in the future.
    #[error("invalid {family} string: timestamp too large")]
    TimestampOutOfRange {
        /// Identifier family, e.g. `"ULID"`.
        family: &'static str,
    },
}

impl ParseError {
    pub(crate) fn format(family: &'static str, input: &str) -> Self {
        Self::InvalidFormat {
            family,
            input: input.to_owned(),
        }
    }
}

#[cfg(not(feature = "parking-lot"))]
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::LockPoisoned
    }
}
