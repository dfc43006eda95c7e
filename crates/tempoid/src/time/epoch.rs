use crate::{ClockError, TimeSource};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use core::{str::FromStr, time::Duration};

/// Default epoch of the Snowflake and Sonyflake families: Wednesday,
/// January 1, 2020 00:00:00 UTC.
pub const DEFAULT_EPOCH: Epoch = Epoch::from_millis(1_577_836_800_000);

/// A reference instant subtracted from wall-clock time before encoding.
///
/// Moving the zero point closer to the present extends how long a fixed-width
/// timestamp field lasts (~69 years for 41 bits of milliseconds, ~174 years for
/// 39 bits of 10 ms units).
///
/// # Example
///
/// ```
/// use tempoid::{DEFAULT_EPOCH, Epoch};
///
/// let epoch: Epoch = "2020-01-01 00:00:00".parse().unwrap();
/// assert_eq!(epoch, DEFAULT_EPOCH);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch {
    millis: u64,
}

impl Default for Epoch {
    fn default() -> Self {
        DEFAULT_EPOCH
    }
}

impl Epoch {
    /// Creates an epoch from Unix milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    /// Returns the epoch in Unix milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.millis
    }

    /// Returns the epoch as a duration since the Unix epoch.
    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Parses a start time such as `"2020-01-01 00:00:00"`.
    ///
    /// Accepted forms are RFC 3339 (`2020-01-01T00:00:00Z`), a naive date-time
    /// separated by a space or `T` (optionally with fractional seconds), and a
    /// bare date. Naive values are interpreted as UTC.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidEpoch`] when the string matches none of the
    /// forms or names an instant before 1970.
    pub fn parse(input: &str) -> Result<Self, ClockError> {
        let trimmed = input.trim();
        let invalid = || ClockError::InvalidEpoch(input.to_owned());

        let millis = if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            dt.timestamp_millis()
        } else if let Some(naive) = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        {
            naive.and_utc().timestamp_millis()
        } else {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map_err(|_| invalid())?
                .and_hms_opt(0, 0, 0)
                .ok_or_else(invalid)?
                .and_utc()
                .timestamp_millis()
        };

        u64::try_from(millis)
            .map(Self::from_millis)
            .map_err(|_| invalid())
    }

    /// Returns the time elapsed since this epoch in units of `unit_millis`,
    /// checking that it fits a timestamp field of `bits` bits.
    ///
    /// # Errors
    ///
    /// - [`ClockError::EpochInFuture`] if `now` is before the epoch
    /// - [`ClockError::EpochOutOfRange`] if the elapsed units exceed
    ///   `2^bits - 1`
    pub fn elapsed_units(
        &self,
        now_millis: u64,
        unit_millis: u64,
        bits: u32,
    ) -> Result<u64, ClockError> {
        let elapsed = now_millis
            .checked_sub(self.millis)
            .ok_or(ClockError::EpochInFuture {
                epoch_ms: self.millis,
                now_ms: now_millis,
            })?
            / unit_millis;
        if elapsed > (1_u64 << bits) - 1 {
            return Err(ClockError::EpochOutOfRange { elapsed, bits });
        }
        Ok(elapsed)
    }

    /// Validates that this epoch can be used right now by a family whose
    /// timestamp field is `bits` wide and counts `unit_millis` milliseconds.
    ///
    /// # Errors
    ///
    /// See [`Epoch::elapsed_units`].
    pub fn validate(
        &self,
        time: &impl TimeSource,
        unit_millis: u64,
        bits: u32,
    ) -> Result<(), ClockError> {
        self.elapsed_units(time.current_millis(), unit_millis, bits)
            .map(|_| ())
    }
}

impl FromStr for Epoch {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
