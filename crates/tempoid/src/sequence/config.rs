use core::time::Duration;
use std::path::PathBuf;

/// What [`FileSequenceStore`] does once [`LockPolicy::timeout`] elapses
/// without acquiring the state file lock.
///
/// [`FileSequenceStore`]: crate::FileSequenceStore
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StaleLockAction {
    /// Treat the lock as abandoned by a dead process: reopen the file once and
    /// wait on a blocking exclusive lock.
    ///
    /// A holder that is in fact still alive keeps its lock; the reopened
    /// handle then simply waits for it.
    #[default]
    ForceAcquire,
    /// Give up and hand out the pseudo-sequence fallback.
    Degrade,
}

/// Retry and recovery policy for acquiring a state file lock.
///
/// Acquisition is attempted non-blocking up to `max_attempts` times, sleeping
/// `retry_interval` in between. If `timeout` elapses first, `on_timeout`
/// decides between stale-lock recovery and the degraded fallback; if the
/// attempts run out first, the degraded fallback is used.
///
/// The defaults (1 ms interval, 5000 attempts, 2 s timeout) make the timeout
/// fire before the attempt budget, so contention resolves through stale-lock
/// recovery rather than through degraded identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LockPolicy {
    /// Sleep between two non-blocking attempts.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "retry_interval_ms", with = "crate::serialize::duration_millis")
    )]
    pub retry_interval: Duration,
    /// Upper bound on non-blocking attempts.
    pub max_attempts: u32,
    /// Wall-clock bound on the non-blocking phase.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "timeout_ms", with = "crate::serialize::duration_millis")
    )]
    pub timeout: Duration,
    /// Behaviour once `timeout` elapses.
    pub on_timeout: StaleLockAction,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            retry_interval: Duration::from_millis(1),
            max_attempts: 5_000,
            timeout: Duration::from_secs(2),
            on_timeout: StaleLockAction::ForceAcquire,
        }
    }
}

impl LockPolicy {
    #[must_use]
    pub const fn with_retry_interval(mut self, retry_interval: Duration) -> Self {
        self.retry_interval = retry_interval;
        self
    }

    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_on_timeout(mut self, on_timeout: StaleLockAction) -> Self {
        self.on_timeout = on_timeout;
        self
    }
}

/// Configuration of a [`FileSequenceStore`].
///
/// ```
/// use tempoid::{FileSequenceStore, StoreConfig};
///
/// let config = StoreConfig {
///     dir: std::env::temp_dir().join("my-service"),
///     ..StoreConfig::default()
/// };
/// let store = FileSequenceStore::from_config(config);
/// assert!(store.dir().ends_with("my-service"));
/// ```
///
/// [`FileSequenceStore`]: crate::FileSequenceStore
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StoreConfig {
    /// Directory holding the state files. Defaults to the system temporary
    /// directory so that unrelated processes on one host share it.
    pub dir: PathBuf,
    /// Lock acquisition policy.
    pub lock: LockPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            lock: LockPolicy::default(),
        }
    }
}
