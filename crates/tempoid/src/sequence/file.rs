use crate::{
    Allocation, Error, LockPolicy, Result, SequenceRecord, SequenceStore, ShardKey,
    StaleLockAction, StoreConfig,
};
use fs2::FileExt;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    thread,
    time::Instant,
};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// A [`SequenceStore`] backed by one advisory-locked file per shard.
///
/// Every [`advance`] opens (creating if absent) the shard's state file, takes
/// an exclusive lock according to its [`LockPolicy`], reads the record,
/// writes the updated record back, and closes the file, which releases the
/// lock. Because the lock is tied to the open file, threads of one process and
/// separate processes contend on it the same way.
///
/// ## Features
/// - ✅ Cross-process on a single host
/// - ✅ Bounded waiting (retry budget, timeout, stale-lock recovery)
/// - ⚠️ Under lock starvation, may return [`SequenceStatus::Degraded`]
///
/// [`SequenceStatus::Degraded`]: crate::SequenceStatus::Degraded
///
/// [`advance`]: SequenceStore::advance
#[derive(Clone, Debug)]
pub struct FileSequenceStore {
    dir: PathBuf,
    policy: LockPolicy,
}

impl Default for FileSequenceStore {
    fn default() -> Self {
        Self::from_config(StoreConfig::default())
    }
}

enum Acquired {
    Locked(File),
    Unobtainable,
}

impl FileSequenceStore {
    /// Creates a store keeping its state files in `dir` with the default
    /// [`LockPolicy`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: LockPolicy::default(),
        }
    }

    pub fn from_config(config: StoreConfig) -> Self {
        Self {
            dir: config.dir,
            policy: config.lock,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: LockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub const fn policy(&self) -> &LockPolicy {
        &self.policy
    }

    /// Location of the state file for `key`.
    pub fn path_for(&self, key: &ShardKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    fn open(path: &Path) -> Result<File> {
        let lock_err = |source| Error::Lock {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(lock_err)?;
        }
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(lock_err)
    }

    fn acquire(&self, file: File, path: &Path) -> Result<Acquired> {
        let contended = fs2::lock_contended_error().raw_os_error();
        let started = Instant::now();
        let mut attempts = 0_u32;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Acquired::Locked(file)),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock || e.raw_os_error() == contended => {}
                Err(source) => {
                    return Err(Error::Lock {
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
            attempts += 1;

            if started.elapsed() >= self.policy.timeout {
                return match self.policy.on_timeout {
                    StaleLockAction::ForceAcquire => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(?path, attempts, "lock timed out; forcing stale lock recovery");
                        drop(file);
                        let file = Self::open(path)?;
                        file.lock_exclusive().map_err(|source| Error::Lock {
                            path: path.to_path_buf(),
                            source,
                        })?;
                        Ok(Acquired::Locked(file))
                    }
                    StaleLockAction::Degrade => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(?path, attempts, "lock timed out; degrading to pseudo-sequence");
                        Ok(Acquired::Unobtainable)
                    }
                };
            }
            if attempts >= self.policy.max_attempts {
                #[cfg(feature = "tracing")]
                tracing::warn!(?path, attempts, "lock attempts exhausted; degrading to pseudo-sequence");
                return Ok(Acquired::Unobtainable);
            }
            thread::sleep(self.policy.retry_interval);
        }
    }

    fn update(mut file: File, key: &ShardKey, bucket: u64, path: &Path) -> Result<(u64, u64)> {
        let lock_err = |source| Error::Lock {
            path: path.to_path_buf(),
            source,
        };
        let mut raw = Vec::new();
        file.read_to_end(&mut raw).map_err(lock_err)?;
        let format = key.family().state_format();
        let mut record = SequenceRecord::decode(format, &String::from_utf8_lossy(&raw));
        let allocated = record.advance(bucket);

        // Truncate only after the new record is in place.
        let encoded = record.encode();
        file.seek(SeekFrom::Start(0)).map_err(lock_err)?;
        file.write_all(encoded.as_bytes()).map_err(lock_err)?;
        file.set_len(encoded.len() as u64).map_err(lock_err)?;
        file.flush().map_err(lock_err)?;
        FileExt::unlock(&file).map_err(lock_err)?;
        Ok(allocated)
    }
}

/// Pseudo-sequence used when the lock cannot be obtained: the process id,
/// masked to the family's sequence width and never below the first sequence.
pub(crate) fn pseudo_sequence(key: &ShardKey) -> u64 {
    let family = key.family();
    (u64::from(std::process::id()) & family.max_sequence()).max(crate::FIRST_SEQUENCE)
}

impl SequenceStore for FileSequenceStore {
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    fn advance(&self, key: &ShardKey, bucket: u64) -> Result<Allocation> {
        let path = self.path_for(key);
        let file = Self::open(&path)?;
        match self.acquire(file, &path)? {
            Acquired::Locked(file) => Self::update(file, key, bucket, &path)
                .map(|(bucket, sequence)| Allocation::exact(bucket, sequence)),
            Acquired::Unobtainable => Ok(Allocation::degraded(bucket, pseudo_sequence(key))),
        }
    }
}
