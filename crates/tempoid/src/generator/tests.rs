use crate::{
    Allocation, ClockError, DEFAULT_EPOCH, Epoch, Error, Family, FileSequenceStore, IdGenStatus,
    IdGenerator, LockPolicy, MemorySequenceStore, RandSource, SequenceStore, ShardKey,
    SnowflakeGenerator, SnowflakeId, SonyflakeGenerator, SonyflakeId, SystemClock, TailMode,
    TbslGenerator, TbslId, TimeSource, Ulid, UlidGenerator, Uuid, UuidGenerator, UuidVersion,
    ThreadRandom,
};
use core::{cell::Cell, time::Duration};
use fs2::FileExt;
use std::{collections::HashSet, fs::OpenOptions, sync::Mutex, thread::scope};

// 2025-01-01T00:00:00Z
const NOW_MS: u64 = 1_735_689_600_000;

struct MockTime {
    now: Cell<Duration>,
}

impl MockTime {
    fn at_millis(millis: u64) -> Self {
        Self {
            now: Cell::new(Duration::from_millis(millis)),
        }
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl TimeSource for MockTime {
    fn current_time(&self) -> Duration {
        self.now.get()
    }
}

struct MockRand {
    rand: u128,
}

impl RandSource<u128> for MockRand {
    fn rand(&self) -> u128 {
        self.rand
    }
}

impl RandSource<u64> for MockRand {
    fn rand(&self) -> u64 {
        self.rand as u64
    }
}

trait IdGenStatusExt<T> {
    fn unwrap_ready(self) -> T;
}

impl<T: core::fmt::Debug> IdGenStatusExt<T> for IdGenStatus<T> {
    fn unwrap_ready(self) -> T {
        match self {
            Self::Ready { id } => id,
            Self::Degraded { id } => panic!("unexpected degraded id ({id:?})"),
        }
    }
}

/// A store whose lock is never obtainable.
struct StarvedStore;

impl SequenceStore for StarvedStore {
    fn advance(&self, key: &ShardKey, bucket: u64) -> crate::Result<Allocation> {
        Ok(Allocation::degraded(
            bucket,
            (u64::from(std::process::id()) & key.family().max_sequence()).max(1),
        ))
    }
}

/// Reports an exhausted sequence for the first request, then counts normally.
#[derive(Default)]
struct ExhaustedOnceStore {
    exhausted: Cell<bool>,
    inner: MemorySequenceStore,
}

impl SequenceStore for ExhaustedOnceStore {
    fn advance(&self, key: &ShardKey, bucket: u64) -> crate::Result<Allocation> {
        if !self.exhausted.replace(true) {
            return Ok(Allocation::exact(bucket, key.family().max_sequence() + 1));
        }
        self.inner.advance(key, bucket)
    }
}

#[test]
fn snowflake_sequence_increments_within_same_millisecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator =
        SnowflakeGenerator::with_store_and_time(1, 2, MemorySequenceStore::new(), &clock).unwrap();

    let id1 = generator.try_next_id().unwrap().unwrap_ready();
    let id2 = generator.try_next_id().unwrap().unwrap_ready();
    let id3 = generator.try_next_id().unwrap().unwrap_ready();

    let expected_ts = NOW_MS - DEFAULT_EPOCH.as_millis();
    for id in [id1, id2, id3] {
        assert_eq!(id.timestamp(), expected_ts);
        assert_eq!((id.datacenter_id(), id.worker_id()), (1, 2));
    }
    assert_eq!([id1.sequence(), id2.sequence(), id3.sequence()], [1, 2, 3]);
    assert!(id1 < id2 && id2 < id3);

    clock.advance(Duration::from_millis(1));
    let id4 = generator.next_id().unwrap();
    assert_eq!(id4.timestamp(), expected_ts + 1);
    assert_eq!(id4.sequence(), 1);
}

#[test]
fn snowflake_burst_past_max_sequence_rolls_into_next_millisecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator =
        SnowflakeGenerator::with_store_and_time(0, 0, MemorySequenceStore::new(), &clock).unwrap();
    let burst = SnowflakeId::SEQUENCE_MASK + 5;

    let mut seen = HashSet::new();
    let mut last_ts = 0;
    for _ in 0..burst {
        let id = generator.next_id().unwrap();
        assert!(seen.insert(id), "duplicate {id:?}");
        assert!(id.timestamp() >= last_ts);
        assert!(id.sequence() >= 1);
        last_ts = id.timestamp();
    }
    assert_eq!(seen.len() as u64, burst);
    assert_eq!(last_ts, NOW_MS - DEFAULT_EPOCH.as_millis() + 1);
}

#[test]
fn snowflake_max_sequence_is_configurable() {
    let clock = MockTime::at_millis(NOW_MS);
    let mut generator =
        SnowflakeGenerator::with_store_and_time(0, 0, MemorySequenceStore::new(), &clock).unwrap();
    generator.set_max_sequence(2).unwrap();

    let ids: Vec<_> = (0..5).map(|_| generator.next_id().unwrap()).collect();
    let seqs: Vec<_> = ids.iter().map(SnowflakeId::sequence).collect();
    assert_eq!(seqs, [1, 2, 1, 2, 1]);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));

    assert!(matches!(
        generator.set_max_sequence(0),
        Err(Error::InvalidInput { field: "max_sequence", .. })
    ));
    assert!(generator.set_max_sequence(4096).is_err());
}

#[test]
fn snowflake_rejects_out_of_range_ids() {
    assert!(matches!(
        SnowflakeGenerator::with_store_and_time(32, 0, MemorySequenceStore::new(), SystemClock),
        Err(Error::InvalidInput { field: "datacenter_id", .. })
    ));
    assert!(matches!(
        SnowflakeGenerator::with_store_and_time(0, 32, MemorySequenceStore::new(), SystemClock),
        Err(Error::InvalidInput { field: "worker_id", .. })
    ));
}

#[test]
fn snowflake_start_timestamp_validation() {
    let clock = MockTime::at_millis(NOW_MS);
    let mut generator =
        SnowflakeGenerator::with_store_and_time(0, 0, MemorySequenceStore::new(), &clock).unwrap();

    assert!(matches!(
        generator.set_start_timestamp("2030-01-01 00:00:00"),
        Err(Error::Clock(ClockError::EpochInFuture { .. }))
    ));
    assert!(matches!(
        generator.set_start_timestamp("1950-01-01"),
        Err(Error::Clock(ClockError::InvalidEpoch(_)))
    ));
    assert!(matches!(
        generator.set_start_timestamp("soon"),
        Err(Error::Clock(ClockError::InvalidEpoch(_)))
    ));
    assert_eq!(generator.epoch(), DEFAULT_EPOCH);

    let far_future = MockTime::at_millis(1 << 41);
    let mut late =
        SnowflakeGenerator::with_store_and_time(0, 0, MemorySequenceStore::new(), &far_future)
            .unwrap();
    assert!(matches!(
        late.set_start_timestamp("1970-01-01 00:00:00"),
        Err(Error::Clock(ClockError::EpochOutOfRange { bits: 41, .. }))
    ));

    generator.set_start_timestamp("2024-12-31 23:59:59").unwrap();
    let id = generator.next_id().unwrap();
    assert_eq!(id.timestamp(), 1_000);
    let info = generator.parse(&id.to_string()).into_info().unwrap();
    assert_eq!(info.time.timestamp_millis() as u64, NOW_MS);
}

#[test]
fn snowflake_default_epoch_decodes_to_now() {
    let generator =
        SnowflakeGenerator::with_store_and_time(3, 4, MemorySequenceStore::new(), SystemClock)
            .unwrap();
    let id = generator.next_id().unwrap();
    let info = SnowflakeId::parse(&id.to_string(), Epoch::parse("2020-01-01 00:00:00").unwrap())
        .into_info()
        .unwrap();
    let drift = info.time.timestamp_millis() - SystemClock.current_millis() as i64;
    assert!(drift.abs() < 1_000, "drift {drift} ms");
}

#[test]
fn snowflake_successive_ids_increase() {
    let dir = tempfile::tempdir().unwrap();
    let generator = SnowflakeGenerator::with_store_and_time(
        5,
        6,
        FileSequenceStore::new(dir.path()),
        SystemClock,
    )
    .unwrap();
    let id1 = generator.next_id().unwrap();
    let id2 = generator.next_id().unwrap();
    assert!(id2 > id1);
    assert!(id2.to_raw() > id1.to_raw());
}

#[test]
fn snowflake_reports_degraded_sequences() {
    let generator =
        SnowflakeGenerator::with_store_and_time(0, 0, StarvedStore, SystemClock).unwrap();
    let status = generator.try_next_id().unwrap();
    assert!(status.is_degraded());
    let expected = (u64::from(std::process::id()) & SnowflakeId::SEQUENCE_MASK).max(1);
    assert_eq!(status.into_id().sequence(), expected);
}

#[test]
fn snowflake_degraded_sequence_respects_max_sequence() {
    let mut generator =
        SnowflakeGenerator::with_store_and_time(0, 0, StarvedStore, SystemClock).unwrap();
    generator.set_max_sequence(2).unwrap();
    let pseudo = (u64::from(std::process::id()) & SnowflakeId::SEQUENCE_MASK).max(1);

    let status = generator.try_next_id().unwrap();
    assert!(status.is_degraded());
    let sequence = status.into_id().sequence();
    assert!((1..=2).contains(&sequence), "sequence {sequence}");
    assert_eq!(sequence, (pseudo - 1) % 2 + 1);
}

#[test]
fn snowflake_exhausted_sequence_moves_to_next_millisecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator =
        SnowflakeGenerator::with_store_and_time(0, 0, ExhaustedOnceStore::default(), &clock)
            .unwrap();

    let id = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(id.timestamp(), NOW_MS - DEFAULT_EPOCH.as_millis() + 1);
    assert_eq!(id.sequence(), 1);
}

#[test]
fn snowflake_file_store_degrades_when_lock_is_held() {
    let dir = tempfile::tempdir().unwrap();
    let clock = MockTime::at_millis(NOW_MS);
    let store = FileSequenceStore::new(dir.path())
        .with_policy(LockPolicy::default().with_max_attempts(2));
    let key = ShardKey::new(Family::Snowflake, "1-1").with_partition("20250101");
    let holder = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(store.path_for(&key))
        .unwrap();
    holder.lock_exclusive().unwrap();

    let generator = SnowflakeGenerator::with_store_and_time(1, 1, store, &clock).unwrap();
    assert!(generator.try_next_id().unwrap().is_degraded());

    FileExt::unlock(&holder).unwrap();
    assert!(!generator.try_next_id().unwrap().is_degraded());
}

#[test]
fn snowflake_generators_in_parallel_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let threads = num_cpus::get().clamp(2, 4);
    let per_thread = 2_000;
    let seen = Mutex::new(HashSet::new());

    scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                let generator = SnowflakeGenerator::with_store_and_time(
                    9,
                    9,
                    FileSequenceStore::new(dir.path()),
                    SystemClock,
                )
                .unwrap();
                let ids: Vec<_> = (0..per_thread)
                    .map(|_| generator.try_next_id().unwrap().unwrap_ready())
                    .collect();
                let mut seen = seen.lock().unwrap();
                for id in ids {
                    assert!(seen.insert(id), "duplicate {id:?}");
                }
            });
        }
    });

    assert_eq!(seen.into_inner().unwrap().len(), threads * per_thread);
}

#[test]
fn sonyflake_uses_ten_millisecond_ticks() {
    let clock = MockTime::at_millis(NOW_MS + 7);
    let generator =
        SonyflakeGenerator::with_store_and_time(300, MemorySequenceStore::new(), &clock).unwrap();

    let id1 = generator.next_id().unwrap();
    clock.advance(Duration::from_millis(2));
    let id2 = generator.next_id().unwrap();
    assert_eq!(id1.timestamp(), (NOW_MS - DEFAULT_EPOCH.as_millis()) / 10);
    assert_eq!(id2.timestamp(), id1.timestamp());
    assert_eq!((id1.sequence(), id2.sequence()), (1, 2));
    assert_eq!(id1.machine_id(), 300);

    clock.advance(Duration::from_millis(1));
    let id3 = generator.next_id().unwrap();
    assert_eq!(id3.timestamp(), id1.timestamp() + 1);
    assert_eq!(id3.sequence(), 1);

    let info = generator.parse(&id3.to_string()).into_info().unwrap();
    assert_eq!(info.time.timestamp_millis() as u64, NOW_MS + 10);
}

#[test]
fn sonyflake_burst_past_max_sequence_rolls_into_next_tick() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator =
        SonyflakeGenerator::with_store_and_time(1, MemorySequenceStore::new(), &clock).unwrap();
    let burst = SonyflakeId::SEQUENCE_MASK + 5;

    let mut previous: Option<SonyflakeId> = None;
    let mut seen = HashSet::new();
    for _ in 0..burst {
        let id = generator.next_id().unwrap();
        assert!(seen.insert(id));
        if let Some(prev) = previous {
            assert!(id.timestamp() >= prev.timestamp());
        }
        previous = Some(id);
    }
    let last = previous.unwrap();
    assert_eq!(last.timestamp(), (NOW_MS - DEFAULT_EPOCH.as_millis()) / 10 + 1);
    assert_eq!(last.sequence(), 5);
}

#[test]
fn sonyflake_validates_machine_and_epoch() {
    assert!(matches!(
        SonyflakeGenerator::with_store_and_time(65_536, MemorySequenceStore::new(), SystemClock),
        Err(Error::InvalidInput { field: "machine_id", .. })
    ));
    let clock = MockTime::at_millis(NOW_MS);
    let mut generator =
        SonyflakeGenerator::with_store_and_time(0, MemorySequenceStore::new(), &clock).unwrap();
    assert!(generator.set_start_timestamp("2026-01-01").is_err());
    generator.set_start_timestamp("1970-01-01").unwrap();
    assert_eq!(generator.epoch(), Epoch::from_millis(0));
    assert_eq!(generator.next_id().unwrap().timestamp(), NOW_MS / 10);
}

#[test]
fn tbsl_sequenced_tail_counts_per_microsecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = TbslGenerator::from_components(
        42,
        MemorySequenceStore::new(),
        &clock,
        MockRand { rand: 0 },
    )
    .unwrap();

    let a = generator.next_id().unwrap();
    let b = generator.next_id().unwrap();
    // The in-process guard moves the second id to the next microsecond.
    assert_eq!(a.micros(), NOW_MS * 1_000);
    assert_eq!(b.micros(), NOW_MS * 1_000 + 1);
    assert_eq!((a.tail(), b.tail()), (1, 1));
    assert_eq!(a.machine_id(), 42);
    assert!(a.to_string() < b.to_string());

    let info = TbslId::parse(&b.to_string()).into_info().unwrap();
    assert_eq!(info.time.timestamp_micros() as u64, NOW_MS * 1_000 + 1);
    assert_eq!(info.machine_id, 42);
}

#[test]
fn tbsl_generators_sharing_a_machine_id_do_not_collide() {
    let clock = MockTime::at_millis(NOW_MS);
    let store = MemorySequenceStore::new();
    let first = TbslGenerator::from_components(3, &store, &clock, ThreadRandom).unwrap();
    let second = TbslGenerator::from_components(3, &store, &clock, ThreadRandom).unwrap();

    let a = first.next_id().unwrap();
    let b = second.next_id().unwrap();
    assert_eq!(a.micros(), b.micros());
    assert_ne!(a, b);
    assert_eq!((a.tail(), b.tail()), (1, 2));
}

#[test]
fn tbsl_exhausted_tail_moves_to_next_microsecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = TbslGenerator::from_components(
        5,
        ExhaustedOnceStore::default(),
        &clock,
        MockRand { rand: 0 },
    )
    .unwrap();

    let id = generator.try_next_id().unwrap().unwrap_ready();
    assert_eq!(id.micros(), NOW_MS * 1_000 + 1);
    assert_eq!(id.tail(), 1);

    // The in-process guard continues after the advanced microsecond.
    let next = generator.next_id().unwrap();
    assert_eq!(next.micros(), NOW_MS * 1_000 + 2);
    assert_eq!(next.tail(), 1);
}

#[test]
fn tbsl_late_generator_is_served_in_the_newer_microsecond() {
    let ahead = MockTime::at_millis(NOW_MS + 1);
    let behind = MockTime::at_millis(NOW_MS);
    let store = MemorySequenceStore::new();
    let first = TbslGenerator::from_components(8, &store, &ahead, ThreadRandom).unwrap();
    let late = TbslGenerator::from_components(8, &store, &behind, ThreadRandom).unwrap();

    let a = first.next_id().unwrap();
    let b = late.next_id().unwrap();
    assert_eq!(a.micros(), (NOW_MS + 1) * 1_000);
    assert_eq!(b.micros(), a.micros());
    assert_eq!((a.tail(), b.tail()), (1, 2));

    // The late generator's guard now starts after the microsecond it was given.
    let c = late.next_id().unwrap();
    assert_eq!(c.micros(), a.micros() + 1);
}

#[test]
fn tbsl_random_tail_mode() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = TbslGenerator::from_components(
        0,
        StarvedStore,
        &clock,
        MockRand {
            rand: 0xFFF_ABCDE,
        },
    )
    .unwrap()
    .with_tail_mode(TailMode::Random);

    let status = generator.try_next_id().unwrap();
    assert!(!status.is_degraded());
    let id = status.into_id();
    assert_eq!(id.tail(), 0xABCDE);
    assert!(id.to_string().ends_with("ABCDE"));
}

#[test]
fn tbsl_validates_machine_id() {
    assert!(matches!(
        TbslGenerator::from_components(100, MemorySequenceStore::new(), SystemClock, ThreadRandom),
        Err(Error::InvalidInput { field: "machine_id", .. })
    ));
}

#[test]
fn tbsl_default_generator_decodes_to_now() {
    let dir = tempfile::tempdir().unwrap();
    let generator =
        TbslGenerator::from_components(0, FileSequenceStore::new(dir.path()), SystemClock, ThreadRandom)
            .unwrap();
    let id = generator.next_id().unwrap();
    assert!(TbslId::is_valid(&id.to_string()));
    let info = TbslId::parse(&id.to_string()).into_info().unwrap();
    let drift = info.time.timestamp_millis() - SystemClock.current_millis() as i64;
    assert!(drift.abs() < 1_000);
    assert_eq!(info.machine_id, 0);
}

#[test]
fn ulid_increments_random_within_same_millisecond() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = UlidGenerator::from_components(&clock, MockRand { rand: 41 });

    let id1 = generator.next_id().unwrap();
    let id2 = generator.next_id().unwrap();
    assert_eq!(id1.timestamp(), NOW_MS);
    assert_eq!(id2.timestamp(), NOW_MS);
    assert_eq!((id1.random(), id2.random()), (41, 42));
    assert!(id1.to_string() < id2.to_string());

    clock.advance(Duration::from_millis(1));
    let id3 = generator.next_id().unwrap();
    assert_eq!((id3.timestamp(), id3.random()), (NOW_MS + 1, 41));
}

#[test]
fn ulid_full_random_part_advances_timestamp() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = UlidGenerator::from_components(
        &clock,
        MockRand {
            rand: Ulid::RANDOM_MASK,
        },
    );

    let id1 = generator.next_id().unwrap();
    assert!(!id1.has_random_room());
    let id2 = generator.next_id().unwrap();
    assert_eq!(id2.timestamp(), NOW_MS + 1);
    assert!(id2 > id1);
}

#[test]
fn ulid_stays_monotonic_when_clock_goes_backward() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = UlidGenerator::from_components(&clock, MockRand { rand: 7 });
    let id1 = generator.next_id().unwrap();
    clock.now.set(Duration::from_millis(NOW_MS - 500));
    let id2 = generator.next_id().unwrap();
    assert_eq!(id2.timestamp(), NOW_MS);
    assert!(id2 > id1);
}

#[test]
fn ulid_threads_produce_unique_ids() {
    let generator = UlidGenerator::new();
    let seen = Mutex::new(HashSet::new());
    let threads = num_cpus::get().clamp(2, 8);

    scope(|s| {
        for _ in 0..threads {
            s.spawn(|| {
                for _ in 0..1_000 {
                    let id = generator.next_id().unwrap();
                    assert!(seen.lock().unwrap().insert(id));
                }
            });
        }
    });
    assert_eq!(seen.into_inner().unwrap().len(), threads * 1_000);
}

#[test]
fn uuid_time_based_versions_decode_to_generation_time() {
    let clock = MockTime::at_millis(NOW_MS);
    clock.advance(Duration::from_nanos(123_400));
    let generator = UuidGenerator::from_components(&clock, ThreadRandom);

    let v1 = generator.v1(None).unwrap();
    let v6 = generator.v6(None).unwrap();
    let v7 = generator.v7(None).unwrap();
    let v8 = generator.v8(None).unwrap();

    let expected_nanos = NOW_MS as i64 * 1_000_000 + 123_400;
    for uuid in [v1, v6, v8] {
        let t = Uuid::get_time(&uuid.to_string()).unwrap();
        assert_eq!(t.timestamp_nanos_opt().unwrap(), expected_nanos, "{uuid}");
    }
    let t7 = Uuid::get_time(&v7.to_string()).unwrap();
    assert_eq!(t7.timestamp_millis() as u64, NOW_MS);

    let versions: Vec<_> = [v1, v6, v7, v8].iter().map(|u| u.version().unwrap()).collect();
    assert_eq!(
        versions,
        [UuidVersion::V1, UuidVersion::V6, UuidVersion::V7, UuidVersion::V8]
    );
}

#[test]
fn uuid_monotonic_versions_never_repeat_a_timestamp() {
    let clock = MockTime::at_millis(NOW_MS);
    let generator = UuidGenerator::from_components(&clock, ThreadRandom);

    let a = generator.v7(None).unwrap();
    let b = generator.v7(None).unwrap();
    assert!(a.to_string() < b.to_string());
    assert_eq!(b.time().unwrap().timestamp_millis() as u64, NOW_MS + 1);

    let c = generator.v6(None).unwrap();
    let d = generator.v6(None).unwrap();
    assert!(c.to_string() < d.to_string());
    let (tc, td) = (c.time().unwrap(), d.time().unwrap());
    assert_eq!((td - tc).num_nanoseconds(), Some(100));

    let e = generator.v8(None).unwrap();
    let f = generator.v8(None).unwrap();
    let (te, tf) = (e.time().unwrap(), f.time().unwrap());
    assert_eq!((tf - te).num_nanoseconds(), Some(100));
}

#[test]
fn uuid_nodes_are_embedded_and_length_checked() {
    let generator = UuidGenerator::from_components(MockTime::at_millis(NOW_MS), ThreadRandom);

    let v6 = generator.v6(Some(&[0x12, 0x34, 1, 2, 3, 4, 5, 6][..])).unwrap();
    let info = Uuid::parse(&v6.to_string()).into_info().unwrap();
    assert_eq!(info.node.as_deref(), Some("9234010203040506"));

    let v8 = generator.v8(Some(&[1, 2, 3, 4, 5, 6, 7][..])).unwrap();
    assert_eq!(
        Uuid::parse(&v8.to_string()).into_info().unwrap().node.as_deref(),
        Some("01020304050607")
    );

    let v7 = generator.v7(Some(&[0xFF; 10][..])).unwrap();
    assert_eq!(
        Uuid::parse(&v7.to_string()).into_info().unwrap().node.as_deref(),
        Some("7fffbfffffffffffffff")
    );

    for (version, len) in [(1, 5), (6, 7), (7, 11), (8, 6)] {
        let node = vec![0_u8; len];
        let node = Some(node.as_slice());
        let result = match version {
            1 => generator.v1(node),
            6 => generator.v6(node),
            7 => generator.v7(node),
            _ => generator.v8(node),
        };
        assert!(
            matches!(result, Err(Error::InvalidInput { field: "node", .. })),
            "v{version} accepted {len} bytes"
        );
    }
}

#[test]
fn uuid_v4_and_selectable_version() {
    let generator = UuidGenerator::from_components(
        MockTime::at_millis(NOW_MS),
        MockRand { rand: u128::MAX },
    );
    let v4 = generator.v4();
    assert_eq!(v4.to_string(), "ffffffff-ffff-4fff-bfff-ffffffffffff");
    assert_eq!(Uuid::get_time(&v4.to_string()), Err(crate::ParseError::UnsupportedVersion(4)));

    let generator = generator.with_version(UuidVersion::V4).unwrap();
    assert_eq!(generator.next_id().unwrap().version(), Some(UuidVersion::V4));
    assert!(generator.with_version(UuidVersion::V5).is_err());

    let default = UuidGenerator::new();
    assert_eq!(default.version(), UuidVersion::V7);
    assert_eq!(default.next_id().unwrap().version(), Some(UuidVersion::V7));
}

#[test]
fn uuid_generator_produces_only_selectable_versions() {
    for version in [
        UuidVersion::V1,
        UuidVersion::V4,
        UuidVersion::V6,
        UuidVersion::V7,
        UuidVersion::V8,
    ] {
        let generator = UuidGenerator::new().with_version(version).unwrap();
        assert_eq!(generator.version(), version);
        assert_eq!(generator.next_id().unwrap().version(), Some(version));
    }
    for version in [
        UuidVersion::Nil,
        UuidVersion::V2,
        UuidVersion::V3,
        UuidVersion::V5,
    ] {
        assert!(matches!(
            UuidGenerator::new().with_version(version),
            Err(Error::InvalidInput { field: "version", .. })
        ));
    }
}
