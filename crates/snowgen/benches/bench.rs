use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowgen::{
    AtomicSnowflakeGenerator, IdGenStatus, LockSnowflakeGenerator, SnowflakeGenerator,
    SystemClock, TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        Ok(IdGenStatus::Pending { .. }) | Err(_) => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the blocking path against the real clock, including the wait
/// whenever a millisecond fills up.
fn bench_generator_system_clock<G>(c: &mut Criterion, group_name: &str, generator: G)
where
    G: SnowflakeGenerator,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(generator.next_id().unwrap());
            }
        });
    });

    group.finish();
}

/// Benchmarks contention: every thread hammers one shared generator.
fn bench_generator_threaded<G>(c: &mut Criterion, group_name: &str, generator: G)
where
    G: SnowflakeGenerator + Send + Sync + 'static,
{
    let generator = Arc::new(generator);
    let mut group = c.benchmark_group(group_name);

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));
        group.bench_function(format!("threads/{threads}"), |b| {
            b.iter_custom(|iters| {
                let barrier = Barrier::new(threads + 1);
                let mut elapsed = std::time::Duration::ZERO;

                for _ in 0..iters {
                    let start = scope(|s| {
                        for _ in 0..threads {
                            let generator = Arc::clone(&generator);
                            let barrier = &barrier;
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                        Instant::now()
                    });
                    elapsed += start.elapsed();
                }

                elapsed
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential(c: &mut Criterion) {
    bench_generator(c, "mock/sequential/lock", || {
        LockSnowflakeGenerator::with_clock(0, 0, FixedMockTime { millis: 1 }).unwrap()
    });
    bench_generator(c, "mock/sequential/atomic", || {
        AtomicSnowflakeGenerator::with_clock(0, 0, FixedMockTime { millis: 1 }).unwrap()
    });
}

fn benchmark_system_clock(c: &mut Criterion) {
    bench_generator_system_clock(
        c,
        "system/sequential/lock",
        LockSnowflakeGenerator::with_clock(0, 0, SystemClock::default()).unwrap(),
    );
    bench_generator_system_clock(
        c,
        "system/sequential/atomic",
        AtomicSnowflakeGenerator::with_clock(0, 0, SystemClock::default()).unwrap(),
    );
}

fn benchmark_threaded(c: &mut Criterion) {
    bench_generator_threaded(
        c,
        "system/threaded/lock",
        LockSnowflakeGenerator::new(0, 0).unwrap(),
    );
    bench_generator_threaded(
        c,
        "system/threaded/atomic",
        AtomicSnowflakeGenerator::new(0, 0).unwrap(),
    );
}

criterion_group!(
    benches,
    benchmark_mock_sequential,
    benchmark_system_clock,
    benchmark_threaded
);
criterion_main!(benches);
