//! Throughput benchmark for `BoundedLog::append`.
//!
//! The append path runs inside the worker's status cadence and on the
//! controller's lifecycle events; it should stay well under a
//! microsecond at the default capacity.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use orrery_console::{BoundedLog, LogLevel};

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("bounded_log");

    group.bench_function("append_under_capacity", |b| {
        b.iter_batched(
            || BoundedLog::new(100).unwrap(),
            |log| {
                for i in 0..50 {
                    log.append(format!("message {i}"), LogLevel::Status);
                }
                log
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("append_with_eviction", |b| {
        let log = BoundedLog::new(100).unwrap();
        for i in 0..100 {
            log.append(format!("prefill {i}"), LogLevel::Info);
        }
        b.iter(|| log.append("steady-state append", LogLevel::Status));
    });

    group.bench_function("snapshot_full", |b| {
        let log = BoundedLog::new(100).unwrap();
        for i in 0..100 {
            log.append(format!("line {i}"), LogLevel::Status);
        }
        b.iter(|| log.snapshot());
    });

    group.finish();
}

criterion_group!(benches, bench_append);
criterion_main!(benches);
