//! Benchmark for the tracker's hot path.
//!
//! `record` runs once per worker iteration (up to the configured
//! target rate); it must stay cheap relative to an engine step.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use orrery_core::{EntityQuery, Vec3};
use orrery_telemetry::{SampleTracker, TrackingFlags};

fn queries(n: usize) -> Vec<EntityQuery> {
    (0..n)
        .map(|i| EntityQuery {
            position: Some(Vec3::new(i as f64, 0.5, 1.0)),
            velocity: Some(Vec3::new(0.0, 0.0, -9.81)),
            mass: Some(1.0),
        })
        .collect()
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample_tracker");

    for n in [1usize, 4, 16] {
        let qs = queries(n);
        group.bench_function(format!("record_{n}_entities"), |b| {
            b.iter_batched(
                || {
                    let mut t = SampleTracker::new(TrackingFlags::default());
                    t.set_gravity(Vec3::new(0.0, 0.0, -9.81));
                    t
                },
                |mut tracker| {
                    for i in 0..100 {
                        tracker.record(i as f64 * 0.01, &qs);
                    }
                    tracker
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("export_positions_1000_samples", |b| {
        let mut tracker = SampleTracker::new(TrackingFlags::default());
        tracker.set_gravity(Vec3::new(0.0, 0.0, -9.81));
        let qs = queries(4);
        for i in 0..1000 {
            tracker.record(i as f64 * 0.01, &qs);
        }
        b.iter(|| {
            let mut buf = Vec::with_capacity(64 * 1024);
            orrery_telemetry::csv::write_vector_csv(&mut buf, tracker.samples(), |s| {
                s.positions.as_ref()
            })
            .unwrap();
            buf
        });
    });

    group.finish();
}

criterion_group!(benches, bench_record);
criterion_main!(benches);
