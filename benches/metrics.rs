//! Benchmarks for the closed-form cost models.
//!
//! These run on every slider change, so they should stay in the nanoseconds.

use annscape::{hnsw, ivf};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_hnsw_metrics(c: &mut Criterion) {
    c.bench_function("hnsw_estimate", |b| {
        b.iter(|| {
            hnsw::metrics::estimate(
                black_box(1_000_000),
                black_box(1536),
                black_box(512),
                black_box(16),
                black_box(200),
                black_box(64),
            )
        })
    });
}

fn bench_ivf_metrics(c: &mut Criterion) {
    c.bench_function("ivf_estimate", |b| {
        b.iter(|| {
            ivf::metrics::estimate(
                black_box(1_000_000),
                black_box(768),
                black_box(1024),
                black_box(32),
            )
        })
    });
}

criterion_group!(benches, bench_hnsw_metrics, bench_ivf_metrics);
criterion_main!(benches);
