//   Copyright (c) 2024-2026 Anton Kundenko <singaraiona@gmail.com>
//   All rights reserved.
//
//   Permission is hereby granted, free of charge, to any person obtaining a copy
//   of this software and associated documentation files (the "Software"), to deal
//   in the Software without restriction, including without limitation the rights
//   to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//   copies of the Software, and to permit persons to whom the Software is
//   furnished to do so, subject to the following conditions:
//
//   The above copyright notice and this permission notice shall be included in all
//   copies or substantial portions of the Software.
//
//   THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//   IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//   FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//   AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//   LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//   OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//   SOFTWARE.

//! Kernel benchmark suite (criterion).
//!
//! Synthetic in-memory columns shaped like the h2oai groupby/join
//! datasets: 10M-row value columns, key columns at low and high
//! cardinality. Override the row count with `BASALT_BENCH_ROWS`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};
use std::time::Duration;

use basalt::{agg, filter, groupby, groupby_agg, hash, join, sort, window};

fn bench_rows() -> usize {
    std::env::var("BASALT_BENCH_ROWS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10_000_000)
}

fn f64_column(n: usize) -> Vec<f64> {
    (0..n).map(|i| ((i * 2654435761) % 1_000_003) as f64).collect()
}

fn key_column(n: usize, cardinality: i64) -> Vec<i64> {
    (0..n as i64)
        .map(|i| i.wrapping_mul(6364136223846793005) % cardinality)
        .collect()
}

fn configure(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(2));
}

// ---------------------------------------------------------------------------
// Elementwise and aggregation
// ---------------------------------------------------------------------------

fn bench_elementwise(c: &mut Criterion) {
    let n = bench_rows();
    let data = f64_column(n);
    let mut group = c.benchmark_group("elementwise");
    configure(&mut group);

    group.bench_function("sum_f64", |b| b.iter(|| black_box(agg::sum(&data))));
    group.bench_function("mean_f64", |b| b.iter(|| black_box(agg::mean(&data))));

    let mut indices = vec![0u32; n];
    group.bench_function("filter_gt", |b| {
        b.iter(|| black_box(filter::filter_gt(&data, 500_000.0, &mut indices)))
    });

    let mut rolled = vec![0.0; n];
    group.bench_function("rolling_min_w100", |b| {
        b.iter(|| black_box(window::rolling_min(&data, 100, 1, &mut rolled)))
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Groupby (q1-style: low and high cardinality)
// ---------------------------------------------------------------------------

fn bench_groupby(c: &mut Criterion) {
    let n = bench_rows();
    let values = f64_column(n);
    let keys_small = key_column(n, 100);
    let keys_large = key_column(n, (n / 10).max(1) as i64);
    let mut group = c.benchmark_group("groupby");
    configure(&mut group);

    group.bench_function("q1_sum_low_cardinality", |b| {
        b.iter(|| black_box(groupby::groupby_sum_i64_f64(&keys_small, &values).unwrap()))
    });
    group.bench_function("q2_sum_high_cardinality", |b| {
        b.iter(|| black_box(groupby::groupby_sum_i64_f64(&keys_large, &values).unwrap()))
    });
    group.bench_function("q3_multi_agg", |b| {
        b.iter(|| black_box(groupby::groupby_multi_agg_i64_f64(&keys_small, &values).unwrap()))
    });

    let mut hashes = vec![0u64; n];
    hash::hash_i64(&keys_small, &mut hashes);
    let mut ids = vec![0u32; n];
    let num_groups = groupby::group_ids_i64(&keys_small, &hashes, &mut ids).unwrap();
    let mut sums = vec![0.0; num_groups as usize];
    group.bench_function("q4_optimal_sum_by_group", |b| {
        b.iter(|| {
            groupby_agg::optimal_sum_by_group(&values, &ids, &mut sums);
            black_box(&sums);
        })
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Sort and hash
// ---------------------------------------------------------------------------

fn bench_sort(c: &mut Criterion) {
    let n = bench_rows();
    let keys = key_column(n, i64::MAX);
    let mut group = c.benchmark_group("sort");
    configure(&mut group);

    let mut idx = vec![0u32; n];
    group.bench_function("argsort_radix_i64", |b| {
        b.iter(|| black_box(sort::argsort_i64(&keys, &mut idx, true)))
    });

    let mut hashes = vec![0u64; n];
    group.bench_function("hash_i64", |b| {
        b.iter(|| black_box(hash::hash_i64(&keys, &mut hashes)))
    });
    group.bench_function("hash_i64_parallel", |b| {
        b.iter(|| black_box(hash::hash_i64_parallel(&keys, &mut hashes)))
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Joins (j1-style)
// ---------------------------------------------------------------------------

fn bench_join(c: &mut Criterion) {
    let n = bench_rows();
    let left = key_column(n, n as i64);
    let right = key_column(n / 10, n as i64);
    let mut group = c.benchmark_group("join");
    configure(&mut group);

    group.bench_function("j1_inner_dispatch", |b| {
        b.iter(|| black_box(join::inner_join_i64(&left, &right).unwrap()))
    });
    group.bench_function("j2_inner_chained", |b| {
        b.iter(|| black_box(join::hash::inner_join_chained(&left, &right).unwrap()))
    });
    group.bench_function("j3_inner_radix_partitioned", |b| {
        b.iter(|| black_box(join::radix::radix_partitioned_inner_join(&left, &right).unwrap()))
    });
    group.bench_function("j4_left_join", |b| {
        b.iter(|| black_box(join::left_join_i64(&left, &right).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_elementwise, bench_groupby, bench_sort, bench_join);
criterion_main!(benches);
