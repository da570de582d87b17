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

//! Aggregation by group id.
//!
//! Four paths compute the same per-group reductions with different memory
//! behavior: sequential scatter, run-length traversal over sorted ids,
//! counting-sort into contiguous runs, and parallel scatter into
//! worker-local accumulators merged after the barrier. The `optimal_*`
//! dispatchers pick by data length, cardinality, and sortedness.
//!
//! Group ids must be dense in `[0, num_groups)`; output slices must hold
//! at least `num_groups` elements (clipped ids past the output are
//! ignored). Min/max outputs are initialized to the type's extremes, so a
//! group no row landed in keeps the identity value.

use rayon::prelude::*;
use tracing::debug;

use crate::config;
use crate::num::Numeric;
use crate::pool;
use crate::sort::is_sorted;

/// Minimum rows before sortedness detection pays for itself.
pub const SORTED_PATH_MIN: usize = 1_000;
/// Minimum rows for the counting-sort path.
pub const RADIX_PATH_MIN: usize = 10_000;
/// Rows-per-group below which cardinality counts as high.
pub const HIGH_CARDINALITY_RATIO: usize = 100;
/// Minimum rows for the parallel scatter path.
pub const PARALLEL_PATH_MIN: usize = 50_000;

// ---------------------------------------------------------------------------
// Scatter (sequential) path
// ---------------------------------------------------------------------------

/// `out[g] = Σ values[i]` over rows with `group_ids[i] == g`. Output must
/// be pre-zeroed or freshly supplied; it is initialized here.
pub fn sum_by_group<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::ZERO);
    let n = values.len().min(group_ids.len());
    for i in 0..n {
        let g = group_ids[i] as usize;
        if g < out.len() {
            out[g] = out[g].add_wrapping(values[i]);
        }
    }
}

/// Per-group minimum; empty groups keep the max identity.
pub fn min_by_group<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::MAX_IDENT);
    let n = values.len().min(group_ids.len());
    for i in 0..n {
        let g = group_ids[i] as usize;
        if g < out.len() {
            out[g] = out[g].min_native(values[i]);
        }
    }
}

/// Per-group maximum; empty groups keep the min identity.
pub fn max_by_group<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::MIN_IDENT);
    let n = values.len().min(group_ids.len());
    for i in 0..n {
        let g = group_ids[i] as usize;
        if g < out.len() {
            out[g] = out[g].max_native(values[i]);
        }
    }
}

/// Per-group row count.
pub fn count_by_group(group_ids: &[u32], out: &mut [u32]) {
    out.fill(0);
    for &g in group_ids {
        let g = g as usize;
        if g < out.len() {
            out[g] += 1;
        }
    }
}

/// Per-group mean in `f64`; empty groups yield NaN.
pub fn mean_by_group<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [f64]) {
    let num_groups = out.len();
    let mut counts = vec![0u32; num_groups];
    out.fill(0.0);
    let n = values.len().min(group_ids.len());
    for i in 0..n {
        let g = group_ids[i] as usize;
        if g < num_groups {
            out[g] += values[i].to_f64();
            counts[g] += 1;
        }
    }
    for g in 0..num_groups {
        out[g] /= counts[g] as f64;
    }
}

// ---------------------------------------------------------------------------
// Sorted-input path: run-length traversal
// ---------------------------------------------------------------------------

#[inline(always)]
fn for_each_run(group_ids: &[u32], n: usize, mut body: impl FnMut(u32, usize, usize)) {
    let mut start = 0;
    while start < n {
        let g = group_ids[start];
        let mut end = start + 1;
        while end < n && group_ids[end] == g {
            end += 1;
        }
        body(g, start, end);
        start = end;
    }
}

/// Sum over contiguous runs of a sorted group-id column, reducing each
/// run through the fixed-shape tree.
pub fn sum_by_group_sorted<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::ZERO);
    let n = values.len().min(group_ids.len());
    for_each_run(group_ids, n, |g, start, end| {
        if (g as usize) < out.len() {
            out[g as usize] = crate::simd::reduce_tree(&values[start..end], T::ZERO, |a, b| {
                a.add_wrapping(b)
            });
        }
    });
}

/// Min over contiguous runs of a sorted group-id column.
pub fn min_by_group_sorted<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::MAX_IDENT);
    let n = values.len().min(group_ids.len());
    for_each_run(group_ids, n, |g, start, end| {
        if (g as usize) < out.len() {
            out[g as usize] = crate::simd::reduce_tree(&values[start..end], T::MAX_IDENT, |a, b| {
                a.min_native(b)
            });
        }
    });
}

/// Max over contiguous runs of a sorted group-id column.
pub fn max_by_group_sorted<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    out.fill(T::MIN_IDENT);
    let n = values.len().min(group_ids.len());
    for_each_run(group_ids, n, |g, start, end| {
        if (g as usize) < out.len() {
            out[g as usize] = crate::simd::reduce_tree(&values[start..end], T::MIN_IDENT, |a, b| {
                a.max_native(b)
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Counting-sort path: sort rows by group id, then traverse runs
// ---------------------------------------------------------------------------

/// Row order grouping equal ids contiguously: counting sort by group id
/// (prefix sums, then a stable scatter).
fn rows_grouped_by_id(group_ids: &[u32], n: usize, num_groups: usize) -> (Vec<u32>, Vec<u32>) {
    let mut counts = vec![0u32; num_groups + 1];
    for &g in &group_ids[..n] {
        if (g as usize) < num_groups {
            counts[g as usize + 1] += 1;
        }
    }
    for g in 0..num_groups {
        counts[g + 1] += counts[g];
    }
    let offsets = counts;
    let mut cursor = offsets.clone();
    let mut order = vec![0u32; n];
    for i in 0..n {
        let g = group_ids[i] as usize;
        if g < num_groups {
            order[cursor[g] as usize] = i as u32;
            cursor[g] += 1;
        }
    }
    (order, offsets)
}

macro_rules! radix_agg {
    ($name:ident, $ident:expr, $fold:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $name<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
            let n = values.len().min(group_ids.len());
            let num_groups = out.len();
            let (order, offsets) = rows_grouped_by_id(group_ids, n, num_groups);
            let fold: fn(T, T) -> T = $fold;
            out.fill($ident);
            for g in 0..num_groups {
                let mut acc = $ident;
                for &row in &order[offsets[g] as usize..offsets[g + 1] as usize] {
                    acc = fold(acc, values[row as usize]);
                }
                out[g] = acc;
            }
        }
    };
}

radix_agg!(
    sum_by_group_radix,
    T::ZERO,
    |a, b| a.add_wrapping(b),
    "Counting-sort rows by group id, then sum each contiguous run. Cache-friendly for high cardinality."
);
radix_agg!(
    min_by_group_radix,
    T::MAX_IDENT,
    |a, b| a.min_native(b),
    "Counting-sort rows by group id, then take each run's minimum."
);
radix_agg!(
    max_by_group_radix,
    T::MIN_IDENT,
    |a, b| a.max_native(b),
    "Counting-sort rows by group id, then take each run's maximum."
);

// ---------------------------------------------------------------------------
// Parallel path: worker-local accumulators, merged after the barrier
// ---------------------------------------------------------------------------

fn by_group_parallel<T: Numeric>(
    values: &[T],
    group_ids: &[u32],
    out: &mut [T],
    ident: T,
    fold: impl Fn(T, T) -> T + Send + Sync + Copy,
) {
    let n = values.len().min(group_ids.len());
    let num_groups = out.len();
    let grain = n.div_ceil(config::max_threads()).max(1);
    let locals: Vec<Vec<T>> = pool::install(|| {
        values[..n]
            .par_chunks(grain)
            .zip(group_ids[..n].par_chunks(grain))
            .map(|(vals, ids)| {
                let mut local = vec![ident; num_groups];
                for (v, &g) in vals.iter().zip(ids) {
                    let g = g as usize;
                    if g < num_groups {
                        local[g] = fold(local[g], *v);
                    }
                }
                local
            })
            .collect()
    });
    out.fill(ident);
    for local in &locals {
        for g in 0..num_groups {
            out[g] = fold(out[g], local[g]);
        }
    }
}

/// Parallel scatter sum: each worker accumulates a private group array,
/// merged sequentially after the join.
pub fn sum_by_group_parallel<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    by_group_parallel(values, group_ids, out, T::ZERO, |a, b| a.add_wrapping(b));
}

/// Parallel scatter minimum.
pub fn min_by_group_parallel<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    by_group_parallel(values, group_ids, out, T::MAX_IDENT, |a, b| a.min_native(b));
}

/// Parallel scatter maximum.
pub fn max_by_group_parallel<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
    by_group_parallel(values, group_ids, out, T::MIN_IDENT, |a, b| a.max_native(b));
}

// ---------------------------------------------------------------------------
// Dispatchers
// ---------------------------------------------------------------------------

enum AggPath {
    Sorted,
    Radix,
    Parallel,
    Scatter,
}

fn choose_path(n: usize, num_groups: usize, group_ids: &[u32]) -> AggPath {
    if n > SORTED_PATH_MIN && is_sorted(&group_ids[..n]) {
        debug!(n, num_groups, "groupby-agg: sorted path");
        AggPath::Sorted
    } else if n >= RADIX_PATH_MIN && n / num_groups.max(1) < HIGH_CARDINALITY_RATIO {
        debug!(n, num_groups, "groupby-agg: counting-sort path");
        AggPath::Radix
    } else if n >= PARALLEL_PATH_MIN && config::max_threads() > 1 {
        debug!(n, num_groups, "groupby-agg: parallel path");
        AggPath::Parallel
    } else {
        AggPath::Scatter
    }
}

macro_rules! optimal_dispatch {
    ($name:ident, $sorted:ident, $radix:ident, $parallel:ident, $scatter:ident, $doc:expr) => {
        #[doc = $doc]
        pub fn $name<T: Numeric>(values: &[T], group_ids: &[u32], out: &mut [T]) {
            let n = values.len().min(group_ids.len());
            match choose_path(n, out.len(), group_ids) {
                AggPath::Sorted => $sorted(values, group_ids, out),
                AggPath::Radix => $radix(values, group_ids, out),
                AggPath::Parallel => $parallel(values, group_ids, out),
                AggPath::Scatter => $scatter(values, group_ids, out),
            }
        }
    };
}

optimal_dispatch!(
    optimal_sum_by_group,
    sum_by_group_sorted,
    sum_by_group_radix,
    sum_by_group_parallel,
    sum_by_group,
    "Per-group sum through the path fitting the data: sorted runs, counting sort, parallel scatter, or sequential scatter."
);
optimal_dispatch!(
    optimal_min_by_group,
    min_by_group_sorted,
    min_by_group_radix,
    min_by_group_parallel,
    min_by_group,
    "Per-group min through the best-fitting path."
);
optimal_dispatch!(
    optimal_max_by_group,
    max_by_group_sorted,
    max_by_group_radix,
    max_by_group_parallel,
    max_by_group,
    "Per-group max through the best-fitting path."
);
