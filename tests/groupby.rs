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

//! Hashing, group-id assignment, and aggregation-by-group tests.

use basalt::{groupby, groupby_agg, hash};

fn hashes_of(keys: &[i64]) -> Vec<u64> {
    let mut out = vec![0u64; keys.len()];
    hash::hash_i64(keys, &mut out);
    out
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

#[test]
fn hash_is_deterministic() {
    let keys: Vec<i64> = (0..10_000).map(|i| i * 31 - 5000).collect();
    let a = hashes_of(&keys);
    let b = hashes_of(&keys);
    assert_eq!(a, b);
}

#[test]
fn parallel_hash_matches_sequential() {
    let keys: Vec<i64> = (0..100_000).map(|i| i * 7 - 350_000).collect();
    let sequential = hashes_of(&keys);
    let mut parallel = vec![0u64; keys.len()];
    hash::hash_i64_parallel(&keys, &mut parallel);
    assert_eq!(sequential, parallel);
}

#[test]
fn f64_hash_canonicalizes_nan_and_zero() {
    let data = [0.0f64, -0.0, f64::NAN, -f64::NAN];
    let mut out = [0u64; 4];
    hash::hash_f64(&data, &mut out);
    assert_eq!(out[0], out[1]);
    assert_eq!(out[2], out[3]);
}

#[test]
fn combine_hashes_is_order_sensitive() {
    let a = hashes_of(&[1, 2, 3]);
    let b = hashes_of(&[4, 5, 6]);
    let mut ab = [0u64; 3];
    let mut ba = [0u64; 3];
    hash::combine_hashes(&[&a, &b], &mut ab);
    hash::combine_hashes(&[&b, &a], &mut ba);
    assert_ne!(ab, ba);
}

// ---------------------------------------------------------------------------
// Group-id assignment
// ---------------------------------------------------------------------------

#[test]
fn group_ids_first_occurrence_order() {
    let keys = [30i64, 10, 30, 20, 10];
    let hashes = hashes_of(&keys);
    let mut ids = [0u32; 5];
    let num_groups = groupby::group_ids_i64(&keys, &hashes, &mut ids).unwrap();
    assert_eq!(num_groups, 3);
    assert_eq!(ids, [0, 1, 0, 2, 1]);
}

#[test]
fn group_ids_are_dense_and_consistent() {
    let keys: Vec<i64> = (0..5000).map(|i| (i * 37) % 101).collect();
    let hashes = hashes_of(&keys);
    let mut ids = vec![0u32; keys.len()];
    let num_groups = groupby::group_ids_i64(&keys, &hashes, &mut ids).unwrap();
    assert_eq!(num_groups, 101);
    // Equal keys get equal ids.
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len().min(i + 150) {
            if keys[i] == keys[j] {
                assert_eq!(ids[i], ids[j]);
            }
        }
    }
    // Every id in [0, num_groups) appears; max + 1 == num_groups.
    let mut seen = vec![false; num_groups as usize];
    for &id in &ids {
        assert!(id < num_groups);
        seen[id as usize] = true;
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn groupby_compute_extended_outputs() {
    let keys = [7i64, 8, 7, 9, 8, 7];
    let hashes = hashes_of(&keys);
    let result = groupby::groupby_compute(&hashes).unwrap();
    assert_eq!(result.num_groups, 3);
    assert_eq!(result.group_ids, vec![0, 1, 0, 2, 1, 0]);
    assert_eq!(result.first_row_idx, vec![0, 1, 3]);
    assert_eq!(result.group_counts, vec![3, 2, 1]);
}

#[test]
fn groupby_sum_scenario() {
    let keys = [10i64, 20, 10, 20, 10];
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    let result = groupby::groupby_sum_i64_f64(&keys, &values).unwrap();
    assert_eq!(result.num_groups, 2);
    assert_eq!(result.keys, vec![10, 20]);
    assert_eq!(result.sums, vec![9.0, 6.0]);
}

#[test]
fn groupby_multi_agg_fused() {
    let keys = [1i64, 2, 1, 2, 1];
    let values = [5.0, -1.0, 3.0, 8.0, 4.0];
    let result = groupby::groupby_multi_agg_i64_f64(&keys, &values).unwrap();
    assert_eq!(result.keys, vec![1, 2]);
    assert_eq!(result.sums, vec![12.0, 7.0]);
    assert_eq!(result.mins, vec![3.0, -1.0]);
    assert_eq!(result.maxs, vec![5.0, 8.0]);
    assert_eq!(result.counts, vec![3, 2]);
}

// ---------------------------------------------------------------------------
// Aggregation by group
// ---------------------------------------------------------------------------

fn scattered_fixture(n: usize, groups: usize) -> (Vec<f64>, Vec<u32>) {
    let values: Vec<f64> = (0..n).map(|i| ((i * 13) % 97) as f64 - 48.0).collect();
    let ids: Vec<u32> = (0..n).map(|i| ((i * 31) % groups) as u32).collect();
    (values, ids)
}

#[test]
fn scatter_sum_matches_naive() {
    let (values, ids) = scattered_fixture(2000, 17);
    let mut out = vec![0.0; 17];
    groupby_agg::sum_by_group(&values, &ids, &mut out);
    let mut naive = vec![0.0; 17];
    for i in 0..values.len() {
        naive[ids[i] as usize] += values[i];
    }
    assert_eq!(out, naive);
}

#[test]
fn all_agg_paths_agree() {
    let groups = 23usize;
    let (values, ids) = scattered_fixture(60_000, groups);

    let mut scatter = vec![0.0; groups];
    groupby_agg::sum_by_group(&values, &ids, &mut scatter);

    let mut radix = vec![0.0; groups];
    groupby_agg::sum_by_group_radix(&values, &ids, &mut radix);
    for g in 0..groups {
        assert!((scatter[g] - radix[g]).abs() < 1e-9, "radix g={g}");
    }

    let mut parallel = vec![0.0; groups];
    groupby_agg::sum_by_group_parallel(&values, &ids, &mut parallel);
    for g in 0..groups {
        assert!((scatter[g] - parallel[g]).abs() < 1e-9, "parallel g={g}");
    }

    // Sorted path needs sorted ids: aggregate a sorted copy.
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by_key(|&i| ids[i]);
    let sorted_ids: Vec<u32> = order.iter().map(|&i| ids[i]).collect();
    let sorted_values: Vec<f64> = order.iter().map(|&i| values[i]).collect();
    let mut sorted_out = vec![0.0; groups];
    groupby_agg::sum_by_group_sorted(&sorted_values, &sorted_ids, &mut sorted_out);
    for g in 0..groups {
        assert!((scatter[g] - sorted_out[g]).abs() < 1e-9, "sorted g={g}");
    }
}

#[test]
fn min_max_by_group_initialize_to_extremes() {
    let values = [5.0f64, -2.0, 7.0];
    let ids = [0u32, 0, 2];
    let mut mins = vec![0.0; 3];
    groupby_agg::min_by_group(&values, &ids, &mut mins);
    assert_eq!(mins[0], -2.0);
    assert_eq!(mins[1], f64::MAX);
    assert_eq!(mins[2], 7.0);

    let mut maxs = vec![0.0; 3];
    groupby_agg::max_by_group(&values, &ids, &mut maxs);
    assert_eq!(maxs[0], 5.0);
    assert_eq!(maxs[1], f64::MIN);
    assert_eq!(maxs[2], 7.0);
}

#[test]
fn count_and_mean_by_group() {
    let values = [1.0f64, 3.0, 10.0];
    let ids = [0u32, 0, 1];
    let mut counts = vec![0u32; 2];
    groupby_agg::count_by_group(&ids, &mut counts);
    assert_eq!(counts, vec![2, 1]);

    let mut means = vec![0.0; 2];
    groupby_agg::mean_by_group(&values, &ids, &mut means);
    assert_eq!(means, vec![2.0, 10.0]);
}

#[test]
fn optimal_dispatch_agrees_across_shapes() {
    // Small scattered, large sorted, and high-cardinality inputs should
    // all produce the same sums as the naive loop.
    for (n, groups, sort_ids) in [(500usize, 7usize, false), (5_000, 11, true), (20_000, 4_000, false)] {
        let (values, mut ids) = scattered_fixture(n, groups);
        if sort_ids {
            ids.sort_unstable();
        }
        let mut naive = vec![0.0; groups];
        for i in 0..n {
            naive[ids[i] as usize] += values[i];
        }
        let mut out = vec![0.0; groups];
        groupby_agg::optimal_sum_by_group(&values, &ids, &mut out);
        for g in 0..groups {
            assert!((out[g] - naive[g]).abs() < 1e-9, "n={n} g={g}");
        }
    }
}

#[test]
fn integer_sum_by_group_wraps() {
    let values = [i64::MAX, 2];
    let ids = [0u32, 0];
    let mut out = vec![0i64; 1];
    groupby_agg::sum_by_group(&values, &ids, &mut out);
    assert_eq!(out[0], i64::MAX.wrapping_add(2));
}
