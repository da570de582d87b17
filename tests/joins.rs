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

//! Join tests. Result row order is unspecified, so assertions compare
//! sorted pair sets; every variant is checked against the same reference.

use basalt::join::{self, JoinResult};

fn pairs_of(result: &JoinResult) -> Vec<(i32, i32)> {
    let mut pairs: Vec<(i32, i32)> = result
        .left_indices()
        .iter()
        .copied()
        .zip(result.right_indices().iter().copied())
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Reference nested-loop inner join.
fn naive_inner(left: &[i64], right: &[i64]) -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    for (l, &lk) in left.iter().enumerate() {
        for (r, &rk) in right.iter().enumerate() {
            if lk == rk {
                pairs.push((l as i32, r as i32));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

fn naive_left(left: &[i64], right: &[i64]) -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    for (l, &lk) in left.iter().enumerate() {
        let mut matched = false;
        for (r, &rk) in right.iter().enumerate() {
            if lk == rk {
                pairs.push((l as i32, r as i32));
                matched = true;
            }
        }
        if !matched {
            pairs.push((l as i32, -1));
        }
    }
    pairs.sort_unstable();
    pairs
}

fn pseudo_keys(n: usize, modulus: i64, seed: i64) -> Vec<i64> {
    (0..n as i64)
        .map(|i| (i.wrapping_mul(6364136223846793005).wrapping_add(seed)) % modulus)
        .collect()
}

// ---------------------------------------------------------------------------
// Inner join
// ---------------------------------------------------------------------------

#[test]
fn inner_join_with_duplicates() {
    let left = [1i64, 2, 2, 3];
    let right = [2i64, 2, 4];
    let result = join::hash::inner_join_chained(&left, &right).unwrap();
    assert_eq!(result.len(), 4);
    assert_eq!(pairs_of(&result), vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
}

#[test]
fn inner_join_no_matches() {
    let left = [1i64, 3, 5];
    let right = [2i64, 4, 6];
    let result = join::inner_join_i64(&left, &right).unwrap();
    assert_eq!(result.len(), 0);
}

#[test]
fn inner_join_empty_sides() {
    let keys = [1i64, 2];
    let empty: [i64; 0] = [];
    assert_eq!(join::inner_join_i64(&keys, &empty).unwrap().len(), 0);
    assert_eq!(join::inner_join_i64(&empty, &keys).unwrap().len(), 0);
}

#[test]
fn chained_variants_agree() {
    let left = pseudo_keys(3000, 500, 17);
    let right = pseudo_keys(2000, 500, 91);
    let expected = naive_inner(&left, &right);
    let chained = join::hash::inner_join_chained(&left, &right).unwrap();
    assert_eq!(pairs_of(&chained), expected);
    let batched = join::hash::inner_join_chained_batched(&left, &right).unwrap();
    assert_eq!(pairs_of(&batched), expected);
    let open = join::hash::inner_join_open_addressing(&left, &right).unwrap();
    assert_eq!(pairs_of(&open), expected);
}

#[test]
fn parallel_and_radix_paths_agree() {
    let left = pseudo_keys(40_000, 60_000, 3);
    let right = pseudo_keys(60_000, 60_000, 7);
    let reference = join::hash::inner_join_chained(&left, &right).unwrap();
    let expected = pairs_of(&reference);

    let parallel = join::parallel::parallel_inner_join(&left, &right).unwrap();
    assert_eq!(pairs_of(&parallel), expected);

    let radix = join::radix::radix_partitioned_inner_join(&left, &right).unwrap();
    assert_eq!(pairs_of(&radix), expected);

    // The dispatcher routes this size through the parallel path.
    let dispatched = join::inner_join_i64(&left, &right).unwrap();
    assert_eq!(pairs_of(&dispatched), expected);
}

#[test]
fn parallel_probe_left_indices_increase_within_chunks() {
    let left = pseudo_keys(50_000, 1000, 5);
    let right = pseudo_keys(1000, 1000, 9);
    let result = join::parallel::parallel_inner_join(&left, &right).unwrap();
    // Within each probe chunk, left indices must be non-decreasing.
    let chunk = join::PROBE_GRAIN as i32;
    let lefts = result.left_indices();
    for w in lefts.windows(2) {
        if w[0] / chunk == w[1] / chunk {
            assert!(w[0] <= w[1]);
        }
    }
}

// ---------------------------------------------------------------------------
// Left join
// ---------------------------------------------------------------------------

#[test]
fn left_join_unmatched_scenario() {
    let left = [1i64, 2, 3];
    let right = [2i64, 4];
    let result = join::left_join_i64(&left, &right).unwrap();
    assert_eq!(result.len(), 3);
    assert_eq!(pairs_of(&result), vec![(0, -1), (1, 0), (2, -1)]);
}

#[test]
fn left_join_variants_agree() {
    let left = pseudo_keys(2500, 400, 11);
    let right = pseudo_keys(1500, 400, 23);
    let expected = naive_left(&left, &right);
    let rows = join::hash::left_join_rows(&left, &right).unwrap();
    assert_eq!(pairs_of(&rows), expected);
    let chained = join::hash::left_join_chained(&left, &right).unwrap();
    assert_eq!(pairs_of(&chained), expected);
    let merged = join::sort_merge::sort_merge_left_join(&left, &right).unwrap();
    assert_eq!(pairs_of(&merged), expected);
}

#[test]
fn left_join_every_left_row_appears() {
    let left = pseudo_keys(5000, 100, 41);
    let right = pseudo_keys(300, 100, 43);
    let result = join::left_join_i64(&left, &right).unwrap();
    let mut seen = vec![false; left.len()];
    for (&l, &r) in result
        .left_indices()
        .iter()
        .zip(result.right_indices().iter())
    {
        seen[l as usize] = true;
        if r >= 0 {
            assert_eq!(left[l as usize], right[r as usize]);
        }
    }
    assert!(seen.iter().all(|&s| s));
}

// ---------------------------------------------------------------------------
// Sort-merge join
// ---------------------------------------------------------------------------

#[test]
fn sort_merge_presorted_scenario() {
    let left = [1i64, 2, 3, 4];
    let right = [2i64, 4];
    let result = join::sort_merge::sort_merge_inner_join(&left, &right).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(pairs_of(&result), vec![(1, 0), (3, 1)]);
}

#[test]
fn sort_merge_handles_unsorted_input() {
    let left = pseudo_keys(4000, 700, 29);
    let right = pseudo_keys(3000, 700, 31);
    let expected = naive_inner(&left, &right);
    let result = join::sort_merge::sort_merge_inner_join(&left, &right).unwrap();
    assert_eq!(pairs_of(&result), expected);
}

#[test]
fn sort_merge_duplicate_runs_emit_cartesian_product() {
    let left = [5i64, 5, 5];
    let right = [5i64, 5];
    let result = join::sort_merge::sort_merge_inner_join(&left, &right).unwrap();
    assert_eq!(result.len(), 6);
}

#[test]
fn dispatcher_takes_sort_merge_for_presorted() {
    let left: Vec<i64> = (0..10_000).collect();
    let right: Vec<i64> = (0..10_000).step_by(2).collect();
    let result = join::inner_join_i64(&left, &right).unwrap();
    assert_eq!(result.len(), 5000);
    for (&l, &r) in result
        .left_indices()
        .iter()
        .zip(result.right_indices().iter())
    {
        assert_eq!(left[l as usize], right[r as usize]);
    }
}
