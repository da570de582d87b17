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

//! Sort-merge join.
//!
//! Pre-sorted sides are detected and merged directly; otherwise the side
//! is radix-argsorted first (indices only, the column itself stays put).
//! Two cursors advance over the ordered views; at a key match, the run of
//! equal keys on each side is located and the Cartesian product emitted.
//! Two passes: the first counts matches so the result is allocated
//! exactly once, the second fills it.

use crate::error::{Error, Result};
use crate::sort::{argsort_i64, is_sorted};

use super::{JoinResult, PairBuf};

/// Ascending traversal order of a key column: `None` when the column is
/// already sorted, else the argsort permutation.
fn traversal_order(keys: &[i64]) -> Result<Option<Vec<u32>>> {
    if is_sorted(keys) {
        return Ok(None);
    }
    let mut idx = Vec::new();
    idx.try_reserve_exact(keys.len()).map_err(|_| Error::Oom)?;
    idx.resize(keys.len(), 0u32);
    argsort_i64(keys, &mut idx, true);
    Ok(Some(idx))
}

#[inline(always)]
fn key_at(keys: &[i64], ord: &Option<Vec<u32>>, i: usize) -> i64 {
    match ord {
        None => keys[i],
        Some(o) => keys[o[i] as usize],
    }
}

#[inline(always)]
fn row_at(ord: &Option<Vec<u32>>, i: usize) -> i32 {
    match ord {
        None => i as i32,
        Some(o) => o[i] as i32,
    }
}

#[inline(always)]
fn run_end(keys: &[i64], ord: &Option<Vec<u32>>, start: usize, key: i64) -> usize {
    let mut end = start + 1;
    while end < keys.len() && key_at(keys, ord, end) == key {
        end += 1;
    }
    end
}

/// Sort-merge inner join.
pub fn sort_merge_inner_join(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let lord = traversal_order(left)?;
    let rord = traversal_order(right)?;

    // Pass 1: count.
    let mut matches = 0usize;
    {
        let (mut li, mut ri) = (0usize, 0usize);
        while li < left.len() && ri < right.len() {
            let lk = key_at(left, &lord, li);
            let rk = key_at(right, &rord, ri);
            if lk < rk {
                li += 1;
            } else if lk > rk {
                ri += 1;
            } else {
                let le = run_end(left, &lord, li, lk);
                let re = run_end(right, &rord, ri, rk);
                matches += (le - li) * (re - ri);
                li = le;
                ri = re;
            }
        }
    }

    // Pass 2: fill exactly.
    let mut out = PairBuf::with_capacity(matches)?;
    let (mut li, mut ri) = (0usize, 0usize);
    while li < left.len() && ri < right.len() {
        let lk = key_at(left, &lord, li);
        let rk = key_at(right, &rord, ri);
        if lk < rk {
            li += 1;
        } else if lk > rk {
            ri += 1;
        } else {
            let le = run_end(left, &lord, li, lk);
            let re = run_end(right, &rord, ri, rk);
            for l in li..le {
                for r in ri..re {
                    out.push(row_at(&lord, l), row_at(&rord, r))?;
                }
            }
            li = le;
            ri = re;
        }
    }
    Ok(out.into_result())
}

/// Sort-merge left join: unmatched left rows emit `(l, -1)` once.
pub fn sort_merge_left_join(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let lord = traversal_order(left)?;
    let rord = traversal_order(right)?;

    // Pass 1: count (every unmatched left row contributes one row).
    let mut rows = 0usize;
    {
        let (mut li, mut ri) = (0usize, 0usize);
        while li < left.len() {
            let lk = key_at(left, &lord, li);
            if ri >= right.len() || lk < key_at(right, &rord, ri) {
                rows += 1;
                li += 1;
            } else if lk > key_at(right, &rord, ri) {
                ri += 1;
            } else {
                let le = run_end(left, &lord, li, lk);
                let re = run_end(right, &rord, ri, lk);
                rows += (le - li) * (re - ri);
                li = le;
                ri = re;
            }
        }
    }

    // Pass 2: fill.
    let mut out = PairBuf::with_capacity(rows)?;
    let (mut li, mut ri) = (0usize, 0usize);
    while li < left.len() {
        let lk = key_at(left, &lord, li);
        if ri >= right.len() || lk < key_at(right, &rord, ri) {
            out.push(row_at(&lord, li), -1)?;
            li += 1;
        } else if lk > key_at(right, &rord, ri) {
            ri += 1;
        } else {
            let le = run_end(left, &lord, li, lk);
            let re = run_end(right, &rord, ri, lk);
            for l in li..le {
                for r in ri..re {
                    out.push(row_at(&lord, l), row_at(&rord, r))?;
                }
            }
            li = le;
            ri = re;
        }
    }
    Ok(out.into_result())
}
