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

//! Argsort: index permutations ordering a column.
//!
//! 64-bit keys go through a stable LSD radix sort: keys are mapped to
//! order-preserving `u64` bit patterns, then eight passes of 8-bit digits
//! over 256 buckets scatter a shadow (keys, indices) buffer pair, swapped
//! each pass. Other types use pdqsort on indices
//! (`slice::sort_unstable_by`), with a parallel chunk-sort-then-merge
//! variant above [`PARALLEL_SORT_MIN`] rows; that fallback is not stable.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::config::{self, CHUNK};
use crate::num::Numeric;
use crate::pool;

/// Row count above which the comparison argsort goes parallel.
pub const PARALLEL_SORT_MIN: usize = 100_000;

const SIGN_BIT: u64 = 1 << 63;

/// Map an `f64` to a `u64` whose unsigned order matches the float order:
/// flip the sign bit for non-negatives, flip all bits for negatives.
#[inline(always)]
pub fn sortable_from_f64(v: f64) -> u64 {
    let b = v.to_bits();
    if b & SIGN_BIT == 0 {
        b ^ SIGN_BIT
    } else {
        !b
    }
}

/// Inverse of [`sortable_from_f64`] for every non-NaN bit pattern.
#[inline(always)]
pub fn sortable_to_f64(k: u64) -> f64 {
    if k & SIGN_BIT != 0 {
        f64::from_bits(k ^ SIGN_BIT)
    } else {
        f64::from_bits(!k)
    }
}

/// Map an `i64` to a `u64` preserving signed order.
#[inline(always)]
pub fn sortable_from_i64(v: i64) -> u64 {
    (v as u64) ^ SIGN_BIT
}

/// Inverse of [`sortable_from_i64`].
#[inline(always)]
pub fn sortable_to_i64(k: u64) -> i64 {
    (k ^ SIGN_BIT) as i64
}

/// Stable LSD radix argsort over pre-mapped sortable keys. `keys` is
/// consumed as the first shadow buffer.
fn radix_argsort(mut keys: Vec<u64>, out: &mut [u32], ascending: bool) {
    let n = keys.len();
    debug_assert_eq!(n, out.len());
    let mut idx: Vec<u32> = (0..n as u32).collect();
    let mut keys_alt: Vec<u64> = vec![0; n];
    let mut idx_alt: Vec<u32> = vec![0; n];

    let mut counts = [0usize; 256];
    for pass in 0..8 {
        let shift = pass * 8;
        counts.fill(0);
        for &k in keys.iter() {
            counts[((k >> shift) & 0xFF) as usize] += 1;
        }
        // A pass where every key shares the digit moves nothing.
        if counts.iter().any(|&c| c == n) {
            continue;
        }
        let mut offsets = [0usize; 256];
        let mut total = 0;
        for d in 0..256 {
            offsets[d] = total;
            total += counts[d];
        }
        for i in 0..n {
            let k = keys[i];
            let d = ((k >> shift) & 0xFF) as usize;
            let pos = offsets[d];
            offsets[d] += 1;
            keys_alt[pos] = k;
            idx_alt[pos] = idx[i];
        }
        std::mem::swap(&mut keys, &mut keys_alt);
        std::mem::swap(&mut idx, &mut idx_alt);
    }
    out.copy_from_slice(&idx);
    if !ascending {
        out.reverse();
    }
}

/// Radix argsort of an i64 column. Stable for equal keys when ascending.
/// Returns the clipped length.
pub fn argsort_i64(data: &[i64], out: &mut [u32], ascending: bool) -> usize {
    let n = data.len().min(out.len());
    let keys: Vec<u64> = data[..n].iter().map(|&v| sortable_from_i64(v)).collect();
    radix_argsort(keys, &mut out[..n], ascending);
    n
}

/// Radix argsort of an f64 column. NaNs map above every finite value and
/// +Inf, so they land at the ascending tail.
pub fn argsort_f64(data: &[f64], out: &mut [u32], ascending: bool) -> usize {
    let n = data.len().min(out.len());
    let keys: Vec<u64> = data[..n].iter().map(|&v| sortable_from_f64(v)).collect();
    radix_argsort(keys, &mut out[..n], ascending);
    n
}

#[inline(always)]
fn order_of<T: Numeric>(a: T, b: T, ascending: bool) -> Ordering {
    let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// Comparison argsort (pdqsort on indices) for non-64-bit keys. Goes
/// parallel above [`PARALLEL_SORT_MIN`] rows. Not stable.
pub fn argsort<T: Numeric>(data: &[T], out: &mut [u32], ascending: bool) -> usize {
    let n = data.len().min(out.len());
    let idx = &mut out[..n];
    for (i, slot) in idx.iter_mut().enumerate() {
        *slot = i as u32;
    }
    if n >= PARALLEL_SORT_MIN && config::max_threads() > 1 {
        argsort_parallel(data, idx, ascending);
    } else {
        idx.sort_unstable_by(|&a, &b| order_of(data[a as usize], data[b as usize], ascending));
    }
    n
}

/// Chunk-sort-then-merge: workers sort disjoint index chunks, then log₂
/// levels of pairwise merges ping-pong between two buffers.
fn argsort_parallel<T: Numeric>(data: &[T], idx: &mut [u32], ascending: bool) {
    let n = idx.len();
    let workers = config::max_threads();
    let chunk = n.div_ceil(workers).max(1);
    pool::install(|| {
        idx.par_chunks_mut(chunk).for_each(|c| {
            c.sort_unstable_by(|&a, &b| order_of(data[a as usize], data[b as usize], ascending));
        });
    });

    let mut src: Vec<u32> = idx.to_vec();
    let mut dst: Vec<u32> = vec![0; n];
    let mut width = chunk;
    while width < n {
        pool::install(|| {
            src.par_chunks(2 * width)
                .zip(dst.par_chunks_mut(2 * width))
                .for_each(|(s, d)| {
                    let mid = width.min(s.len());
                    merge_runs(data, &s[..mid], &s[mid..], d, ascending);
                });
        });
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }
    idx.copy_from_slice(&src);
}

fn merge_runs<T: Numeric>(data: &[T], a: &[u32], b: &[u32], out: &mut [u32], ascending: bool) {
    let mut i = 0;
    let mut j = 0;
    let mut o = 0;
    while i < a.len() && j < b.len() {
        if order_of(data[a[i] as usize], data[b[j] as usize], ascending) != Ordering::Greater {
            out[o] = a[i];
            i += 1;
        } else {
            out[o] = b[j];
            j += 1;
        }
        o += 1;
    }
    out[o..o + a.len() - i].copy_from_slice(&a[i..]);
    o += a.len() - i;
    out[o..o + b.len() - j].copy_from_slice(&b[j..]);
}

/// Pairwise non-descending check, chunked so the compiler vectorizes the
/// comparisons. NaN comparisons are false and never count as violations,
/// so an all-NaN column is vacuously sorted. Used by groupby-agg and
/// sort-merge join to skip the sort pass.
pub fn is_sorted<T: Copy + PartialOrd>(data: &[T]) -> bool {
    let n = data.len();
    if n < 2 {
        return true;
    }
    let mut i = 0;
    while i + CHUNK + 1 <= n {
        let mut violated = false;
        for j in 0..CHUNK {
            violated |= data[i + j] > data[i + j + 1];
        }
        if violated {
            return false;
        }
        i += CHUNK;
    }
    while i + 1 < n {
        if data[i] > data[i + 1] {
            return false;
        }
        i += 1;
    }
    true
}
