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

//! Predicate evaluation into compacted index vectors and masks.
//!
//! Index compaction uses branchless writes: every slot is written, the
//! cursor advances only on a hit, so no data-dependent branch disturbs the
//! pipeline. The contract is `out_indices.len() >= data.len()`; with a
//! shorter output the unrolled loop stops while a full chunk of slots
//! still remains and the tail bounds-guards every write, so the slice is
//! never overrun (hits past the end are dropped).

use crate::config::CHUNK;
use crate::num::Numeric;
use crate::simd;

#[inline(always)]
fn filter_indices<T: Copy>(
    data: &[T],
    out: &mut [u32],
    pred: impl Fn(T) -> bool + Copy,
) -> usize {
    let n = data.len();
    let mut count = 0usize;
    let mut i = 0;
    // Branchless writes are only safe while a whole chunk of output slots
    // certainly remains.
    while i + CHUNK <= n && count + CHUNK <= out.len() {
        for j in 0..CHUNK {
            out[count] = (i + j) as u32;
            count += pred(data[i + j]) as usize;
        }
        i += CHUNK;
    }
    while i < n {
        if pred(data[i]) && count < out.len() {
            out[count] = i as u32;
            count += 1;
        }
        i += 1;
    }
    count
}

macro_rules! filter_op {
    ($indices:ident, $mask_u8:ident, $mask_bool:ident, $op:tt, $sym:literal) => {
        #[doc = concat!(
            "Indices `i` with `data[i] ", $sym, " threshold`, strictly increasing. ",
            "Contract: `out_indices.len() >= data.len()`. Returns the hit count."
        )]
        pub fn $indices<T: Numeric>(data: &[T], threshold: T, out_indices: &mut [u32]) -> usize {
            filter_indices(data, out_indices, |v| v $op threshold)
        }

        #[doc = concat!("Length-n byte mask of `data[i] ", $sym, " threshold`.")]
        pub fn $mask_u8<T: Numeric>(data: &[T], threshold: T, out: &mut [u8]) -> usize {
            simd::map1_into(data, out, |v| (v $op threshold) as u8)
        }

        #[doc = concat!("Length-n bool mask of `data[i] ", $sym, " threshold`.")]
        pub fn $mask_bool<T: Numeric>(data: &[T], threshold: T, out: &mut [bool]) -> usize {
            simd::map1_into(data, out, |v| v $op threshold)
        }
    };
}

filter_op!(filter_gt, filter_gt_mask, filter_gt_mask_bool, >, ">");
filter_op!(filter_ge, filter_ge_mask, filter_ge_mask_bool, >=, ">=");
filter_op!(filter_lt, filter_lt_mask, filter_lt_mask_bool, <, "<");
filter_op!(filter_le, filter_le_mask, filter_le_mask_bool, <=, "<=");
filter_op!(filter_eq, filter_eq_mask, filter_eq_mask_bool, ==, "==");

/// Number of non-zero bytes in a mask column.
pub fn count_mask_true(mask: &[u8]) -> usize {
    simd::map_reduce_tree(mask, 0usize, |b| (b != 0) as usize, |a, b| a + b)
}

/// Number of `true` values in a bool column.
pub fn count_true(mask: &[bool]) -> usize {
    simd::map_reduce_tree(mask, 0usize, |b| b as usize, |a, b| a + b)
}

/// Expand a byte mask into the indices of its non-zero positions.
/// Writes at most `out_indices.len()` indices; returns the written count.
pub fn indices_from_mask(mask: &[u8], out_indices: &mut [u32]) -> usize {
    filter_indices(mask, out_indices, |b| b != 0)
}
