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

//! Conditional select and null (NaN) handling.
//!
//! The float null sentinel is NaN; `is_null` exploits `NaN != NaN` with a
//! vectorized self-inequality. Integer columns have no null concept, so
//! their `is_null` mask is all zero and the fill kernels degenerate to
//! copies (the collaborator layers validity masks on top where it needs
//! them).

use crate::config::{CHUNK, UNROLL, VECTOR_WIDTH};
use crate::num::Numeric;
use crate::simd;

/// `out[i] = if mask[i] != 0 { a[i] } else { b[i] }`.
pub fn select<T: Numeric>(mask: &[u8], a: &[T], b: &[T], out: &mut [T]) -> usize {
    let n = mask
        .len()
        .min(a.len())
        .min(b.len())
        .min(out.len());
    let (mask, a, b) = (&mask[..n], &a[..n], &b[..n]);
    let out = &mut out[..n];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                let p = base + j;
                out[p] = if mask[p] != 0 { a[p] } else { b[p] };
            }
        }
        i += CHUNK;
    }
    while i < n {
        out[i] = if mask[i] != 0 { a[i] } else { b[i] };
        i += 1;
    }
    n
}

/// Byte mask of null (NaN) positions.
pub fn is_null<T: Numeric>(data: &[T], out: &mut [u8]) -> usize {
    simd::map1_into(data, out, |v| v.is_null() as u8)
}

/// Byte mask of non-null positions. `is_null` and `is_not_null` are
/// complementary at every position.
pub fn is_not_null<T: Numeric>(data: &[T], out: &mut [u8]) -> usize {
    simd::map1_into(data, out, |v| (!v.is_null()) as u8)
}

/// Replace nulls with `fill`. Idempotent: filling an already-filled
/// column is a copy.
pub fn fill_null<T: Numeric>(data: &[T], fill: T, out: &mut [T]) -> usize {
    simd::map1_into(data, out, |v| if v.is_null() { fill } else { v })
}

/// Replace nulls with the most recent non-null value. Leading nulls stay
/// null. Sequential one-pass.
pub fn fill_null_forward<T: Numeric>(data: &[T], out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    let mut last = T::NULL_FILL;
    let mut seen = false;
    for i in 0..n {
        let v = data[i];
        if v.is_null() {
            out[i] = if seen { last } else { T::NULL_FILL };
        } else {
            last = v;
            seen = true;
            out[i] = v;
        }
    }
    n
}

/// Replace nulls with the next non-null value. Trailing nulls stay null.
pub fn fill_null_backward<T: Numeric>(data: &[T], out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    let mut next = T::NULL_FILL;
    let mut seen = false;
    for i in (0..n).rev() {
        let v = data[i];
        if v.is_null() {
            out[i] = if seen { next } else { T::NULL_FILL };
        } else {
            next = v;
            seen = true;
            out[i] = v;
        }
    }
    n
}

/// First non-null of two columns per row.
pub fn coalesce2<T: Numeric>(a: &[T], b: &[T], out: &mut [T]) -> usize {
    simd::map2_into(a, b, out, |x, y| if x.is_null() { y } else { x })
}

/// First non-null across any number of columns per row; null if every
/// column is null at that row.
pub fn coalesce_n<T: Numeric>(cols: &[&[T]], out: &mut [T]) -> usize {
    let n = cols
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    for i in 0..n {
        let mut v = T::NULL_FILL;
        for col in cols {
            if !col[i].is_null() {
                v = col[i];
                break;
            }
        }
        out[i] = v;
    }
    n
}
