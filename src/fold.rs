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

//! Horizontal (row-wise) folds across N columns.
//!
//! Fixed arities 2 and 3 are fused into a single pass; the variable-arity
//! forms initialize the output from column 0 with a block copy and then
//! accumulate column by column through the shared kernel skeleton.
//! Output length is clipped to the shortest input.

use crate::config::{CHUNK, UNROLL, VECTOR_WIDTH};
use crate::num::Numeric;
use crate::simd;

#[inline(always)]
fn fold3<T: Numeric>(
    a: &[T],
    b: &[T],
    c: &[T],
    out: &mut [T],
    f: impl Fn(T, T) -> T + Copy,
) -> usize {
    let n = a.len().min(b.len()).min(c.len()).min(out.len());
    let (a, b, c) = (&a[..n], &b[..n], &c[..n]);
    let out = &mut out[..n];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                out[base + j] = f(f(a[base + j], b[base + j]), c[base + j]);
            }
        }
        i += CHUNK;
    }
    while i < n {
        out[i] = f(f(a[i], b[i]), c[i]);
        i += 1;
    }
    n
}

#[inline(always)]
fn fold_n<T: Numeric>(cols: &[&[T]], out: &mut [T], f: impl Fn(T, T) -> T + Copy) -> usize {
    let Some(first) = cols.first() else {
        return 0;
    };
    let n = cols
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    out[..n].copy_from_slice(&first[..n]);
    for col in &cols[1..] {
        simd::map2_inplace(&mut out[..n], &col[..n], f);
    }
    n
}

/// `out[i] = a[i] + b[i]` (fixed arity 2).
pub fn sum2<T: Numeric>(a: &[T], b: &[T], out: &mut [T]) -> usize {
    simd::map2_into(a, b, out, |x, y| x.add_wrapping(y))
}

/// `out[i] = a[i] + b[i] + c[i]` (fixed arity 3, single pass).
pub fn sum3<T: Numeric>(a: &[T], b: &[T], c: &[T], out: &mut [T]) -> usize {
    fold3(a, b, c, out, |x, y| x.add_wrapping(y))
}

/// Row-wise sum across any number of columns.
pub fn sum_n<T: Numeric>(cols: &[&[T]], out: &mut [T]) -> usize {
    fold_n(cols, out, |x, y| x.add_wrapping(y))
}

/// Row-wise minimum across any number of columns.
pub fn min_n<T: Numeric>(cols: &[&[T]], out: &mut [T]) -> usize {
    fold_n(cols, out, |x, y| x.min_native(y))
}

/// Row-wise maximum across any number of columns.
pub fn max_n<T: Numeric>(cols: &[&[T]], out: &mut [T]) -> usize {
    fold_n(cols, out, |x, y| x.max_native(y))
}

/// Row-wise product across any number of columns.
pub fn product_n<T: Numeric>(cols: &[&[T]], out: &mut [T]) -> usize {
    fold_n(cols, out, |x, y| x.mul_wrapping(y))
}

/// Row-wise mean across any number of columns, in `f64`.
pub fn mean_n<T: Numeric>(cols: &[&[T]], out: &mut [f64]) -> usize {
    let Some(first) = cols.first() else {
        return 0;
    };
    let n = cols
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    simd::map1_into(&first[..n], &mut out[..n], |v| v.to_f64());
    for col in &cols[1..] {
        let col = &col[..n];
        for (o, v) in out[..n].iter_mut().zip(col) {
            *o += v.to_f64();
        }
    }
    let inv = 1.0 / cols.len() as f64;
    simd::map1_inplace(&mut out[..n], |v| v * inv);
    n
}

/// Row-wise OR across mask columns: 1 if any column is non-zero.
pub fn any_n(masks: &[&[u8]], out: &mut [u8]) -> usize {
    let Some(first) = masks.first() else {
        return 0;
    };
    let n = masks
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    simd::map1_into(&first[..n], &mut out[..n], |b| (b != 0) as u8);
    for mask in &masks[1..] {
        simd::map2_inplace(&mut out[..n], &mask[..n], |acc, b| acc | (b != 0) as u8);
    }
    n
}

/// Row-wise AND across mask columns: 1 if every column is non-zero.
pub fn all_n(masks: &[&[u8]], out: &mut [u8]) -> usize {
    let Some(first) = masks.first() else {
        return 0;
    };
    let n = masks
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    simd::map1_into(&first[..n], &mut out[..n], |b| (b != 0) as u8);
    for mask in &masks[1..] {
        simd::map2_inplace(&mut out[..n], &mask[..n], |acc, b| acc & (b != 0) as u8);
    }
    n
}

/// Row-wise count of non-null values across float columns. For integer
/// columns every value counts.
pub fn count_non_null_n<T: Numeric>(cols: &[&[T]], out: &mut [u32]) -> usize {
    let n = cols
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    out[..n].fill(0);
    for col in cols {
        let col = &col[..n];
        for (o, v) in out[..n].iter_mut().zip(col) {
            *o += (!v.is_null()) as u32;
        }
    }
    n
}
