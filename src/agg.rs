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

//! Vertical aggregations over a single column.
//!
//! All reductions run through the fixed accumulator tree in [`crate::simd`],
//! so for a given column length and build the float result is bit-identical
//! across runs. Across different lengths the tail path sums differently and
//! results may drift in the last ULPs.
//!
//! Empty input yields no value, except `sum` whose identity is 0.
//! Aggregations that divide (`mean`, `variance`) compute in `f64`
//! regardless of element type.

use crate::num::Numeric;
use crate::simd;

/// Wrapping (integer) / IEEE-754 (float) sum. Empty input sums to 0.
pub fn sum<T: Numeric>(data: &[T]) -> T {
    simd::reduce_tree(data, T::ZERO, |a, b| a.add_wrapping(b))
}

/// Smallest element, or `None` for empty input. A float NaN operand is
/// skipped per IEEE minNum.
pub fn min<T: Numeric>(data: &[T]) -> Option<T> {
    if data.is_empty() {
        return None;
    }
    Some(simd::reduce_tree(data, T::MAX_IDENT, |a, b| a.min_native(b)))
}

/// Largest element, or `None` for empty input.
pub fn max<T: Numeric>(data: &[T]) -> Option<T> {
    if data.is_empty() {
        return None;
    }
    Some(simd::reduce_tree(data, T::MIN_IDENT, |a, b| a.max_native(b)))
}

/// Arithmetic mean in `f64`, or `None` for empty input.
pub fn mean<T: Numeric>(data: &[T]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let total = simd::map_reduce_tree(data, 0.0f64, |v| v.to_f64(), |a, b| a + b);
    Some(total / data.len() as f64)
}

#[inline(always)]
fn sum_sq_dev<T: Numeric>(data: &[T], m: f64) -> f64 {
    simd::map_reduce_tree(
        data,
        0.0f64,
        |v| {
            let d = v.to_f64() - m;
            d * d
        },
        |a, b| a + b,
    )
}

/// Sample variance (divisor `n - 1`). Requires `n >= 2`.
pub fn variance<T: Numeric>(data: &[T]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    Some(sum_sq_dev(data, m) / (data.len() - 1) as f64)
}

/// Sample standard deviation. Requires `n >= 2`.
pub fn stddev<T: Numeric>(data: &[T]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Population variance (divisor `n`). Requires `n >= 1`.
pub fn variance_pop<T: Numeric>(data: &[T]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let m = mean(data)?;
    Some(sum_sq_dev(data, m) / data.len() as f64)
}

/// Population standard deviation. Requires `n >= 1`.
pub fn stddev_pop<T: Numeric>(data: &[T]) -> Option<f64> {
    variance_pop(data).map(f64::sqrt)
}

/// Count of non-null elements. For integer columns this is the length.
pub fn count_non_null<T: Numeric>(data: &[T]) -> usize {
    if !T::IS_FLOAT {
        return data.len();
    }
    simd::map_reduce_tree(data, 0usize, |v| (!v.is_null()) as usize, |a, b| a + b)
}
