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

//! Permutation of a source column by an index vector.
//!
//! Selection vectors come in two flavors: unsigned `u32` indices (filter
//! output, argsort output) and signed `i32` indices where `-1` encodes a
//! missing row (join output). A missing or out-of-range index writes the
//! type's null fill: NaN for floats, 0 for integers.

use crate::num::Numeric;
use crate::simd::prefetch_read;

/// `out[i] = src[indices[i]]` over `min(len(indices), len(out))` rows.
/// Out-of-range indices write the null fill.
pub fn gather<T: Numeric>(src: &[T], indices: &[u32], out: &mut [T]) -> usize {
    let n = indices.len().min(out.len());
    for i in 0..n {
        if i + 8 < n {
            let ahead = indices[i + 8] as usize;
            if ahead < src.len() {
                prefetch_read(&src[ahead]);
            }
        }
        let idx = indices[i] as usize;
        out[i] = if idx < src.len() { src[idx] } else { T::NULL_FILL };
    }
    n
}

/// As [`gather`], for signed indices: `-1` (and any other out-of-range
/// index) writes the null fill. This is the shape join results arrive in.
pub fn gather_signed<T: Numeric>(src: &[T], indices: &[i32], out: &mut [T]) -> usize {
    let n = indices.len().min(out.len());
    for i in 0..n {
        let idx = indices[i];
        out[i] = if idx >= 0 && (idx as usize) < src.len() {
            src[idx as usize]
        } else {
            T::NULL_FILL
        };
    }
    n
}
