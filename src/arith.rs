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

//! Elementwise arithmetic over numeric columns.
//!
//! Each operation comes in four shapes: vector∘vector and vector∘scalar,
//! each out-of-place and in-place. Integer arithmetic wraps; float
//! arithmetic propagates NaN/Inf per IEEE-754; division by zero is
//! delegated to the hardware. Lengths are clipped to the common minimum.
//! None of these kernels allocate and none can fail.

use crate::num::Numeric;
use crate::simd;

macro_rules! binary_op {
    ($vv:ident, $vs:ident, $vv_inplace:ident, $vs_inplace:ident, $method:ident, $sym:literal) => {
        #[doc = concat!("`out[i] = a[i] ", $sym, " b[i]`. Returns the clipped length.")]
        pub fn $vv<T: Numeric>(a: &[T], b: &[T], out: &mut [T]) -> usize {
            simd::map2_into(a, b, out, |x, y| x.$method(y))
        }

        #[doc = concat!("`out[i] = a[i] ", $sym, " s`. Returns the clipped length.")]
        pub fn $vs<T: Numeric>(a: &[T], s: T, out: &mut [T]) -> usize {
            simd::map1_into(a, out, |x| x.$method(s))
        }

        #[doc = concat!("`a[i] = a[i] ", $sym, " b[i]` in place.")]
        pub fn $vv_inplace<T: Numeric>(a: &mut [T], b: &[T]) {
            simd::map2_inplace(a, b, |x, y| x.$method(y))
        }

        #[doc = concat!("`a[i] = a[i] ", $sym, " s` in place.")]
        pub fn $vs_inplace<T: Numeric>(a: &mut [T], s: T) {
            simd::map1_inplace(a, |x| x.$method(s))
        }
    };
}

binary_op!(add, add_scalar, add_inplace, add_scalar_inplace, add_wrapping, "+");
binary_op!(sub, sub_scalar, sub_inplace, sub_scalar_inplace, sub_wrapping, "-");
binary_op!(mul, mul_scalar, mul_inplace, mul_scalar_inplace, mul_wrapping, "*");
binary_op!(div, div_scalar, div_inplace, div_scalar_inplace, div_native, "/");

/// `out[i] = -a[i]` (wrapping for integers).
pub fn neg<T: Numeric>(a: &[T], out: &mut [T]) -> usize {
    simd::map1_into(a, out, |x| x.neg_wrapping())
}

/// `out[i] = |a[i]|` (wrapping at the integer minimum).
pub fn abs<T: Numeric>(a: &[T], out: &mut [T]) -> usize {
    simd::map1_into(a, out, |x| x.abs_native())
}
