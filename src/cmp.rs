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

//! Elementwise comparison producing byte-mask columns.
//!
//! Masks are `u8` columns holding exactly `0` or `1`. Comparisons against
//! NaN follow native float semantics (always false), so an all-NaN column
//! compares equal to nothing, including itself.

use crate::num::Numeric;
use crate::simd;

macro_rules! cmp_op {
    ($vv:ident, $vs:ident, $op:tt, $sym:literal) => {
        #[doc = concat!("`out[i] = (a[i] ", $sym, " b[i]) as u8`. Returns the clipped length.")]
        pub fn $vv<T: Numeric>(a: &[T], b: &[T], out: &mut [u8]) -> usize {
            simd::map2_into(a, b, out, |x, y| (x $op y) as u8)
        }

        #[doc = concat!("`out[i] = (a[i] ", $sym, " s) as u8`. Returns the clipped length.")]
        pub fn $vs<T: Numeric>(a: &[T], s: T, out: &mut [u8]) -> usize {
            simd::map1_into(a, out, |x| (x $op s) as u8)
        }
    };
}

cmp_op!(lt, lt_scalar, <, "<");
cmp_op!(le, le_scalar, <=, "<=");
cmp_op!(gt, gt_scalar, >, ">");
cmp_op!(ge, ge_scalar, >=, ">=");
cmp_op!(eq, eq_scalar, ==, "==");
cmp_op!(ne, ne_scalar, !=, "!=");
