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

//! Numeric primitive bound for kernel monomorphization.
//!
//! Every kernel is generic over [`Numeric`] and compiles to scalar and
//! vector code specialized per element type. Integer arithmetic wraps;
//! float arithmetic follows IEEE-754. The float null sentinel is NaN
//! (`x != x`); integers have no null concept and `is_null` is
//! constant-false, which the optimizer deletes from integer instantiations.

/// Fixed-width numeric column element: `i32`, `i64`, `f32`, `f64`.
pub trait Numeric: Copy + PartialEq + PartialOrd + Send + Sync + 'static {
    const ZERO: Self;
    const ONE: Self;
    /// Initializer for min-reductions (largest representable value).
    const MAX_IDENT: Self;
    /// Initializer for max-reductions (smallest representable value).
    const MIN_IDENT: Self;
    /// What a missing value is filled with: NaN for floats, 0 for integers.
    const NULL_FILL: Self;
    const IS_FLOAT: bool;

    fn add_wrapping(self, rhs: Self) -> Self;
    fn sub_wrapping(self, rhs: Self) -> Self;
    fn mul_wrapping(self, rhs: Self) -> Self;
    /// Hardware division semantics: floats yield ±Inf/NaN on zero
    /// divisors, integer division by zero traps.
    fn div_native(self, rhs: Self) -> Self;
    fn neg_wrapping(self) -> Self;
    fn abs_native(self) -> Self;
    fn min_native(self, rhs: Self) -> Self;
    fn max_native(self, rhs: Self) -> Self;
    /// True only for float NaN.
    fn is_null(self) -> bool;
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

macro_rules! numeric_int {
    ($t:ty) => {
        impl Numeric for $t {
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const MAX_IDENT: Self = <$t>::MAX;
            const MIN_IDENT: Self = <$t>::MIN;
            const NULL_FILL: Self = 0;
            const IS_FLOAT: bool = false;

            #[inline(always)]
            fn add_wrapping(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline(always)]
            fn sub_wrapping(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline(always)]
            fn mul_wrapping(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline(always)]
            fn div_native(self, rhs: Self) -> Self {
                self / rhs
            }
            #[inline(always)]
            fn neg_wrapping(self) -> Self {
                self.wrapping_neg()
            }
            #[inline(always)]
            fn abs_native(self) -> Self {
                self.wrapping_abs()
            }
            #[inline(always)]
            fn min_native(self, rhs: Self) -> Self {
                if rhs < self {
                    rhs
                } else {
                    self
                }
            }
            #[inline(always)]
            fn max_native(self, rhs: Self) -> Self {
                if rhs > self {
                    rhs
                } else {
                    self
                }
            }
            #[inline(always)]
            fn is_null(self) -> bool {
                false
            }
            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline(always)]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

macro_rules! numeric_float {
    ($t:ty) => {
        impl Numeric for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const MAX_IDENT: Self = <$t>::MAX;
            const MIN_IDENT: Self = <$t>::MIN;
            const NULL_FILL: Self = <$t>::NAN;
            const IS_FLOAT: bool = true;

            #[inline(always)]
            fn add_wrapping(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn sub_wrapping(self, rhs: Self) -> Self {
                self - rhs
            }
            #[inline(always)]
            fn mul_wrapping(self, rhs: Self) -> Self {
                self * rhs
            }
            #[inline(always)]
            fn div_native(self, rhs: Self) -> Self {
                self / rhs
            }
            #[inline(always)]
            fn neg_wrapping(self) -> Self {
                -self
            }
            #[inline(always)]
            fn abs_native(self) -> Self {
                self.abs()
            }
            // IEEE minNum/maxNum: a NaN operand is skipped, matching the
            // native-FP null model (nulls do not poison min/max).
            #[inline(always)]
            fn min_native(self, rhs: Self) -> Self {
                self.min(rhs)
            }
            #[inline(always)]
            fn max_native(self, rhs: Self) -> Self {
                self.max(rhs)
            }
            #[inline(always)]
            fn is_null(self) -> bool {
                self != self
            }
            #[inline(always)]
            fn to_f64(self) -> f64 {
                self as f64
            }
            #[inline(always)]
            fn from_f64(v: f64) -> Self {
                v as $t
            }
        }
    };
}

numeric_int!(i32);
numeric_int!(i64);
numeric_float!(f32);
numeric_float!(f64);
