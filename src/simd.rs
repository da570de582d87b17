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

//! Three-stage kernel skeletons shared by every elementwise and reduction
//! kernel in the crate.
//!
//! A kernel body is written once as a scalar closure; these skeletons run
//! it through an unrolled loop of `UNROLL` independent `VECTOR_WIDTH`-wide
//! blocks, a single-vector loop for the next remainder, and a scalar tail.
//! All inner loops are over fixed-width sub-slices so the compiler
//! vectorizes them to the target's lane count.
//!
//! Reductions keep `UNROLL * VECTOR_WIDTH` accumulators and combine them
//! in a fixed tree shape at the end. For a given input length and build
//! the float result is therefore bit-identical across runs.

use crate::config::{CHUNK, UNROLL, VECTOR_WIDTH};

// The accumulator combine below folds exactly four accumulator rows.
const _: () = assert!(UNROLL == 4);

/// `out[i] = f(a[i])` over `min(len(a), len(out))` elements. Returns the
/// clipped length.
#[inline(always)]
pub fn map1_into<T: Copy, U: Copy>(a: &[T], out: &mut [U], f: impl Fn(T) -> U + Copy) -> usize {
    let n = a.len().min(out.len());
    let a = &a[..n];
    let out = &mut out[..n];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                out[base + j] = f(a[base + j]);
            }
        }
        i += CHUNK;
    }
    while i + VECTOR_WIDTH <= n {
        for j in 0..VECTOR_WIDTH {
            out[i + j] = f(a[i + j]);
        }
        i += VECTOR_WIDTH;
    }
    while i < n {
        out[i] = f(a[i]);
        i += 1;
    }
    n
}

/// `out[i] = f(a[i], b[i])` over the clipped common length.
#[inline(always)]
pub fn map2_into<T: Copy, U: Copy>(
    a: &[T],
    b: &[T],
    out: &mut [U],
    f: impl Fn(T, T) -> U + Copy,
) -> usize {
    let n = a.len().min(b.len()).min(out.len());
    let a = &a[..n];
    let b = &b[..n];
    let out = &mut out[..n];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                out[base + j] = f(a[base + j], b[base + j]);
            }
        }
        i += CHUNK;
    }
    while i + VECTOR_WIDTH <= n {
        for j in 0..VECTOR_WIDTH {
            out[i + j] = f(a[i + j], b[i + j]);
        }
        i += VECTOR_WIDTH;
    }
    while i < n {
        out[i] = f(a[i], b[i]);
        i += 1;
    }
    n
}

/// In-place `a[i] = f(a[i])`.
#[inline(always)]
pub fn map1_inplace<T: Copy>(a: &mut [T], f: impl Fn(T) -> T + Copy) {
    let n = a.len();
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                a[base + j] = f(a[base + j]);
            }
        }
        i += CHUNK;
    }
    while i < n {
        a[i] = f(a[i]);
        i += 1;
    }
}

/// In-place `a[i] = f(a[i], b[i])` over the clipped common length.
#[inline(always)]
pub fn map2_inplace<T: Copy>(a: &mut [T], b: &[T], f: impl Fn(T, T) -> T + Copy) {
    let n = a.len().min(b.len());
    let a = &mut a[..n];
    let b = &b[..n];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                a[base + j] = f(a[base + j], b[base + j]);
            }
        }
        i += CHUNK;
    }
    while i < n {
        a[i] = f(a[i], b[i]);
        i += 1;
    }
}

/// Tree reduction with `UNROLL * VECTOR_WIDTH` accumulators and a fixed
/// combine order: accumulator rows pairwise, then a binary lane tree, then
/// the scalar tail folded sequentially.
#[inline(always)]
pub fn reduce_tree<T: Copy>(data: &[T], ident: T, f: impl Fn(T, T) -> T + Copy) -> T {
    map_reduce_tree(data, ident, |v| v, f)
}

/// As [`reduce_tree`] but maps each element through `m` first. Used where
/// the accumulation domain differs from the element type (mean and
/// variance accumulate `f64`).
#[inline(always)]
pub fn map_reduce_tree<T: Copy, A: Copy>(
    data: &[T],
    ident: A,
    m: impl Fn(T) -> A + Copy,
    f: impl Fn(A, A) -> A + Copy,
) -> A {
    let n = data.len();
    let mut acc = [[ident; VECTOR_WIDTH]; UNROLL];
    let mut i = 0;
    while i + CHUNK <= n {
        for k in 0..UNROLL {
            let base = i + k * VECTOR_WIDTH;
            for j in 0..VECTOR_WIDTH {
                acc[k][j] = f(acc[k][j], m(data[base + j]));
            }
        }
        i += CHUNK;
    }
    while i + VECTOR_WIDTH <= n {
        for j in 0..VECTOR_WIDTH {
            acc[0][j] = f(acc[0][j], m(data[i + j]));
        }
        i += VECTOR_WIDTH;
    }
    // (0,1) and (2,3) first, then across, then the binary lane tree.
    let mut lanes = [ident; VECTOR_WIDTH];
    for j in 0..VECTOR_WIDTH {
        let a01 = f(acc[0][j], acc[1][j]);
        let a23 = f(acc[2][j], acc[3][j]);
        lanes[j] = f(a01, a23);
    }
    let mut width = VECTOR_WIDTH / 2;
    while width > 0 {
        for j in 0..width {
            lanes[j] = f(lanes[j], lanes[j + width]);
        }
        width /= 2;
    }
    let mut r = lanes[0];
    while i < n {
        r = f(r, m(data[i]));
        i += 1;
    }
    r
}

/// Hint the CPU to pull the cache line at `ptr` before it is needed.
/// No-op on targets without a stable prefetch primitive.
#[inline(always)]
pub(crate) fn prefetch_read<T>(ptr: *const T) {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: prefetch is a hint and never faults, even on wild addresses.
    unsafe {
        core::arch::x86_64::_mm_prefetch::<{ core::arch::x86_64::_MM_HINT_T0 }>(ptr as *const i8);
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = ptr;
    }
}
