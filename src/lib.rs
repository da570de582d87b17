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

//! basalt: vectorized columnar compute kernels for dataframe engines.
//!
//! A flat library of cache- and SIMD-aware primitives implementing the
//! inner loops of relational operators over contiguous columns of
//! fixed-width numeric data: elementwise arithmetic and comparison,
//! filtering, vertical and horizontal aggregation, null handling,
//! hashing, argsort, groupby, joins, and window functions.
//!
//! The surrounding dataframe machinery (column/table API, planner,
//! I/O, logical types, validity bitmaps) lives in the collaborator,
//! which consumes this crate either as a Rust library or through the
//! `bs_*` C ABI in [`ffi`].
//!
//! Conventions shared by every kernel:
//!
//! - Callers size output buffers per the kernel's contract; lengths are
//!   clipped to the common minimum and the kernel never allocates
//!   columns. Joins and groupby return owning handles instead.
//! - The float null sentinel is NaN (`x != x`); integer and byte
//!   columns have no null concept.
//! - Byte masks hold exactly 0 or 1 when produced here; any non-zero
//!   byte reads as true.
//! - Reductions use a fixed accumulator-tree shape, so float results
//!   are bit-identical across runs for the same input length and build.
//! - Kernels are single-threaded unless named `*_parallel` or routed to
//!   a parallel path by a dispatcher; parallel kernels run on a pool
//!   sized by [`config::max_threads`] and join before returning.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod agg;
pub mod arith;
pub mod cmp;
pub mod cond;
pub mod config;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod fold;
pub mod gather;
pub mod groupby;
pub mod groupby_agg;
pub mod hash;
pub mod idx;
pub mod join;
pub mod num;
pub mod pool;
pub mod simd;
pub mod sort;
pub mod window;

pub use config::{CHUNK, MAX_THREADS, UNROLL, VECTOR_WIDTH};
pub use error::{Error, Result};
pub use groupby::{GroupbyMultiAgg, GroupbyResult, GroupbySum};
pub use idx::IdxVec;
pub use join::JoinResult;
pub use num::Numeric;
