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

//! Error values produced by kernels that own allocations.
//!
//! Most kernels write into caller-provided slices and cannot fail; length
//! mismatches are clipped, not reported. The error surface is confined to
//! the handful of operations that allocate (joins, groupby handles, sort
//! scratch) and to aggregations invoked on inputs outside their domain.

use thiserror::Error;

/// Errors produced by allocating kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Transient or result-handle allocation failed.
    #[error("out of memory")]
    Oom,
    /// Input lengths disagree beyond what clipping can reconcile.
    #[error("length error")]
    Length,
    /// Input outside the operation's domain (e.g. variance of n < 2).
    #[error("domain error")]
    Domain,
}

pub type Result<T> = std::result::Result<T, Error>;
