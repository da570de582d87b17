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

//! Equi-joins over 64-bit integer keys.
//!
//! The result is a pair of equal-length signed index vectors owned by a
//! [`JoinResult`] handle. Inner joins emit one row per matching `(l, r)`
//! pair; left joins additionally emit `(l, -1)` once for each unmatched
//! left row. Result row order is not guaranteed stable: left indices
//! increase within each worker chunk, and chunks are concatenated in
//! worker index order. Callers requiring a canonical order sort
//! externally.
//!
//! Dispatch signals are data size, a sampled cardinality estimate, and
//! sortedness; the numeric thresholds here are the tunable part.

pub mod hash;
pub mod parallel;
pub mod radix;
pub mod sort_merge;

use tracing::debug;

use crate::error::{Error, Result};
use crate::sort::is_sorted;

/// Right-side size above which partitioned parallel joins pay off.
pub const PARALLEL_JOIN_MIN_RIGHT: usize = 50_000;
/// Left-side rows per probe task.
pub const PROBE_GRAIN: usize = 16 * 1024;

/// Owning join result: two equal-length signed index vectors. A right
/// index of `-1` marks an unmatched left row (left joins only).
pub struct JoinResult {
    left: Vec<i32>,
    right: Vec<i32>,
}

impl JoinResult {
    pub(crate) fn from_parts(left: Vec<i32>, right: Vec<i32>) -> Self {
        debug_assert_eq!(left.len(), right.len());
        JoinResult { left, right }
    }

    /// Number of result rows (`num_matches` for inner joins).
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn left_indices(&self) -> &[i32] {
        &self.left
    }

    pub fn right_indices(&self) -> &[i32] {
        &self.right
    }
}

/// Growable pair buffer with explicit out-of-memory reporting. Workers
/// own one each; the main thread concatenates them with block copies.
pub(crate) struct PairBuf {
    pub left: Vec<i32>,
    pub right: Vec<i32>,
}

impl PairBuf {
    pub fn with_capacity(cap: usize) -> Result<Self> {
        let mut left = Vec::new();
        left.try_reserve(cap).map_err(|_| Error::Oom)?;
        let mut right = Vec::new();
        right.try_reserve(cap).map_err(|_| Error::Oom)?;
        Ok(PairBuf { left, right })
    }

    #[inline(always)]
    pub fn push(&mut self, l: i32, r: i32) -> Result<()> {
        if self.left.len() == self.left.capacity() {
            let grow = self.left.capacity().max(16);
            self.left.try_reserve(grow).map_err(|_| Error::Oom)?;
            self.right.try_reserve(grow).map_err(|_| Error::Oom)?;
        }
        self.left.push(l);
        self.right.push(r);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn into_result(self) -> JoinResult {
        JoinResult::from_parts(self.left, self.right)
    }
}

/// Concatenate worker-local buffers into one exactly-sized result.
pub(crate) fn merge_chunks(chunks: Vec<PairBuf>) -> Result<JoinResult> {
    let total: usize = chunks.iter().map(PairBuf::len).sum();
    let mut out = PairBuf::with_capacity(total)?;
    for chunk in &chunks {
        out.left.extend_from_slice(&chunk.left);
        out.right.extend_from_slice(&chunk.right);
    }
    Ok(out.into_result())
}

/// Inner join dispatcher.
///
/// Large right sides go through the radix-partitioned parallel join,
/// falling back to the sequential chained join if the partitioned path
/// runs out of memory. Pre-sorted inputs take the sort-merge path.
pub fn inner_join_i64(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    if right.len() >= PARALLEL_JOIN_MIN_RIGHT && crate::config::max_threads() > 1 {
        debug!(
            left = left.len(),
            right = right.len(),
            "inner join: radix-partitioned parallel path"
        );
        match radix::radix_partitioned_inner_join(left, right) {
            Ok(res) => return Ok(res),
            Err(Error::Oom) => {
                debug!("inner join: partitioned path out of memory, retrying sequentially");
            }
            Err(e) => return Err(e),
        }
    }
    if is_sorted(left) && is_sorted(right) {
        debug!(
            left = left.len(),
            right = right.len(),
            "inner join: sort-merge path (pre-sorted)"
        );
        return sort_merge::sort_merge_inner_join(left, right);
    }
    hash::inner_join_chained(left, right)
}

/// Left join dispatcher. Large inputs probe in parallel chunks; the rest
/// run the sequential per-key-row-list join.
pub fn left_join_i64(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    if right.len() >= PARALLEL_JOIN_MIN_RIGHT
        && left.len() >= PROBE_GRAIN
        && crate::config::max_threads() > 1
    {
        debug!(
            left = left.len(),
            right = right.len(),
            "left join: parallel chunked probe"
        );
        match parallel::parallel_left_join(left, right) {
            Ok(res) => return Ok(res),
            Err(Error::Oom) => {
                debug!("left join: parallel path out of memory, retrying sequentially");
            }
            Err(e) => return Err(e),
        }
    }
    if is_sorted(left) && is_sorted(right) {
        return sort_merge::sort_merge_left_join(left, right);
    }
    hash::left_join_rows(left, right)
}
