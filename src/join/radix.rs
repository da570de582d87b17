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

//! Radix-partitioned hash join.
//!
//! Both sides are partitioned by the high bits of the key hash, giving P
//! disjoint sub-joins with no shared state: rows whose hashes disagree in
//! the top bits can never match. Each partition builds and probes
//! independently on the worker pool into a private buffer; the main
//! thread concatenates the buffers. Used for large build sides where
//! per-partition tables fit cache far better than one monolithic table.

use rayon::prelude::*;

use crate::config;
use crate::error::Result;
use crate::hash::fast_int_hash;
use crate::pool;

use super::hash::ChainedTable;
use super::{merge_chunks, JoinResult, PairBuf};

/// Partition count for the current thread budget: the next power of two
/// above twice the budget, within `[4, 64]`.
fn partition_count() -> usize {
    (config::max_threads() * 2).next_power_of_two().clamp(4, 64)
}

struct Partitions {
    /// Original row index per partition, in row order.
    rows: Vec<Vec<u32>>,
    /// Keys per partition, parallel to `rows`.
    keys: Vec<Vec<i64>>,
}

fn partition_side(side: &[i64], nparts: usize, shift: u32) -> Partitions {
    let mut counts = vec![0usize; nparts];
    for &key in side {
        counts[(fast_int_hash(key as u64) >> shift) as usize] += 1;
    }
    let mut rows: Vec<Vec<u32>> = counts.iter().map(|&c| Vec::with_capacity(c)).collect();
    let mut keys: Vec<Vec<i64>> = counts.iter().map(|&c| Vec::with_capacity(c)).collect();
    for (row, &key) in side.iter().enumerate() {
        let p = (fast_int_hash(key as u64) >> shift) as usize;
        rows[p].push(row as u32);
        keys[p].push(key);
    }
    Partitions { rows, keys }
}

/// Inner join with partitioned build and probe. Matches the chained join
/// row for row; only the result order differs (partition-major).
pub fn radix_partitioned_inner_join(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let nparts = partition_count();
    let shift = 64 - nparts.trailing_zeros();
    let lparts = partition_side(left, nparts, shift);
    let rparts = partition_side(right, nparts, shift);

    let results: Vec<Result<PairBuf>> = pool::install(|| {
        (0..nparts)
            .into_par_iter()
            .map(|p| {
                let lkeys = &lparts.keys[p];
                let lrows = &lparts.rows[p];
                let rrows = &rparts.rows[p];
                let table = ChainedTable::build(&rparts.keys[p])?;
                let mut buf = PairBuf::with_capacity(lkeys.len())?;
                for (i, &key) in lkeys.iter().enumerate() {
                    table.probe_remapped_into(key, lrows[i] as i32, rrows, &mut buf)?;
                }
                Ok(buf)
            })
            .collect()
    });
    let chunks: Vec<PairBuf> = results.into_iter().collect::<Result<_>>()?;
    merge_chunks(chunks)
}
