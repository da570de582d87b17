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

//! Parallel hash joins: chunked probe over worker-local buffers.
//!
//! The probe side splits into grain-sized chunks; each worker probes its
//! chunk into a private growable buffer with no synchronization, and the
//! main thread merges the buffers into one contiguous result with block
//! copies after the barrier. Left indices therefore increase within each
//! chunk, and chunks land in worker index order. Any allocation failure
//! in any worker fails the whole operation with out-of-memory; partial
//! buffers are dropped before returning.

use rayon::prelude::*;

use crate::error::Result;
use crate::pool;

use super::hash::{probe_chunk, ChainedTable};
use super::{merge_chunks, JoinResult, PairBuf, PROBE_GRAIN};

/// Parallel inner join: sequential chained build, then parallel chunked
/// probe.
pub fn parallel_inner_join(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = ChainedTable::build(right)?;
    let chunks = probe_chunks_inner(&table, left)?;
    merge_chunks(chunks)
}

/// Probe `left` in parallel chunks against an already-built table.
pub(crate) fn probe_chunks_inner(table: &ChainedTable, left: &[i64]) -> Result<Vec<PairBuf>> {
    let results: Vec<Result<PairBuf>> = pool::install(|| {
        left.par_chunks(PROBE_GRAIN)
            .enumerate()
            .map(|(c, chunk)| {
                // Initial capacity assumes roughly one match per probe row.
                let mut buf = PairBuf::with_capacity(chunk.len())?;
                probe_chunk(table, chunk, c * PROBE_GRAIN, &mut buf)?;
                Ok(buf)
            })
            .collect()
    });
    results.into_iter().collect()
}

/// Parallel left join: chained build, parallel chunked probe emitting
/// `(l, -1)` for unmatched rows.
pub fn parallel_left_join(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = ChainedTable::build(right)?;
    let results: Vec<Result<PairBuf>> = pool::install(|| {
        left.par_chunks(PROBE_GRAIN)
            .enumerate()
            .map(|(c, chunk)| {
                let base = c * PROBE_GRAIN;
                let mut buf = PairBuf::with_capacity(chunk.len())?;
                for (i, &key) in chunk.iter().enumerate() {
                    let l = (base + i) as i32;
                    if !table.probe_into_counted(key, l, &mut buf)? {
                        buf.push(l, -1)?;
                    }
                }
                Ok(buf)
            })
            .collect()
    });
    let chunks: Vec<PairBuf> = results.into_iter().collect::<Result<_>>()?;
    merge_chunks(chunks)
}
