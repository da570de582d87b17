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

//! Hash-join build and probe.
//!
//! The build side (right) goes into either a chained table (`head` +
//! `next[]` index-linked lists, keys copied adjacent for a contiguous hot
//! path) or an open-addressing table at ≤50% load with inline keys. Table
//! capacity comes from a sampled cardinality estimate. Probing walks the
//! left side sequentially or four keys in lockstep with slot prefetch.

use crate::error::{Error, Result};
use crate::hash::fast_int_hash;
use crate::idx::KeyRows;
use crate::simd::prefetch_read;

use super::{JoinResult, PairBuf};

/// Positions sampled by the cardinality estimator.
const SAMPLE_POSITIONS: usize = 256;
/// Hash buckets the sample is thrown into. Power of two.
const SAMPLE_BUCKETS: usize = 512;

/// Estimate the distinct-key count by sampling up to 256 positions into
/// 512 hash buckets and correcting for bucket collisions
/// (`-B·ln(1 - m/B)` occupancy inversion), scaled to the full column.
pub(crate) fn estimate_unique(keys: &[i64]) -> usize {
    let n = keys.len();
    if n == 0 {
        return 0;
    }
    let sample = n.min(SAMPLE_POSITIONS);
    let step = (n / sample).max(1);
    let mut seen = [false; SAMPLE_BUCKETS];
    let mut occupied = 0usize;
    let mut pos = 0;
    for _ in 0..sample {
        let b = (fast_int_hash(keys[pos] as u64) as usize) & (SAMPLE_BUCKETS - 1);
        if !seen[b] {
            seen[b] = true;
            occupied += 1;
        }
        pos += step;
        if pos >= n {
            pos -= n;
        }
    }
    let bf = SAMPLE_BUCKETS as f64;
    let distinct_in_sample = if occupied == SAMPLE_BUCKETS {
        sample as f64
    } else {
        -bf * (1.0 - occupied as f64 / bf).ln()
    };
    let scaled = distinct_in_sample * (n as f64 / sample as f64);
    (scaled.ceil() as usize).clamp(1, n)
}

/// Power-of-two slot count targeting ~1.5 average chain length on the
/// estimated distinct count, clamped to a quarter and sixteen times the
/// row count.
pub(crate) fn table_capacity(n_rows: usize, est_unique: usize) -> usize {
    let target = est_unique.saturating_mul(3) / 2;
    let lo = (n_rows / 4).max(16);
    let hi = n_rows.saturating_mul(16).max(16);
    target.clamp(lo, hi).next_power_of_two()
}

/// Chained hash table over the build side. `heads[slot]` is the newest
/// row in the chain, `next[row]` the next row sharing the slot, `-1` ends
/// a chain. Keys are copied next to `next` so chain walks stay on hot
/// cache lines.
pub(crate) struct ChainedTable {
    mask: usize,
    heads: Vec<i32>,
    next: Vec<i32>,
    keys: Vec<i64>,
}

impl ChainedTable {
    pub fn build(right_keys: &[i64]) -> Result<Self> {
        let n = right_keys.len();
        let cap = table_capacity(n, estimate_unique(right_keys));
        let mut heads = Vec::new();
        heads.try_reserve_exact(cap).map_err(|_| Error::Oom)?;
        heads.resize(cap, -1i32);
        let mut next = Vec::new();
        next.try_reserve_exact(n).map_err(|_| Error::Oom)?;
        next.resize(n, -1i32);
        let mut keys = Vec::new();
        keys.try_reserve_exact(n).map_err(|_| Error::Oom)?;
        keys.extend_from_slice(right_keys);
        let mask = cap - 1;
        let mut table = ChainedTable {
            mask,
            heads,
            next,
            keys,
        };
        for r in 0..n {
            let slot = (fast_int_hash(right_keys[r] as u64) as usize) & mask;
            table.next[r] = table.heads[slot];
            table.heads[slot] = r as i32;
        }
        Ok(table)
    }

    #[inline(always)]
    pub fn slot_of(&self, key: i64) -> usize {
        (fast_int_hash(key as u64) as usize) & self.mask
    }

    /// Walk the chain for `key`, appending `(left_row, r)` for every
    /// matching right row.
    #[inline(always)]
    pub fn probe_into(&self, key: i64, left_row: i32, out: &mut PairBuf) -> Result<()> {
        let mut r = self.heads[self.slot_of(key)];
        while r >= 0 {
            let row = r as usize;
            if self.keys[row] == key {
                out.push(left_row, r)?;
            }
            r = self.next[row];
        }
        Ok(())
    }

    /// As [`probe_into`] but emitting `row_map[r]` instead of the local
    /// row `r`. Partitioned joins build tables over partition-local rows
    /// and remap to original indices on emit.
    #[inline(always)]
    pub fn probe_remapped_into(
        &self,
        key: i64,
        left_row: i32,
        row_map: &[u32],
        out: &mut PairBuf,
    ) -> Result<()> {
        let mut r = self.heads[self.slot_of(key)];
        while r >= 0 {
            let row = r as usize;
            if self.keys[row] == key {
                out.push(left_row, row_map[row] as i32)?;
            }
            r = self.next[row];
        }
        Ok(())
    }

    /// As [`probe_into`] but reports whether anything matched, for left
    /// joins.
    #[inline(always)]
    pub fn probe_into_counted(&self, key: i64, left_row: i32, out: &mut PairBuf) -> Result<bool> {
        let mut matched = false;
        let mut r = self.heads[self.slot_of(key)];
        while r >= 0 {
            let row = r as usize;
            if self.keys[row] == key {
                out.push(left_row, r)?;
                matched = true;
            }
            r = self.next[row];
        }
        Ok(matched)
    }
}

/// Sequential chained hash join: build the right side, probe each left
/// row in order.
pub fn inner_join_chained(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = ChainedTable::build(right)?;
    let mut out = PairBuf::with_capacity(left.len())?;
    probe_chunk(&table, left, 0, &mut out)?;
    Ok(out.into_result())
}

/// Probe `left` rows (numbered from `base`) against the table. Shared by
/// the sequential and the parallel chunked paths.
pub(crate) fn probe_chunk(
    table: &ChainedTable,
    left: &[i64],
    base: usize,
    out: &mut PairBuf,
) -> Result<()> {
    for (i, &key) in left.iter().enumerate() {
        table.probe_into(key, (base + i) as i32, out)?;
    }
    Ok(())
}

/// Batched probe: four left keys in lockstep. The four slots are hashed
/// and prefetched together, then each chain is walked while the next
/// chain element is prefetched.
pub fn inner_join_chained_batched(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = ChainedTable::build(right)?;
    let mut out = PairBuf::with_capacity(left.len())?;
    let n = left.len();
    let mut i = 0;
    while i + 4 <= n {
        let mut slots = [0usize; 4];
        for j in 0..4 {
            slots[j] = table.slot_of(left[i + j]);
            prefetch_read(&table.heads[slots[j]]);
        }
        for j in 0..4 {
            let key = left[i + j];
            let mut r = table.heads[slots[j]];
            while r >= 0 {
                let row = r as usize;
                let n_next = table.next[row];
                if n_next >= 0 {
                    prefetch_read(&table.keys[n_next as usize]);
                }
                if table.keys[row] == key {
                    out.push((i + j) as i32, r)?;
                }
                r = n_next;
            }
        }
        i += 4;
    }
    while i < n {
        table.probe_into(left[i], i as i32, &mut out)?;
        i += 1;
    }
    Ok(out.into_result())
}

/// Open-addressing inner join: `{key, row}` slots at ≤50% load, linear
/// probing, every build row in its own slot. Two passes: the first
/// counts matches without allocating, the second fills an exactly-sized
/// result.
pub fn inner_join_open_addressing(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let n = right.len();
    let cap = (n.max(8) * 2).next_power_of_two();
    let mask = cap - 1;
    let mut slot_keys = Vec::new();
    slot_keys.try_reserve_exact(cap).map_err(|_| Error::Oom)?;
    slot_keys.resize(cap, 0i64);
    let mut slot_rows = Vec::new();
    slot_rows.try_reserve_exact(cap).map_err(|_| Error::Oom)?;
    slot_rows.resize(cap, -1i32);
    for (r, &key) in right.iter().enumerate() {
        let mut slot = (fast_int_hash(key as u64) as usize) & mask;
        while slot_rows[slot] >= 0 {
            slot = (slot + 1) & mask;
        }
        slot_rows[slot] = r as i32;
        slot_keys[slot] = key;
    }

    // Pass 1: exact match count.
    let mut matches = 0usize;
    for &key in left {
        let mut slot = (fast_int_hash(key as u64) as usize) & mask;
        while slot_rows[slot] >= 0 {
            matches += (slot_keys[slot] == key) as usize;
            slot = (slot + 1) & mask;
        }
    }

    // Pass 2: fill exactly.
    let mut out = PairBuf::with_capacity(matches)?;
    for (l, &key) in left.iter().enumerate() {
        let mut slot = (fast_int_hash(key as u64) as usize) & mask;
        while slot_rows[slot] >= 0 {
            if slot_keys[slot] == key {
                out.push(l as i32, slot_rows[slot])?;
            }
            slot = (slot + 1) & mask;
        }
    }
    Ok(out.into_result())
}

/// Sequential left join over per-key row lists: every left row emits its
/// matches in right-row order, or `(l, -1)` when the key is absent.
pub fn left_join_rows(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = KeyRows::build(right);
    let mut out = PairBuf::with_capacity(left.len())?;
    for (l, &key) in left.iter().enumerate() {
        match table.get(key) {
            Some(rows) => {
                for &r in rows {
                    out.push(l as i32, r as i32)?;
                }
            }
            None => out.push(l as i32, -1)?,
        }
    }
    Ok(out.into_result())
}

/// Sequential left join over the chained table. Kept alongside
/// [`left_join_rows`] for the parallel path, which reuses the chained
/// build.
pub fn left_join_chained(left: &[i64], right: &[i64]) -> Result<JoinResult> {
    let table = ChainedTable::build(right)?;
    let mut out = PairBuf::with_capacity(left.len())?;
    for (l, &key) in left.iter().enumerate() {
        if !table.probe_into_counted(key, l as i32, &mut out)? {
            out.push(l as i32, -1)?;
        }
    }
    Ok(out.into_result())
}
