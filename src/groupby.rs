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

//! Group-id assignment: dense ids per distinct key, in first-occurrence
//! order.
//!
//! An open-address table (power-of-two capacity, linear probing) maps each
//! row's hash to a group id. When the key column is supplied, collisions
//! are disambiguated by comparing the row's key against the group's first
//! row; hash-only assignment trusts 64-bit hash equality. First-occurrence
//! order is the output contract: group 0 is the key of the earliest row.
//!
//! Assignment is sequential even under a multi-thread budget: the
//! ordering contract is cheaper to keep than to restore.

use crate::error::{Error, Result};
use crate::hash::fast_int_hash;

/// Open-address hash → group-id table shared by the assignment kernels.
/// `slots` holds the first row of each group, `slot_group` its id.
struct GroupTable {
    mask: usize,
    slots: Vec<i32>,
    slot_group: Vec<u32>,
}

impl GroupTable {
    fn with_rows(n: usize) -> Result<Self> {
        let cap = (n.max(8) * 2).next_power_of_two();
        let mut slots = Vec::new();
        slots.try_reserve_exact(cap).map_err(|_| Error::Oom)?;
        slots.resize(cap, -1i32);
        let mut slot_group = Vec::new();
        slot_group.try_reserve_exact(cap).map_err(|_| Error::Oom)?;
        slot_group.resize(cap, 0u32);
        Ok(GroupTable {
            mask: cap - 1,
            slots,
            slot_group,
        })
    }

    /// Group id for row `i`, inserting a fresh group when the key is new.
    /// `same_key(first_row)` decides whether row `i` belongs to the group
    /// whose first row is `first_row`.
    #[inline(always)]
    fn assign(
        &mut self,
        hash: u64,
        row: u32,
        num_groups: &mut u32,
        same_key: impl Fn(u32) -> bool,
    ) -> u32 {
        let mut slot = (hash as usize) & self.mask;
        loop {
            let head = self.slots[slot];
            if head < 0 {
                self.slots[slot] = row as i32;
                self.slot_group[slot] = *num_groups;
                let id = *num_groups;
                *num_groups += 1;
                return id;
            }
            if same_key(head as u32) {
                return self.slot_group[slot];
            }
            slot = (slot + 1) & self.mask;
        }
    }
}

/// Assign dense group ids from a precomputed hash column alone. Equal
/// hashes are treated as equal keys. Returns `num_groups`.
pub fn group_ids_from_hashes(hashes: &[u64], out_ids: &mut [u32]) -> Result<u32> {
    let n = hashes.len().min(out_ids.len());
    let mut table = GroupTable::with_rows(n)?;
    let mut num_groups = 0u32;
    for i in 0..n {
        let h = hashes[i];
        out_ids[i] = table.assign(h, i as u32, &mut num_groups, |head| {
            hashes[head as usize] == h
        });
    }
    Ok(num_groups)
}

/// Assign dense group ids with collision-safe key verification: the hash
/// routes to a slot, the key column decides group membership.
pub fn group_ids_i64(keys: &[i64], hashes: &[u64], out_ids: &mut [u32]) -> Result<u32> {
    let n = keys.len().min(hashes.len()).min(out_ids.len());
    let mut table = GroupTable::with_rows(n)?;
    let mut num_groups = 0u32;
    for i in 0..n {
        let k = keys[i];
        out_ids[i] = table.assign(hashes[i], i as u32, &mut num_groups, |head| {
            keys[head as usize] == k
        });
    }
    Ok(num_groups)
}

/// Owning result of a groupby computation: per-row group ids plus the
/// per-group first row and count, produced in one pass.
pub struct GroupbyResult {
    pub group_ids: Vec<u32>,
    pub num_groups: u32,
    pub first_row_idx: Vec<u32>,
    pub group_counts: Vec<u32>,
}

/// Group rows by a precomputed hash column, also emitting `first_row_idx`
/// and `group_counts` in the same pass.
pub fn groupby_compute(hashes: &[u64]) -> Result<GroupbyResult> {
    let n = hashes.len();
    let mut group_ids = Vec::new();
    group_ids.try_reserve_exact(n).map_err(|_| Error::Oom)?;
    let mut first_row_idx: Vec<u32> = Vec::new();
    let mut group_counts: Vec<u32> = Vec::new();
    let mut table = GroupTable::with_rows(n)?;
    let mut num_groups = 0u32;
    for i in 0..n {
        let h = hashes[i];
        let before = num_groups;
        let id = table.assign(h, i as u32, &mut num_groups, |head| {
            hashes[head as usize] == h
        });
        if num_groups > before {
            first_row_idx.push(i as u32);
            group_counts.push(1);
        } else {
            group_counts[id as usize] += 1;
        }
        group_ids.push(id);
    }
    Ok(GroupbyResult {
        group_ids,
        num_groups,
        first_row_idx,
        group_counts,
    })
}

/// Owning result of a fused groupby-sum: distinct keys in
/// first-occurrence order and their value sums.
pub struct GroupbySum {
    pub keys: Vec<i64>,
    pub sums: Vec<f64>,
    pub num_groups: u32,
}

/// Fused hash → group → sum over an i64 key column and f64 value column.
/// Lengths are clipped to the common minimum.
pub fn groupby_sum_i64_f64(keys: &[i64], values: &[f64]) -> Result<GroupbySum> {
    let n = keys.len().min(values.len());
    let mut table = GroupTable::with_rows(n)?;
    let mut out_keys: Vec<i64> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();
    let mut num_groups = 0u32;
    for i in 0..n {
        let k = keys[i];
        let before = num_groups;
        let id = table.assign(
            fast_int_hash(k as u64),
            i as u32,
            &mut num_groups,
            |head| keys[head as usize] == k,
        );
        if num_groups > before {
            out_keys.push(k);
            sums.push(values[i]);
        } else {
            sums[id as usize] += values[i];
        }
    }
    Ok(GroupbySum {
        keys: out_keys,
        sums,
        num_groups,
    })
}

/// Owning result of a fused multi-aggregate groupby.
pub struct GroupbyMultiAgg {
    pub keys: Vec<i64>,
    pub sums: Vec<f64>,
    pub mins: Vec<f64>,
    pub maxs: Vec<f64>,
    pub counts: Vec<u32>,
    pub num_groups: u32,
}

/// Fused hash → group → {sum, min, max, count} in one pass.
pub fn groupby_multi_agg_i64_f64(keys: &[i64], values: &[f64]) -> Result<GroupbyMultiAgg> {
    let n = keys.len().min(values.len());
    let mut table = GroupTable::with_rows(n)?;
    let mut out_keys: Vec<i64> = Vec::new();
    let mut sums: Vec<f64> = Vec::new();
    let mut mins: Vec<f64> = Vec::new();
    let mut maxs: Vec<f64> = Vec::new();
    let mut counts: Vec<u32> = Vec::new();
    let mut num_groups = 0u32;
    for i in 0..n {
        let k = keys[i];
        let v = values[i];
        let before = num_groups;
        let id = table.assign(
            fast_int_hash(k as u64),
            i as u32,
            &mut num_groups,
            |head| keys[head as usize] == k,
        );
        if num_groups > before {
            out_keys.push(k);
            sums.push(v);
            mins.push(v);
            maxs.push(v);
            counts.push(1);
        } else {
            let g = id as usize;
            sums[g] += v;
            mins[g] = mins[g].min(v);
            maxs[g] = maxs[g].max(v);
            counts[g] += 1;
        }
    }
    Ok(GroupbyMultiAgg {
        keys: out_keys,
        sums,
        mins,
        maxs,
        counts,
        num_groups,
    })
}
