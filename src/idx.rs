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

//! Per-key row lists.
//!
//! One of three row-sharing-a-key representations in the crate, used where
//! the full set of rows per key must be materialized before use (left-join
//! build). The others are the head/next chained table (inner hash-join
//! build, `join::hash`) and counting-sort runs (radix groupby-agg path).
//! Most keys hold few rows, so the list is inline up to 4 entries and
//! spills to the heap on the fifth push.

use smallvec::SmallVec;

use crate::hash::fast_int_hash;

/// Row list with inline capacity 4.
pub type IdxVec = SmallVec<[u32; 4]>;

/// Open-address table from i64 key to the rows holding it, in insertion
/// order within each key. Capacity is a power of two at ≥2× load.
pub struct KeyRows {
    mask: u64,
    // Slot -> index into `keys`/`rows`, or -1 for empty.
    slots: Vec<i32>,
    keys: Vec<i64>,
    rows: Vec<IdxVec>,
}

impl KeyRows {
    /// Build the table from a key column.
    pub fn build(keys: &[i64]) -> Self {
        let cap = (keys.len() * 2).next_power_of_two().max(16);
        let mut table = KeyRows {
            mask: (cap - 1) as u64,
            slots: vec![-1; cap],
            keys: Vec::new(),
            rows: Vec::new(),
        };
        for (row, &key) in keys.iter().enumerate() {
            table.push(key, row as u32);
        }
        table
    }

    fn push(&mut self, key: i64, row: u32) {
        let mut slot = (fast_int_hash(key as u64) & self.mask) as usize;
        loop {
            let entry = self.slots[slot];
            if entry < 0 {
                self.slots[slot] = self.keys.len() as i32;
                self.keys.push(key);
                let mut list = IdxVec::new();
                list.push(row);
                self.rows.push(list);
                return;
            }
            if self.keys[entry as usize] == key {
                self.rows[entry as usize].push(row);
                return;
            }
            slot = (slot + 1) & self.mask as usize;
        }
    }

    /// Rows holding `key`, in insertion order, or `None` if absent.
    pub fn get(&self, key: i64) -> Option<&[u32]> {
        let mut slot = (fast_int_hash(key as u64) & self.mask) as usize;
        loop {
            let entry = self.slots[slot];
            if entry < 0 {
                return None;
            }
            if self.keys[entry as usize] == key {
                return Some(self.rows[entry as usize].as_slice());
            }
            slot = (slot + 1) & self.mask as usize;
        }
    }

    /// Number of distinct keys.
    pub fn num_keys(&self) -> usize {
        self.keys.len()
    }
}
