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

//! Column hashing for joins and groupby.
//!
//! Two quality levels. The fast path is two rounds of multiply-xorshift
//! and is the single hash every table build and probe in this crate uses;
//! a table and its probes always agree by construction. The high-quality
//! path is a 128-bit widening multiply folded with three secret constants,
//! used for multi-column key combination where collision rate matters more
//! than throughput.
//!
//! Hashing is deterministic: identical input produces bit-identical
//! output, across calls and across threads.

use rayon::prelude::*;

use crate::config;
use crate::pool;
use crate::simd;

/// Golden-ratio multiplier for round one.
const MULT1: u64 = 0x9E37_79B9_7F4A_7C15;
/// Second well-distributed odd prime for round two.
const MULT2: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// Secret constants for the high-quality wide-multiply path.
const SECRET: [u64; 3] = [
    0x2d35_8dcc_aa6c_78a5,
    0x8bb8_4b93_962e_acc9,
    0x4b33_a62e_d433_d4a3,
];

/// Canonical bit pattern all NaNs hash as.
const CANONICAL_NAN: u64 = 0x7FF8_0000_0000_0000;

/// Rows per task when hashing in parallel.
pub const HASH_GRAIN: usize = 8 * 1024;

/// The library-wide integer hash: two rounds of multiply-then-xor-shift.
#[inline(always)]
pub fn fast_int_hash(mut x: u64) -> u64 {
    x = (x ^ (x >> 32)).wrapping_mul(MULT1);
    x = (x ^ (x >> 29)).wrapping_mul(MULT2);
    x ^ (x >> 32)
}

/// High-quality mix: 128-bit product of `a ^ b` with a secret, folded as
/// `lo ^ hi`.
#[inline(always)]
pub fn wide_mix(a: u64, b: u64) -> u64 {
    let r = (a as u128).wrapping_mul(b as u128);
    (r as u64) ^ ((r >> 64) as u64)
}

#[inline(always)]
fn canonical_f64_bits(v: f64) -> u64 {
    if v != v {
        CANONICAL_NAN
    } else if v == 0.0 {
        // -0.0 == 0.0 must hash identically.
        0
    } else {
        v.to_bits()
    }
}

/// Hash an i64 column. `out` is clipped to the common length.
pub fn hash_i64(data: &[i64], out: &mut [u64]) -> usize {
    simd::map1_into(data, out, |v| fast_int_hash(v as u64))
}

/// Hash an i32 column.
pub fn hash_i32(data: &[i32], out: &mut [u64]) -> usize {
    simd::map1_into(data, out, |v| fast_int_hash(v as u32 as u64))
}

/// Hash an f64 column. All NaNs hash alike; `-0.0` hashes as `0.0`.
pub fn hash_f64(data: &[f64], out: &mut [u64]) -> usize {
    simd::map1_into(data, out, |v| fast_int_hash(canonical_f64_bits(v)))
}

/// Hash an f32 column with the same canonicalization as [`hash_f64`].
pub fn hash_f32(data: &[f32], out: &mut [u64]) -> usize {
    simd::map1_into(data, out, |v| fast_int_hash(canonical_f64_bits(v as f64)))
}

/// Combine per-column hash vectors into one row hash.
///
/// `h = secret0; for each column: h = wide_mix(h ^ col[i], secret1);
/// h ^= secret2`. Column order matters, as groupby key semantics require.
pub fn combine_hashes(columns: &[&[u64]], out: &mut [u64]) -> usize {
    let n = columns
        .iter()
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
        .min(out.len());
    out[..n].fill(SECRET[0]);
    for col in columns {
        simd::map2_inplace(&mut out[..n], &col[..n], |h, v| wide_mix(h ^ v, SECRET[1]));
    }
    simd::map1_inplace(&mut out[..n], |h| h ^ SECRET[2]);
    n
}

/// Parallel chunked i64 hashing, grain ≈ 8 K rows. Falls back to the
/// sequential kernel for short inputs or a budget of one thread.
pub fn hash_i64_parallel(data: &[i64], out: &mut [u64]) -> usize {
    let n = data.len().min(out.len());
    if n < 2 * HASH_GRAIN || config::max_threads() == 1 {
        return hash_i64(&data[..n], &mut out[..n]);
    }
    pool::install(|| {
        data[..n]
            .par_chunks(HASH_GRAIN)
            .zip(out[..n].par_chunks_mut(HASH_GRAIN))
            .for_each(|(src, dst)| {
                hash_i64(src, dst);
            });
    });
    n
}

/// Parallel chunked f64 hashing.
pub fn hash_f64_parallel(data: &[f64], out: &mut [u64]) -> usize {
    let n = data.len().min(out.len());
    if n < 2 * HASH_GRAIN || config::max_threads() == 1 {
        return hash_f64(&data[..n], &mut out[..n]);
    }
    pool::install(|| {
        data[..n]
            .par_chunks(HASH_GRAIN)
            .zip(out[..n].par_chunks_mut(HASH_GRAIN))
            .for_each(|(src, dst)| {
                hash_f64(src, dst);
            });
    });
    n
}
