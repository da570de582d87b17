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

//! C ABI exports (`bs_*`).
//!
//! This is the crate's single foreign boundary; the dataframe collaborator
//! binds these symbols over FFI. Conventions:
//!
//! - Columns arrive as `(pointer, len)` pairs; a null pointer is treated
//!   as an empty column and every kernel then returns without writing.
//! - Output buffers are caller-sized per the kernel's documented contract.
//! - Handle constructors return null on failure (the no-handle
//!   indicator); accessors borrow from the handle; each handle has one
//!   destroy entry point that releases every component buffer.
//!
//! # Safety
//!
//! All functions here are `unsafe extern "C"`: the caller must pass
//! pointers valid for the stated lengths, and must not alias an output
//! with an input unless the kernel is documented in-place.

use crate::{agg, arith, cmp, config, filter, groupby, hash, join, sort};

// ---------------------------------------------------------------------------
// Pointer plumbing
// ---------------------------------------------------------------------------

#[inline(always)]
unsafe fn col<'a, T>(ptr: *const T, len: usize) -> &'a [T] {
    if ptr.is_null() || len == 0 {
        &[]
    } else {
        // SAFETY: non-null and valid for `len` reads per the ABI contract.
        unsafe { std::slice::from_raw_parts(ptr, len) }
    }
}

#[inline(always)]
unsafe fn col_mut<'a, T>(ptr: *mut T, len: usize) -> &'a mut [T] {
    if ptr.is_null() || len == 0 {
        &mut []
    } else {
        // SAFETY: non-null and valid for `len` writes per the ABI contract.
        unsafe { std::slice::from_raw_parts_mut(ptr, len) }
    }
}

// ---------------------------------------------------------------------------
// Thread configuration
// ---------------------------------------------------------------------------

/// Set the process-wide thread budget (clamped to `[1, 32]`).
#[no_mangle]
pub extern "C" fn bs_set_max_threads(n: usize) {
    config::set_max_threads(n);
}

/// Current thread budget, auto-detecting on first call.
#[no_mangle]
pub extern "C" fn bs_get_max_threads() -> usize {
    config::max_threads()
}

/// Whether the budget came from auto-detection.
#[no_mangle]
pub extern "C" fn bs_is_threads_auto_detected() -> bool {
    config::is_threads_auto_detected()
}

// ---------------------------------------------------------------------------
// Elementwise arithmetic
// ---------------------------------------------------------------------------

macro_rules! ffi_arith {
    ($name:ident, $t:ty, $kernel:path) => {
        /// Elementwise kernel over `min(len, out)` elements. `out` must
        /// not alias the inputs.
        #[no_mangle]
        pub unsafe extern "C" fn $name(a: *const $t, b: *const $t, out: *mut $t, len: usize) {
            // SAFETY: forwarded ABI contract.
            unsafe { $kernel(col(a, len), col(b, len), col_mut(out, len)) };
        }
    };
}

ffi_arith!(bs_add_f64, f64, arith::add::<f64>);
ffi_arith!(bs_sub_f64, f64, arith::sub::<f64>);
ffi_arith!(bs_mul_f64, f64, arith::mul::<f64>);
ffi_arith!(bs_div_f64, f64, arith::div::<f64>);
ffi_arith!(bs_add_i64, i64, arith::add::<i64>);
ffi_arith!(bs_sub_i64, i64, arith::sub::<i64>);
ffi_arith!(bs_mul_i64, i64, arith::mul::<i64>);
ffi_arith!(bs_div_i64, i64, arith::div::<i64>);

// ---------------------------------------------------------------------------
// Elementwise comparison (0/1 byte masks)
// ---------------------------------------------------------------------------

macro_rules! ffi_cmp {
    ($name:ident, $t:ty, $kernel:path) => {
        /// Comparison into a 0/1 byte mask of `min(len, out)` elements.
        #[no_mangle]
        pub unsafe extern "C" fn $name(a: *const $t, b: *const $t, out: *mut u8, len: usize) {
            // SAFETY: forwarded ABI contract.
            unsafe { $kernel(col(a, len), col(b, len), col_mut(out, len)) };
        }
    };
}

ffi_cmp!(bs_cmp_lt_f64, f64, cmp::lt::<f64>);
ffi_cmp!(bs_cmp_le_f64, f64, cmp::le::<f64>);
ffi_cmp!(bs_cmp_gt_f64, f64, cmp::gt::<f64>);
ffi_cmp!(bs_cmp_ge_f64, f64, cmp::ge::<f64>);
ffi_cmp!(bs_cmp_eq_f64, f64, cmp::eq::<f64>);
ffi_cmp!(bs_cmp_ne_f64, f64, cmp::ne::<f64>);
ffi_cmp!(bs_cmp_lt_i64, i64, cmp::lt::<i64>);
ffi_cmp!(bs_cmp_le_i64, i64, cmp::le::<i64>);
ffi_cmp!(bs_cmp_gt_i64, i64, cmp::gt::<i64>);
ffi_cmp!(bs_cmp_ge_i64, i64, cmp::ge::<i64>);
ffi_cmp!(bs_cmp_eq_i64, i64, cmp::eq::<i64>);
ffi_cmp!(bs_cmp_ne_i64, i64, cmp::ne::<i64>);

// ---------------------------------------------------------------------------
// Masks and filtering
// ---------------------------------------------------------------------------

/// Count of non-zero bytes in a mask column.
#[no_mangle]
pub unsafe extern "C" fn bs_count_mask_true(mask: *const u8, len: usize) -> usize {
    // SAFETY: forwarded ABI contract.
    filter::count_mask_true(unsafe { col(mask, len) })
}

/// Expand a mask into indices. Writes at most `max_indices`; returns the
/// written count.
#[no_mangle]
pub unsafe extern "C" fn bs_indices_from_mask(
    mask: *const u8,
    mask_len: usize,
    out_indices: *mut u32,
    max_indices: usize,
) -> usize {
    // SAFETY: forwarded ABI contract.
    unsafe { filter::indices_from_mask(col(mask, mask_len), col_mut(out_indices, max_indices)) }
}

macro_rules! ffi_filter {
    ($name:ident, $t:ty, $kernel:path) => {
        /// Compacted indices of rows passing the predicate. `out_indices`
        /// must hold at least `len` slots; `out_count` receives the hit
        /// count.
        #[no_mangle]
        pub unsafe extern "C" fn $name(
            data: *const $t,
            len: usize,
            threshold: $t,
            out_indices: *mut u32,
            out_count: *mut usize,
        ) {
            // SAFETY: forwarded ABI contract.
            let count = unsafe { $kernel(col(data, len), threshold, col_mut(out_indices, len)) };
            if !out_count.is_null() {
                // SAFETY: non-null out parameter.
                unsafe { *out_count = count };
            }
        }
    };
}

ffi_filter!(bs_filter_gt_f64, f64, filter::filter_gt::<f64>);
ffi_filter!(bs_filter_lt_f64, f64, filter::filter_lt::<f64>);
ffi_filter!(bs_filter_gt_i64, i64, filter::filter_gt::<i64>);
ffi_filter!(bs_filter_lt_i64, i64, filter::filter_lt::<i64>);

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Sum; empty input yields 0.
#[no_mangle]
pub unsafe extern "C" fn bs_sum_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::sum(unsafe { col(data, len) })
}

/// Wrapping sum; empty input yields 0.
#[no_mangle]
pub unsafe extern "C" fn bs_sum_i64(data: *const i64, len: usize) -> i64 {
    // SAFETY: forwarded ABI contract.
    agg::sum(unsafe { col(data, len) })
}

/// Mean; empty input yields 0.0.
#[no_mangle]
pub unsafe extern "C" fn bs_mean_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::mean(unsafe { col(data, len) }).unwrap_or(0.0)
}

/// Minimum; empty input yields NaN (the no-value indicator at this ABI).
#[no_mangle]
pub unsafe extern "C" fn bs_min_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::min(unsafe { col(data, len) }).unwrap_or(f64::NAN)
}

/// Maximum; empty input yields NaN.
#[no_mangle]
pub unsafe extern "C" fn bs_max_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::max(unsafe { col(data, len) }).unwrap_or(f64::NAN)
}

/// Minimum; empty input yields `i64::MAX`.
#[no_mangle]
pub unsafe extern "C" fn bs_min_i64(data: *const i64, len: usize) -> i64 {
    // SAFETY: forwarded ABI contract.
    agg::min(unsafe { col(data, len) }).unwrap_or(i64::MAX)
}

/// Maximum; empty input yields `i64::MIN`.
#[no_mangle]
pub unsafe extern "C" fn bs_max_i64(data: *const i64, len: usize) -> i64 {
    // SAFETY: forwarded ABI contract.
    agg::max(unsafe { col(data, len) }).unwrap_or(i64::MIN)
}

/// Sample variance; inputs shorter than 2 yield NaN.
#[no_mangle]
pub unsafe extern "C" fn bs_variance_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::variance(unsafe { col(data, len) }).unwrap_or(f64::NAN)
}

/// Sample standard deviation; inputs shorter than 2 yield NaN.
#[no_mangle]
pub unsafe extern "C" fn bs_stddev_f64(data: *const f64, len: usize) -> f64 {
    // SAFETY: forwarded ABI contract.
    agg::stddev(unsafe { col(data, len) }).unwrap_or(f64::NAN)
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Hash an i64 column into `out_hashes`.
#[no_mangle]
pub unsafe extern "C" fn bs_hash_i64_column(data: *const i64, out_hashes: *mut u64, len: usize) {
    // SAFETY: forwarded ABI contract.
    unsafe { hash::hash_i64(col(data, len), col_mut(out_hashes, len)) };
}

/// Hash an f64 column into `out_hashes` (NaNs and signed zeros
/// canonicalized).
#[no_mangle]
pub unsafe extern "C" fn bs_hash_f64_column(data: *const f64, out_hashes: *mut u64, len: usize) {
    // SAFETY: forwarded ABI contract.
    unsafe { hash::hash_f64(col(data, len), col_mut(out_hashes, len)) };
}

/// Combine `num_columns` per-column hash vectors into one row hash.
/// Column order is significant.
#[no_mangle]
pub unsafe extern "C" fn bs_combine_hashes(
    columns: *const *const u64,
    num_columns: usize,
    out: *mut u64,
    len: usize,
) -> usize {
    if columns.is_null() {
        return 0;
    }
    // SAFETY: `columns` points to `num_columns` column pointers, each
    // valid for `len` reads.
    let ptrs = unsafe { col(columns, num_columns) };
    let cols: Vec<&[u64]> = ptrs.iter().map(|&p| unsafe { col(p, len) }).collect();
    // SAFETY: forwarded ABI contract.
    hash::combine_hashes(&cols, unsafe { col_mut(out, len) })
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Radix argsort of an f64 column into `out_indices_u32`.
#[no_mangle]
pub unsafe extern "C" fn bs_argsort_f64(
    data: *const f64,
    len: usize,
    out_indices: *mut u32,
    ascending: bool,
) {
    // SAFETY: forwarded ABI contract.
    unsafe { sort::argsort_f64(col(data, len), col_mut(out_indices, len), ascending) };
}

/// Radix argsort of an i64 column into `out_indices_u32`.
#[no_mangle]
pub unsafe extern "C" fn bs_argsort_i64(
    data: *const i64,
    len: usize,
    out_indices: *mut u32,
    ascending: bool,
) {
    // SAFETY: forwarded ABI contract.
    unsafe { sort::argsort_i64(col(data, len), col_mut(out_indices, len), ascending) };
}

// ---------------------------------------------------------------------------
// Groupby handle
// ---------------------------------------------------------------------------

/// Group rows by a precomputed hash column. Returns an owning handle, or
/// null on allocation failure.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_compute(
    hashes: *const u64,
    len: usize,
) -> *mut groupby::GroupbyResult {
    // SAFETY: forwarded ABI contract.
    match groupby::groupby_compute(unsafe { col(hashes, len) }) {
        Ok(result) => Box::into_raw(Box::new(result)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Number of groups in a groupby handle.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_num_groups(handle: *const groupby::GroupbyResult) -> u32 {
    if handle.is_null() {
        return 0;
    }
    // SAFETY: handle came from bs_groupby_compute and is not destroyed.
    unsafe { (*handle).num_groups }
}

/// Borrowed pointer to the per-row group ids. Valid until destroy.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_group_ids(handle: *const groupby::GroupbyResult) -> *const u32 {
    if handle.is_null() {
        return std::ptr::null();
    }
    // SAFETY: as above.
    unsafe { (*handle).group_ids.as_ptr() }
}

/// Borrowed pointer to each group's first row index.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_first_row_idx(
    handle: *const groupby::GroupbyResult,
) -> *const u32 {
    if handle.is_null() {
        return std::ptr::null();
    }
    // SAFETY: as above.
    unsafe { (*handle).first_row_idx.as_ptr() }
}

/// Borrowed pointer to each group's row count.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_group_counts(
    handle: *const groupby::GroupbyResult,
) -> *const u32 {
    if handle.is_null() {
        return std::ptr::null();
    }
    // SAFETY: as above.
    unsafe { (*handle).group_counts.as_ptr() }
}

/// Destroy a groupby handle, releasing all component buffers.
#[no_mangle]
pub unsafe extern "C" fn bs_groupby_result_destroy(handle: *mut groupby::GroupbyResult) {
    if !handle.is_null() {
        // SAFETY: exclusive ownership transfers back; double-destroy is a
        // caller bug, as with any C handle.
        drop(unsafe { Box::from_raw(handle) });
    }
}

// ---------------------------------------------------------------------------
// Join handle
// ---------------------------------------------------------------------------

/// Inner join of two i64 key columns. Returns an owning handle, or null
/// on allocation failure.
#[no_mangle]
pub unsafe extern "C" fn bs_inner_join_i64(
    left_keys: *const i64,
    left_len: usize,
    right_keys: *const i64,
    right_len: usize,
) -> *mut join::JoinResult {
    // SAFETY: forwarded ABI contract.
    match join::inner_join_i64(unsafe { col(left_keys, left_len) }, unsafe {
        col(right_keys, right_len)
    }) {
        Ok(result) => Box::into_raw(Box::new(result)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Left join of two i64 key columns; unmatched left rows carry right
/// index `-1`.
#[no_mangle]
pub unsafe extern "C" fn bs_left_join_i64(
    left_keys: *const i64,
    left_len: usize,
    right_keys: *const i64,
    right_len: usize,
) -> *mut join::JoinResult {
    // SAFETY: forwarded ABI contract.
    match join::left_join_i64(unsafe { col(left_keys, left_len) }, unsafe {
        col(right_keys, right_len)
    }) {
        Ok(result) => Box::into_raw(Box::new(result)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Result row count (`num_matches` for inner joins).
#[no_mangle]
pub unsafe extern "C" fn bs_join_num_matches(handle: *const join::JoinResult) -> usize {
    if handle.is_null() {
        return 0;
    }
    // SAFETY: handle came from a join constructor and is not destroyed.
    unsafe { (*handle).len() }
}

/// Borrowed pointer to the left index vector. Valid until destroy.
#[no_mangle]
pub unsafe extern "C" fn bs_join_left_indices(handle: *const join::JoinResult) -> *const i32 {
    if handle.is_null() {
        return std::ptr::null();
    }
    // SAFETY: as above.
    unsafe { (*handle).left_indices().as_ptr() }
}

/// Borrowed pointer to the right index vector.
#[no_mangle]
pub unsafe extern "C" fn bs_join_right_indices(handle: *const join::JoinResult) -> *const i32 {
    if handle.is_null() {
        return std::ptr::null();
    }
    // SAFETY: as above.
    unsafe { (*handle).right_indices().as_ptr() }
}

/// Destroy a join handle, releasing both index buffers.
#[no_mangle]
pub unsafe extern "C" fn bs_join_result_destroy(handle: *mut join::JoinResult) {
    if !handle.is_null() {
        // SAFETY: exclusive ownership transfers back.
        drop(unsafe { Box::from_raw(handle) });
    }
}
