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

//! C ABI exercise: the `bs_*` exports called the way a foreign binding
//! would call them, including handle lifecycles and null-pointer
//! tolerance.

use basalt::ffi::*;

#[test]
fn elementwise_over_the_abi() {
    let a = [1.0f64, 2.0, 3.0];
    let b = [10.0f64, 20.0, 30.0];
    let mut out = [0.0f64; 3];
    unsafe { bs_add_f64(a.as_ptr(), b.as_ptr(), out.as_mut_ptr(), 3) };
    assert_eq!(out, [11.0, 22.0, 33.0]);

    let mut mask = [0u8; 3];
    unsafe { bs_cmp_gt_f64(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 3) };
    assert_eq!(mask, [0, 0, 0]);
    unsafe { bs_cmp_lt_f64(a.as_ptr(), b.as_ptr(), mask.as_mut_ptr(), 3) };
    assert_eq!(mask, [1, 1, 1]);
}

#[test]
fn filter_and_mask_over_the_abi() {
    let data = [1.0f64, 5.0, 3.0, 7.0, 2.0, 8.0, 4.0, 6.0];
    let mut indices = [0u32; 8];
    let mut count = 0usize;
    unsafe {
        bs_filter_gt_f64(
            data.as_ptr(),
            data.len(),
            4.0,
            indices.as_mut_ptr(),
            &mut count,
        )
    };
    assert_eq!(count, 4);
    assert_eq!(&indices[..4], &[1, 3, 5, 7]);

    let mask = [0u8, 1, 0, 1, 1];
    assert_eq!(unsafe { bs_count_mask_true(mask.as_ptr(), mask.len()) }, 3);
    let mut expanded = [0u32; 5];
    let written =
        unsafe { bs_indices_from_mask(mask.as_ptr(), mask.len(), expanded.as_mut_ptr(), 5) };
    assert_eq!(written, 3);
    assert_eq!(&expanded[..3], &[1, 3, 4]);
}

#[test]
fn aggregation_over_the_abi() {
    let data = [1.0f64, 2.0, 3.0, 4.0];
    assert_eq!(unsafe { bs_sum_f64(data.as_ptr(), 4) }, 10.0);
    assert_eq!(unsafe { bs_mean_f64(data.as_ptr(), 4) }, 2.5);
    assert_eq!(unsafe { bs_min_f64(data.as_ptr(), 4) }, 1.0);
    assert_eq!(unsafe { bs_max_f64(data.as_ptr(), 4) }, 4.0);
    // Empty input: sum 0, mean-of-empty 0.0.
    assert_eq!(unsafe { bs_sum_f64(std::ptr::null(), 0) }, 0.0);
    assert_eq!(unsafe { bs_mean_f64(std::ptr::null(), 0) }, 0.0);
    assert!(unsafe { bs_min_f64(std::ptr::null(), 0) }.is_nan());
}

#[test]
fn argsort_over_the_abi() {
    let data = [3.0f64, 1.0, 2.0];
    let mut idx = [0u32; 3];
    unsafe { bs_argsort_f64(data.as_ptr(), 3, idx.as_mut_ptr(), true) };
    assert_eq!(idx, [1, 2, 0]);
    unsafe { bs_argsort_f64(data.as_ptr(), 3, idx.as_mut_ptr(), false) };
    assert_eq!(idx, [0, 2, 1]);
}

#[test]
fn hash_and_combine_over_the_abi() {
    let keys = [10i64, 20, 10];
    let mut h1 = [0u64; 3];
    unsafe { bs_hash_i64_column(keys.as_ptr(), h1.as_mut_ptr(), 3) };
    assert_eq!(h1[0], h1[2]);
    assert_ne!(h1[0], h1[1]);

    let mut h2 = [0u64; 3];
    unsafe { bs_hash_i64_column(keys.as_ptr(), h2.as_mut_ptr(), 3) };
    assert_eq!(h1, h2);

    let columns = [h1.as_ptr(), h2.as_ptr()];
    let mut combined = [0u64; 3];
    let n = unsafe { bs_combine_hashes(columns.as_ptr(), 2, combined.as_mut_ptr(), 3) };
    assert_eq!(n, 3);
    assert_eq!(combined[0], combined[2]);
}

#[test]
fn groupby_handle_lifecycle() {
    let keys = [10i64, 20, 10, 20, 10];
    let mut hashes = [0u64; 5];
    unsafe { bs_hash_i64_column(keys.as_ptr(), hashes.as_mut_ptr(), 5) };
    let handle = unsafe { bs_groupby_compute(hashes.as_ptr(), 5) };
    assert!(!handle.is_null());
    assert_eq!(unsafe { bs_groupby_num_groups(handle) }, 2);
    let ids = unsafe { bs_groupby_group_ids(handle) };
    let ids = unsafe { std::slice::from_raw_parts(ids, 5) };
    assert_eq!(ids, &[0, 1, 0, 1, 0]);
    let firsts = unsafe { bs_groupby_first_row_idx(handle) };
    let firsts = unsafe { std::slice::from_raw_parts(firsts, 2) };
    assert_eq!(firsts, &[0, 1]);
    let counts = unsafe { bs_groupby_group_counts(handle) };
    let counts = unsafe { std::slice::from_raw_parts(counts, 2) };
    assert_eq!(counts, &[3, 2]);
    unsafe { bs_groupby_result_destroy(handle) };
}

#[test]
fn join_handle_lifecycle() {
    let left = [1i64, 2, 2, 3];
    let right = [2i64, 2, 4];
    let handle = unsafe { bs_inner_join_i64(left.as_ptr(), 4, right.as_ptr(), 3) };
    assert!(!handle.is_null());
    let n = unsafe { bs_join_num_matches(handle) };
    assert_eq!(n, 4);
    let l = unsafe { std::slice::from_raw_parts(bs_join_left_indices(handle), n) };
    let r = unsafe { std::slice::from_raw_parts(bs_join_right_indices(handle), n) };
    let mut pairs: Vec<(i32, i32)> = l.iter().copied().zip(r.iter().copied()).collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
    unsafe { bs_join_result_destroy(handle) };

    let lhandle = unsafe { bs_left_join_i64(left.as_ptr(), 4, right.as_ptr(), 3) };
    assert!(!lhandle.is_null());
    assert_eq!(unsafe { bs_join_num_matches(lhandle) }, 6);
    unsafe { bs_join_result_destroy(lhandle) };
}

#[test]
fn thread_config_over_the_abi() {
    let detected = bs_get_max_threads();
    assert!(detected >= 1 && detected <= 32);
    bs_set_max_threads(2);
    assert_eq!(bs_get_max_threads(), 2);
    assert!(!bs_is_threads_auto_detected());
    // 0 clamps up to 1, oversized clamps down to the cap.
    bs_set_max_threads(0);
    assert_eq!(bs_get_max_threads(), 1);
    bs_set_max_threads(10_000);
    assert_eq!(bs_get_max_threads(), 32);
    bs_set_max_threads(detected);
}

#[test]
fn null_pointers_are_tolerated() {
    unsafe { bs_add_f64(std::ptr::null(), std::ptr::null(), std::ptr::null_mut(), 8) };
    assert_eq!(unsafe { bs_count_mask_true(std::ptr::null(), 9) }, 0);
    assert_eq!(unsafe { bs_join_num_matches(std::ptr::null()) }, 0);
    assert_eq!(unsafe { bs_groupby_num_groups(std::ptr::null()) }, 0);
    unsafe { bs_join_result_destroy(std::ptr::null_mut()) };
    unsafe { bs_groupby_result_destroy(std::ptr::null_mut()) };
}
