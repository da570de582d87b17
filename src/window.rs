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

//! Window functions: offsets, ranks, cumulatives, and rolling aggregates.
//!
//! Rolling windows are trailing: `out[i]` covers
//! `data[max(0, i-w+1) ..= i]`. `min_periods` is the observation count the
//! window must hold before a value is emitted; shorter windows emit the
//! null fill (NaN for floats, 0 for integers). Rolling min/max run a
//! monotonic deque in a ring buffer of length `window + 1`, amortized
//! O(1) per step; rolling std is a naive two-pass per window.
//!
//! Partitioned variants consume a sorted group-id vector and reset their
//! state at each group boundary.

use crate::agg;
use crate::num::Numeric;
use crate::simd;

#[inline(always)]
fn gate<T: Numeric>(value: T, have: usize, min_periods: usize) -> T {
    if have >= min_periods.max(1) {
        value
    } else {
        T::NULL_FILL
    }
}

// ---------------------------------------------------------------------------
// Offsets
// ---------------------------------------------------------------------------

/// `out[i] = data[i - periods]`; the first `periods` slots get `fill`.
/// Block copy plus scalar fill of the leading region.
pub fn lag<T: Numeric>(data: &[T], periods: usize, fill: T, out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    let k = periods.min(n);
    out[..k].fill(fill);
    out[k..n].copy_from_slice(&data[..n - k]);
    n
}

/// `out[i] = data[i + periods]`; the last `periods` slots get `fill`.
pub fn lead<T: Numeric>(data: &[T], periods: usize, fill: T, out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    let k = periods.min(n);
    out[..n - k].copy_from_slice(&data[k..n]);
    out[n - k..n].fill(fill);
    n
}

/// Per-partition lag over a sorted group-id vector.
pub fn lag_partitioned<T: Numeric>(
    data: &[T],
    group_ids: &[u32],
    periods: usize,
    fill: T,
    out: &mut [T],
) -> usize {
    let n = data.len().min(group_ids.len()).min(out.len());
    let mut start = 0;
    while start < n {
        let g = group_ids[start];
        let mut end = start + 1;
        while end < n && group_ids[end] == g {
            end += 1;
        }
        lag(&data[start..end], periods, fill, &mut out[start..end]);
        start = end;
    }
    n
}

/// Per-partition lead over a sorted group-id vector.
pub fn lead_partitioned<T: Numeric>(
    data: &[T],
    group_ids: &[u32],
    periods: usize,
    fill: T,
    out: &mut [T],
) -> usize {
    let n = data.len().min(group_ids.len()).min(out.len());
    let mut start = 0;
    while start < n {
        let g = group_ids[start];
        let mut end = start + 1;
        while end < n && group_ids[end] == g {
            end += 1;
        }
        lead(&data[start..end], periods, fill, &mut out[start..end]);
        start = end;
    }
    n
}

// ---------------------------------------------------------------------------
// Ranks
// ---------------------------------------------------------------------------

/// `out[i] = i + 1`.
pub fn row_number(out: &mut [u32]) -> usize {
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = (i + 1) as u32;
    }
    out.len()
}

/// Row numbers restarting at 1 on each group boundary. Input must be
/// sorted by partition.
pub fn row_number_partitioned(group_ids: &[u32], out: &mut [u32]) -> usize {
    let n = group_ids.len().min(out.len());
    let mut counter = 0u32;
    for i in 0..n {
        if i > 0 && group_ids[i] != group_ids[i - 1] {
            counter = 0;
        }
        counter += 1;
        out[i] = counter;
    }
    n
}

/// Competition rank over a value-sorted column: a new rank starts where
/// the value changes and equals the 1-based position.
pub fn rank<T: Numeric>(data: &[T], out: &mut [u32]) -> usize {
    let n = data.len().min(out.len());
    let mut current = 1u32;
    for i in 0..n {
        if i > 0 && data[i] != data[i - 1] {
            current = (i + 1) as u32;
        }
        out[i] = current;
    }
    n
}

/// Dense rank over a value-sorted column: increments by one per distinct
/// value.
pub fn dense_rank<T: Numeric>(data: &[T], out: &mut [u32]) -> usize {
    let n = data.len().min(out.len());
    let mut current = 1u32;
    for i in 0..n {
        if i > 0 && data[i] != data[i - 1] {
            current += 1;
        }
        out[i] = current;
    }
    n
}

// ---------------------------------------------------------------------------
// Cumulatives
// ---------------------------------------------------------------------------

macro_rules! cumulative {
    ($name:ident, $name_part:ident, $init:expr, $fold:expr, $doc:expr) => {
        #[doc = $doc]
        pub fn $name<T: Numeric>(data: &[T], out: &mut [T]) -> usize {
            let n = data.len().min(out.len());
            let fold: fn(T, T) -> T = $fold;
            let mut state = $init;
            for i in 0..n {
                state = fold(state, data[i]);
                out[i] = state;
            }
            n
        }

        #[doc = concat!("Per-partition variant of the cumulative, resetting at group boundaries.")]
        pub fn $name_part<T: Numeric>(data: &[T], group_ids: &[u32], out: &mut [T]) -> usize {
            let n = data.len().min(group_ids.len()).min(out.len());
            let fold: fn(T, T) -> T = $fold;
            let mut state = $init;
            for i in 0..n {
                if i > 0 && group_ids[i] != group_ids[i - 1] {
                    state = $init;
                }
                state = fold(state, data[i]);
                out[i] = state;
            }
            n
        }
    };
}

cumulative!(
    cum_sum,
    cum_sum_partitioned,
    T::ZERO,
    |a, b| a.add_wrapping(b),
    "Running sum (wrapping for integers)."
);
cumulative!(
    cum_min,
    cum_min_partitioned,
    T::MAX_IDENT,
    |a, b| a.min_native(b),
    "Running minimum."
);
cumulative!(
    cum_max,
    cum_max_partitioned,
    T::MIN_IDENT,
    |a, b| a.max_native(b),
    "Running maximum."
);

// ---------------------------------------------------------------------------
// Rolling aggregates
// ---------------------------------------------------------------------------

/// Rolling sum: the first full window is built through the reduction
/// tree, then one add and one subtract per step.
pub fn rolling_sum<T: Numeric>(data: &[T], window: usize, min_periods: usize, out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    if window == 0 {
        out[..n].fill(T::NULL_FILL);
        return n;
    }
    let w = window;
    let head = w.min(n);
    let mut acc = T::ZERO;
    for i in 0..head {
        acc = acc.add_wrapping(data[i]);
        out[i] = gate(acc, i + 1, min_periods);
    }
    if n > w {
        let mut acc = simd::reduce_tree(&data[..w], T::ZERO, |a, b| a.add_wrapping(b));
        for i in w..n {
            acc = acc.add_wrapping(data[i]).sub_wrapping(data[i - w]);
            out[i] = gate(acc, w, min_periods);
        }
    }
    n
}

/// Rolling mean in `f64`, sliding-window like [`rolling_sum`].
pub fn rolling_mean<T: Numeric>(
    data: &[T],
    window: usize,
    min_periods: usize,
    out: &mut [f64],
) -> usize {
    let n = data.len().min(out.len());
    if window == 0 {
        out[..n].fill(f64::NAN);
        return n;
    }
    let w = window;
    let mut acc = 0.0f64;
    for i in 0..n {
        acc += data[i].to_f64();
        if i >= w {
            acc -= data[i - w].to_f64();
        }
        let have = (i + 1).min(w);
        out[i] = if have >= min_periods.max(1) {
            acc / have as f64
        } else {
            f64::NAN
        };
    }
    n
}

/// Monotonic-deque rolling extremum. `keeps(back, cur)` is false when the
/// back of the deque is dominated by the incoming value and must be
/// dropped.
#[inline(always)]
fn rolling_extremum<T: Numeric>(
    data: &[T],
    window: usize,
    min_periods: usize,
    out: &mut [T],
    keeps: impl Fn(T, T) -> bool + Copy,
) -> usize {
    let n = data.len().min(out.len());
    if window == 0 {
        out[..n].fill(T::NULL_FILL);
        return n;
    }
    let w = window;
    let cap = w + 1;
    let mut ring = vec![0u32; cap];
    let mut head = 0usize;
    let mut len = 0usize;
    for i in 0..n {
        // Expire the front index once it leaves the window.
        while len > 0 && (ring[head] as usize) + w <= i {
            head = (head + 1) % cap;
            len -= 1;
        }
        // Drop dominated entries from the back.
        while len > 0 {
            let back = ring[(head + len - 1) % cap] as usize;
            if keeps(data[back], data[i]) {
                break;
            }
            len -= 1;
        }
        ring[(head + len) % cap] = i as u32;
        len += 1;
        out[i] = gate(data[ring[head] as usize], (i + 1).min(w), min_periods);
    }
    n
}

/// Rolling minimum via monotonic deque, O(n) over the column.
pub fn rolling_min<T: Numeric>(data: &[T], window: usize, min_periods: usize, out: &mut [T]) -> usize {
    rolling_extremum(data, window, min_periods, out, |back, cur| back < cur)
}

/// Rolling maximum via monotonic deque.
pub fn rolling_max<T: Numeric>(data: &[T], window: usize, min_periods: usize, out: &mut [T]) -> usize {
    rolling_extremum(data, window, min_periods, out, |back, cur| back > cur)
}

/// Rolling sample standard deviation, two passes per window. Windows with
/// fewer than two observations (or fewer than `min_periods`) emit NaN.
pub fn rolling_std<T: Numeric>(
    data: &[T],
    window: usize,
    min_periods: usize,
    out: &mut [f64],
) -> usize {
    let n = data.len().min(out.len());
    if window == 0 {
        out[..n].fill(f64::NAN);
        return n;
    }
    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        let slice = &data[start..=i];
        out[i] = if slice.len() >= min_periods.max(2) {
            agg::stddev(slice).unwrap_or(f64::NAN)
        } else {
            f64::NAN
        };
    }
    n
}

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

/// `out[i] = data[i] - data[i - periods]`; the first `periods` slots are
/// null-filled.
pub fn diff<T: Numeric>(data: &[T], periods: usize, out: &mut [T]) -> usize {
    let n = data.len().min(out.len());
    let k = periods.min(n);
    out[..k].fill(T::NULL_FILL);
    for i in k..n {
        out[i] = data[i].sub_wrapping(data[i - k]);
    }
    n
}

/// Fractional change against the previous element. The first slot and any
/// division by zero emit NaN.
pub fn pct_change(data: &[f64], out: &mut [f64]) -> usize {
    let n = data.len().min(out.len());
    if n == 0 {
        return 0;
    }
    out[0] = f64::NAN;
    for i in 1..n {
        let prev = data[i - 1];
        out[i] = if prev == 0.0 {
            f64::NAN
        } else {
            (data[i] - prev) / prev
        };
    }
    n
}
