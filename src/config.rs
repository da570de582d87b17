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

//! Process-wide configuration: the thread budget and the kernel shape
//! constants shared by every vectorized loop in the crate.
//!
//! The thread budget is the only mutable global state. It is read once per
//! parallel kernel entry; a concurrent `set_max_threads` affects at most
//! the next kernel call.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Hard cap on worker threads regardless of configuration.
pub const MAX_THREADS: usize = 32;

/// Elements per vector lane group. All kernels agree on this width; the
/// compiler picks the actual target lane count.
pub const VECTOR_WIDTH: usize = 8;

/// Independent accumulator count in unrolled loops.
pub const UNROLL: usize = 4;

/// Elements processed per unrolled iteration.
pub const CHUNK: usize = VECTOR_WIDTH * UNROLL;

// 0 means "not yet configured": the first reader auto-detects.
static THREAD_BUDGET: AtomicUsize = AtomicUsize::new(0);
static AUTO_DETECTED: AtomicBool = AtomicBool::new(true);

/// Current thread budget. Auto-detects from the logical CPU count on first
/// read unless `set_max_threads` was called earlier.
pub fn max_threads() -> usize {
    let cur = THREAD_BUDGET.load(Ordering::Relaxed);
    if cur != 0 {
        return cur;
    }
    let detected = num_cpus::get().clamp(1, MAX_THREADS);
    // Another thread may have configured or detected concurrently; first
    // store wins so all readers agree.
    match THREAD_BUDGET.compare_exchange(0, detected, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => detected,
        Err(existing) => existing,
    }
}

/// Set the thread budget explicitly. Values are clamped to
/// `[1, MAX_THREADS]`.
pub fn set_max_threads(n: usize) {
    let n = n.clamp(1, MAX_THREADS);
    THREAD_BUDGET.store(n, Ordering::Relaxed);
    AUTO_DETECTED.store(false, Ordering::Relaxed);
}

/// Whether the current budget came from auto-detection rather than an
/// explicit `set_max_threads`.
pub fn is_threads_auto_detected() -> bool {
    AUTO_DETECTED.load(Ordering::Relaxed)
}
