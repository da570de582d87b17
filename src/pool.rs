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

//! Worker-pool dispatch for `parallel_*` kernels.
//!
//! A single rayon pool sized to the thread budget backs every parallel
//! kernel. The budget is sampled on each kernel entry; when it changed
//! since the pool was built, the pool is rebuilt before dispatch. Parallel
//! kernels suspend the caller until all workers complete (rayon `install`
//! is a barrier join). Kernels never create threads directly.

use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};

use rayon::prelude::*;
use tracing::debug;

use crate::config;

struct PoolState {
    threads: usize,
    pool: Arc<rayon::ThreadPool>,
}

static POOL: Mutex<Option<PoolState>> = Mutex::new(None);

/// Pool matching the current thread budget, rebuilding if the budget
/// changed since the last parallel kernel.
fn current_pool() -> Arc<rayon::ThreadPool> {
    let budget = config::max_threads();
    let mut slot = POOL.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(state) = slot.as_ref() {
        if state.threads == budget {
            return state.pool.clone();
        }
    }
    debug!(threads = budget, "rebuilding worker pool");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(budget)
        .thread_name(|i| format!("basalt-worker-{i}"))
        .build()
        .map(Arc::new)
        // Pool construction only fails when the OS refuses to spawn
        // threads; a 1-thread current-thread pool always succeeds.
        .unwrap_or_else(|_| {
            Arc::new(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(1)
                    .use_current_thread()
                    .build()
                    .expect("current-thread pool"),
            )
        });
    *slot = Some(PoolState {
        threads: budget,
        pool: pool.clone(),
    });
    pool
}

/// Run `op` inside the budget-sized pool. Blocks until it returns.
pub fn install<R, F>(op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    current_pool().install(op)
}

/// Partition `[0, n)` into chunks of approximately `grain` indices and
/// dispatch `body` over them on the worker pool. Workers may steal chunks
/// from each other; `body` must tolerate any dispatch order.
pub fn parallel_for<F>(n: usize, grain: usize, body: F)
where
    F: Fn(Range<usize>) + Sync,
{
    if n == 0 {
        return;
    }
    let grain = grain.max(1);
    let tasks = n.div_ceil(grain);
    if tasks <= 1 {
        body(0..n);
        return;
    }
    install(|| {
        (0..tasks).into_par_iter().for_each(|t| {
            let start = t * grain;
            let end = (start + grain).min(n);
            body(start..end);
        });
    });
}

/// Number of chunks `parallel_for` would dispatch for `n` and `grain`.
/// Used by kernels that pre-size per-worker buffers.
pub fn task_count(n: usize, grain: usize) -> usize {
    n.div_ceil(grain.max(1))
}
