// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pool-backed execution strategy over rayon.

use std::fmt;
use std::sync::{Arc, OnceLock};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::{OrbitError, Result};
use crate::strategy::{ExecutionStrategy, LocalStrategy};

/// Largest accepted `concurrency_log2` (65536 worker threads).
pub const MAX_CONCURRENCY_LOG2: u32 = 16;

/// Fork predicate: `(size, depth) -> bool`.
pub type ForkPredicate = dyn Fn(usize, usize) -> bool + Send + Sync;

/// Depth-bounded forking policy.
///
/// Forks iff `depth < max_depth` and `size > work_size * (depth² + 1)`, so the
/// minimum piece grows quadratically with depth and the tree of live tasks is
/// bounded by `2^max_depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForkPolicy {
    /// Deepest level that may still fork.
    pub max_depth: usize,
    /// Minimal piece of work worth a task at depth 0.
    pub work_size: usize,
}

impl ForkPolicy {
    /// Evaluates the policy.
    pub fn fork(&self, size: usize, depth: usize) -> bool {
        let floor = self
            .work_size
            .saturating_mul(depth.saturating_mul(depth).saturating_add(1));
        depth < self.max_depth && size > floor
    }
}

/// Process-wide pool behind [`PoolStrategy::parallel`].
static SHARED: OnceLock<Arc<ThreadPool>> = OnceLock::new();

/// Execution strategy backed by a rayon worker pool.
///
/// `queue_pair` maps to `join` (one branch inline, the other stealable) and
/// `execute_blocking` to `install`; a worker waiting on a join keeps stealing
/// work, so nested blocking never starves the pool. Work always runs on the
/// strategy's own pool, even when called from a worker of another pool.
#[derive(Clone)]
pub struct PoolStrategy {
    pool: Arc<ThreadPool>,
    predicate: Arc<ForkPredicate>,
}

impl fmt::Debug for PoolStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolStrategy")
            .field("threads", &self.pool.current_num_threads())
            .finish_non_exhaustive()
    }
}

impl PoolStrategy {
    /// Strategy over an existing pool with the given policy.
    pub fn new(pool: Arc<ThreadPool>, policy: ForkPolicy) -> Self {
        Self::with_predicate(pool, move |size, depth| policy.fork(size, depth))
    }

    /// Strategy over an existing pool with a custom fork predicate.
    pub fn with_predicate<F>(pool: Arc<ThreadPool>, predicate: F) -> Self
    where
        F: Fn(usize, usize) -> bool + Send + Sync + 'static,
    {
        Self {
            pool,
            predicate: Arc::new(predicate),
        }
    }

    /// Strategy over a process-wide pool sized like rayon's default (one
    /// worker per available core, or `RAYON_NUM_THREADS`).
    ///
    /// The pool is created on first use and shared by every strategy this
    /// returns.
    ///
    /// # Errors
    ///
    /// [`OrbitError::PoolBuild`] if the shared pool cannot be started.
    pub fn parallel() -> Result<Self> {
        let pool = match SHARED.get() {
            Some(pool) => Arc::clone(pool),
            None => {
                let built = Arc::new(
                    ThreadPoolBuilder::new()
                        .thread_name(|i| format!("orbit-shared-{i}"))
                        .build()?,
                );
                Arc::clone(SHARED.get_or_init(|| built))
            }
        };
        let threads = pool.current_num_threads();
        let policy = ForkPolicy {
            max_depth: (usize::BITS - threads.leading_zeros()) as usize,
            work_size: 4,
        };
        debug!(threads, ?policy, "using shared worker pool");
        Ok(Self::new(pool, policy))
    }
}

impl ExecutionStrategy for PoolStrategy {
    fn fork(&self, size: usize, depth: usize) -> bool {
        size > 1 && (self.predicate)(size, depth)
    }

    fn execute_blocking(&self, task: &mut (dyn FnMut() + Send)) {
        self.pool.install(task);
    }

    fn queue_pair(&self, a: &mut (dyn FnMut() + Send), b: &mut (dyn FnMut() + Send)) {
        self.pool.join(a, b);
    }
}

/// Builds a strategy with `2^concurrency_log2` worker threads.
///
/// `concurrency_log2 == 0` yields the sequential [`LocalStrategy`]. The fork
/// depth is bounded by `concurrency_log2`.
///
/// # Errors
///
/// [`OrbitError::InvalidConfig`] when `concurrency_log2` exceeds
/// [`MAX_CONCURRENCY_LOG2`]; [`OrbitError::PoolBuild`] if rayon cannot start
/// the workers.
pub fn create(concurrency_log2: u32, work_size: usize) -> Result<Arc<dyn ExecutionStrategy>> {
    if concurrency_log2 == 0 {
        debug!("concurrency 0, using local strategy");
        return Ok(Arc::new(LocalStrategy));
    }
    if concurrency_log2 > MAX_CONCURRENCY_LOG2 {
        return Err(OrbitError::InvalidConfig(format!(
            "concurrency_log2 {concurrency_log2} exceeds {MAX_CONCURRENCY_LOG2}"
        )));
    }
    let threads = 1usize << concurrency_log2;
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("orbit-worker-{i}"))
        .build()?;
    let policy = ForkPolicy {
        max_depth: concurrency_log2 as usize,
        work_size,
    };
    debug!(threads, ?policy, "created worker pool");
    Ok(Arc::new(PoolStrategy::new(Arc::new(pool), policy)))
}
