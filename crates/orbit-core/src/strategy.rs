// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Execution strategy contract and the explicit execution context.
//!
//! Parallelism is expressed as divide-and-conquer: an algorithm asks
//! [`Par::fork`] whether a piece of work of a given size is worth splitting,
//! and if so runs both halves through [`Par::join`]. Strategies only decide
//! and execute; they never see algorithm data.

use std::fmt;
use std::sync::OnceLock;

use tracing::debug;

use crate::error::{OrbitError, Result};

/// Parallel execution strategy.
///
/// The primitives are untyped so the trait stays object safe; typed results
/// are layered on top by [`Par`].
pub trait ExecutionStrategy: Send + Sync + fmt::Debug {
    /// Whether work of `size` at recursion `depth` should be split.
    ///
    /// Pure; must return false whenever `size <= 1`.
    fn fork(&self, size: usize, depth: usize) -> bool;

    /// Runs `task` to completion, possibly on a worker thread, and returns
    /// once it has finished.
    ///
    /// Calling this from inside a task of the same strategy must not
    /// deadlock.
    fn execute_blocking(&self, task: &mut (dyn FnMut() + Send));

    /// Runs `a` and `b`, potentially concurrently, and returns once both have
    /// finished.
    fn queue_pair(&self, a: &mut (dyn FnMut() + Send), b: &mut (dyn FnMut() + Send));
}

/// Default non-parallel strategy.
///
/// [`ExecutionStrategy::fork`] always returns false, so algorithms never reach
/// the other primitives; invoking them anyway is a programming error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalStrategy;

impl ExecutionStrategy for LocalStrategy {
    fn fork(&self, _size: usize, _depth: usize) -> bool {
        false
    }

    #[allow(clippy::panic)]
    fn execute_blocking(&self, _task: &mut (dyn FnMut() + Send)) {
        panic!("execute_blocking on LocalStrategy; query fork() first");
    }

    #[allow(clippy::panic)]
    fn queue_pair(&self, _a: &mut (dyn FnMut() + Send), _b: &mut (dyn FnMut() + Send)) {
        panic!("queue_pair on LocalStrategy; query fork() first");
    }
}

static LOCAL: LocalStrategy = LocalStrategy;
static DEFAULT: OnceLock<Box<dyn ExecutionStrategy>> = OnceLock::new();

/// Installs the process-wide default strategy.
///
/// Meant for the final application only; library code should take a [`Par`]
/// from its caller instead. Succeeds at most once per process.
///
/// # Errors
///
/// [`OrbitError::DefaultStrategyAlreadySet`] on every call after the first.
pub fn set_default_strategy<S>(strategy: S) -> Result<()>
where
    S: ExecutionStrategy + 'static,
{
    debug!(?strategy, "installing default execution strategy");
    DEFAULT
        .set(Box::new(strategy))
        .map_err(|_| OrbitError::DefaultStrategyAlreadySet)
}

/// The process-wide default strategy ([`LocalStrategy`] until configured).
pub fn default_strategy() -> &'static dyn ExecutionStrategy {
    match DEFAULT.get() {
        Some(strategy) => strategy.as_ref(),
        None => &LOCAL,
    }
}

/// Execution context: a strategy plus the current recursion depth.
///
/// `Par` is `Copy` and threaded through every recursive call. Both branches of
/// a [`Par::join`] observe `depth + 1`.
#[derive(Clone, Copy)]
pub struct Par<'s> {
    strategy: &'s dyn ExecutionStrategy,
    depth: usize,
}

impl fmt::Debug for Par<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Par")
            .field("strategy", &self.strategy)
            .field("depth", &self.depth)
            .finish()
    }
}

impl<'s> Par<'s> {
    /// Root context (depth 0) over an explicit strategy.
    pub fn new(strategy: &'s dyn ExecutionStrategy) -> Self {
        Self { strategy, depth: 0 }
    }

    /// Recursion depth of this context.
    pub fn depth(self) -> usize {
        self.depth
    }

    /// The strategy driving this context.
    pub fn strategy(self) -> &'s dyn ExecutionStrategy {
        self.strategy
    }

    /// Whether work of `size` should be split at this depth.
    pub fn fork(self, size: usize) -> bool {
        size > 1 && self.strategy.fork(size, self.depth)
    }

    fn child(self) -> Self {
        Self {
            strategy: self.strategy,
            depth: self.depth + 1,
        }
    }

    /// Runs `task` through [`ExecutionStrategy::execute_blocking`] and returns
    /// its result. [`Par::fork`] must be queried first.
    pub fn execute_blocking<R, F>(self, task: F) -> R
    where
        F: FnOnce(Par<'s>) -> R + Send,
        R: Send,
    {
        let mut slot = Slot::Pending(task);
        self.strategy.execute_blocking(&mut || slot.run(self));
        slot.finish(self)
    }

    /// Runs `a` and `b` through [`ExecutionStrategy::queue_pair`], each with a
    /// child context, and returns both results in argument order.
    pub fn join<A, B, RA, RB>(self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce(Par<'s>) -> RA + Send,
        B: FnOnce(Par<'s>) -> RB + Send,
        RA: Send,
        RB: Send,
    {
        let child = self.child();
        let mut sa = Slot::Pending(a);
        let mut sb = Slot::Pending(b);
        self.strategy
            .queue_pair(&mut || sa.run(child), &mut || sb.run(child));
        (sa.finish(child), sb.finish(child))
    }

    /// Three-way variant of [`Par::join`]: `a` is paired against the join of
    /// `b` and `c`.
    pub fn join3<A, B, C, RA, RB, RC>(self, a: A, b: B, c: C) -> (RA, RB, RC)
    where
        A: FnOnce(Par<'s>) -> RA + Send,
        B: FnOnce(Par<'s>) -> RB + Send,
        C: FnOnce(Par<'s>) -> RC + Send,
        RA: Send,
        RB: Send,
        RC: Send,
    {
        let (ra, (rb, rc)) = self.join(a, |p| p.join(b, c));
        (ra, rb, rc)
    }
}

impl Par<'static> {
    /// Root context over the process-wide default strategy.
    pub fn global() -> Self {
        Self::new(default_strategy())
    }

    /// Root context that never forks.
    pub fn local() -> Self {
        Self::new(&LOCAL)
    }
}

/// Single-slot result holder for one task.
enum Slot<F, R> {
    Pending(F),
    Running,
    Done(R),
}

impl<F, R> Slot<F, R> {
    fn run<'s>(&mut self, par: Par<'s>)
    where
        F: FnOnce(Par<'s>) -> R,
    {
        if let Self::Pending(task) = std::mem::replace(self, Self::Running) {
            *self = Self::Done(task(par));
        }
    }

    /// Reads the result; a task the strategy never ran is executed inline.
    fn finish<'s>(self, par: Par<'s>) -> R
    where
        F: FnOnce(Par<'s>) -> R,
    {
        match self {
            Self::Done(value) => value,
            Self::Pending(task) => task(par),
            // A task that panicked has already unwound through the strategy.
            Self::Running => unreachable!("task slot read while still running"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Runs both branches sequentially on the caller; forks above size 2.
    #[derive(Debug)]
    struct Inline {
        pairs: AtomicUsize,
    }

    impl ExecutionStrategy for Inline {
        fn fork(&self, size: usize, depth: usize) -> bool {
            size > 2 && depth < 8
        }

        fn execute_blocking(&self, task: &mut (dyn FnMut() + Send)) {
            task();
        }

        fn queue_pair(&self, a: &mut (dyn FnMut() + Send), b: &mut (dyn FnMut() + Send)) {
            self.pairs.fetch_add(1, Ordering::Relaxed);
            b();
            a();
        }
    }

    /// Never runs anything; results must still come back.
    #[derive(Debug)]
    struct Lazy;

    impl ExecutionStrategy for Lazy {
        fn fork(&self, size: usize, _depth: usize) -> bool {
            size > 1
        }

        fn execute_blocking(&self, _task: &mut (dyn FnMut() + Send)) {}

        fn queue_pair(&self, _a: &mut (dyn FnMut() + Send), _b: &mut (dyn FnMut() + Send)) {}
    }

    #[test]
    fn local_never_forks() {
        let par = Par::local();
        assert!(!par.fork(0));
        assert!(!par.fork(1));
        assert!(!par.fork(1 << 20));
    }

    #[test]
    #[should_panic(expected = "queue_pair")]
    fn local_queue_pair_is_a_contract_violation() {
        let _ = Par::local().join(|_| 1, |_| 2);
    }

    #[test]
    #[should_panic(expected = "execute_blocking")]
    fn local_execute_blocking_is_a_contract_violation() {
        let _ = Par::local().execute_blocking(|_| 1);
    }

    #[test]
    fn join_returns_results_in_argument_order() {
        let strategy = Inline {
            pairs: AtomicUsize::new(0),
        };
        let par = Par::new(&strategy);
        let (a, b) = par.join(|p| (p.depth(), "a"), |p| (p.depth(), "b"));
        assert_eq!(a, (1, "a"));
        assert_eq!(b, (1, "b"));
        assert_eq!(strategy.pairs.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn join3_composes_two_pairs() {
        let strategy = Inline {
            pairs: AtomicUsize::new(0),
        };
        let par = Par::new(&strategy);
        let (a, b, c) = par.join3(|p| p.depth(), |p| p.depth(), |p| p.depth());
        assert_eq!((a, b, c), (1, 2, 2));
        assert_eq!(strategy.pairs.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn blocking_keeps_depth() {
        let strategy = Inline {
            pairs: AtomicUsize::new(0),
        };
        let par = Par::new(&strategy);
        assert_eq!(par.execute_blocking(|p| p.depth() + 40), 40);
    }

    #[test]
    fn skipped_tasks_run_inline() {
        let par = Par::new(&Lazy);
        assert_eq!(par.join(|_| 3, |_| 4), (3, 4));
        assert_eq!(par.execute_blocking(|_| 5), 5);
    }

    #[test]
    fn fork_is_false_for_trivial_sizes_whatever_the_strategy() {
        let par = Par::new(&Lazy);
        assert!(!par.fork(1));
        assert!(par.fork(2));
    }
}
