// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::cast_possible_wrap)]

use std::sync::{Arc, Mutex};

use dashu::integer::IBig;
use orbit_core::{create, ExecutionStrategy, LocalStrategy, PoolStrategy};
use rayon::ThreadPoolBuilder;

pub use orbit_dry_tests::{random_order, shuffle, Graph, XorShift64, SEEDS};

/// Forks every splittable piece of work and runs join branches one after
/// the other in a seeded random order.
///
/// Single-threaded, so any dependence of a result on branch scheduling shows
/// up deterministically for a given seed.
#[derive(Debug)]
pub struct ShuffledStrategy {
    rng: Mutex<XorShift64>,
}

impl ShuffledStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(XorShift64::new(seed)),
        }
    }

    fn coin(&self) -> bool {
        self.rng.lock().unwrap().gen_bool()
    }
}

impl ExecutionStrategy for ShuffledStrategy {
    fn fork(&self, size: usize, _depth: usize) -> bool {
        size > 1
    }

    fn execute_blocking(&self, task: &mut (dyn FnMut() + Send)) {
        task();
    }

    fn queue_pair(&self, a: &mut (dyn FnMut() + Send), b: &mut (dyn FnMut() + Send)) {
        if self.coin() {
            a();
            b();
        } else {
            b();
            a();
        }
    }
}

/// Named strategies every transparency check runs against.
pub fn strategies() -> Vec<(String, Arc<dyn ExecutionStrategy>)> {
    let always = ThreadPoolBuilder::new()
        .num_threads(3)
        .build()
        .expect("pool of 3 threads should build");
    let mut out: Vec<(String, Arc<dyn ExecutionStrategy>)> = vec![
        ("local".into(), Arc::new(LocalStrategy)),
        (
            "shared".into(),
            Arc::new(PoolStrategy::parallel().expect("shared pool should build")),
        ),
        (
            "always-fork".into(),
            Arc::new(PoolStrategy::with_predicate(Arc::new(always), |_, _| true)),
        ),
        ("shuffled".into(), Arc::new(ShuffledStrategy::new(0x5EED))),
    ];
    for (log2, work) in [(1, 1), (2, 4), (3, 16)] {
        out.push((
            format!("pool-{log2}-{work}"),
            create(log2, work).expect("pool should build"),
        ));
    }
    out
}

/// Random strictly increasing run of values below `bound`.
pub fn sorted_run(rng: &mut XorShift64, len: usize, bound: usize) -> Vec<i32> {
    let mut v: Vec<i32> = (0..len)
        .map(|_| rng.gen_range_usize(bound) as i32)
        .collect();
    v.sort_unstable();
    v.dedup();
    v
}

pub fn widen(xs: &[i32]) -> Vec<i64> {
    xs.iter().map(|&x| i64::from(x)).collect()
}

pub fn exact(xs: &[i32]) -> Vec<IBig> {
    xs.iter().map(|&x| IBig::from(x)).collect()
}

pub fn widen_groups(groups: &[Vec<i32>]) -> Vec<Vec<i64>> {
    groups.iter().map(|g| widen(g)).collect()
}

pub fn exact_groups(groups: &[Vec<i32>]) -> Vec<Vec<IBig>> {
    groups.iter().map(|g| exact(g)).collect()
}

/// A graph's adjacency read through `order`, row by row.
pub fn adjacency_under(g: &Graph, order: &[usize]) -> Vec<bool> {
    order
        .iter()
        .flat_map(|&a| order.iter().map(move |&b| g.edge(a, b)))
        .collect()
}
