// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::cast_possible_wrap)]
//! Ordered merge and merge-sort throughput, sequential vs pooled.
//!
//! # Running
//!
//! ```sh
//! cargo bench --package orbit-benches --bench merge_throughput
//! ```
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use orbit_core::{ExecutionStrategy, ForkPolicy, LocalStrategy, Par, PoolStrategy, SetOperator};
use orbit_dry_tests::{shuffle, XorShift64};
use rayon::ThreadPoolBuilder;

/// Sequential baseline plus one pool per worker count.
fn strategies() -> Vec<(String, Arc<dyn ExecutionStrategy>)> {
    let mut out: Vec<(String, Arc<dyn ExecutionStrategy>)> =
        vec![("local".into(), Arc::new(LocalStrategy))];
    for log2 in [1u32, 2, 3] {
        let pool = ThreadPoolBuilder::new()
            .num_threads(1 << log2)
            .build()
            .expect("bench pool should build");
        let policy = ForkPolicy {
            max_depth: log2 as usize + 2,
            work_size: 1 << 12,
        };
        out.push((
            format!("pool_{}w", 1 << log2),
            Arc::new(PoolStrategy::new(Arc::new(pool), policy)),
        ));
    }
    out
}

/// Strictly increasing run: every `step`-th integer from `offset`.
fn run(len: usize, step: i64, offset: i64) -> Vec<i64> {
    (0..len as i64).map(|i| offset + i * step).collect()
}

fn bench_two_way_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_way_merge");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(30);
    let strategies = strategies();
    for &n in &[10_000usize, 200_000] {
        let a = run(n, 2, 0);
        let b = run(n, 3, 1);
        group.throughput(Throughput::Elements(2 * n as u64));
        for op in [SetOperator::Union, SetOperator::Isect, SetOperator::Diff] {
            for (name, strategy) in &strategies {
                let id = BenchmarkId::new(format!("{op:?}/{name}"), n);
                group.bench_with_input(id, &n, |bch, _| {
                    let par = Par::new(strategy.as_ref());
                    bch.iter(|| {
                        black_box(par.merge(&a, &b, i64::cmp, |x, _| *x, op));
                    });
                });
            }
        }
    }
    group.finish();
}

fn bench_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_by");
    group
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(20);
    let strategies = strategies();
    for &n in &[10_000usize, 100_000] {
        let mut xs: Vec<i64> = (0..n as i64).collect();
        shuffle(&mut XorShift64::new(0x00C0_FFEE), &mut xs);
        group.throughput(Throughput::Elements(n as u64));
        for (name, strategy) in &strategies {
            group.bench_with_input(BenchmarkId::new(name.as_str(), n), &n, |bch, &n| {
                let par = Par::new(strategy.as_ref());
                bch.iter(|| black_box(par.sort_by(n, |i| xs[i], i64::cmp, |x, _| *x)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_two_way_merge, bench_sort);
criterion_main!(benches);
