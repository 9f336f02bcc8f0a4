// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Range bisection primitives: for-each, reduce, populate, concatenate, and
//! the sort/group operations built from reduce + merge.
//!
//! The crate-internal `*_in` functions take callbacks that receive the current
//! [`Par`], so nested algorithms (a comparator that itself reduces in
//! parallel) keep threading depth. The public methods on [`Par`] wrap plain
//! closures around them.

use std::cmp::Ordering;

use crate::merge::merge_in;
use crate::set_op::SetOperator;
use crate::strategy::Par;

/// Comparator ordering members within a group.
pub(crate) type Inner<'f, T> = dyn Fn(&T, &T) -> Ordering + Sync + 'f;

/// Comparator over `T` that receives the execution context.
pub(crate) type ParCmp<'s, 'f, T> = &'f (dyn Fn(Par<'s>, &T, &T) -> Ordering + Sync);

pub(crate) fn for_each_in<'s, F>(par: Par<'s>, from: usize, to: usize, f: &F)
where
    F: Fn(Par<'s>, usize) + Sync,
{
    let n = to.saturating_sub(from);
    if par.fork(n) {
        let mid = from + n / 2;
        par.join(
            |p| for_each_in(p, from, mid, f),
            |p| for_each_in(p, mid, to, f),
        );
    } else {
        for i in from..to {
            f(par, i);
        }
    }
}

/// Reduces `[from, to)`; `None` for an empty range.
///
/// Left results are always merged before right ones. The sequential base
/// case reduces neighbours pairwise (`(0,1), (2,3), ...`) until one value
/// remains, which keeps merge-style reductions balanced.
pub(crate) fn reduce_in<'s, T, V, M>(
    par: Par<'s>,
    from: usize,
    to: usize,
    value: &V,
    merge: &M,
) -> Option<T>
where
    T: Send,
    V: Fn(Par<'s>, usize) -> T + Sync,
    M: Fn(Par<'s>, T, T) -> T + Sync,
{
    let n = to.saturating_sub(from);
    if par.fork(n) {
        let mid = from + n / 2;
        let (a, b) = par.join(
            |p| reduce_in(p, from, mid, value, merge),
            |p| reduce_in(p, mid, to, value, merge),
        );
        return match (a, b) {
            (Some(a), Some(b)) => Some(merge(par, a, b)),
            (a, b) => a.or(b),
        };
    }
    let mut level: Vec<T> = (from..to).map(|i| value(par, i)).collect();
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut items = level.into_iter();
        while let Some(a) = items.next() {
            next.push(match items.next() {
                Some(b) => merge(par, a, b),
                None => a,
            });
        }
        level = next;
    }
    level.pop()
}

fn fill_in<'s, T, F>(par: Par<'s>, offset: usize, out: &mut [Option<T>], f: &F)
where
    T: Send,
    F: Fn(Par<'s>, usize) -> T + Sync,
{
    if par.fork(out.len()) {
        let mid = out.len() / 2;
        let (left, right) = out.split_at_mut(mid);
        par.join(
            |p| fill_in(p, offset, left, f),
            |p| fill_in(p, offset + mid, right, f),
        );
    } else {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = Some(f(par, offset + i));
        }
    }
}

pub(crate) fn populate_in<'s, T, F>(par: Par<'s>, n: usize, f: &F) -> Vec<T>
where
    T: Send,
    F: Fn(Par<'s>, usize) -> T + Sync,
{
    let mut out: Vec<Option<T>> = std::iter::repeat_with(|| None).take(n).collect();
    fill_in(par, 0, &mut out, f);
    out.into_iter().flatten().collect()
}

/// Moves every part into `out`; `offsets[i]` is where part `i` starts.
fn scatter_in<T: Send>(
    par: Par<'_>,
    parts: &mut [Vec<T>],
    offsets: &[usize],
    out: &mut [Option<T>],
) {
    if parts.len() > 1 && par.fork(out.len()) {
        let mid = parts.len() / 2;
        let (lp, rp) = parts.split_at_mut(mid);
        let (lo, ro) = offsets.split_at(mid);
        let (lout, rout) = out.split_at_mut(ro[0] - lo[0]);
        par.join(
            |p| scatter_in(p, lp, lo, lout),
            |p| scatter_in(p, rp, ro, rout),
        );
    } else {
        let moved = parts.iter_mut().flat_map(std::mem::take);
        for (slot, item) in out.iter_mut().zip(moved) {
            *slot = Some(item);
        }
    }
}

pub(crate) fn concat_parts_in<T: Send>(par: Par<'_>, mut parts: Vec<Vec<T>>) -> Vec<T> {
    let mut offsets = Vec::with_capacity(parts.len());
    let mut total = 0usize;
    for part in &parts {
        offsets.push(total);
        total += part.len();
    }
    let mut out: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
    scatter_in(par, &mut parts, &offsets, &mut out);
    out.into_iter().flatten().collect()
}

pub(crate) fn sort_in<'s, T, F, M>(
    par: Par<'s>,
    n: usize,
    value: &F,
    cmp: ParCmp<'s, '_, T>,
    combine: &M,
) -> Vec<T>
where
    T: Clone + Send + Sync,
    F: Fn(Par<'s>, usize) -> T + Sync,
    M: Fn(Par<'s>, &T, &T) -> T + Sync,
{
    reduce_in(
        par,
        0,
        n,
        &|p, i| vec![value(p, i)],
        &|p, a: Vec<T>, b: Vec<T>| merge_in(p, &a, &b, cmp, combine, SetOperator::Union),
    )
    .unwrap_or_default()
}

pub(crate) fn group_in<'s, T, F>(
    par: Par<'s>,
    n: usize,
    value: &F,
    outer: ParCmp<'s, '_, T>,
    inner: Option<ParCmp<'s, '_, T>>,
) -> Vec<Vec<T>>
where
    T: Clone + Send + Sync,
    F: Fn(Par<'s>, usize) -> T + Sync,
{
    let by_head = |p: Par<'s>, a: &Vec<T>, b: &Vec<T>| {
        debug_assert!(!a.is_empty() && !b.is_empty());
        outer(p, &a[0], &b[0])
    };
    let join_members = |p: Par<'s>, a: &Vec<T>, b: &Vec<T>| match inner {
        Some(inner) => {
            let keep_first = |_: Par<'s>, u: &T, _: &T| u.clone();
            merge_in(p, a, b, inner, &keep_first, SetOperator::Union)
        }
        None => concat_parts_in(p, vec![a.clone(), b.clone()]),
    };
    sort_in(par, n, &|p, i| vec![value(p, i)], &by_head, &join_members)
}

/// [`group_in`] where `inner` only orders: members it calls equal are all
/// kept, in input order.
pub(crate) fn group_stable_in<'s, T, F>(
    par: Par<'s>,
    n: usize,
    value: &F,
    outer: ParCmp<'s, '_, T>,
    inner: ParCmp<'s, '_, T>,
) -> Vec<Vec<T>>
where
    T: Clone + Send + Sync,
    F: Fn(Par<'s>, usize) -> T + Sync,
{
    let outer = |p: Par<'s>, a: &(usize, T), b: &(usize, T)| outer(p, &a.1, &b.1);
    let inner =
        |p: Par<'s>, a: &(usize, T), b: &(usize, T)| inner(p, &a.1, &b.1).then(a.0.cmp(&b.0));
    group_in(par, n, &|p, i| (i, value(p, i)), &outer, Some(&inner))
        .into_iter()
        .map(|members| members.into_iter().map(|(_, v)| v).collect())
        .collect()
}

/// What splitting does with members the inner comparator calls equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Ties {
    /// Keep the first of them.
    Collapse,
    /// Keep all of them in input order.
    Keep,
}

/// Splits every group of `src` by `outer`; `None` when nothing split.
///
/// A group that stays whole keeps its original member order.
pub(crate) fn regroup_in<'s, T>(
    par: Par<'s>,
    src: &[Vec<T>],
    outer: ParCmp<'s, '_, T>,
    inner: Option<ParCmp<'s, '_, T>>,
    ties: Ties,
) -> Option<Vec<Vec<T>>>
where
    T: Clone + Send + Sync,
{
    let parts = populate_in(par, src.len(), &|p, i| {
        let group = &src[i];
        if group.len() > 1 {
            let at = |_: Par<'s>, j: usize| group[j].clone();
            let split = match (inner, ties) {
                (Some(inner), Ties::Keep) => group_stable_in(p, group.len(), &at, outer, inner),
                _ => group_in(p, group.len(), &at, outer, inner),
            };
            if split.len() > 1 {
                return split;
            }
        }
        vec![group.clone()]
    });
    let count: usize = parts.iter().map(Vec::len).sum();
    if count == src.len() {
        None
    } else {
        Some(concat_parts_in(par, parts))
    }
}

impl<'s> Par<'s> {
    /// Runs `task` here, or through [`Par::execute_blocking`] when `size` is
    /// worth forking.
    pub(crate) fn enter<R, F>(self, size: usize, task: F) -> R
    where
        F: FnOnce(Par<'s>) -> R + Send,
        R: Send,
    {
        if self.fork(size) {
            self.execute_blocking(task)
        } else {
            task(self)
        }
    }

    /// Applies `f` to every index in `[from, to)`, in unspecified order.
    pub fn for_each<F>(self, from: usize, to: usize, f: F)
    where
        F: Fn(usize) + Sync,
    {
        let f = move |_: Par<'s>, i: usize| f(i);
        self.enter(to.saturating_sub(from), |p| for_each_in(p, from, to, &f));
    }

    /// Reduces `value(from) ⊕ ... ⊕ value(to - 1)` with an associative
    /// `merge`; `identity` for an empty range.
    ///
    /// ```
    /// use orbit_core::Par;
    /// assert_eq!(Par::local().reduce(0, 5, 0, |i| i, |a, b| a + b), 10);
    /// ```
    pub fn reduce<T, V, M>(self, from: usize, to: usize, identity: T, value: V, merge: M) -> T
    where
        T: Send,
        V: Fn(usize) -> T + Sync,
        M: Fn(T, T) -> T + Sync,
    {
        let value = move |_: Par<'s>, i: usize| value(i);
        let merge = move |_: Par<'s>, a: T, b: T| merge(a, b);
        self.enter(to.saturating_sub(from), |p| {
            reduce_in(p, from, to, &value, &merge)
        })
        .unwrap_or(identity)
    }

    /// Builds `[f(0), ..., f(n - 1)]`.
    pub fn populate<T, F>(self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        let f = move |_: Par<'s>, i: usize| f(i);
        self.enter(n, |p| populate_in(p, n, &f))
    }

    /// Concatenates `f(0), ..., f(n - 1)` in index order.
    pub fn concat<T, F>(self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> Vec<T> + Sync,
    {
        let f = move |_: Par<'s>, i: usize| f(i);
        self.enter(n, |p| {
            let parts = populate_in(p, n, &f);
            concat_parts_in(p, parts)
        })
    }

    /// `a` followed by `b`.
    pub fn concat_pair<T: Send>(self, a: Vec<T>, b: Vec<T>) -> Vec<T> {
        let size = a.len() + b.len();
        self.enter(size, |p| concat_parts_in(p, vec![a, b]))
    }

    /// `a`, `b`, then `c`.
    pub fn concat_triple<T: Send>(self, a: Vec<T>, b: Vec<T>, c: Vec<T>) -> Vec<T> {
        let size = a.len() + b.len() + c.len();
        self.enter(size, |p| concat_parts_in(p, vec![a, b, c]))
    }

    /// Merge-sorts `value(0..n)` by `cmp`; elements equal under `cmp` are
    /// collapsed with `combine`.
    ///
    /// ```
    /// use orbit_core::Par;
    /// let src = [3, 2, 3, 0, 1, 1];
    /// let sorted = Par::local().sort_by(src.len(), |i| src[i], i32::cmp, |a, _| *a);
    /// assert_eq!(sorted, vec![0, 1, 2, 3]);
    /// ```
    pub fn sort_by<T, F, C, M>(self, n: usize, value: F, cmp: C, combine: M) -> Vec<T>
    where
        T: Clone + Send + Sync,
        F: Fn(usize) -> T + Sync,
        C: Fn(&T, &T) -> Ordering + Sync,
        M: Fn(&T, &T) -> T + Sync,
    {
        let value = move |_: Par<'s>, i: usize| value(i);
        let cmp = move |_: Par<'s>, a: &T, b: &T| cmp(a, b);
        let combine = move |_: Par<'s>, a: &T, b: &T| combine(a, b);
        self.enter(n, |p| sort_in(p, n, &value, &cmp, &combine))
    }

    /// Groups `value(0..n)` into runs equal under `outer`, in `outer` order.
    ///
    /// With `inner`, each group is sorted (and deduplicated) by it; without,
    /// members keep their input order.
    pub fn group_by<T, F, C>(
        self,
        n: usize,
        value: F,
        outer: C,
        inner: Option<&Inner<'_, T>>,
    ) -> Vec<Vec<T>>
    where
        T: Clone + Send + Sync,
        F: Fn(usize) -> T + Sync,
        C: Fn(&T, &T) -> Ordering + Sync,
    {
        let value = move |_: Par<'s>, i: usize| value(i);
        let outer = move |_: Par<'s>, a: &T, b: &T| outer(a, b);
        let inner = inner.map(|f| move |_: Par<'s>, a: &T, b: &T| f(a, b));
        self.enter(n, |p| match &inner {
            Some(inner) => group_in(p, n, &value, &outer, Some(inner)),
            None => group_in(p, n, &value, &outer, None),
        })
    }

    /// Splits every group of a preorder by `outer` (see [`Par::group_by`]).
    ///
    /// Group order is preserved: each group is replaced in place by its
    /// splits. Returns a copy of `src` when nothing split.
    pub fn regroup<T, C>(
        self,
        src: &[Vec<T>],
        outer: C,
        inner: Option<&Inner<'_, T>>,
    ) -> Vec<Vec<T>>
    where
        T: Clone + Send + Sync,
        C: Fn(&T, &T) -> Ordering + Sync,
    {
        let outer = move |_: Par<'s>, a: &T, b: &T| outer(a, b);
        let inner = inner.map(|f| move |_: Par<'s>, a: &T, b: &T| f(a, b));
        let size = src.iter().map(Vec::len).sum();
        self.enter(size, |p| {
            let split = match &inner {
                Some(inner) => regroup_in(p, src, &outer, Some(inner), Ties::Collapse),
                None => regroup_in(p, src, &outer, None, Ties::Collapse),
            };
            split.unwrap_or_else(|| src.to_vec())
        })
    }
}
