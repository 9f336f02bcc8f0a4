// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ordered-set merge engine.
//!
//! Inputs are strictly increasing under the supplied comparator. The parallel
//! path bisects the longer input, binary-searches its midpoint in the other,
//! and merges both halves independently; the halves never interact because
//! every element left of the split compares below every element right of it.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::Result;
use crate::reduce::{reduce_in, ParCmp};
use crate::set_op::SetOperator;
use crate::strategy::Par;

pub(crate) fn merge_in<'s, T, M>(
    par: Par<'s>,
    a: &[T],
    b: &[T],
    cmp: ParCmp<'s, '_, T>,
    combine: &M,
    op: SetOperator,
) -> Vec<T>
where
    T: Clone + Send + Sync,
    M: Fn(Par<'s>, &T, &T) -> T + Sync,
{
    if op == SetOperator::Empty {
        return Vec::new();
    }
    if a.is_empty() || b.is_empty() {
        return tail(a, b, op);
    }
    if a.len() > 2 && b.len() > 2 && par.fork(a.len() + b.len()) {
        return split(par, a, b, cmp, combine, op);
    }

    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match cmp(par, &a[i], &b[j]) {
            Ordering::Less => {
                if op.left() {
                    out.push(a[i].clone());
                }
                i += 1;
            }
            Ordering::Greater => {
                if op.right() {
                    out.push(b[j].clone());
                }
                j += 1;
            }
            Ordering::Equal => {
                if op.both() {
                    out.push(combine(par, &a[i], &b[j]));
                }
                i += 1;
                j += 1;
            }
        }
    }
    out.extend(tail(&a[i..], &b[j..], op));
    out
}

/// Whatever `op` admits of two inputs of which at most one is non-empty.
fn tail<T: Clone>(a: &[T], b: &[T], op: SetOperator) -> Vec<T> {
    let mut out = Vec::new();
    if op.left() {
        out.extend_from_slice(a);
    }
    if op.right() {
        out.extend_from_slice(b);
    }
    out
}

fn split<'s, T, M>(
    par: Par<'s>,
    a: &[T],
    b: &[T],
    cmp: ParCmp<'s, '_, T>,
    combine: &M,
    op: SetOperator,
) -> Vec<T>
where
    T: Clone + Send + Sync,
    M: Fn(Par<'s>, &T, &T) -> T + Sync,
{
    // Split both inputs at (ap, bp) so everything left of the split is below
    // the pivot and everything right of it is at or above.
    let (ap, bp) = if a.len() >= b.len() {
        let ap = a.len() / 2;
        let pivot = &a[ap];
        let bp = b
            .binary_search_by(|x| cmp(par, x, pivot))
            .unwrap_or_else(|i| i);
        (ap, bp)
    } else {
        let bp = b.len() / 2;
        let pivot = &b[bp];
        let ap = a
            .binary_search_by(|x| cmp(par, x, pivot))
            .unwrap_or_else(|i| i);
        (ap, bp)
    };
    debug_assert!(ap <= a.len() && bp <= b.len());
    trace!(
        depth = par.depth(),
        ap,
        bp,
        a = a.len(),
        b = b.len(),
        "merge split"
    );

    let (al, ar) = a.split_at(ap);
    let (bl, br) = b.split_at(bp);
    let extreme = al.is_empty() || ar.is_empty() || bl.is_empty() || br.is_empty();
    let (mut left, right) = if extreme {
        // One half is a run of a single input; no task needed for it.
        (
            merge_in(par, al, bl, cmp, combine, op),
            merge_in(par, ar, br, cmp, combine, op),
        )
    } else {
        par.join(
            |p| merge_in(p, al, bl, cmp, combine, op),
            |p| merge_in(p, ar, br, cmp, combine, op),
        )
    };
    left.extend(right);
    left
}

impl<'s> Par<'s> {
    /// Merges two sequences strictly increasing under `cmp`.
    ///
    /// `op` selects which elements survive: those only in `a`, only in `b`,
    /// and pairs equal under `cmp`, which are replaced by `combine(x, y)`.
    ///
    /// ```
    /// use orbit_core::{Par, SetOperator};
    /// let u = Par::local().merge(&[0, 1], &[0, 2, 3], i32::cmp, |x, _| *x, SetOperator::Union);
    /// assert_eq!(u, vec![0, 1, 2, 3]);
    /// ```
    pub fn merge<T, C, M>(self, a: &[T], b: &[T], cmp: C, combine: M, op: SetOperator) -> Vec<T>
    where
        T: Clone + Send + Sync,
        C: Fn(&T, &T) -> Ordering + Sync,
        M: Fn(&T, &T) -> T + Sync,
    {
        let cmp = move |_: Par<'s>, x: &T, y: &T| cmp(x, y);
        let combine = move |_: Par<'s>, x: &T, y: &T| combine(x, y);
        self.enter(a.len() + b.len(), |p| merge_in(p, a, b, &cmp, &combine, op))
    }

    /// Folds `f(0), ..., f(n - 1)` with [`Par::merge`].
    ///
    /// Pairwise folding is only order-independent for symmetric operators, so
    /// `Ldiff`, `Rdiff`, `Left` and `Right` are rejected.
    ///
    /// # Errors
    ///
    /// [`OrbitError::AsymmetricOperator`](crate::OrbitError::AsymmetricOperator)
    /// for an asymmetric `op`.
    pub fn merge_many<T, F, C, M>(
        self,
        n: usize,
        f: F,
        cmp: C,
        combine: M,
        op: SetOperator,
    ) -> Result<Vec<T>>
    where
        T: Clone + Send + Sync,
        F: Fn(usize) -> Vec<T> + Sync,
        C: Fn(&T, &T) -> Ordering + Sync,
        M: Fn(&T, &T) -> T + Sync,
    {
        op.require_symmetric()?;
        let f = move |_: Par<'s>, i: usize| f(i);
        let cmp = move |_: Par<'s>, x: &T, y: &T| cmp(x, y);
        let combine = move |_: Par<'s>, x: &T, y: &T| combine(x, y);
        let fold = |p: Par<'s>, x: Vec<T>, y: Vec<T>| merge_in(p, &x, &y, &cmp, &combine, op);
        Ok(self
            .enter(n, |p| reduce_in(p, 0, n, &f, &fold))
            .unwrap_or_default())
    }
}
