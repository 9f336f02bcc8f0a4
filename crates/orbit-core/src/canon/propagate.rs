// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed-point refinement of a preorder.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use super::{Proceed, Relation, Tie};
use crate::group_op::GroupOperator;
use crate::ordering::compare_chain;
use crate::reduce::{regroup_in, ParCmp, Ties};
use crate::strategy::Par;

/// Order of `a` relative to `b` as seen from the groups of `groups`.
///
/// Groups are consulted from last to first; for each, the differences
/// `relate(a, c) - relate(b, c)` over its members are combined and the first
/// non-neutral sign decides.
pub(super) fn relative_order<T, E, G>(
    par: Par<'_>,
    groups: &[Vec<T>],
    a: &T,
    b: &T,
    relate: &Relation<'_, T, E>,
    group: &G,
) -> Ordering
where
    T: Sync,
    E: Send,
    G: GroupOperator<E>,
{
    let n = groups.len();
    compare_chain(n, |i| {
        let members = &groups[n - 1 - i];
        let diff = group.combine_range(par, 0, members.len(), &|_, k| {
            let c = &members[k];
            group.cancel(relate(a, c), relate(b, c))
        });
        group.signum(&diff)
    })
}

/// Refines `src` until no group splits any more.
///
/// Before every pass `proceed` (when given) is consulted; `false` stops the
/// refinement early. `tie` orders members inside each split group.
#[instrument(skip_all, fields(groups = src.len()))]
pub(super) fn propagate_in<'s, T, E, G>(
    par: Par<'s>,
    src: Vec<Vec<T>>,
    relate: &Relation<'_, T, E>,
    group: &G,
    tie: Option<&Tie<T>>,
    proceed: Option<&Proceed<T>>,
) -> Vec<Vec<T>>
where
    T: Clone + Send + Sync,
    E: Send,
    G: GroupOperator<E>,
{
    let tie = tie.map(|f| move |_: Par<'s>, a: &T, b: &T| f(a, b));
    let tie = tie.as_ref().map(|f| f as ParCmp<'s, '_, T>);

    let mut current = src;
    let mut passes = 0usize;
    while proceed.is_none_or(|f| f(current.as_slice())) {
        let next = {
            let groups = &current;
            let relative =
                |p: Par<'s>, a: &T, b: &T| relative_order(p, groups, a, b, relate, group);
            regroup_in(par, groups, &relative, tie, Ties::Keep)
        };
        let Some(next) = next else { break };
        passes += 1;
        debug!(pass = passes, groups = next.len(), "refined");
        current = next;
    }
    debug!(passes, groups = current.len(), "propagation done");
    current
}
