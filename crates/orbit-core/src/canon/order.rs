// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Automorphism groups and canonical order.

use std::cmp::Ordering;

use tracing::{debug, instrument};

use super::compare::compare_in;
use super::propagate::propagate_in;
use super::{Relation, Tie};
use crate::group_op::GroupOperator;
use crate::ordering::first_best;
use crate::reduce::{group_stable_in, populate_in, regroup_in, Ties};
use crate::strategy::Par;

/// Partitions `src` into automorphism orbits.
#[instrument(skip_all, fields(groups = src.len()))]
pub(super) fn groups_in<'s, T, E, G>(
    par: Par<'s>,
    src: Vec<Vec<T>>,
    relate: &Relation<'_, T, E>,
    group: &G,
    tie: Option<&Tie<T>>,
) -> Vec<Vec<T>>
where
    T: Clone + PartialEq + Send + Sync,
    E: Send,
    G: GroupOperator<E>,
{
    let fixed = propagate_in(par, src, relate, group, None, None);
    let orbits = {
        let by_orbit = |p: Par<'s>, a: &T, b: &T| compare_in(p, a, b, &fixed, relate, group);
        regroup_in(par, &fixed, &by_orbit, None, Ties::Keep)
    };
    let orbits = orbits.unwrap_or(fixed);
    debug!(orbits = orbits.len(), "orbits computed");
    let Some(tie) = tie else {
        return orbits;
    };
    let tie = |_: Par<'s>, a: &T, b: &T| tie(a, b);
    let whole = |_: Par<'s>, _: &T, _: &T| Ordering::Equal;
    populate_in(par, orbits.len(), &|p, i| {
        let orbit = &orbits[i];
        group_stable_in(p, orbit.len(), &|_, j| orbit[j].clone(), &whole, &tie)
            .into_iter()
            .flatten()
            .collect()
    })
}

/// Canonical order: refine, individualize the last ambiguous group's pivot,
/// repeat until every group is a singleton.
#[instrument(skip_all, fields(groups = src.len()))]
pub(super) fn order_in<T, E, G>(
    par: Par<'_>,
    src: Vec<Vec<T>>,
    relate: &Relation<'_, T, E>,
    group: &G,
    tie: Option<&Tie<T>>,
) -> Vec<T>
where
    T: Clone + PartialEq + Send + Sync,
    E: Send,
    G: GroupOperator<E>,
{
    // Settled tails, collected back to front.
    let mut settled: Vec<Vec<T>> = Vec::new();
    let mut current = src;
    loop {
        current = groups_in(par, current, relate, group, None);
        let ambiguous = current.iter().rposition(|g| g.len() > 1);
        let tail_from = ambiguous.map_or(0, |pv| pv + 1);
        settled.push(current.split_off(tail_from).into_iter().flatten().collect());

        let Some(mut siblings) = ambiguous.and_then(|_| current.pop()) else {
            break;
        };
        let sp = tie
            .and_then(|tie| first_best(&siblings, tie))
            .unwrap_or(0);
        let pivot = siblings.remove(sp);
        debug!(
            group = current.len(),
            siblings = siblings.len(),
            "individualizing pivot"
        );
        current.extend(propagate_in(
            par,
            vec![siblings, vec![pivot]],
            relate,
            group,
            None,
            None,
        ));
    }
    settled.into_iter().rev().flatten().collect()
}
