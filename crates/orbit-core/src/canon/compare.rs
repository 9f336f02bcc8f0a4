// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pairwise automorphism test.
//!
//! To decide whether `a` and `b` are interchangeable, the preorder is doubled
//! into a low copy seen from `a` and a high copy seen from `b`, with the two
//! copies unrelated to each other. If refinement ever separates `a` (low)
//! from `b` (high), the two symbols are distinguishable.

use std::cmp::Ordering;

use tracing::trace;

use super::propagate::propagate_in;
use super::Relation;
use crate::group_op::GroupOperator;
use crate::reduce::populate_in;
use crate::strategy::Par;

/// A symbol in one of the two copies of the preorder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct Tagged<T> {
    pub(super) high: bool,
    pub(super) value: T,
}

impl<T> Tagged<T> {
    fn low(value: T) -> Self {
        Self { high: false, value }
    }

    fn high(value: T) -> Self {
        Self { high: true, value }
    }
}

pub(super) fn compare_in<T, E, G>(
    par: Par<'_>,
    a: &T,
    b: &T,
    src: &[Vec<T>],
    relate: &Relation<'_, T, E>,
    group: &G,
) -> Ordering
where
    T: Clone + PartialEq + Send + Sync,
    E: Send,
    G: GroupOperator<E>,
{
    if a == b {
        return Ordering::Equal;
    }

    let doubled = populate_in(par, src.len() + 1, &|_, i| {
        if i == 0 {
            return vec![Tagged::low(a.clone()), Tagged::high(b.clone())];
        }
        let members = &src[i - 1];
        let mut out = Vec::with_capacity(members.len() * 2);
        for x in members {
            if x != a {
                out.push(Tagged::low(x.clone()));
            }
            if x != b {
                out.push(Tagged::high(x.clone()));
            }
        }
        out
    });
    let tagged_relate = |u: &Tagged<T>, v: &Tagged<T>| {
        if u.high == v.high {
            relate(&u.value, &v.value)
        } else {
            group.identity()
        }
    };
    let undecided = |s: &[Vec<Tagged<T>>]| s.first().is_some_and(|g| g.len() == 2);
    let refined = propagate_in(par, doubled, &tagged_relate, group, None, Some(&undecided));

    let verdict = match refined.first().map(Vec::as_slice) {
        Some([_, _]) | None => Ordering::Equal,
        Some([first, ..]) if !first.high => Ordering::Less,
        Some(_) => Ordering::Greater,
    };
    trace!(?verdict, "pairwise compare");
    verdict
}

