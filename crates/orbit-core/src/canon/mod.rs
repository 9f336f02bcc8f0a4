// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Relative canonical ordering.
//!
//! Symbols are related pairwise by a weight `relate(a, b)` drawn from a group
//! ([`GroupOperator`]). Starting from a preorder (an ordered sequence of
//! symbol groups), the engine
//!
//! - refines groups until every member of a group sees every group the same
//!   way ([`Canonizer::propagate`]),
//! - splits the refined groups into automorphism orbits
//!   ([`Canonizer::groups`]), and
//! - breaks the remaining symmetry by individualizing pivots until the order
//!   is total ([`Canonizer::order`]).
//!
//! Only the relation and the initial preorder influence the result: two
//! relabelings of the same structure yield orders under which the relation
//! reads identically.

use std::cmp::Ordering;

use crate::group_op::GroupOperator;
use crate::strategy::Par;

mod compare;
mod order;
mod propagate;

/// Tie-break comparator for symbols the relation cannot tell apart.
pub type Tie<T> = dyn Fn(&T, &T) -> Ordering + Sync;

/// Early-stop predicate consulted before every refinement pass.
pub type Proceed<T> = dyn Fn(&[Vec<T>]) -> bool + Sync;

pub(crate) type Relation<'r, T, E> = dyn Fn(&T, &T) -> E + Sync + 'r;

/// Canonicalization over a relation `relate` with weights in group `group`.
///
/// ```
/// use orbit_core::{Additive, Canonizer, Par};
///
/// // Path 0 - 1 - 2: edges weigh 1, non-edges -1.
/// let relate = |a: &i32, b: &i32| match (a - b).abs() {
///     0 => 0,
///     1 => 1,
///     _ => -1,
/// };
/// let canon = Canonizer::new(Par::local(), relate, Additive);
/// assert_eq!(canon.groups(&[vec![0, 1, 2]], None), vec![vec![0, 2], vec![1]]);
/// assert_eq!(canon.order(&[vec![0, 1, 2]], None).len(), 3);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Canonizer<'s, R, G> {
    par: Par<'s>,
    relate: R,
    group: G,
}

impl<'s, R, G> Canonizer<'s, R, G> {
    /// Binds a relation and its group operator to an execution context.
    pub fn new(par: Par<'s>, relate: R, group: G) -> Self {
        Self { par, relate, group }
    }

    /// The execution context.
    pub fn par(&self) -> Par<'s> {
        self.par
    }

    /// Refines `src` to a fixed point.
    ///
    /// `tie` stably orders members within split groups, keeping all it calls
    /// equal; `proceed`, when given, is asked before each pass and stops
    /// refinement on `false`. Returns a copy of `src` when no group splits.
    pub fn propagate<T, E>(
        &self,
        src: &[Vec<T>],
        tie: Option<&Tie<T>>,
        proceed: Option<&Proceed<T>>,
    ) -> Vec<Vec<T>>
    where
        R: Fn(&T, &T) -> E + Sync,
        G: GroupOperator<E>,
        T: Clone + PartialEq + Send + Sync,
        E: Send,
    {
        self.par.enter(symbols(src), |p| {
            propagate::propagate_in(p, src.to_vec(), &self.relate, &self.group, tie, proceed)
        })
    }

    /// Whether `a` and `b` can be told apart relative to `src`.
    ///
    /// `Equal` when they are interchangeable (or identical); otherwise
    /// `Less` or `Greater` by which of them refinement separates first.
    pub fn compare<T, E>(&self, a: &T, b: &T, src: &[Vec<T>]) -> Ordering
    where
        R: Fn(&T, &T) -> E + Sync,
        G: GroupOperator<E>,
        T: Clone + PartialEq + Send + Sync,
        E: Send,
    {
        self.par.enter(2 * symbols(src), |p| {
            compare::compare_in(p, a, b, src, &self.relate, &self.group)
        })
    }

    /// Automorphism orbits of `src`, in refined order.
    ///
    /// Without `tie`, orbit members keep their relative input order;
    /// with it, each orbit is stably sorted by `tie`. Members `tie` calls
    /// equal are all kept, in input order.
    pub fn groups<T, E>(&self, src: &[Vec<T>], tie: Option<&Tie<T>>) -> Vec<Vec<T>>
    where
        R: Fn(&T, &T) -> E + Sync,
        G: GroupOperator<E>,
        T: Clone + PartialEq + Send + Sync,
        E: Send,
    {
        self.par.enter(symbols(src), |p| {
            order::groups_in(p, src.to_vec(), &self.relate, &self.group, tie)
        })
    }

    /// Canonical total order of the symbols of `src`.
    ///
    /// Pivots are taken from the last ambiguous group: its first member, or
    /// with `tie` its first maximal member.
    pub fn order<T, E>(&self, src: &[Vec<T>], tie: Option<&Tie<T>>) -> Vec<T>
    where
        R: Fn(&T, &T) -> E + Sync,
        G: GroupOperator<E>,
        T: Clone + PartialEq + Send + Sync,
        E: Send,
    {
        self.par.enter(symbols(src), |p| {
            order::order_in(p, src.to_vec(), &self.relate, &self.group, tie)
        })
    }
}

fn symbols<T>(src: &[Vec<T>]) -> usize {
    src.iter().map(Vec::len).sum()
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::group_op::Additive;
    use crate::pool::create;

    /// Adjacency of an undirected graph as a relation: vertex 0, edge 1,
    /// non-edge -1.
    fn weights(n: usize, edges: &[(usize, usize)]) -> Vec<Vec<i32>> {
        let mut w = vec![vec![-1; n]; n];
        for (i, row) in w.iter_mut().enumerate() {
            row[i] = 0;
        }
        for &(a, b) in edges {
            w[a][b] = 1;
            w[b][a] = 1;
        }
        w
    }

    fn all(n: usize) -> Vec<Vec<usize>> {
        vec![(0..n).collect()]
    }

    #[test]
    fn star_separates_the_center() {
        let w = weights(4, &[(0, 1), (0, 2), (0, 3)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| w[*a][*b], Additive);
        assert_eq!(canon.groups(&all(4), None), vec![vec![1, 2, 3], vec![0]]);
    }

    #[test]
    fn symmetric_graphs_are_a_single_orbit() {
        let cycle = weights(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| cycle[*a][*b], Additive);
        assert_eq!(canon.propagate(&all(5), None, None), all(5));
        assert_eq!(canon.groups(&all(5), None), all(5));
        assert_eq!(canon.compare(&0, &3, &all(5)), Ordering::Equal);
    }

    #[test]
    fn disjoint_triangles_are_one_orbit() {
        // Swapping the triangles is an automorphism, so vertices of different
        // components are orbit mates too.
        let w = weights(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| w[*a][*b], Additive);
        assert_eq!(canon.propagate(&all(6), None, None), all(6));
        assert_eq!(canon.compare(&0, &1, &all(6)), Ordering::Equal);
        assert_eq!(canon.compare(&0, &4, &all(6)), Ordering::Equal);
        assert_eq!(canon.groups(&all(6), None), all(6));
    }

    #[test]
    fn order_is_a_permutation() {
        let w = weights(7, &[(0, 1), (1, 2), (2, 3), (3, 0), (4, 5), (0, 6)]);
        let strategy = create(2, 1).expect("pool of 4 threads should build");
        for par in [Par::local(), Par::new(strategy.as_ref())] {
            let canon = Canonizer::new(par, |a: &usize, b: &usize| w[*a][*b], Additive);
            let mut order = canon.order(&all(7), None);
            order.sort_unstable();
            assert_eq!(order, (0..7).collect::<Vec<_>>());
        }
    }

    #[test]
    fn proceed_can_stop_refinement_early() {
        let w = weights(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| w[*a][*b], Additive);
        let never = |_: &[Vec<usize>]| false;
        assert_eq!(canon.propagate(&all(5), None, Some(&never)), all(5));
        let once = |s: &[Vec<usize>]| s.len() == 1;
        assert_eq!(canon.propagate(&all(5), None, Some(&once)).len(), 2);
    }

    #[test]
    fn tie_sorts_orbits() {
        let w = weights(4, &[(0, 1), (0, 2), (0, 3)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| w[*a][*b], Additive);
        let desc = |a: &usize, b: &usize| b.cmp(a);
        assert_eq!(
            canon.groups(&[vec![2, 0, 3, 1]], Some(&desc)),
            vec![vec![3, 2, 1], vec![0]]
        );
    }

    #[test]
    fn partial_tie_keeps_every_orbit_member() {
        let w = weights(4, &[(0, 1), (0, 2), (0, 3)]);
        let canon = Canonizer::new(Par::local(), |a: &usize, b: &usize| w[*a][*b], Additive);
        let halves = |a: &usize, b: &usize| (a / 2).cmp(&(b / 2));
        let groups = canon.groups(&[vec![0, 1, 2, 3]], Some(&halves));
        assert_eq!(groups, vec![vec![1, 2, 3], vec![0]]);
        let reversed = canon.groups(&[vec![3, 2, 1, 0]], Some(&halves));
        assert_eq!(reversed, vec![vec![1, 3, 2], vec![0]]);
        let refined = canon.propagate(&[vec![3, 2, 1, 0]], Some(&halves), None);
        assert_eq!(refined, vec![vec![1, 3, 2], vec![0]]);
    }
}
