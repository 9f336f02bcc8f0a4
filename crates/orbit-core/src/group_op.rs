// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Group operators over relation weights.

use std::cmp::Ordering;

use dashu::integer::IBig;

use crate::reduce::reduce_in;
use crate::strategy::Par;

/// Algebraic structure the canonicalization engine needs from a weight type.
///
/// `combine` must be associative and commutative with `identity` as its
/// neutral element; `cancel(a, b)` is `a` combined with the inverse of `b`.
pub trait GroupOperator<E>: Sync {
    /// Neutral element.
    fn identity(&self) -> E;

    /// Group operation.
    fn combine(&self, a: E, b: E) -> E;

    /// `a` combined with the inverse of `b`.
    fn cancel(&self, a: E, b: E) -> E;

    /// Sign of `v` relative to the identity.
    fn signum(&self, v: &E) -> Ordering;

    /// Combines `f(from), ..., f(to - 1)`; the identity for an empty range.
    fn combine_range<'s, F>(&self, par: Par<'s>, from: usize, to: usize, f: &F) -> E
    where
        Self: Sized,
        E: Send,
        F: Fn(Par<'s>, usize) -> E + Sync,
    {
        reduce_in(par, from, to, f, &|_, a, b| self.combine(a, b))
            .unwrap_or_else(|| self.identity())
    }
}

/// Integer addition.
///
/// Fixed-width instances wrap on overflow; [`IBig`] is exact and serves as
/// the overflow-free reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Additive;

macro_rules! wrapping_additive {
    ($($t:ty),*) => {$(
        impl GroupOperator<$t> for Additive {
            fn identity(&self) -> $t {
                0
            }

            fn combine(&self, a: $t, b: $t) -> $t {
                a.wrapping_add(b)
            }

            fn cancel(&self, a: $t, b: $t) -> $t {
                a.wrapping_sub(b)
            }

            fn signum(&self, v: &$t) -> Ordering {
                v.cmp(&0)
            }
        }
    )*};
}

wrapping_additive!(i32, i64);

impl GroupOperator<IBig> for Additive {
    fn identity(&self) -> IBig {
        IBig::ZERO
    }

    fn combine(&self, a: IBig, b: IBig) -> IBig {
        a + b
    }

    fn cancel(&self, a: IBig, b: IBig) -> IBig {
        a - b
    }

    fn signum(&self, v: &IBig) -> Ordering {
        v.cmp(&IBig::ZERO)
    }
}
