// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Truth tables of elementary set operations.

use crate::error::{OrbitError, Result};

/// Which elements of a merge of two sorted sequences pass into the result.
///
/// Each operator is a three-column truth table: elements only in the left
/// input, elements only in the right input, and elements in both (which are
/// combined). Discriminants follow `4*left + 2*right + both`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum SetOperator {
    /// Always empty.
    Empty = 0,
    /// Intersection.
    Isect = 1,
    /// Right asymmetric difference.
    Rdiff = 2,
    /// The right argument.
    Right = 3,
    /// Left asymmetric difference.
    Ldiff = 4,
    /// The left argument.
    Left = 5,
    /// Symmetric difference.
    Diff = 6,
    /// Union.
    Union = 7,
}

impl SetOperator {
    /// All operators in discriminant order.
    pub const ALL: [Self; 8] = [
        Self::Empty,
        Self::Isect,
        Self::Rdiff,
        Self::Right,
        Self::Ldiff,
        Self::Left,
        Self::Diff,
        Self::Union,
    ];

    /// Looks up the operator with the given truth table.
    pub const fn of(left: bool, right: bool, both: bool) -> Self {
        Self::ALL[(left as usize) << 2 | (right as usize) << 1 | both as usize]
    }

    /// Accepts elements present only in the left input.
    pub const fn left(self) -> bool {
        (self as u8) & 4 != 0
    }

    /// Accepts elements present only in the right input.
    pub const fn right(self) -> bool {
        (self as u8) & 2 != 0
    }

    /// Accepts (combined) elements present in both inputs.
    pub const fn both(self) -> bool {
        (self as u8) & 1 != 0
    }

    /// The operator with left and right columns swapped.
    pub const fn reverse(self) -> Self {
        Self::of(self.right(), self.left(), self.both())
    }

    /// True when the left and right columns agree.
    pub const fn is_symmetric(self) -> bool {
        self.left() == self.right()
    }

    /// Rejects asymmetric operators (`Ldiff`, `Rdiff`, `Left`, `Right`).
    ///
    /// # Errors
    ///
    /// [`OrbitError::AsymmetricOperator`] carrying `self`.
    pub fn require_symmetric(self) -> Result<()> {
        if self.is_symmetric() {
            Ok(())
        } else {
            Err(OrbitError::AsymmetricOperator(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_matches_discriminants() {
        assert_eq!(SetOperator::of(false, false, false), SetOperator::Empty);
        assert_eq!(SetOperator::of(false, false, true), SetOperator::Isect);
        assert_eq!(SetOperator::of(false, true, false), SetOperator::Rdiff);
        assert_eq!(SetOperator::of(false, true, true), SetOperator::Right);
        assert_eq!(SetOperator::of(true, false, false), SetOperator::Ldiff);
        assert_eq!(SetOperator::of(true, false, true), SetOperator::Left);
        assert_eq!(SetOperator::of(true, true, false), SetOperator::Diff);
        assert_eq!(SetOperator::of(true, true, true), SetOperator::Union);
        for op in SetOperator::ALL {
            assert_eq!(SetOperator::of(op.left(), op.right(), op.both()), op);
        }
    }

    #[test]
    fn reverse_swaps_sides() {
        assert_eq!(SetOperator::Ldiff.reverse(), SetOperator::Rdiff);
        assert_eq!(SetOperator::Left.reverse(), SetOperator::Right);
        assert_eq!(SetOperator::Union.reverse(), SetOperator::Union);
        assert_eq!(SetOperator::Isect.reverse(), SetOperator::Isect);
    }

    #[test]
    fn only_four_operators_are_symmetric() {
        let symmetric: Vec<_> = SetOperator::ALL
            .into_iter()
            .filter(|op| op.require_symmetric().is_ok())
            .collect();
        assert_eq!(
            symmetric,
            vec![
                SetOperator::Empty,
                SetOperator::Isect,
                SetOperator::Diff,
                SetOperator::Union
            ]
        );
        assert!(matches!(
            SetOperator::Rdiff.require_symmetric(),
            Err(OrbitError::AsymmetricOperator(SetOperator::Rdiff))
        ));
    }
}
