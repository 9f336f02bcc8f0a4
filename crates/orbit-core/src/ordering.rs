// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Comparator building blocks.

use std::cmp::Ordering;

/// Orders slices by length first, then element-wise.
///
/// ```
/// use orbit_core::ordering::compare_slices;
/// use std::cmp::Ordering;
/// assert_eq!(compare_slices(&[9], &[0, 0], i32::cmp), Ordering::Less);
/// assert_eq!(compare_slices(&[1, 2], &[1, 3], i32::cmp), Ordering::Less);
/// ```
pub fn compare_slices<T, C>(a: &[T], b: &[T], cmp: C) -> Ordering
where
    C: Fn(&T, &T) -> Ordering,
{
    a.len().cmp(&b.len()).then_with(|| {
        a.iter()
            .zip(b)
            .map(|(x, y)| cmp(x, y))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

/// First non-equal result of `f(0), ..., f(n - 1)`.
pub fn compare_chain<F>(n: usize, f: F) -> Ordering
where
    F: Fn(usize) -> Ordering,
{
    (0..n).map(f).find(|o| o.is_ne()).unwrap_or(Ordering::Equal)
}

/// Index of the first item that no later item is strictly better than.
///
/// `better(x, y)` is `Greater` when `x` beats `y`. `None` for empty input.
pub fn first_best<T, C>(items: &[T], better: C) -> Option<usize>
where
    C: Fn(&T, &T) -> Ordering,
{
    let mut best = None;
    for (i, item) in items.iter().enumerate() {
        match best {
            Some(b) if better(item, &items[b]) != Ordering::Greater => {}
            _ => best = Some(i),
        }
    }
    best
}
