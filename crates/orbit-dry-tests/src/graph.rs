// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Dense undirected graphs for canonicalization tests.
//!
//! Random generators come in three flavors:
//!
//! - *symmetric*: circulant graphs under a random labeling, rich in
//!   automorphisms;
//! - *asymmetric*: independent random bits per vertex pair, which rarely
//!   have nontrivial automorphisms;
//! - *mixed*: a block composition where each block and the quotient graph
//!   between blocks are drawn recursively.

use crate::rng::{random_order, XorShift64};

/// Undirected simple graph on vertices `0..n`, stored as a full matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    adj: Vec<bool>,
}

impl Graph {
    /// Graph without edges.
    pub fn empty(n: usize) -> Self {
        Self {
            n,
            adj: vec![false; n * n],
        }
    }

    /// Every pair of distinct vertices adjacent.
    pub fn complete(n: usize) -> Self {
        Self::from_fn(n, |_, _| true)
    }

    /// Graph with the given edges (self-loops are ignored).
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        let mut g = Self::empty(n);
        for &(a, b) in edges {
            g.set(a, b, true);
        }
        g
    }

    /// Graph whose pair `{a, b}` (`a != b`) is an edge iff `f(a, b)`.
    ///
    /// `f` is only consulted for `a < b`.
    pub fn from_fn(n: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut g = Self::empty(n);
        for b in 0..n {
            for a in 0..b {
                if f(a, b) {
                    g.set(a, b, true);
                }
            }
        }
        g
    }

    /// Path `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        Self::from_fn(n, |a, b| b == a + 1)
    }

    /// Cycle on `n` vertices.
    pub fn cycle(n: usize) -> Self {
        Self::from_fn(n, |a, b| b == a + 1 || (n > 2 && a == 0 && b == n - 1))
    }

    /// Star with center 0 and `n - 1` leaves.
    pub fn star(n: usize) -> Self {
        Self::from_fn(n, |a, _| a == 0)
    }

    /// `K(p, q)`: vertices `0..p` on one side, `p..p+q` on the other.
    pub fn complete_bipartite(p: usize, q: usize) -> Self {
        Self::from_fn(p + q, |a, b| (a < p) != (b < p))
    }

    /// Petersen graph: outer 5-cycle `0..5`, inner pentagram `5..10`.
    pub fn petersen() -> Self {
        Self::from_fn(10, |a, b| match (a < 5, b < 5) {
            (true, true) => (b - a) % 5 == 1 || (b - a) % 5 == 4,
            (true, false) => b == a + 5,
            (false, false) => (b - a) % 5 == 2 || (b - a) % 5 == 3,
            (false, true) => false,
        })
    }

    /// Rook's graph `K_n x K_n`: cells of an `n x n` board, adjacent when
    /// they share a row or a column.
    pub fn rook(n: usize) -> Self {
        Self::from_fn(n * n, |a, b| a / n == b / n || a % n == b % n)
    }

    /// Shrikhande graph: Cayley graph of `Z4 x Z4` with generators
    /// `(0, 1)`, `(1, 0)` and `(1, 1)`. Shares its parameters with
    /// [`Graph::rook`]`(4)` but is not isomorphic to it.
    pub fn shrikhande() -> Self {
        Self::from_fn(16, |a, b| {
            let d = ((b / 4 + 4 - a / 4) % 4, (b % 4 + 4 - a % 4) % 4);
            matches!(d, (0, 1 | 3) | (1 | 3, 0) | (1, 1) | (3, 3))
        })
    }

    /// Paley graph on `Z_q` for a prime `q = 1 (mod 4)`: `a` and `b` are
    /// adjacent when `b - a` is a nonzero square.
    pub fn paley(q: usize) -> Self {
        let squares: Vec<bool> = (0..q).map(|x| (1..q).any(|y| y * y % q == x)).collect();
        Self::from_fn(q, |a, b| squares[(b - a) % q])
    }

    /// Number of vertices.
    pub fn vertices(&self) -> usize {
        self.n
    }

    /// Whether `{a, b}` is an edge.
    pub fn edge(&self, a: usize, b: usize) -> bool {
        self.adj[a * self.n + b]
    }

    fn set(&mut self, a: usize, b: usize, on: bool) {
        if a != b {
            self.adj[a * self.n + b] = on;
            self.adj[b * self.n + a] = on;
        }
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.adj.iter().filter(|&&e| e).count() / 2
    }

    /// The graph seen through `order`: vertex `i` of the result is vertex
    /// `order[i]` of `self`.
    pub fn relabel(&self, order: &[usize]) -> Self {
        debug_assert_eq!(order.len(), self.n);
        Self::from_fn(self.n, |a, b| self.edge(order[a], order[b]))
    }

    /// The graph as an integer relation: `vertex` on the diagonal, `edge`
    /// for adjacent pairs, `non_edge` otherwise.
    pub fn as_weights(&self, vertex: i32, edge: i32, non_edge: i32) -> Vec<Vec<i32>> {
        (0..self.n)
            .map(|a| {
                (0..self.n)
                    .map(|b| match (a == b, self.edge(a, b)) {
                        (true, _) => vertex,
                        (false, true) => edge,
                        (false, false) => non_edge,
                    })
                    .collect()
            })
            .collect()
    }

    /// [`Graph::as_weights`] with the conventional `0 / 1 / -1`.
    pub fn weights(&self) -> Vec<Vec<i32>> {
        self.as_weights(0, 1, -1)
    }

    /// Random graph mixing symmetric and asymmetric structure.
    ///
    /// `density` picks the edge probability (random when `None`). `symmetry`
    /// in `[0, 1]` biases towards circulant (1) or asymmetric (0) parts;
    /// `None` draws the bias at random.
    pub fn random(
        n: usize,
        density: Option<f64>,
        symmetry: Option<f64>,
        rng: &mut XorShift64,
    ) -> Self {
        if n < 3 {
            return if n > 0 && rng.gen_bool() {
                Self::complete(n)
            } else {
                Self::empty(n)
            };
        }
        let bias = match symmetry {
            None => rng.next_f64(),
            Some(s) if s <= 0.0 => return Self::random_asymmetric(n, density, rng),
            Some(s) if s >= 1.0 => return Self::random_symmetric(n, density, rng),
            Some(s) => s,
        };
        if n < 6 {
            return if rng.next_f64() <= bias {
                Self::random_symmetric(n, density, rng)
            } else {
                Self::random_asymmetric(n, density, rng)
            };
        }
        let (va, vb) = (rng.next_f64(), rng.next_f64());
        if va < bias && vb < bias {
            return Self::random_symmetric(n, density, rng);
        }
        if va > bias && vb > bias {
            return Self::random_asymmetric(n, density, rng);
        }

        // Blocks of side `side`, the last one possibly short, plus a
        // quotient graph deciding adjacency between blocks.
        let side = (1..=n).find(|s| s * s >= n).unwrap_or(n);
        let blocks = n.div_ceil(side);
        let seed = rng.next_u64();
        let parts: Vec<Self> = (0..=blocks)
            .map(|p| {
                let len = if p == blocks {
                    blocks
                } else if p == blocks - 1 && !n.is_multiple_of(side) {
                    n % side
                } else {
                    side
                };
                let mut sub = XorShift64::new(seed.wrapping_mul(1 + p as u64));
                Self::random(len, density, symmetry, &mut sub)
            })
            .collect();
        let order = random_order(n, rng);
        Self::from_fn(n, |a, b| {
            let (a, b) = (order[a], order[b]);
            let (ag, bg) = (a / side, b / side);
            if ag == bg {
                parts[ag].edge(a % side, b % side)
            } else {
                parts[blocks].edge(ag, bg)
            }
        })
    }

    /// Random graph from independent bits per vertex pair.
    #[allow(clippy::cast_precision_loss)]
    pub fn random_asymmetric(n: usize, density: Option<f64>, rng: &mut XorShift64) -> Self {
        if n < 2 {
            return Self::empty(n);
        }
        let m = n - 1;
        let bits = random_bits((m * m - m) / 2 + 1, density, 1.0 / m as f64, rng);
        Self::from_fn(n, |a, b| {
            let b = b - 1;
            bits[(b * b - b) / 2 + a]
        })
    }

    /// Random circulant graph under a random labeling.
    #[allow(clippy::cast_precision_loss)]
    pub fn random_symmetric(n: usize, density: Option<f64>, rng: &mut XorShift64) -> Self {
        if n < 2 {
            return Self::empty(n);
        }
        let order = random_order(n, rng);
        let bits = random_bits(n / 2, density, 1.0 / n as f64, rng);
        Self::from_fn(n, |a, b| {
            let d = order[a].abs_diff(order[b]);
            bits[d.min(n - d) - 1]
        })
    }
}

/// `len` random bits with probability `limit + (1 - 2 limit) * density`.
fn random_bits(len: usize, density: Option<f64>, limit: f64, rng: &mut XorShift64) -> Vec<bool> {
    let density = density.unwrap_or_else(|| rng.next_f64());
    let p = (1.0 - 2.0 * limit).mul_add(density, limit);
    (0..len).map(|_| rng.next_f64() <= p).collect()
}
