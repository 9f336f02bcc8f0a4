// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test fixtures for orbit crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`rng`] - Deterministic xorshift64* RNG, shuffles and random orders
//! - [`graph`] - Dense undirected graphs, named shapes and random generators

pub mod graph;
pub mod rng;

pub use graph::Graph;
pub use rng::{random_order, shuffle, XorShift64};

/// Seeds used by randomized suites; fixed so failures reproduce.
pub const SEEDS: &[u64] = &[1, 7, 42, 0xDEAD_BEEF, 0x0123_4567_89AB_CDEF];
