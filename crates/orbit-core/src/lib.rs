// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! orbit-core: parallel divide-and-conquer kernel.
//!
//! Everything in this crate is expressed as bisection over ranges or sorted
//! sequences, joined through an [`ExecutionStrategy`]. On top of the
//! primitives sit the ordered-set merge engine (eight [`SetOperator`]
//! semantics) and the relative canonical-ordering engine ([`Canonizer`]),
//! which computes automorphism orbits and a canonical order of symbols under
//! an arbitrary weighted relation.
//!
//! Results never depend on how work was split: running under
//! [`LocalStrategy`] or any [`PoolStrategy`] yields identical values.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::cognitive_complexity,
    clippy::option_if_let_else,
    clippy::significant_drop_tightening,
    clippy::doc_markdown,
    clippy::too_many_lines,
    clippy::too_long_first_doc_paragraph,
    clippy::missing_panics_doc,
    clippy::similar_names,
    clippy::trivially_copy_pass_by_ref,
    clippy::needless_collect,
    clippy::manual_let_else,
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation
)]
// Mirrors the workspace lint table: the crate-level group denies above would
// otherwise re-enable what the workspace allows.

/// Relative canonical ordering: propagate, compare, groups, order.
pub mod canon;
mod config;
mod error;
mod group_op;
mod merge;
/// Slice comparison and best-index helpers.
pub mod ordering;
mod pool;
mod reduce;
mod set_op;
mod strategy;

/// Relation-driven canonicalization handle.
pub use canon::{Canonizer, Proceed, Tie};
/// Serde-backed execution configuration.
pub use config::ExecutionConfig;
/// Crate error type and result alias.
pub use error::{OrbitError, Result};
/// Algebraic operators over relation weights.
pub use group_op::{Additive, GroupOperator};
/// Pool-backed strategy and its default fork policy.
pub use pool::{create, ForkPolicy, ForkPredicate, PoolStrategy, MAX_CONCURRENCY_LOG2};
/// Truth tables for ordered merges.
pub use set_op::SetOperator;
/// Strategy contract, the sequential strategy, the process-wide default and
/// the explicit execution context.
pub use strategy::{
    default_strategy, set_default_strategy, ExecutionStrategy, LocalStrategy, Par,
};
