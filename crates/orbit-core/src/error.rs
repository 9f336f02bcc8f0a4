// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type shared by every fallible entry point.

use thiserror::Error;

use crate::set_op::SetOperator;

/// Errors emitted by orbit-core.
#[derive(Debug, Error)]
pub enum OrbitError {
    /// An n-way merge was requested with an operator whose left and right
    /// columns differ; pairwise reduction is only defined for symmetric ones.
    #[error("{0:?} is not symmetric")]
    AsymmetricOperator(SetOperator),
    /// The process-wide default strategy can be configured once.
    #[error("default execution strategy already set")]
    DefaultStrategyAlreadySet,
    /// The worker pool could not be created.
    #[error("worker pool build failed: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
    /// Configuration value out of range.
    #[error("invalid execution config: {0}")]
    InvalidConfig(String),
    /// Configuration document could not be decoded.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result alias for orbit-core.
pub type Result<T> = std::result::Result<T, OrbitError>;
