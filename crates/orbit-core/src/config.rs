// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Serializable execution configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{OrbitError, Result};
use crate::pool::{create, MAX_CONCURRENCY_LOG2};
use crate::strategy::ExecutionStrategy;

/// How a strategy should be built.
///
/// Missing fields take their defaults, so `{}` is the sequential setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Base-2 logarithm of the worker count; 0 means no pool.
    pub concurrency_log2: u32,
    /// Minimal piece of work worth a task at depth 0.
    pub work_size: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            concurrency_log2: 0,
            work_size: 4,
        }
    }
}

impl ExecutionConfig {
    /// Decodes and validates a JSON document.
    ///
    /// # Errors
    ///
    /// [`OrbitError::ConfigParse`] for malformed JSON and
    /// [`OrbitError::InvalidConfig`] for out-of-range values.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed JSON form.
    ///
    /// # Errors
    ///
    /// [`OrbitError::ConfigParse`] if serialization fails.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Rejects values no strategy can be built from.
    ///
    /// # Errors
    ///
    /// [`OrbitError::InvalidConfig`] when `concurrency_log2` exceeds 16 or
    /// `work_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency_log2 > MAX_CONCURRENCY_LOG2 {
            return Err(OrbitError::InvalidConfig(format!(
                "concurrency_log2 {} exceeds {MAX_CONCURRENCY_LOG2}",
                self.concurrency_log2
            )));
        }
        if self.work_size == 0 {
            return Err(OrbitError::InvalidConfig(
                "work_size must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Builds the configured strategy.
    ///
    /// # Errors
    ///
    /// Validation errors, or [`OrbitError::PoolBuild`] if the pool cannot be
    /// created.
    pub fn build(&self) -> Result<Arc<dyn ExecutionStrategy>> {
        self.validate()?;
        create(self.concurrency_log2, self.work_size)
    }
}
