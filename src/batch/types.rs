use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of tasks admitted per batch
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 10;

/// Queue configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Maximum number of tasks in flight at once; 0 is treated as 1
    #[serde(alias = "maxRequests", alias = "simultaneousRequests")]
    pub concurrency_limit: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl QueueConfig {
    /// Parse a configuration from JSON. Unknown keys are ignored so the queue
    /// settings can live inside a larger options file.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Limit actually used when partitioning
    pub fn effective_limit(&self) -> usize {
        self.concurrency_limit.max(1)
    }
}

/// Errors raised while loading a [`QueueConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed
    #[error("Invalid queue configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Callback for progress updates: `(completed, total)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Partition of a task list into contiguous batches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    total: usize,
    limit: usize,
}

impl BatchPlan {
    /// Plan `total` tasks in batches of `limit` (0 is treated as 1)
    pub fn new(total: usize, limit: usize) -> Self {
        Self {
            total,
            limit: limit.max(1),
        }
    }

    /// Number of batches, `ceil(total / limit)`
    pub fn batch_count(&self) -> usize {
        self.total.div_ceil(self.limit)
    }

    /// Size of every batch but possibly the last
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Total number of tasks
    pub fn total(&self) -> usize {
        self.total
    }

    /// Index ranges of each batch, in order
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.total)
            .step_by(self.limit)
            .map(move |start| start..(start + self.limit).min(self.total))
    }
}
