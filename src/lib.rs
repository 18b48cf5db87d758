//! # Batch Queue
//!
//! Bounded-concurrency batch execution for async tasks.
//!
//! ## Overview
//!
//! A [`BatchQueue`] takes an ordered list of tasks and a concurrency limit `N`.
//! The list is split into contiguous batches of `N` tasks. Batches run one after
//! another; the tasks of a batch run concurrently. The run resolves to every
//! result once all batches are done, or fails with the first task failure.
//!
//! ## Quick Start
//!
//! ```rust
//! use batch_queue::{run, Pending, Task};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tasks: Vec<Task<String, String>> = vec![
//!     Task::value("value".to_string()),
//!     Task::pending(async { Ok("promise".to_string()) }),
//!     Task::call(|| Pending::in_flight(async { Ok("callable".to_string()) })),
//! ];
//!
//! let results = run(tasks, 3).await?;
//! assert_eq!(results.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Semantics
//!
//! - **Task kinds**: literal values, callables invoked when their batch is
//!   admitted, and pending futures
//! - **Ordering**: results come back batch by batch; inside a batch they are
//!   in completion order, not submission order
//! - **Fail-fast**: the first failure ends the run and no later batch starts.
//!   Siblings already in flight keep running and their outcomes are discarded
//! - **No cancellation, retry, timeout, or priority**: wrap individual tasks
//!   for those
//! - **Panics**: a callable that panics when invoked unwinds out of the run
//!   rather than becoming a task failure
//!
//! ## Modules
//!
//! - [`batch`]: tasks, configuration and the executor
//! - [`summary`]: tallies for boolean task outcomes

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use thiserror::Error;

/// Result type for queue runs failing with a task reason of type `E`
pub type Result<T, E> = std::result::Result<T, QueueError<E>>;

/// Error type for queue runs
#[derive(Error, Debug)]
pub enum QueueError<E> {
    /// A task failed; carries the reason it failed with, untouched
    #[error("Task failed in batch {batch}: {reason}")]
    TaskFailed {
        /// Index of the batch the task belonged to
        batch: usize,
        /// Failure reason supplied by the task
        reason: E,
    },

    /// A spawned task ended without producing an outcome
    #[error("Task in batch {batch} did not complete: {source}")]
    Join {
        /// Index of the batch the task belonged to
        batch: usize,
        /// Join error from the runtime
        #[source]
        source: tokio::task::JoinError,
    },
}

impl<E> QueueError<E> {
    /// Index of the batch that failed
    pub fn batch(&self) -> usize {
        match self {
            QueueError::TaskFailed { batch, .. } | QueueError::Join { batch, .. } => *batch,
        }
    }

    /// Failure reason supplied by the task, if a task failed
    pub fn reason(&self) -> Option<&E> {
        match self {
            QueueError::TaskFailed { reason, .. } => Some(reason),
            QueueError::Join { .. } => None,
        }
    }

    /// Take the failure reason supplied by the task, if a task failed
    pub fn into_reason(self) -> Option<E> {
        match self {
            QueueError::TaskFailed { reason, .. } => Some(reason),
            QueueError::Join { .. } => None,
        }
    }
}

/// Tasks, configuration and the batch executor
pub mod batch;

/// Tallies for boolean task outcomes
pub mod summary;

pub use batch::{
    run, BatchPlan, BatchQueue, ConfigError, Pending, PendingFuture, ProgressCallback,
    QueueConfig, Task, TaskFn, DEFAULT_CONCURRENCY_LIMIT,
};
pub use summary::FlagSummary;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err: QueueError<&str> = QueueError::TaskFailed {
            batch: 2,
            reason: "promise rejection details.",
        };

        assert_eq!(err.batch(), 2);
        assert_eq!(err.reason(), Some(&"promise rejection details."));
        assert_eq!(
            err.to_string(),
            "Task failed in batch 2: promise rejection details."
        );
        assert_eq!(err.into_reason(), Some("promise rejection details."));
    }
}
