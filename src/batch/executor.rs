//! Batch queue executor
//!
//! Runs an ordered task list with bounded concurrency:
//! - tasks are split into contiguous batches of `concurrency_limit`
//! - batches run strictly one after another
//! - tasks inside a batch run concurrently, results kept in completion order
//! - the first failure ends the run; later batches are never admitted
//!
//! Tasks still in flight when their batch fails are left running. Their join
//! handles are detached, so their outcomes are never observed.

use std::panic;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, instrument, warn, Span};
use uuid::Uuid;

use crate::batch::task::{Pending, Task};
use crate::batch::types::{BatchPlan, ProgressCallback, QueueConfig, DEFAULT_CONCURRENCY_LIMIT};
use crate::{QueueError, Result};

/// Bounded-concurrency batch queue
#[derive(Clone)]
pub struct BatchQueue {
    /// Tasks admitted per batch
    concurrency_limit: usize,
    /// Progress callback
    progress_callback: Option<ProgressCallback>,
}

impl std::fmt::Debug for BatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchQueue")
            .field("concurrency_limit", &self.concurrency_limit)
            .field("progress_callback", &self.progress_callback.is_some())
            .finish()
    }
}

impl BatchQueue {
    /// Create a queue with the default concurrency limit
    pub fn new() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            progress_callback: None,
        }
    }

    /// Create a queue from configuration
    pub fn from_config(config: &QueueConfig) -> Self {
        Self::new().with_concurrency_limit(config.concurrency_limit)
    }

    /// Set concurrency limit (tasks per batch). 0 is treated as 1.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Set progress callback, called with `(completed, total)` after every result
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.progress_callback = Some(std::sync::Arc::new(callback));
        self
    }

    /// Tasks admitted per batch
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Run all tasks and collect their results.
    ///
    /// Results are grouped by batch in batch order; inside a batch they are in
    /// completion order. Must be awaited inside a tokio runtime, since in-flight
    /// tasks are spawned onto it.
    ///
    /// # Panics
    ///
    /// A callable task that panics when invoked, or an in-flight task whose
    /// future panics, unwinds out of this call instead of producing a
    /// [`QueueError`].
    #[instrument(
        skip(self, tasks),
        fields(
            run_id = %Uuid::new_v4(),
            task_count = tasks.len(),
            concurrency_limit = self.concurrency_limit,
            batch_count = tracing::field::Empty,
        )
    )]
    pub async fn run<T, E>(&self, tasks: Vec<Task<T, E>>) -> Result<Vec<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let plan = BatchPlan::new(tasks.len(), self.concurrency_limit);
        Span::current().record("batch_count", plan.batch_count());

        if tasks.is_empty() {
            debug!("No tasks to run");
            return Ok(Vec::new());
        }

        let run_start = Instant::now();
        info!("Starting batch queue");

        let total = plan.total();
        let mut results = Vec::with_capacity(total);
        let mut remaining = tasks.into_iter();

        for (index, range) in plan.ranges().enumerate() {
            let batch: Vec<Task<T, E>> = remaining.by_ref().take(range.len()).collect();
            debug!(batch = index, start = range.start, size = batch.len(), "Admitting batch");

            let resolutions = self.run_batch(index, batch, results.len(), total).await?;

            debug!(batch = index, resolved = resolutions.len(), "Batch fulfilled");
            results.extend(resolutions);
        }

        info!(
            results = results.len(),
            duration_ms = run_start.elapsed().as_millis(),
            "Batch queue completed"
        );

        Ok(results)
    }

    /// Run one batch to its terminal state.
    ///
    /// `done` is the number of results collected by earlier batches, used only
    /// for progress reporting.
    async fn run_batch<T, E>(
        &self,
        index: usize,
        batch: Vec<Task<T, E>>,
        done: usize,
        total: usize,
    ) -> Result<Vec<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let size = batch.len();
        let mut resolutions = Vec::with_capacity(size);
        let mut in_flight = FuturesUnordered::new();

        for task in batch {
            match task.into_pending() {
                Pending::Ready(value) => {
                    resolutions.push(value);
                    self.report_progress(done + resolutions.len(), total);
                }
                Pending::InFlight(future) => in_flight.push(tokio::spawn(future)),
            }
        }

        while let Some(joined) = in_flight.next().await {
            match joined {
                Ok(Ok(value)) => {
                    resolutions.push(value);
                    self.report_progress(done + resolutions.len(), total);
                }
                Ok(Err(reason)) => {
                    warn!(
                        batch = index,
                        resolved = resolutions.len(),
                        abandoned = in_flight.len(),
                        "Task failed, stopping queue"
                    );
                    // Dropping the join handles detaches the siblings
                    return Err(QueueError::TaskFailed { batch: index, reason });
                }
                Err(join_err) if join_err.is_panic() => {
                    panic::resume_unwind(join_err.into_panic());
                }
                Err(join_err) => {
                    warn!(batch = index, error = %join_err, "Task did not complete");
                    return Err(QueueError::Join {
                        batch: index,
                        source: join_err,
                    });
                }
            }
        }

        debug_assert_eq!(resolutions.len(), size);
        Ok(resolutions)
    }

    fn report_progress(&self, completed: usize, total: usize) {
        if let Some(ref callback) = self.progress_callback {
            callback(completed, total);
        }
    }
}

impl Default for BatchQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `tasks` with at most `limit` in flight at once.
///
/// Shorthand for `BatchQueue::new().with_concurrency_limit(limit).run(tasks)`.
pub async fn run<T, E>(tasks: Vec<Task<T, E>>, limit: usize) -> Result<Vec<T>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    BatchQueue::new()
        .with_concurrency_limit(limit)
        .run(tasks)
        .await
}
