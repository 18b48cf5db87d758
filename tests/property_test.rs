//! Property tests for batch grouping
//!
//! Whatever the completion order inside a batch, every result must come back
//! exactly once and inside the run of results belonging to its own batch.

use batch_queue::{BatchPlan, Pending, Task};
use proptest::prelude::*;
use std::time::Duration;

fn build_tasks(delays: &[u8]) -> Vec<Task<usize, String>> {
    delays
        .iter()
        .enumerate()
        .map(|(id, &delay)| match delay % 3 {
            0 => Task::value(id),
            1 => Task::call(move || Pending::ready(id)),
            _ => Task::call_async(move || async move {
                tokio::time::sleep(Duration::from_millis(u64::from(delay % 4))).await;
                Ok(id)
            }),
        })
        .collect()
}

fn run_blocking(delays: &[u8], limit: usize) -> Vec<usize> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime should build");

    runtime
        .block_on(batch_queue::run(build_tasks(delays), limit))
        .expect("all tasks succeed")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn results_are_a_permutation_grouped_by_batch(
        delays in prop::collection::vec(any::<u8>(), 0..24),
        limit in 1usize..8,
    ) {
        let results = run_blocking(&delays, limit);
        prop_assert_eq!(results.len(), delays.len());

        let plan = BatchPlan::new(delays.len(), limit);
        for range in plan.ranges() {
            let mut batch = results[range.clone()].to_vec();
            batch.sort_unstable();
            prop_assert_eq!(batch, range.collect::<Vec<_>>());
        }
    }

    #[test]
    fn limit_at_least_length_is_one_batch(
        len in 0usize..16,
        extra in 0usize..4,
    ) {
        let plan = BatchPlan::new(len, len + extra);
        prop_assert!(plan.batch_count() <= 1);
    }
}

#[test]
fn literal_values_keep_submission_order() {
    let results = tokio_test::block_on(async {
        let tasks: Vec<Task<u8, String>> = (0..9).map(Task::value).collect();
        batch_queue::run(tasks, 4).await
    });

    assert_eq!(results.unwrap(), (0..9).collect::<Vec<u8>>());
}
