//! Tally of boolean task outcomes
//!
//! Update and curation jobs typically queue one request per record and resolve
//! each task to `true` when the remote side accepted it and `false` when it did
//! not. The queue itself only fails on hard errors, so the soft failures have to
//! be counted afterwards.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Counts of successful and unsuccessful boolean outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSummary {
    /// Outcomes that were `true`
    pub succeeded: usize,
    /// Outcomes that were `false`
    pub failed: usize,
}

impl FlagSummary {
    /// Tally a slice of outcomes
    pub fn from_flags(flags: &[bool]) -> Self {
        flags.iter().copied().collect()
    }

    /// Total number of outcomes
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every outcome was `true`
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Log the tally, naming what was processed (e.g. "records")
    pub fn log(&self, subject: &str) {
        if self.succeeded > 0 {
            info!(count = self.succeeded, "Updated {} {}", self.succeeded, subject);
        }
        if self.failed > 0 {
            info!(
                count = self.failed,
                "There were {} errors while processing {}", self.failed, subject
            );
        }
    }
}

impl FromIterator<bool> for FlagSummary {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut summary, flag| {
            if flag {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            summary
        })
    }
}
