//! Sequential batch processing of stream jobs
//!
//! Jobs run one at a time in input order with a fixed pause between them. The
//! pause is the only protection against upstream rate limiting, so there is
//! deliberately no parallelism here.

use std::time::Duration;

use tracing::{info, warn};

use crate::app::models::JobDescriptor;
use crate::app::runner::StreamJobRunner;

pub mod summary;

pub use summary::{BatchSummary, FailedJob};

/// Runs every job of a batch exactly once
pub struct BatchOrchestrator<'a> {
    runner: &'a StreamJobRunner,
    delay: Duration,
}

impl<'a> BatchOrchestrator<'a> {
    /// Create an orchestrator pausing `delay` between jobs
    pub fn new(runner: &'a StreamJobRunner, delay: Duration) -> Self {
        Self { runner, delay }
    }

    /// Process all jobs and return the aggregated summary
    ///
    /// A failed job is recorded and the batch continues with the next one.
    pub async fn run(&self, jobs: &[JobDescriptor]) -> BatchSummary {
        let total = jobs.len();
        let mut summary = BatchSummary::new(total);
        info!("Processing {} streams", total);

        for (idx, job) in jobs.iter().enumerate() {
            let position = idx + 1;
            info!(
                "[{}/{}] Processing: {} ({})",
                position,
                total,
                job.name,
                job.location()
            );

            let outcome = self.runner.run(job).await;
            if outcome.success {
                info!("SUCCESS: {}", job.name);
            } else {
                warn!("FAILED: {} - {}", job.name, outcome.message);
            }
            summary.record(job, &outcome);

            if position < total && !self.delay.is_zero() {
                info!("Waiting {:?} before next request...", self.delay);
                tokio::time::sleep(self.delay).await;
            }
        }

        let summary = summary.finish();
        info!(
            "Batch finished: {} succeeded, {} failed",
            summary.success_count, summary.failure_count
        );
        summary
    }
}
