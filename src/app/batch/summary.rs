//! Batch statistics
//!
//! Counters and the failure list are owned by the orchestrator and only ever
//! appended to while the batch runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::models::{JobDescriptor, JobOutcome};

/// A job that did not produce a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedJob {
    /// Display name of the stream
    pub name: String,
    /// `country/subdivision/folder_name`
    pub location: String,
    pub stream_id: String,
    /// Failure message from the job outcome
    pub error: String,
}

/// Aggregated result of a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of jobs in the batch
    pub total: usize,
    /// Jobs that wrote a manifest
    pub success_count: usize,
    /// Jobs that failed
    pub failure_count: usize,
    /// Failed jobs in the order they ran
    pub failures: Vec<FailedJob>,
    /// When the batch started
    pub started_at: DateTime<Utc>,
    /// When the last job finished
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchSummary {
    /// Create an empty summary for a batch of `total` jobs
    pub fn new(total: usize) -> Self {
        Self {
            total,
            success_count: 0,
            failure_count: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Account for one finished job
    pub fn record(&mut self, job: &JobDescriptor, outcome: &JobOutcome) {
        if outcome.success {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
            self.failures.push(FailedJob {
                name: job.name.clone(),
                location: job.location(),
                stream_id: job.stream_id.clone(),
                error: outcome.message.clone(),
            });
        }
    }

    /// Seal the summary once every job has run
    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    /// Jobs accounted for so far
    pub fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }

    /// Wall-clock duration of the batch, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at
            .map(|finished| finished.signed_duration_since(self.started_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn job(name: &str) -> JobDescriptor {
        JobDescriptor {
            country: "TR".to_string(),
            subdivision: "34".to_string(),
            folder_name: "besiktas".to_string(),
            stream_id: format!("{name}-id"),
            name: name.to_string(),
            referer: "https://example.org/".to_string(),
        }
    }

    #[test]
    fn test_record_counts_and_failures() {
        let mut summary = BatchSummary::new(2);
        summary.record(
            &job("ok"),
            &JobOutcome::succeeded(PathBuf::from("a.m3u8"), "https://h/a.m3u8"),
        );
        summary.record(&job("bad"), &JobOutcome::failed("HTTP Status: 404"));

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.failure_count, 1);
        assert!(summary.is_complete());
        assert_eq!(
            summary.failures,
            vec![FailedJob {
                name: "bad".to_string(),
                location: "TR/34/besiktas".to_string(),
                stream_id: "bad-id".to_string(),
                error: "HTTP Status: 404".to_string(),
            }]
        );
    }

    #[test]
    fn test_finish_sets_end_time() {
        let summary = BatchSummary::new(0);
        assert!(summary.duration().is_none());

        let summary = summary.finish();
        assert!(summary.finished_at.is_some());
        assert!(summary.duration().unwrap() >= chrono::Duration::zero());
    }

    #[test]
    fn test_summary_serializes() {
        let mut summary = BatchSummary::new(1);
        summary.record(&job("bad"), &JobOutcome::failed("boom"));
        let json = serde_json::to_value(summary.finish()).unwrap();

        assert_eq!(json["total"], 1);
        assert_eq!(json["failure_count"], 1);
        assert_eq!(json["failures"][0]["name"], "bad");
    }
}
