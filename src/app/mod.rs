//! Core application logic for the manifest fetcher
//!
//! This module contains the fetch client, manifest locator and rewriter, the
//! single-job runner and the batch orchestrator.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use manifest_fetcher::app::{
//!     BatchOrchestrator, ClientConfig, HttpFetcher, PatternLocator, RunnerConfig, StreamJobRunner,
//! };
//! use manifest_fetcher::config::load_streams;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let jobs = load_streams("streams_config.json").await?;
//! let fetcher = HttpFetcher::from_config(&ClientConfig::default())?;
//! let runner = StreamJobRunner::new(
//!     Arc::new(fetcher),
//!     Box::new(PatternLocator::default()),
//!     RunnerConfig::default(),
//! );
//!
//! let summary = BatchOrchestrator::new(&runner, Duration::from_secs(2))
//!     .run(&jobs)
//!     .await;
//! println!("{}/{} manifests saved", summary.success_count, summary.total);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod client;
pub mod locator;
pub mod models;
pub mod rewriter;
pub mod runner;

// Re-export main public API
pub use batch::{BatchOrchestrator, BatchSummary, FailedJob};
pub use client::{ClientConfig, FetchClient, FetchResponse, HttpFetcher};
pub use locator::{ElementLocator, LocatorKind, ManifestLocator, PatternLocator};
pub use models::{JobDescriptor, JobOutcome};
pub use rewriter::rewrite;
pub use runner::{RunnerConfig, StreamJobRunner};
