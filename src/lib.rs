//! Manifest Fetcher Library
//!
//! Fetches HLS manifests referenced from stream embed pages, rewrites relative
//! segment references into absolute URLs and stores the result in a
//! `country/subdivision/folder` tree, one stream at a time.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
