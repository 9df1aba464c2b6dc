//! HTTP fetch capability for embed pages and manifests
//!
//! The pipeline only depends on the [`FetchClient`] trait: a GET with custom
//! headers that yields a status code and body text, or a transport error.
//! Getting past upstream bot gates is entirely the client's business.
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building
//! - `headers`: browser-like request header sets
//! - `http`: the reqwest-backed [`HttpFetcher`]

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::errors::FetchResult;

pub mod config;
pub mod headers;
pub mod http;

pub use config::ClientConfig;
pub use headers::{embed_page_headers, manifest_headers};
pub use http::HttpFetcher;

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only 200 counts as success; redirects are followed by the client
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// GET capability used by the job runner
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Perform a GET request with the given headers
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failure. Non-200 statuses are not
    /// errors at this level.
    async fn get(&self, url: &str, headers: HeaderMap) -> FetchResult<FetchResponse>;
}
