//! reqwest-backed fetch client with request rate limiting
//!
//! Requests are never retried here: a failed fetch is reported to the job
//! runner as is, and the batch moves on.

use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::header::HeaderMap;
use reqwest::Client;
use url::Url;

use crate::app::client::{ClientConfig, FetchClient, FetchResponse};
use crate::errors::{ConfigError, ConfigResult, FetchError, FetchResult};

type DirectRateLimiter = RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>;

/// HTTP fetch client for embed pages and manifests
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpFetcher {
    /// Creates a new HttpFetcher with the given client and rate limiting
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use for requests
    /// * `rate_limit_rps` - Requests per second rate limit
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the rate limit is zero
    pub fn new(client: Client, rate_limit_rps: u32) -> ConfigResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Builds the client described by `config` and wraps it
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the client cannot be built or the rate limit is zero
    pub fn from_config(config: &ClientConfig) -> crate::errors::Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self::new(client, config.rate_limit_rps)?)
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> ConfigResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| ConfigError::InvalidValue {
            field: "client.rate_limit_rps".to_string(),
            value: rate_limit_rps.to_string(),
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }
}

#[async_trait]
impl FetchClient for HttpFetcher {
    async fn get(&self, url: &str, headers: HeaderMap) -> FetchResult<FetchResponse> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).headers(headers).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("{} responded {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse { status, body })
    }
}
