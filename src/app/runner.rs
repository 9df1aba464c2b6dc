//! Single stream job: embed page → manifest URL → manifest → rewrite → disk
//!
//! Steps run strictly in order and the first failure ends the job. Nothing is
//! retried. Every error, and any panic inside the job, becomes a failed
//! [`JobOutcome`] so that a batch always keeps going.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;
use tracing::{info, warn};
use url::Url;

use crate::app::client::{embed_page_headers, manifest_headers, ClientConfig, FetchClient};
use crate::app::locator::ManifestLocator;
use crate::app::models::{JobDescriptor, JobOutcome};
use crate::app::rewriter::rewrite;
use crate::constants::{files, upstream};
use crate::errors::{FetchStage, JobError, JobResult};

/// Runner settings independent of the HTTP client
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Embed endpoint; the stream ID is appended as the last path segment
    pub embed_base_url: String,
    /// Manifest extension searched for in embed pages
    pub manifest_extension: String,
    /// Root of the output tree
    pub output_root: PathBuf,
    /// Extension of written files
    pub file_extension: String,
    /// Header values for the embed page request
    pub client: ClientConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            embed_base_url: upstream::EMBED_BASE_URL.to_string(),
            manifest_extension: upstream::MANIFEST_EXTENSION.to_string(),
            output_root: PathBuf::from("."),
            file_extension: upstream::MANIFEST_EXTENSION.to_string(),
            client: ClientConfig::default(),
        }
    }
}

/// Runs one stream job at a time
pub struct StreamJobRunner {
    client: Arc<dyn FetchClient>,
    locator: Box<dyn ManifestLocator>,
    config: RunnerConfig,
}

impl StreamJobRunner {
    pub fn new(
        client: Arc<dyn FetchClient>,
        locator: Box<dyn ManifestLocator>,
        config: RunnerConfig,
    ) -> Self {
        Self {
            client,
            locator,
            config,
        }
    }

    /// Embed page URL for a stream ID
    pub fn embed_url(&self, stream_id: &str) -> String {
        format!(
            "{}/{}",
            self.config.embed_base_url.trim_end_matches('/'),
            stream_id.trim_start_matches('/')
        )
    }

    /// Run a job and report its outcome
    ///
    /// On success the rewritten manifest has been written to
    /// `<root>/<country>/<subdivision>/<folder_name>/<stream_id>.<ext>`,
    /// overwriting any earlier file. On failure nothing has been written.
    pub async fn run(&self, job: &JobDescriptor) -> JobOutcome {
        let attempt = AssertUnwindSafe(self.try_run(job)).catch_unwind().await;

        match attempt {
            Ok(Ok((file_path, manifest_url))) => {
                info!("Manifest saved to: {}", file_path.display());
                JobOutcome::succeeded(file_path, manifest_url)
            }
            Ok(Err(e)) => {
                warn!(
                    "Job {} failed ({}): {}",
                    job.stream_id,
                    e.category(),
                    e
                );
                JobOutcome::failed(e.to_string())
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!("Job {} panicked: {}", job.stream_id, reason);
                JobOutcome::failed(format!("Error: {reason}"))
            }
        }
    }

    async fn try_run(&self, job: &JobDescriptor) -> JobResult<(PathBuf, String)> {
        let embed_url = self.embed_url(&job.stream_id);
        let embed_base = Url::parse(&embed_url).map_err(|source| JobError::InvalidUrl {
            url: embed_url.clone(),
            source,
        })?;

        info!("Fetching embed page: {}", embed_url);
        info!("Using referer: {}", job.referer);
        let headers = embed_page_headers(&self.config.client, &job.referer)?;
        let page = self.client.get(&embed_url, headers).await?;
        if !page.is_ok() {
            return Err(JobError::UpstreamStatus {
                stage: FetchStage::EmbedPage,
                status: page.status,
            });
        }
        info!("Successfully fetched embed page ({} bytes)", page.body.len());

        let located = self
            .locator
            .locate(&page.body)
            .ok_or_else(|| JobError::ManifestNotFound {
                extension: self.config.manifest_extension.clone(),
            })?;
        let manifest_url = embed_base
            .join(located.trim())
            .map_err(|source| JobError::InvalidUrl {
                url: located.clone(),
                source,
            })?;
        info!("Found manifest URL: {}", manifest_url);

        let manifest = self
            .client
            .get(manifest_url.as_str(), manifest_headers(&embed_url)?)
            .await?;
        if !manifest.is_ok() {
            return Err(JobError::UpstreamStatus {
                stage: FetchStage::Manifest,
                status: manifest.status,
            });
        }
        info!(
            "Successfully fetched manifest content ({} bytes)",
            manifest.body.len()
        );

        let rewritten = rewrite(&manifest.body, &manifest_url);
        let file_path = job.output_path(&self.config.output_root, &self.config.file_extension);
        persist(&file_path, &rewritten).await?;

        Ok((file_path, manifest_url.to_string()))
    }
}

/// Write `content` to `destination` through a temporary sibling file
async fn persist(destination: &Path, content: &str) -> JobResult<()> {
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(persistence_error(parent))?;
    }

    let mut temp_name = destination.as_os_str().to_os_string();
    temp_name.push(files::TEMP_FILE_SUFFIX);
    let temp_path = PathBuf::from(temp_name);

    tokio::fs::write(&temp_path, content.as_bytes())
        .await
        .map_err(persistence_error(&temp_path))?;

    if let Err(source) = tokio::fs::rename(&temp_path, destination).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(JobError::Persistence {
            path: destination.to_path_buf(),
            source,
        });
    }

    Ok(())
}

fn persistence_error(path: &Path) -> impl FnOnce(std::io::Error) -> JobError {
    let path = path.to_path_buf();
    move |source| JobError::Persistence { path, source }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "job panicked".to_string()
    }
}
