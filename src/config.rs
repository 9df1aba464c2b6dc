//! Configuration management for the manifest fetcher
//!
//! Two inputs are loaded here: the optional TOML application config, which
//! tunes the client, upstream endpoint, batch pacing and output location, and
//! the JSON streams file listing the jobs of a batch.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::app::{ClientConfig, JobDescriptor, LocatorKind, RunnerConfig};
use crate::constants::{files, http, limits, logging, upstream};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Upstream embed service settings
    pub upstream: UpstreamConfig,
    /// Batch settings
    pub batch: BatchConfig,
    /// Output tree settings
    pub output: OutputConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    /// User agent for all requests
    pub user_agent: String,
    /// Accept-Language for embed page requests
    pub accept_language: String,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
            accept_language: http::ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Upstream embed service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Embed endpoint, stream IDs are appended to it
    pub embed_base_url: String,
    /// Manifest extension searched for in embed pages
    pub manifest_extension: String,
    /// Manifest locator strategy
    pub locator: LocatorKind,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            embed_base_url: upstream::EMBED_BASE_URL.to_string(),
            manifest_extension: upstream::MANIFEST_EXTENSION.to_string(),
            locator: LocatorKind::default(),
        }
    }
}

/// Batch pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// JSON file listing the streams to process
    pub streams_file: PathBuf,
    /// Pause between consecutive jobs, e.g. "2s" or "500ms"
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            streams_file: PathBuf::from(files::STREAMS_FILE_NAME),
            delay: limits::DEFAULT_JOB_DELAY,
        }
    }
}

/// Output tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory of the `country/subdivision/folder` tree
    pub root: PathBuf,
    /// Extension of written manifest files (empty = manifest extension)
    pub file_extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            file_extension: String::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            rate_limit_rps: self.rate_limit_rps,
            user_agent: self.user_agent.clone(),
            accept_language: self.accept_language.clone(),
        }
    }
}

impl AppConfig {
    /// Load configuration
    ///
    /// An explicitly given file must exist. Otherwise the standard locations
    /// are searched and defaults are used when none exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing (explicit path only),
    /// unreadable, not valid TOML, or fails validation
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Self::load_from_file(&path).await?
            }
            None => match Self::find_config_file() {
                Some(path) => Self::load_from_file(&path).await?,
                None => Self::default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(files::CONFIG_FILE_NAME)];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        search_paths.into_iter().find(|path| path.exists())
    }

    /// Default config file path for the current user
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(files::CONFIG_DIR_NAME).join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let mut config: AppConfig = toml::from_str(&content)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Check values that would otherwise only fail once jobs are running
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for the first invalid field
    pub fn validate(&self) -> ConfigResult<()> {
        if self.client.rate_limit_rps == 0 {
            return Err(invalid(
                "client.rate_limit_rps",
                "0",
                "Rate limit must be greater than 0",
            ));
        }

        if self.upstream.manifest_extension.trim_start_matches('.').is_empty() {
            return Err(invalid(
                "upstream.manifest_extension",
                &self.upstream.manifest_extension,
                "Extension must not be empty",
            ));
        }

        match Url::parse(&self.upstream.embed_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(invalid(
                    "upstream.embed_base_url",
                    &self.upstream.embed_base_url,
                    &format!("Unsupported scheme '{}'", url.scheme()),
                ))
            }
            Err(e) => {
                return Err(invalid(
                    "upstream.embed_base_url",
                    &self.upstream.embed_base_url,
                    &e.to_string(),
                ))
            }
        }

        Ok(())
    }

    /// Runtime settings for the job runner
    pub fn runner_config(&self) -> RunnerConfig {
        let manifest_extension = self
            .upstream
            .manifest_extension
            .trim_start_matches('.')
            .to_string();
        let file_extension = match self.output.file_extension.trim_start_matches('.') {
            "" => manifest_extension.clone(),
            ext => ext.to_string(),
        };

        RunnerConfig {
            embed_base_url: self.upstream.embed_base_url.clone(),
            manifest_extension,
            output_root: self.output.root.clone(),
            file_extension,
            client: self.client.to_runtime_config(),
        }
    }

    /// Default configuration file content with comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Manifest Fetcher Configuration
# Every setting is optional; missing values fall back to the defaults shown.

[client]
request_timeout_secs = {timeout}
connect_timeout_secs = {connect}
rate_limit_rps = {rps}
user_agent = "{ua}"
accept_language = "{lang}"

[upstream]
embed_base_url = "{embed}"
manifest_extension = "{ext}"
# "patterns" (regular expressions over the page) or "elements" (src attributes)
locator = "patterns"

[batch]
streams_file = "{streams}"
delay = "{delay}s"

[output]
root = "."
# Empty = same as the manifest extension
file_extension = ""

[logging]
level = "{level}"  # error, warn, info, debug, trace
"#,
            timeout = http::DEFAULT_TIMEOUT.as_secs(),
            connect = http::CONNECT_TIMEOUT.as_secs(),
            rps = limits::DEFAULT_RATE_LIMIT_RPS,
            ua = http::USER_AGENT,
            lang = http::ACCEPT_LANGUAGE,
            embed = upstream::EMBED_BASE_URL,
            ext = upstream::MANIFEST_EXTENSION,
            streams = files::STREAMS_FILE_NAME,
            delay = limits::DEFAULT_JOB_DELAY.as_secs(),
            level = logging::DEFAULT_LOG_LEVEL,
        )
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Load the job list from a JSON streams file
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::Read` if it cannot be read and
/// `ConfigError::InvalidStreams` if it is not a JSON array of stream objects
pub async fn load_streams<P: AsRef<Path>>(path: P) -> ConfigResult<Vec<JobDescriptor>> {
    let path = path.as_ref();
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let jobs: Vec<JobDescriptor> =
        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidStreams {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded {} streams from {}", jobs.len(), path.display());
    Ok(jobs)
}
