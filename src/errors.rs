//! Error types for the manifest fetcher
//!
//! Configuration errors are fatal and abort a run before any job starts.
//! Everything that can go wrong inside a single job is a [`JobError`], which the
//! job runner turns into a failed outcome instead of propagating.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration and streams file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration or streams file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// File exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML in the application config
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid JSON in the streams file
    #[error("Invalid JSON in streams file {path}: {source}")]
    InvalidStreams {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// HTTP fetch errors raised by a [`FetchClient`](crate::app::FetchClient)
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, timeout or body decoding failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The URL handed to the client could not be parsed
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Which upstream request a status error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    EmbedPage,
    Manifest,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmbedPage => write!(f, "embed page"),
            Self::Manifest => write!(f, "manifest"),
        }
    }
}

/// Errors scoped to a single stream job
#[derive(Error, Debug)]
pub enum JobError {
    /// Transport failure during either fetch
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Upstream answered with something other than 200
    #[error("Failed to fetch {stage}. HTTP Status: {status}")]
    UpstreamStatus { stage: FetchStage, status: u16 },

    /// No manifest reference in the embed page
    #[error("{} URL not found in embed page", .extension.to_uppercase())]
    ManifestNotFound { extension: String },

    /// Embed or manifest URL could not be built
    #[error("Invalid URL: {url} - {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A header value taken from the job descriptor is not a valid header
    #[error("Invalid {name} header value: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    /// Directory creation or file write failed
    #[error("Failed to write {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl JobError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            JobError::Fetch(_) => "transport",
            JobError::UpstreamStatus { .. } => "upstream-status",
            JobError::ManifestNotFound { .. } => "locator-miss",
            JobError::Persistence { .. } => "persistence",
            JobError::InvalidUrl { .. } | JobError::InvalidHeader { .. } => "input",
        }
    }
}

/// Top-level application error used by the CLI layer
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client construction error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Config(_) => "config",
            AppError::Fetch(_) => "fetch",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Job result type alias
pub type JobResult<T> = std::result::Result<T, JobError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_message_contains_code() {
        let err = JobError::UpstreamStatus {
            stage: FetchStage::EmbedPage,
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch embed page. HTTP Status: 404"
        );
        assert_eq!(err.category(), "upstream-status");
    }

    #[test]
    fn test_manifest_not_found_message() {
        let err = JobError::ManifestNotFound {
            extension: "m3u8".to_string(),
        };
        assert_eq!(err.to_string(), "M3U8 URL not found in embed page");
    }

    #[test]
    fn test_app_error_categories() {
        let err = AppError::from(ConfigError::NotFound {
            path: PathBuf::from("streams_config.json"),
        });
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("streams_config.json"));
        assert_eq!(AppError::generic("boom").category(), "generic");
    }
}
