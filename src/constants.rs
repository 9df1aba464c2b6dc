//! Application constants for the manifest fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Upstream embed service endpoints
pub mod upstream {
    /// Base endpoint for embed pages; the stream ID is appended as the last path segment
    pub const EMBED_BASE_URL: &str = "https://embed.galata.ai/embed";

    /// Default manifest file extension searched for in embed pages
    pub const MANIFEST_EXTENSION: &str = "m3u8";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Desktop Chrome user agent sent with every request
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    /// Accept header for the embed page navigation
    pub const ACCEPT_HTML: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

    /// Accept-Language header for the embed page navigation
    pub const ACCEPT_LANGUAGE: &str = "tr-TR,tr;q=0.9,en-US;q=0.8,en;q=0.7";

    /// Fixed per-request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;

    /// Embed page is loaded as a cross-site iframe navigation
    pub const SEC_FETCH_DEST: &str = "iframe";
    pub const SEC_FETCH_MODE: &str = "navigate";
    pub const SEC_FETCH_SITE: &str = "cross-site";
}

/// Rate limiting configuration
pub mod limits {
    use super::Duration;

    /// Ceiling on outgoing requests per second
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 2;

    /// Delay inserted between consecutive jobs of a batch
    pub const DEFAULT_JOB_DELAY: Duration = Duration::from_secs(2);
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic writes
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Default streams file name
    pub const STREAMS_FILE_NAME: &str = "streams_config.json";

    /// Project-local configuration file name
    pub const CONFIG_FILE_NAME: &str = "manifest-fetcher.toml";

    /// Directory under the user config dir holding `config.toml`
    pub const CONFIG_DIR_NAME: &str = "manifest-fetcher";
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

pub use http::USER_AGENT;
pub use limits::{DEFAULT_JOB_DELAY, DEFAULT_RATE_LIMIT_RPS};
pub use upstream::{EMBED_BASE_URL, MANIFEST_EXTENSION};
