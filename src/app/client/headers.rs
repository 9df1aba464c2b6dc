//! Browser-like request headers
//!
//! The embed page is requested the way a desktop browser loads a cross-site
//! iframe; the manifest request only needs the embed page as its referer.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};

use crate::app::client::ClientConfig;
use crate::constants::http;
use crate::errors::{JobError, JobResult};

/// Headers for the embed page request
///
/// # Errors
///
/// Returns `JobError::InvalidHeader` if the referer or a configured header
/// value contains characters not allowed in HTTP headers
pub fn embed_page_headers(config: &ClientConfig, referer: &str) -> JobResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);
    headers.insert(ACCEPT, HeaderValue::from_static(http::ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("Accept-Language", &config.accept_language)?,
    );
    headers.insert(REFERER, header_value("Referer", referer)?);
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static(http::SEC_FETCH_DEST),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static(http::SEC_FETCH_MODE),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static(http::SEC_FETCH_SITE),
    );
    Ok(headers)
}

/// Headers for the manifest request
///
/// # Errors
///
/// Returns `JobError::InvalidHeader` if the embed URL is not a valid header value
pub fn manifest_headers(embed_url: &str) -> JobResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(REFERER, header_value("Referer", embed_url)?);
    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> JobResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| JobError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}
