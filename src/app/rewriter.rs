//! Relative segment URL rewriting for manifests
//!
//! Every line of a manifest that is neither blank nor a `#` tag/comment is a
//! URI reference. References that are already absolute are kept; all others are
//! resolved against the manifest's own URL with RFC 3986 reference resolution,
//! so that the saved manifest can be played from anywhere.

use std::borrow::Cow;

use tracing::{debug, warn};
use url::Url;

/// Rewrite all relative references in `manifest` into absolute URLs
///
/// # Arguments
///
/// * `manifest` - Manifest text as fetched
/// * `base` - URL the manifest was fetched from
///
/// # Returns
///
/// The rewritten manifest. Blank and comment lines are copied verbatim, the line
/// count is unchanged and `\r\n` line endings are preserved.
///
/// # Example
///
/// ```rust
/// use manifest_fetcher::app::rewrite;
/// use url::Url;
///
/// let base = Url::parse("https://host/path/manifest.m3u8").unwrap();
/// let out = rewrite("#EXTM3U\nsegment1.ts\n/seg/1.ts", &base);
/// assert_eq!(out, "#EXTM3U\nhttps://host/path/segment1.ts\nhttps://host/seg/1.ts");
/// ```
pub fn rewrite(manifest: &str, base: &Url) -> String {
    manifest
        .split('\n')
        .map(|line| rewrite_line(line, base))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite_line<'a>(line: &'a str, base: &Url) -> Cow<'a, str> {
    let (content, line_end) = match line.strip_suffix('\r') {
        Some(content) => (content, "\r"),
        None => (line, ""),
    };

    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Cow::Borrowed(line);
    }

    if is_absolute(trimmed) {
        return Cow::Owned(format!("{trimmed}{line_end}"));
    }

    match base.join(trimmed) {
        Ok(resolved) => {
            debug!("Converted relative URL: {} -> {}", trimmed, resolved);
            Cow::Owned(format!("{resolved}{line_end}"))
        }
        Err(e) => {
            warn!("Could not resolve {:?} against {}: {}", trimmed, base, e);
            Cow::Owned(format!("{trimmed}{line_end}"))
        }
    }
}

/// Whether a reference already starts with an `http://` or `https://` scheme
pub fn is_absolute(reference: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
