//! Manifest URL discovery in embed pages
//!
//! The embed page carries the manifest URL somewhere in its markup or inline
//! script. [`PatternLocator`] finds it with an ordered list of regular
//! expressions, most specific first, so that generic URL sniffing only runs when
//! nothing better matched. [`ElementLocator`] is a structured alternative that
//! queries `src` attributes through an HTML parser.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::constants::upstream;

/// Finds a manifest URL in an HTML document
pub trait ManifestLocator: Send + Sync {
    /// Returns the manifest URL, or `None` when the page carries none
    fn locate(&self, html: &str) -> Option<String>;
}

/// Locator strategy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocatorKind {
    /// Ordered regular expressions over the raw page text
    #[default]
    Patterns,
    /// `src` attribute query over the parsed document
    Elements,
}

impl LocatorKind {
    /// Build the locator for this strategy
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if the pattern set cannot be compiled
    pub fn build(self, extension: &str) -> Result<Box<dyn ManifestLocator>, regex::Error> {
        Ok(match self {
            LocatorKind::Patterns => Box::new(PatternLocator::new(extension)?),
            LocatorKind::Elements => Box::new(ElementLocator::new(extension)),
        })
    }
}

static DEFAULT_PATTERNS: LazyLock<PatternLocator> = LazyLock::new(|| {
    PatternLocator::new(upstream::MANIFEST_EXTENSION)
        .expect("Default manifest patterns should compile")
});

/// Ordered-pattern manifest locator
///
/// Patterns, in priority order, for extension `ext`:
///
/// 1. double-quoted `src` attribute containing `.ext`
/// 2. single-quoted `src` attribute containing `.ext`
/// 3. any double-quoted absolute URL containing `.ext`
/// 4. any bare absolute URL containing `.ext`, delimited by whitespace, quotes or angle brackets
///
/// Only the first pattern that matches anywhere in the document is used.
#[derive(Debug, Clone)]
pub struct PatternLocator {
    patterns: Vec<Regex>,
}

impl PatternLocator {
    /// Build the pattern list for a manifest extension (without the leading dot)
    ///
    /// # Errors
    ///
    /// Returns `regex::Error` if a pattern fails to compile
    pub fn new(extension: &str) -> Result<Self, regex::Error> {
        let ext = regex::escape(extension.trim_start_matches('.'));
        let sources = [
            format!(r#"src="([^"]*\.{ext}[^"]*)""#),
            format!(r#"src='([^']*\.{ext}[^']*)'"#),
            format!(r#""(https?://[^"]*\.{ext}[^"]*)""#),
            format!(r#"(https?://[^\s<>"']*\.{ext}[^\s<>"']*)"#),
        ];

        let patterns = sources
            .iter()
            .map(|source| RegexBuilder::new(source).case_insensitive(true).build())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Number of patterns consulted, in priority order
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }
}

impl Default for PatternLocator {
    fn default() -> Self {
        DEFAULT_PATTERNS.clone()
    }
}

impl ManifestLocator for PatternLocator {
    fn locate(&self, html: &str) -> Option<String> {
        self.patterns.iter().enumerate().find_map(|(priority, pattern)| {
            let url = pattern.captures(html)?.get(1)?.as_str().to_string();
            tracing::debug!("Manifest URL matched pattern {}: {}", priority + 1, url);
            Some(url)
        })
    }
}

static SRC_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[src]").expect("Static selector should parse"));

/// DOM-query manifest locator
///
/// Returns the first element `src` attribute, in document order, whose value
/// contains `.ext` (ASCII case-insensitive). Script bodies are not inspected.
#[derive(Debug, Clone)]
pub struct ElementLocator {
    needle: String,
}

impl ElementLocator {
    pub fn new(extension: &str) -> Self {
        Self {
            needle: format!(".{}", extension.trim_start_matches('.').to_ascii_lowercase()),
        }
    }
}

impl ManifestLocator for ElementLocator {
    fn locate(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&SRC_SELECTOR)
            .filter_map(|element| element.value().attr("src"))
            .find(|src| src.to_ascii_lowercase().contains(&self.needle))
            .map(|src| src.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quoted_src() {
        let html = r#"<video><source src="https://cdn.example/x.m3u8" type="application/x-mpegURL"></video>"#;
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/x.m3u8".to_string())
        );
    }

    #[test]
    fn test_single_quoted_src() {
        let html = "<video src='https://cdn.example/live/index.m3u8?token=abc'></video>";
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/live/index.m3u8?token=abc".to_string())
        );
    }

    #[test]
    fn test_src_attribute_wins_over_earlier_quoted_url() {
        // The decoy appears first in the document but only matches a lower-priority pattern
        let html = r#"
            <script>var preview = "https://decoy.example/preview.m3u8";</script>
            <video src="https://cdn.example/real.m3u8"></video>
        "#;
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/real.m3u8".to_string())
        );
    }

    #[test]
    fn test_quoted_url_in_script() {
        let html = r#"<script>player.load({ file: "https://cdn.example/a/b.m3u8" });</script>"#;
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/a/b.m3u8".to_string())
        );
    }

    #[test]
    fn test_bare_url_fallback() {
        let html = "<p>stream at https://cdn.example/bare.m3u8 for now</p>";
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/bare.m3u8".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_match() {
        let html = r#"<VIDEO SRC="https://cdn.example/LIVE.M3U8"></VIDEO>"#;
        let locator = PatternLocator::default();
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/LIVE.M3U8".to_string())
        );
    }

    #[test]
    fn test_not_found() {
        let html = r#"<html><body><video src="https://cdn.example/clip.mp4"></video></body></html>"#;
        assert_eq!(PatternLocator::default().locate(html), None);
        assert_eq!(PatternLocator::default().locate(""), None);
    }

    #[test]
    fn test_custom_extension_is_escaped() {
        let locator = PatternLocator::new("mpd").unwrap();
        assert_eq!(locator.pattern_count(), 4);
        assert_eq!(
            locator.locate(r#"<video src="https://cdn.example/dash.mpd"></video>"#),
            Some("https://cdn.example/dash.mpd".to_string())
        );
        // the dot before the extension is literal
        assert_eq!(locator.locate(r#"<video src="https://cdn.example/dashxmpd"></video>"#), None);
    }

    #[test]
    fn test_element_locator() {
        let html = r#"
            <html><body>
              <img src="/poster.jpg">
              <script>var decoy = "https://decoy.example/x.m3u8";</script>
              <video><source src="https://cdn.example/stream.M3U8"></video>
            </body></html>
        "#;
        let locator = ElementLocator::new("m3u8");
        assert_eq!(
            locator.locate(html),
            Some("https://cdn.example/stream.M3U8".to_string())
        );
        assert_eq!(locator.locate("<p>nothing here</p>"), None);
    }

    #[test]
    fn test_locator_kind_build() {
        let html = r#"<video src="https://cdn.example/x.m3u8"></video>"#;
        for kind in [LocatorKind::Patterns, LocatorKind::Elements] {
            let locator = kind.build("m3u8").unwrap();
            assert_eq!(
                locator.locate(html),
                Some("https://cdn.example/x.m3u8".to_string())
            );
        }
    }
}
