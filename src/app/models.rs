//! Data models for the manifest fetcher
//!
//! This module defines the job descriptors read from the streams file and the
//! outcome records produced by the job runner.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// One configured stream resource
///
/// Field names match the streams file exactly:
///
/// ```json
/// {
///   "country": "TR",
///   "subdivision": "53",
///   "folder_name": "rize-merkez",
///   "stream_id": "a1b2c3",
///   "name": "Rize Merkez",
///   "referer": "https://example.org/live/rize"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    /// Country code, first level of the output tree
    pub country: String,
    /// Subdivision code; the streams file may carry it as a string or an integer
    #[serde(deserialize_with = "string_or_number")]
    pub subdivision: String,
    /// Folder name, third level of the output tree
    pub folder_name: String,
    /// Upstream stream identifier
    pub stream_id: String,
    /// Display name used in reports
    pub name: String,
    /// Referer sent with the embed page request
    pub referer: String,
}

impl JobDescriptor {
    /// Location label in the form `country/subdivision/folder_name`
    pub fn location(&self) -> String {
        format!("{}/{}/{}", self.country, self.subdivision, self.folder_name)
    }

    /// Output directory for this job below `root`
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.country)
            .join(&self.subdivision)
            .join(&self.folder_name)
    }

    /// Output file path for this job below `root`
    pub fn output_path(&self, root: &Path, extension: &str) -> PathBuf {
        self.output_dir(root)
            .join(format!("{}.{}", self.stream_id, extension))
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
    })
}

/// Result of running one stream job
///
/// Construct through [`JobOutcome::succeeded`] or [`JobOutcome::failed`]: a
/// successful outcome always has a file path and manifest URL, a failed one
/// always has a message and never a file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOutcome {
    pub success: bool,
    pub message: String,
    pub file_path: Option<PathBuf>,
    pub manifest_url: Option<String>,
}

impl JobOutcome {
    /// Successful outcome for a manifest written to `file_path`
    pub fn succeeded(file_path: PathBuf, manifest_url: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Manifest successfully downloaded and processed".to_string(),
            file_path: Some(file_path),
            manifest_url: Some(manifest_url.into()),
        }
    }

    /// Failed outcome; an empty message is replaced with a generic one
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        };

        Self {
            success: false,
            message,
            file_path: None,
            manifest_url: None,
        }
    }
}
