// Request-scoped data models for the download flow

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Canonical video identifier (e.g. `dQw4w9WgXcQ`).
///
/// Only ASCII alphanumerics, `-` and `_` are accepted, since the id ends up in
/// output file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let well_formed = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        well_formed.then_some(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title used when the probe yields nothing usable.
    pub fn fallback_title(&self) -> String {
        format!("video_{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested output kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadKind {
    Video,
    Audio,
}

impl DownloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DownloadKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            other => Err(format!("Unknown download kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub kind: DownloadKind,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, kind: DownloadKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(url, DownloadKind::Video)
    }

    pub fn audio(url: impl Into<String>) -> Self {
        Self::new(url, DownloadKind::Audio)
    }
}

/// Successful outcome of a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadResult {
    pub title: String,
    pub file_path: PathBuf,
}

impl DownloadResult {
    /// MIME type of the produced artifact, derived from its extension.
    pub fn media_type(&self) -> &'static str {
        media_type_for(&self.file_path)
    }
}

/// Metadata reported by the info probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    #[serde(skip_serializing)]
    pub id: String,
    pub title: String,
    pub author: String,
    /// Duration in seconds
    pub length: u64,
    pub views: u64,
    pub description: String,
    /// `YYYY-MM-DD`, when the extractor knows it
    pub publish_date: Option<String>,
    /// Progressive mp4 heights, highest first (e.g. `["720p", "360p"]`)
    pub available_resolutions: Vec<String>,
}

pub fn media_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("mp3") => "audio/mp3",
        Some("m4a") => "audio/m4a",
        _ => "application/octet-stream",
    }
}
