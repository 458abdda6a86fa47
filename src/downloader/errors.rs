// Error taxonomy for the download flow

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Every way a download request can fail.
///
/// `InvalidUrl` and `MissingDependency` are detected before the extractor is
/// touched; the other two only surface after the extractor has been invoked and
/// keep its message for diagnostics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DownloadError {
    /// Input did not resolve to a canonical video identifier
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A required external binary (yt-dlp, ffmpeg) is absent
    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    /// The extractor failed while downloading
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The extractor reported success but no artifact was found on disk
    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Stable discriminant of [`DownloadError`], for clients that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidUrl,
    MissingDependency,
    ExtractionFailed,
    FileNotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidUrl => "INVALID_URL",
            Self::MissingDependency => "MISSING_DEPENDENCY",
            Self::ExtractionFailed => "EXTRACTION_FAILED",
            Self::FileNotFound => "FILE_NOT_FOUND",
        };
        f.write_str(s)
    }
}

impl DownloadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::MissingDependency(_) => ErrorKind::MissingDependency,
            Self::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
            Self::FileNotFound(_) => ErrorKind::FileNotFound,
        }
    }

    /// The underlying message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidUrl(m)
            | Self::MissingDependency(m)
            | Self::ExtractionFailed(m)
            | Self::FileNotFound(m) => m,
        }
    }

    /// Advisory install/upgrade text when the failure looks like a missing or
    /// outdated collaborator. Never changes control flow.
    pub fn remediation_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidUrl(_) => None,
            Self::MissingDependency(m) => {
                if m.contains("ffmpeg") {
                    Some(FFMPEG_INSTALL_HINT)
                } else {
                    Some(YTDLP_INSTALL_HINT)
                }
            }
            Self::ExtractionFailed(m) | Self::FileNotFound(m) => hint_for_output(m),
        }
    }
}

pub const YTDLP_INSTALL_HINT: &str = "yt-dlp is required. Install it with:\n\
     1) pip3 install -U yt-dlp\n\
     2) or: brew install yt-dlp";

pub const YTDLP_UPGRADE_HINT: &str = "If the error persists, try updating yt-dlp:\n\
     1) pip3 install -U yt-dlp\n\
     2) or: brew upgrade yt-dlp";

pub const FORMAT_UNAVAILABLE_HINT: &str = "Video with the specified resolution not found. \
     Pick one of the available resolutions reported by the video info.";

pub const FFMPEG_INSTALL_HINT: &str = "Audio extraction needs ffmpeg. Install it with:\n\
     1) brew install ffmpeg\n\
     2) or: sudo apt install ffmpeg";

/// Match extractor stderr against the failure signatures that usually mean
/// the tool is missing or stale.
fn hint_for_output(output: &str) -> Option<&'static str> {
    let lower = output.to_lowercase();

    if lower.contains("ffmpeg") || lower.contains("ffprobe") {
        return Some(FFMPEG_INSTALL_HINT);
    }

    if lower.contains("command not found") || lower.contains("no such file") {
        return Some(YTDLP_INSTALL_HINT);
    }

    if lower.contains("requested format is not available") {
        return Some(FORMAT_UNAVAILABLE_HINT);
    }

    let outdated = [
        "unsupported url",
        "unable to extract",
        "nsig extraction failed",
        "sign in to confirm",
        "http error 403",
        "please report this issue",
    ];
    if outdated.iter().any(|p| lower.contains(p)) {
        return Some(YTDLP_UPGRADE_HINT);
    }

    None
}
