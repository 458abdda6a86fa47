// FormatSelector - yt-dlp format specifications per download kind
//
// Two strategies share one contract:
// - Best: best combined stream, falling back to best video (or best audio for
//   audio-only downloads)
// - Resolution: a progressive mp4 stream of an exact height, as requested by
//   the HTTP `/download/{resolution}` endpoint

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::models::DownloadKind;

/// How the stream is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatStrategy {
    #[default]
    Best,
    /// Exact frame height in pixels
    Resolution(u32),
}

impl fmt::Display for FormatStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Best => write!(f, "best"),
            Self::Resolution(height) => write!(f, "{}p", height),
        }
    }
}

impl FromStr for FormatStrategy {
    type Err = String;

    /// Accepts `best`, `720p` or `720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "best" {
            return Ok(Self::Best);
        }
        let digits = s.strip_suffix('p').unwrap_or(&s);
        match digits.parse::<u32>() {
            Ok(height) if height > 0 => Ok(Self::Resolution(height)),
            _ => Err(format!("Unsupported resolution: {}", s)),
        }
    }
}

/// One entry of the `formats` array in yt-dlp's JSON output.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamFormat {
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
}

impl StreamFormat {
    fn has_codec(codec: &Option<String>) -> bool {
        codec
            .as_deref()
            .map_or(false, |c| c != "none" && !c.is_empty())
    }

    /// Carries both audio and video in a single stream.
    pub fn is_progressive(&self) -> bool {
        Self::has_codec(&self.vcodec) && Self::has_codec(&self.acodec)
    }

    pub fn is_mp4(&self) -> bool {
        self.ext.as_deref() == Some("mp4")
    }
}

pub struct FormatSelector;

impl FormatSelector {
    /// yt-dlp `-f` argument for a kind and strategy.
    ///
    /// Audio ignores the strategy; resolution only narrows video streams.
    pub fn spec(kind: DownloadKind, strategy: FormatStrategy) -> String {
        match (kind, strategy) {
            (DownloadKind::Audio, _) => "bestaudio/best".to_string(),
            (DownloadKind::Video, FormatStrategy::Best) => "best[ext=mp4]/best/bestvideo".to_string(),
            (DownloadKind::Video, FormatStrategy::Resolution(height)) => format!(
                "best[height={}][ext=mp4][vcodec!=none][acodec!=none]",
                height
            ),
        }
    }

    /// Distinct progressive mp4 heights as `"<h>p"`, highest first.
    pub fn progressive_resolutions(formats: &[StreamFormat]) -> Vec<String> {
        let mut heights: Vec<u32> = formats
            .iter()
            .filter(|f| f.is_progressive() && f.is_mp4())
            .filter_map(|f| f.height)
            .collect();

        heights.sort_unstable_by(|a, b| b.cmp(a));
        heights.dedup();

        heights.into_iter().map(|h| format!("{}p", h)).collect()
    }
}
