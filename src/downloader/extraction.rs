// Extraction configuration handed to the extractor

use std::path::{Path, PathBuf};

use super::format_selector::{FormatSelector, FormatStrategy};
use super::models::{DownloadKind, VideoId};

/// Codec produced by the audio post-processing step.
pub const AUDIO_CODEC: &str = "mp3";

/// Bitrate of the audio post-processing step, in kbps.
pub const AUDIO_QUALITY_KBPS: u32 = 192;

/// Transcoding directive run by the extractor after retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostProcessing {
    pub codec: &'static str,
    pub quality_kbps: u32,
}

/// Parameters for one extractor run. Built per request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub kind: DownloadKind,
    pub format_selector: String,
    /// Output path without extension, keyed by the video id
    pub output_base: PathBuf,
    /// yt-dlp `-o` template: `output_base` plus `.%(ext)s`
    pub output_template: String,
    pub post_processing: Option<PostProcessing>,
}

impl ExtractionConfig {
    pub fn build(kind: DownloadKind, video_id: &VideoId, downloads_dir: &Path) -> Self {
        Self::build_with(kind, FormatStrategy::Best, video_id, downloads_dir)
    }

    pub fn build_with(
        kind: DownloadKind,
        strategy: FormatStrategy,
        video_id: &VideoId,
        downloads_dir: &Path,
    ) -> Self {
        let output_base = downloads_dir.join(output_name(kind, strategy, video_id));
        let output_template = format!("{}.%(ext)s", output_base.to_string_lossy());

        let post_processing = match kind {
            DownloadKind::Audio => Some(PostProcessing {
                codec: AUDIO_CODEC,
                quality_kbps: AUDIO_QUALITY_KBPS,
            }),
            DownloadKind::Video => None,
        };

        Self {
            kind,
            format_selector: FormatSelector::spec(kind, strategy),
            output_base,
            output_template,
            post_processing,
        }
    }

    /// Whether the run depends on the external transcoder.
    pub fn needs_transcoder(&self) -> bool {
        self.post_processing.is_some()
    }
}

/// File name (without extension) for a request. Titles never appear here.
fn output_name(kind: DownloadKind, strategy: FormatStrategy, video_id: &VideoId) -> String {
    match (kind, strategy) {
        (DownloadKind::Audio, _) => format!("audio_{}", video_id),
        (DownloadKind::Video, FormatStrategy::Best) => format!("video_{}", video_id),
        (DownloadKind::Video, FormatStrategy::Resolution(height)) => {
            format!("video_{}_{}p", video_id, height)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::new("abc123").unwrap()
    }

    #[test]
    fn video_config_has_no_post_processing() {
        let config = ExtractionConfig::build(DownloadKind::Video, &id(), Path::new("downloads"));

        assert_eq!(config.format_selector, "best[ext=mp4]/best/bestvideo");
        assert_eq!(config.output_base, Path::new("downloads").join("video_abc123"));
        assert!(config.output_template.ends_with("video_abc123.%(ext)s"));
        assert_eq!(config.post_processing, None);
        assert!(!config.needs_transcoder());
    }

    #[test]
    fn audio_config_transcodes_to_mp3() {
        let config = ExtractionConfig::build(DownloadKind::Audio, &id(), Path::new("downloads"));

        assert_eq!(config.format_selector, "bestaudio/best");
        assert_eq!(config.output_base, Path::new("downloads").join("audio_abc123"));
        assert_eq!(
            config.post_processing,
            Some(PostProcessing {
                codec: "mp3",
                quality_kbps: 192
            })
        );
        assert!(config.needs_transcoder());
    }

    #[test]
    fn resolution_strategy_gets_its_own_name() {
        let config = ExtractionConfig::build_with(
            DownloadKind::Video,
            FormatStrategy::Resolution(720),
            &id(),
            Path::new("out"),
        );

        assert_eq!(config.output_base, Path::new("out").join("video_abc123_720p"));
        assert!(config.format_selector.contains("height=720"));
    }
}
