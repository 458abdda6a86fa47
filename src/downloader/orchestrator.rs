// Orchestrator: validate, configure, probe, download, resolve

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::errors::DownloadError;
use super::extraction::ExtractionConfig;
use super::format_selector::FormatStrategy;
use super::models::{DownloadKind, DownloadRequest, DownloadResult, VideoId, VideoMetadata};
use super::resolver;
use super::traits::{DependencyProbe, Extractor};
use super::validator;

/// Drives one extractor through a download request.
///
/// Holds no per-request state; concurrent calls only share the downloads
/// directory.
pub struct Downloader {
    extractor: Arc<dyn Extractor>,
    dependencies: Arc<dyn DependencyProbe>,
    downloads_dir: PathBuf,
}

impl Downloader {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        dependencies: Arc<dyn DependencyProbe>,
        downloads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            extractor,
            dependencies,
            downloads_dir: downloads_dir.into(),
        }
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<DownloadResult, DownloadError> {
        self.download_with(request, FormatStrategy::Best).await
    }

    pub async fn download_with(
        &self,
        request: &DownloadRequest,
        strategy: FormatStrategy,
    ) -> Result<DownloadResult, DownloadError> {
        let video_id = Self::video_id(&request.url)?;

        if request.kind == DownloadKind::Audio
            && !self.dependencies.transcoder_available().await
        {
            tracing::warn!(
                target: "youtube_fetch::orchestrator",
                video_id = %video_id,
                "ffmpeg unavailable, refusing audio download"
            );
            return Err(DownloadError::MissingDependency(
                "ffmpeg is required for audio downloads but was not found".to_string(),
            ));
        }

        let config =
            ExtractionConfig::build_with(request.kind, strategy, &video_id, &self.downloads_dir);

        tokio::fs::create_dir_all(&self.downloads_dir)
            .await
            .map_err(|e| {
                DownloadError::ExtractionFailed(format!(
                    "Cannot create {}: {}",
                    self.downloads_dir.display(),
                    e
                ))
            })?;

        let title = self.probe_title(&request.url, &video_id).await;

        tracing::info!(
            target: "youtube_fetch::orchestrator",
            extractor = self.extractor.name(),
            video_id = %video_id,
            kind = %request.kind,
            strategy = %strategy,
            format = %config.format_selector,
            "Starting download"
        );

        if let Err(e) = self.extractor.download(&request.url, &config).await {
            tracing::error!(
                target: "youtube_fetch::orchestrator",
                video_id = %video_id,
                error = %e,
                "Download failed"
            );
            return Err(e);
        }

        let file_path = resolver::resolve(&config.output_base, request.kind).ok_or_else(|| {
            DownloadError::FileNotFound(format!(
                "{} reported success but no file matching {} exists",
                self.extractor.name(),
                config.output_base.display()
            ))
        })?;

        tracing::info!(
            target: "youtube_fetch::orchestrator",
            video_id = %video_id,
            path = %file_path.display(),
            "Download complete"
        );

        Ok(DownloadResult { title, file_path })
    }

    /// Metadata for the HTTP info endpoint and the CLI. Unlike the probe inside
    /// [`Self::download`], a failure here is returned to the caller.
    pub async fn video_info(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        Self::video_id(url)?;
        self.extractor.probe(url).await
    }

    fn video_id(url: &str) -> Result<VideoId, DownloadError> {
        validator::validate(url).ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))
    }

    /// Best-known title; probe failures and empty titles fall back to `video_<id>`.
    async fn probe_title(&self, url: &str, video_id: &VideoId) -> String {
        match self.extractor.probe(url).await {
            Ok(meta) if !meta.title.trim().is_empty() => meta.title,
            Ok(_) => {
                tracing::warn!(
                    target: "youtube_fetch::orchestrator",
                    video_id = %video_id,
                    "Probe returned no title, using fallback"
                );
                video_id.fallback_title()
            }
            Err(e) => {
                tracing::warn!(
                    target: "youtube_fetch::orchestrator",
                    video_id = %video_id,
                    error = %e,
                    "Could not extract video information, trying direct download"
                );
                video_id.fallback_title()
            }
        }
    }
}
