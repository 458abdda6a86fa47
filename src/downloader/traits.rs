// Collaborator seams of the download orchestrator

use async_trait::async_trait;

use super::errors::DownloadError;
use super::extraction::ExtractionConfig;
use super::models::VideoMetadata;

/// External extraction tool (yt-dlp in production, stubs in tests).
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Fetch metadata without writing anything to disk
    async fn probe(&self, url: &str) -> Result<VideoMetadata, DownloadError>;

    /// Download (and post-process) according to `config`
    async fn download(&self, url: &str, config: &ExtractionConfig) -> Result<(), DownloadError>;
}

/// Availability of external binaries, consulted on every request.
#[async_trait]
pub trait DependencyProbe: Send + Sync {
    async fn transcoder_available(&self) -> bool;
}
