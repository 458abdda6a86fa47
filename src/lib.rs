//! Fetch YouTube videos and audio through `yt-dlp`.
//!
//! The [`downloader`] module holds the orchestration. [`ytdlp`] is the
//! production [`Extractor`] and [`http`] exposes everything over JSON.

pub mod config;
pub mod downloader;
pub mod http;
pub mod logging;
pub mod ytdlp;

use std::sync::Arc;

pub use config::AppConfig;
pub use downloader::{
    DependencyProbe, DownloadError, DownloadKind, DownloadRequest, DownloadResult, Downloader,
    Extractor, VideoMetadata,
};
pub use ytdlp::YtDlp;

use downloader::tools::SystemDependencies;

/// Wire the production extractor and dependency probe from `config`.
pub fn build_downloader(config: &AppConfig) -> Downloader {
    Downloader::new(
        Arc::new(YtDlp::from_config(config)),
        Arc::new(SystemDependencies::new(config.ffmpeg_path.clone())),
        config.downloads_dir.clone(),
    )
}
