use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use time::macros::format_description;
use time::Date;

use crate::config::AppConfig;
use crate::downloader::errors::DownloadError;
use crate::downloader::extraction::ExtractionConfig;
use crate::downloader::format_selector::{FormatSelector, StreamFormat};
use crate::downloader::models::VideoMetadata;
use crate::downloader::traits::Extractor;
use crate::downloader::utils::{run_output, tail_lines, CommandError};

/// Extractor backed by the `yt-dlp` binary.
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: String,
    proxy: Option<String>,
    cookies_path: Option<PathBuf>,
    probe_timeout: Option<Duration>,
}

impl YtDlp {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            proxy: None,
            cookies_path: None,
            probe_timeout: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            binary: config.ytdlp_path.clone(),
            proxy: config.proxy.clone(),
            cookies_path: config.cookies_path.clone(),
            probe_timeout: config.probe_timeout,
        }
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_cookies_path(mut self, path: Option<PathBuf>) -> Self {
        self.cookies_path = path;
        self
    }

    pub fn with_probe_timeout(mut self, limit: Option<Duration>) -> Self {
        self.probe_timeout = limit;
        self
    }

    /// Flags shared by probe and download.
    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--no-check-certificates".to_string(),
        ];

        if let Some(path) = &self.cookies_path {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().into_owned());
        }

        if let Some(proxy) = &self.proxy {
            args.push("--proxy".to_string());
            args.push(proxy.clone());
        }

        args
    }

    pub fn probe_args(&self, url: &str) -> Vec<String> {
        let mut args = vec!["--dump-json".to_string(), "--skip-download".to_string()];
        args.extend(self.common_args());
        args.push(url.to_string());
        args
    }

    pub fn download_args(&self, url: &str, config: &ExtractionConfig) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "-f".to_string(),
            config.format_selector.clone(),
            "-o".to_string(),
            config.output_template.clone(),
        ];
        args.extend(self.common_args());

        if let Some(pp) = &config.post_processing {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(pp.codec.to_string());
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", pp.quality_kbps));
        }

        args.push(url.to_string());
        args
    }

    async fn run(&self, args: Vec<String>, limit: Option<Duration>) -> Result<Vec<u8>, DownloadError> {
        tracing::debug!(
            target: "youtube_fetch::ytdlp",
            "Running: {} {}",
            self.binary,
            args.join(" ")
        );

        let output = run_output(&self.binary, &args, limit)
            .await
            .map_err(|e| match e {
                CommandError::NotFound(_) => DownloadError::MissingDependency(format!(
                    "yt-dlp not found at '{}'",
                    self.binary
                )),
                other => DownloadError::ExtractionFailed(other.to_string()),
            })?;

        if !output.status.success() {
            tracing::debug!(
                target: "youtube_fetch::ytdlp",
                status = %output.status,
                stderr = %tail_lines(&output.stderr, 3),
                "yt-dlp failed"
            );
            return Err(exit_error(&output.status, &output.stderr));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<VideoMetadata, DownloadError> {
        let stdout = self.run(self.probe_args(url), self.probe_timeout).await?;
        parse_metadata(&stdout)
    }

    async fn download(&self, url: &str, config: &ExtractionConfig) -> Result<(), DownloadError> {
        self.run(self.download_args(url, config), None).await.map(|_| ())
    }
}

/// Failure carrying yt-dlp's whole stderr, or the exit status when it printed
/// nothing.
fn exit_error(status: &impl fmt::Display, stderr: &[u8]) -> DownloadError {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        DownloadError::ExtractionFailed(format!("yt-dlp exited with {}", status))
    } else {
        DownloadError::ExtractionFailed(stderr.to_string())
    }
}

/// Parse the `--dump-json` output of a single video.
pub fn parse_metadata(stdout: &[u8]) -> Result<VideoMetadata, DownloadError> {
    let json: serde_json::Value = serde_json::from_slice(stdout)
        .map_err(|e| DownloadError::ExtractionFailed(format!("Failed to parse JSON: {}", e)))?;

    let formats: Vec<StreamFormat> = json
        .get("formats")
        .filter(|v| !v.is_null())
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| DownloadError::ExtractionFailed(format!("Unexpected formats array: {}", e)))?
        .unwrap_or_default();

    let text = |key: &str| json[key].as_str().unwrap_or("").to_string();

    Ok(VideoMetadata {
        id: text("id"),
        title: text("title"),
        author: json["uploader"]
            .as_str()
            .or_else(|| json["channel"].as_str())
            .unwrap_or("Unknown")
            .to_string(),
        length: json["duration"].as_f64().unwrap_or(0.0) as u64,
        views: json["view_count"].as_u64().unwrap_or(0),
        description: text("description"),
        publish_date: json["upload_date"].as_str().and_then(format_upload_date),
        available_resolutions: FormatSelector::progressive_resolutions(&formats),
    })
}

/// `20240131` → `2024-01-31`; anything unparseable is dropped.
fn format_upload_date(raw: &str) -> Option<String> {
    let date = Date::parse(raw, format_description!("[year][month][day]")).ok()?;
    date.format(format_description!("[year]-[month]-[day]")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{DownloadKind, DownloadRequest, VideoId};
    use crate::downloader::orchestrator::Downloader;
    use crate::downloader::tools::SystemDependencies;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Stand-in yt-dlp: `--dump-json` hangs, a download writes `<template>` as mp4.
    #[cfg(unix)]
    const SLOW_INFO_YTDLP: &str = r#"#!/bin/sh
prev=""
out=""
for arg in "$@"; do
    if [ "$arg" = "--dump-json" ]; then
        sleep 5
        exit 0
    fi
    if [ "$prev" = "-o" ]; then
        out="$arg"
    fi
    prev="$arg"
done
printf 'media' > "$(printf '%s' "$out" | sed 's/%(ext)s$/mp4/')"
"#;

    #[cfg(unix)]
    fn install_script(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("yt-dlp");
        std::fs::write(&path, body).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path.to_string_lossy().into_owned()
    }

    const SAMPLE: &str = r#"{
        "id": "abc123",
        "title": "Rock & Roll",
        "uploader": "Band",
        "duration": 212.4,
        "view_count": 1500,
        "description": "live",
        "upload_date": "20240131",
        "formats": [
            {"format_id": "18", "ext": "mp4", "height": 360, "vcodec": "avc1.42001E", "acodec": "mp4a.40.2"},
            {"format_id": "22", "ext": "mp4", "height": 720, "vcodec": "avc1.64001F", "acodec": "mp4a.40.2"},
            {"format_id": "137", "ext": "mp4", "height": 1080, "vcodec": "avc1.640028", "acodec": "none"},
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "height": null}
        ]
    }"#;

    #[test]
    fn parses_metadata() {
        let meta = parse_metadata(SAMPLE.as_bytes()).unwrap();

        assert_eq!(meta.id, "abc123");
        assert_eq!(meta.title, "Rock & Roll");
        assert_eq!(meta.author, "Band");
        assert_eq!(meta.length, 212);
        assert_eq!(meta.views, 1500);
        assert_eq!(meta.publish_date.as_deref(), Some("2024-01-31"));
        assert_eq!(meta.available_resolutions, vec!["720p", "360p"]);
    }

    #[test]
    fn tolerates_sparse_metadata() {
        let meta = parse_metadata(br#"{"id": "abc123"}"#).unwrap();

        assert_eq!(meta.title, "");
        assert_eq!(meta.author, "Unknown");
        assert_eq!(meta.publish_date, None);
        assert!(meta.available_resolutions.is_empty());
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_metadata(b"ERROR: not json").unwrap_err();
        assert!(matches!(err, DownloadError::ExtractionFailed(_)));
    }

    #[test]
    fn bad_upload_date_is_dropped() {
        assert_eq!(format_upload_date("2024-01-31"), None);
        assert_eq!(format_upload_date("20241341"), None);
    }

    #[test]
    fn audio_download_args() {
        let id = VideoId::new("abc123").unwrap();
        let config = ExtractionConfig::build(DownloadKind::Audio, &id, Path::new("downloads"));
        let ytdlp = YtDlp::new("yt-dlp").with_proxy(Some("socks5://127.0.0.1:1080".into()));

        let args = ytdlp.download_args("https://youtu.be/abc123", &config);

        let pos = |flag: &str| args.iter().position(|a| a == flag).unwrap();
        assert_eq!(args[pos("-f") + 1], "bestaudio/best");
        assert_eq!(args[pos("-o") + 1], config.output_template);
        assert_eq!(args[pos("--audio-format") + 1], "mp3");
        assert_eq!(args[pos("--audio-quality") + 1], "192K");
        assert_eq!(args[pos("--proxy") + 1], "socks5://127.0.0.1:1080");
        assert!(args.contains(&"-x".to_string()));
        assert!(args.contains(&"--no-check-certificates".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc123");
    }

    #[test]
    fn video_download_args_skip_post_processing() {
        let id = VideoId::new("abc123").unwrap();
        let config = ExtractionConfig::build(DownloadKind::Video, &id, Path::new("downloads"));

        let args = YtDlp::new("yt-dlp").download_args("https://youtu.be/abc123", &config);

        assert!(!args.contains(&"-x".to_string()));
        assert!(!args.contains(&"--proxy".to_string()));
    }

    #[test]
    fn probe_args_never_download() {
        let args = YtDlp::new("yt-dlp")
            .with_cookies_path(Some(PathBuf::from("/tmp/cookies.txt")))
            .probe_args("https://youtu.be/abc123");

        assert_eq!(&args[..2], &["--dump-json", "--skip-download"]);
        assert!(args.windows(2).any(|w| w[0] == "--cookies" && w[1] == "/tmp/cookies.txt"));
    }

    #[test]
    fn failure_keeps_whole_stderr() {
        let stderr = b"WARNING: [youtube] falling back\nERROR: [youtube] abc123: Sign in to confirm your age\nThis video may be inappropriate\nUse --cookies\n";

        let err = exit_error(&"exit status: 1", stderr);
        assert_eq!(
            err,
            DownloadError::ExtractionFailed(
                "WARNING: [youtube] falling back\nERROR: [youtube] abc123: Sign in to confirm your age\nThis video may be inappropriate\nUse --cookies".to_string()
            )
        );

        let err = exit_error(&"exit status: 2", b"  \n");
        assert_eq!(err.message(), "yt-dlp exited with exit status: 2");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_info_lookup_times_out() {
        let dir = TempDir::new().unwrap();
        let ytdlp = YtDlp::new(install_script(dir.path(), SLOW_INFO_YTDLP))
            .with_probe_timeout(Some(Duration::from_millis(200)));

        let err = ytdlp.probe("https://youtu.be/abc123").await.unwrap_err();
        assert!(matches!(&err, DownloadError::ExtractionFailed(m) if m.contains("timed out")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timed_out_info_lookup_falls_back_to_synthesized_title() {
        let dir = TempDir::new().unwrap();
        let downloads = dir.path().join("downloads");
        let ytdlp = YtDlp::new(install_script(dir.path(), SLOW_INFO_YTDLP))
            .with_probe_timeout(Some(Duration::from_millis(200)));
        let downloader = Downloader::new(
            Arc::new(ytdlp),
            Arc::new(SystemDependencies::new("/nonexistent/bin/ffmpeg")),
            &downloads,
        );

        let result = downloader
            .download(&DownloadRequest::video("https://youtu.be/abc123"))
            .await
            .unwrap();

        assert_eq!(result.title, "video_abc123");
        assert_eq!(result.file_path, downloads.join("video_abc123.mp4"));
    }

    #[tokio::test]
    async fn missing_binary_is_missing_dependency() {
        let ytdlp = YtDlp::new("/nonexistent/bin/yt-dlp");
        let id = VideoId::new("abc123").unwrap();
        let config = ExtractionConfig::build(DownloadKind::Video, &id, Path::new("downloads"));

        let err = ytdlp.download("https://youtu.be/abc123", &config).await.unwrap_err();
        assert!(matches!(err, DownloadError::MissingDependency(_)));
    }
}
