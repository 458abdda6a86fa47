//! Request handlers.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use super::error::HttpError;
use super::state::AppState;
use crate::downloader::{
    sanitize, validator, DownloadKind, DownloadRequest, FormatStrategy, VideoMetadata,
};

/// Body of every endpoint: `{"url": "..."}`.
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body extractor whose rejections render as [`HttpError`] JSON.
type UrlBody = Result<Json<UrlRequest>, JsonRejection>;

/// Pull a usable URL out of the body or explain why not.
fn require_url(req: UrlRequest) -> Result<String, HttpError> {
    let url = req
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| {
            HttpError::BadRequest("Missing 'url' parameter in the request body.".to_string())
        })?;

    if !validator::is_watch_url(&url) || validator::validate(&url).is_none() {
        return Err(HttpError::BadRequest("Invalid YouTube URL.".to_string()));
    }

    Ok(url)
}

pub async fn health() -> &'static str {
    "OK"
}

/// `POST /download/{resolution}`: progressive mp4 at an exact height.
pub async fn download_by_resolution(
    State(state): State<AppState>,
    Path(resolution): Path<String>,
    body: UrlBody,
) -> Result<Json<MessageResponse>, HttpError> {
    let Json(req) = body?;
    let url = require_url(req)?;
    let strategy: FormatStrategy = resolution.parse().map_err(HttpError::BadRequest)?;

    state
        .downloader
        .download_with(&DownloadRequest::video(url), strategy)
        .await?;

    Ok(Json(MessageResponse {
        message: format!("Video with resolution {} downloaded successfully.", resolution),
    }))
}

/// `POST /video_info`
pub async fn video_info(
    State(state): State<AppState>,
    body: UrlBody,
) -> Result<Json<VideoMetadata>, HttpError> {
    let Json(req) = body?;
    let url = require_url(req)?;
    let info = state.downloader.video_info(&url).await?;
    Ok(Json(info))
}

/// `POST /media/{kind}`: download, then stream the artifact back from disk.
pub async fn media(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    body: UrlBody,
) -> Result<Response, HttpError> {
    let Json(req) = body?;
    let url = require_url(req)?;
    let kind: DownloadKind = kind.parse().map_err(HttpError::BadRequest)?;

    let result = state
        .downloader
        .download(&DownloadRequest::new(url, kind))
        .await?;

    let cannot_read = |e: std::io::Error| {
        HttpError::Internal(format!("Cannot read {}: {}", result.file_path.display(), e))
    };
    let file = tokio::fs::File::open(&result.file_path)
        .await
        .map_err(cannot_read)?;
    let length = file.metadata().await.map_err(cannot_read)?.len();

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_name(&result.title, &result.file_path)
    );

    Ok((
        [
            (header::CONTENT_TYPE, result.media_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, length.to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// Sanitized title plus the artifact's extension, restricted to what an
/// HTTP header value can carry.
fn attachment_name(title: &str, path: &std::path::Path) -> String {
    let stem: String = sanitize(title)
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    let stem = stem.trim();

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("bin");

    if stem.is_empty() {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("download.{}", ext))
    } else {
        format!("{}.{}", stem, ext)
    }
}
