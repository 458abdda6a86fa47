//! HTTP error type and its mapping from [`DownloadError`].

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::downloader::{DownloadError, ErrorKind};

#[derive(Debug, Error)]
pub enum HttpError {
    /// Client input rejected before any work was done.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The download flow failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    /// Install/upgrade advice, advisory only
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            HttpError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg.clone(),
                    kind: None,
                    hint: None,
                },
            ),
            HttpError::Download(err) => {
                let status = match err {
                    DownloadError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    ErrorBody {
                        error: err.message().to_string(),
                        kind: Some(err.kind()),
                        hint: err.remediation_hint(),
                    },
                )
            }
            HttpError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: msg.clone(),
                    kind: None,
                    hint: None,
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!(target: "youtube_fetch::http", error = %self, "Request failed");
        }

        (status, axum::Json(body)).into_response()
    }
}
