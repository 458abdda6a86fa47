//! Route definitions and router construction.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Build the full router with state applied.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/download/{resolution}",
            post(handlers::download_by_resolution),
        )
        .route("/video_info", post(handlers::video_info))
        .route("/media/{kind}", post(handlers::media))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
