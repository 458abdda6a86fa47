//! JSON HTTP surface over the [`Downloader`].

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::downloader::Downloader;

pub use error::HttpError;
pub use routes::create_router;
pub use state::{AppContext, AppState};

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, downloader: Downloader) -> std::io::Result<()> {
    let state: AppState = Arc::new(AppContext::new(downloader));
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        target: "youtube_fetch::http",
        addr = %listener.local_addr()?,
        "HTTP server listening"
    );

    axum::serve(listener, app).await
}
