//! Shared application state type.

use std::sync::Arc;

use crate::downloader::Downloader;

/// Services the handlers need.
pub struct AppContext {
    pub downloader: Downloader,
}

impl AppContext {
    pub fn new(downloader: Downloader) -> Self {
        Self { downloader }
    }
}

pub type AppState = Arc<AppContext>;
