// Downloader module: URL handling, extraction config, orchestration

pub mod errors;
pub mod extraction;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod resolver;
pub mod sanitize;
pub mod tools;
pub mod traits;
pub mod utils;
pub mod validator;

pub use errors::{DownloadError, ErrorKind};
pub use extraction::ExtractionConfig;
pub use format_selector::FormatStrategy;
pub use models::{DownloadKind, DownloadRequest, DownloadResult, VideoId, VideoMetadata};
pub use orchestrator::Downloader;
pub use sanitize::sanitize;
pub use traits::{DependencyProbe, Extractor};
