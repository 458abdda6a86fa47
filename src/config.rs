//! Runtime configuration.
//!
//! Values come from the environment (optionally seeded from a `.env` file) and
//! can be overridden by CLI flags in `main.rs`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::downloader::tools::{ToolManager, ToolType};

pub const ENV_DOWNLOADS_DIR: &str = "YTF_DOWNLOADS_DIR";
pub const ENV_YTDLP: &str = "YTF_YTDLP";
pub const ENV_FFMPEG: &str = "YTF_FFMPEG";
pub const ENV_PROXY: &str = "YTF_PROXY";
pub const ENV_COOKIES: &str = "YTF_COOKIES";
pub const ENV_PROBE_TIMEOUT: &str = "YTF_PROBE_TIMEOUT";
pub const ENV_BIND: &str = "YTF_BIND";

pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory every artifact is written to, created on first use
    pub downloads_dir: PathBuf,
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    pub proxy: Option<String>,
    pub cookies_path: Option<PathBuf>,
    /// Applies to the info probe only; downloads are never cut short
    pub probe_timeout: Option<Duration>,
    pub bind: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            downloads_dir: PathBuf::from(DEFAULT_DOWNLOADS_DIR),
            ytdlp_path: ToolType::YtDlp.as_str().to_string(),
            ffmpeg_path: ToolType::Ffmpeg.as_str().to_string(),
            proxy: None,
            cookies_path: None,
            probe_timeout: None,
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl AppConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        let tools = ToolManager::new();
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;

        if std::env::var(ENV_YTDLP).is_err() {
            config.ytdlp_path = tools.locate_or_default(ToolType::YtDlp);
        }
        if std::env::var(ENV_FFMPEG).is_err() {
            config.ffmpeg_path = tools.locate_or_default(ToolType::Ffmpeg);
        }
        Ok(config)
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let probe_timeout = match get(ENV_PROBE_TIMEOUT) {
            Some(raw) => Some(Duration::from_secs(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidValue {
                    key: ENV_PROBE_TIMEOUT,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?)),
            None => None,
        };

        let bind = match get(ENV_BIND) {
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: ENV_BIND,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => defaults.bind,
        };

        Ok(Self {
            downloads_dir: get(ENV_DOWNLOADS_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.downloads_dir),
            ytdlp_path: get(ENV_YTDLP).unwrap_or(defaults.ytdlp_path),
            ffmpeg_path: get(ENV_FFMPEG).unwrap_or(defaults.ffmpeg_path),
            proxy: get(ENV_PROXY),
            cookies_path: get(ENV_COOKIES).map(PathBuf::from),
            probe_timeout,
            bind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.downloads_dir, PathBuf::from("downloads"));
        assert_eq!(config.ytdlp_path, "yt-dlp");
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.proxy, None);
        assert_eq!(config.probe_timeout, None);
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_DOWNLOADS_DIR, "/srv/media"),
            (ENV_YTDLP, "/opt/bin/yt-dlp"),
            (ENV_PROXY, "socks5h://127.0.0.1:1080"),
            (ENV_COOKIES, "/etc/cookies.txt"),
            (ENV_PROBE_TIMEOUT, "15"),
            (ENV_BIND, "0.0.0.0:8080"),
            (ENV_FFMPEG, "  "),
        ]))
        .unwrap();

        assert_eq!(config.downloads_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.ytdlp_path, "/opt/bin/yt-dlp");
        assert_eq!(config.ffmpeg_path, "ffmpeg");
        assert_eq!(config.proxy.as_deref(), Some("socks5h://127.0.0.1:1080"));
        assert_eq!(config.cookies_path, Some(PathBuf::from("/etc/cookies.txt")));
        assert_eq!(config.probe_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.bind.port(), 8080);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup(&[(ENV_PROBE_TIMEOUT, "soon")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ENV_PROBE_TIMEOUT,
                ..
            }
        ));

        assert!(AppConfig::from_lookup(lookup(&[(ENV_BIND, "localhost")])).is_err());
    }
}
