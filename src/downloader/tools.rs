// External tool discovery and availability checks

use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use super::errors::{FFMPEG_INSTALL_HINT, YTDLP_INSTALL_HINT};
use super::traits::DependencyProbe;
use super::utils::run_output;

/// Upper bound for a `-version` check.
const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ToolType {
    YtDlp,
    Ffmpeg,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "yt-dlp",
            ToolType::Ffmpeg => "ffmpeg",
        }
    }

    /// Flag that prints the version and exits zero.
    fn version_arg(&self) -> &'static str {
        match self {
            ToolType::YtDlp => "--version",
            ToolType::Ffmpeg => "-version",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            ToolType::YtDlp => YTDLP_INSTALL_HINT,
            ToolType::Ffmpeg => FFMPEG_INSTALL_HINT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub tool_type: ToolType,
    pub version: Option<String>,
    pub path: Option<String>,
    pub is_available: bool,
}

pub struct ToolManager;

impl ToolManager {
    pub fn new() -> Self {
        Self
    }

    pub fn get_tool_info(&self, tool_type: ToolType) -> ToolInfo {
        let path = self.locate(tool_type);
        let version = path
            .as_deref()
            .and_then(|p| version_of(p, tool_type.version_arg()));

        ToolInfo {
            name: tool_type.as_str().to_string(),
            tool_type,
            is_available: version.is_some(),
            version,
            path,
        }
    }

    pub fn get_all_tools(&self) -> Vec<ToolInfo> {
        vec![
            self.get_tool_info(ToolType::YtDlp),
            self.get_tool_info(ToolType::Ffmpeg),
        ]
    }

    /// Common install locations first, then `PATH`.
    pub fn locate(&self, tool_type: ToolType) -> Option<String> {
        let binary_name = tool_type.as_str();

        let common_paths = [
            format!("/opt/homebrew/bin/{}", binary_name),
            format!("/usr/local/bin/{}", binary_name),
            format!("/usr/bin/{}", binary_name),
        ];

        for path in common_paths {
            if Path::new(&path).exists() {
                return Some(path);
            }
        }

        let output = Command::new("which").arg(binary_name).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!path.is_empty()).then_some(path)
    }

    /// Discovered path, or the bare name so `PATH` lookup happens at spawn time.
    pub fn locate_or_default(&self, tool_type: ToolType) -> String {
        self.locate(tool_type)
            .unwrap_or_else(|| tool_type.as_str().to_string())
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}

/// First line of `<path> <arg>` when it exits successfully.
fn version_of(path: &str, arg: &str) -> Option<String> {
    let output = Command::new(path).arg(arg).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}

/// Checks for ffmpeg by running `<ffmpeg> -version` on every call, so a binary
/// installed while the server runs is picked up on the next request.
#[derive(Debug, Clone)]
pub struct SystemDependencies {
    ffmpeg_path: String,
}

impl SystemDependencies {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }
}

#[async_trait]
impl DependencyProbe for SystemDependencies {
    async fn transcoder_available(&self) -> bool {
        let args = [ToolType::Ffmpeg.version_arg().to_string()];
        let available = run_output(&self.ffmpeg_path, &args, Some(VERSION_CHECK_TIMEOUT))
            .await
            .map(|output| output.status.success())
            .unwrap_or(false);

        tracing::debug!(
            target: "youtube_fetch::tools",
            ffmpeg = %self.ffmpeg_path,
            available,
            "Checked transcoder"
        );
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_names() {
        assert_eq!(ToolType::YtDlp.as_str(), "yt-dlp");
        assert_eq!(ToolType::Ffmpeg.as_str(), "ffmpeg");
        assert!(ToolType::Ffmpeg.install_hint().contains("ffmpeg"));
    }

    #[tokio::test]
    async fn missing_ffmpeg_is_unavailable() {
        let deps = SystemDependencies::new("/nonexistent/bin/ffmpeg");
        assert!(!deps.transcoder_available().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_decides_availability() {
        assert!(SystemDependencies::new("true").transcoder_available().await);
        assert!(!SystemDependencies::new("false").transcoder_available().await);
    }

    #[test]
    fn unavailable_tool_info_has_no_version() {
        assert_eq!(version_of("/nonexistent/bin/yt-dlp", "--version"), None);
    }
}
