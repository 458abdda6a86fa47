//! `youtube-fetch` command-line entry point.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use youtube_fetch::downloader::tools::ToolManager;
use youtube_fetch::logging::init_tracing;
use youtube_fetch::{build_downloader, AppConfig, DownloadError, DownloadKind, DownloadRequest};

#[derive(Debug, Parser)]
#[command(name = "youtube-fetch", version, about = "Download YouTube video or audio via yt-dlp")]
struct Cli {
    /// Directory artifacts are written to
    #[arg(long, global = true, value_name = "DIR")]
    downloads_dir: Option<PathBuf>,

    /// Path to the yt-dlp binary
    #[arg(long, global = true, value_name = "PATH")]
    ytdlp: Option<String>,

    /// Path to the ffmpeg binary
    #[arg(long, global = true, value_name = "PATH")]
    ffmpeg: Option<String>,

    /// Proxy URL handed to yt-dlp
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download the best available video
    Video { url: String },
    /// Download audio as mp3 (needs ffmpeg)
    Audio { url: String },
    /// Print video metadata as JSON
    Info { url: String },
    /// Show yt-dlp and ffmpeg status
    Tools,
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.downloads_dir {
            config.downloads_dir = dir.clone();
        }
        if let Some(path) = &self.ytdlp {
            config.ytdlp_path = path.clone();
        }
        if let Some(path) = &self.ffmpeg {
            config.ffmpeg_path = path.clone();
        }
        if self.proxy.is_some() {
            config.proxy = self.proxy.clone();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = AppConfig::from_env().context("Invalid configuration")?;
    cli.apply(&mut config);

    match cli.command {
        Commands::Video { url } => fetch(&config, DownloadRequest::new(url, DownloadKind::Video)).await,
        Commands::Audio { url } => fetch(&config, DownloadRequest::new(url, DownloadKind::Audio)).await,
        Commands::Info { url } => {
            let info = build_downloader(&config)
                .video_info(&url)
                .await
                .map_err(report)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
            Ok(())
        }
        Commands::Tools => {
            for tool in ToolManager::new().get_all_tools() {
                match (&tool.path, &tool.version) {
                    (Some(path), Some(version)) => {
                        println!("{:<8} {} ({})", tool.name, version, path)
                    }
                    _ => {
                        println!("{:<8} not available", tool.name);
                        println!("         {}", tool.tool_type.install_hint());
                    }
                }
            }
            Ok(())
        }
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind);
            youtube_fetch::http::serve(addr, build_downloader(&config))
                .await
                .with_context(|| format!("HTTP server on {} failed", addr))
        }
    }
}

async fn fetch(config: &AppConfig, request: DownloadRequest) -> anyhow::Result<()> {
    let result = build_downloader(config)
        .download(&request)
        .await
        .map_err(report)?;

    println!("{}", result.title);
    println!("{}", result.file_path.display());
    Ok(())
}

/// Print the remediation hint, if any, and hand the error to anyhow.
fn report(err: DownloadError) -> anyhow::Error {
    if let Some(hint) = err.remediation_hint() {
        eprintln!("hint: {}", hint);
    }
    anyhow::Error::new(err)
}
