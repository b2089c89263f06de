use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use super::models::{ResolvedAudio, SearchEntry, VideoInfo};
use crate::errors::AppError;
use crate::models::RemoteTrack;
use crate::playback::SourceResolver;

const SEARCH_LIMIT: usize = 20;
const PROBE_URL: &str = "https://www.youtube.com/generate_204";
const PROBE_TIMEOUT_SECONDS: u64 = 5;

/// Thin wrapper around the `yt-dlp` binary: flat search dumps for the
/// search page, single-video dumps for stream resolution and downloads.
pub struct YtDlpClient {
    binary: String,
    http: reqwest::Client,
}

impl YtDlpClient {
    pub fn new() -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            binary: "yt-dlp".to_string(),
            http,
        })
    }

    async fn run(&self, args: &[&str], operation: &str) -> Result<Vec<u8>> {
        log::debug!("yt-dlp {}: {:?}", operation, args);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn {} for {}", self.binary, operation))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "{} failed for {}: {}",
                self.binary,
                operation,
                stderr.trim()
            ));
        }

        Ok(output.stdout)
    }

    /// Searches YouTube, returning candidates in result order. Entries that
    /// fail to parse are skipped, not fatal.
    pub async fn search(&self, query: &str) -> Result<Vec<RemoteTrack>> {
        let target = format!("ytsearch{}:{}", SEARCH_LIMIT, query);
        let stdout = self
            .run(
                &["--dump-json", "--flat-playlist", "--no-warnings", &target],
                "search",
            )
            .await?;

        let mut tracks = Vec::new();
        for line in String::from_utf8_lossy(&stdout).lines() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SearchEntry>(line) {
                Ok(entry) => tracks.push(entry.into_remote_track()),
                Err(e) => log::warn!("Skipping unparsable search entry: {}", e),
            }
        }

        log::info!("Search '{}' returned {} results", query, tracks.len());
        Ok(tracks)
    }

    /// Resolves the direct audio URL (and container extension) for a video.
    pub async fn resolve_audio(&self, video_id: &str) -> Result<ResolvedAudio> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let stdout = self
            .run(
                &[
                    "--dump-single-json",
                    "-f",
                    "bestaudio/best",
                    "--no-playlist",
                    "--no-warnings",
                    &url,
                ],
                "resolve",
            )
            .await?;

        let info: VideoInfo =
            serde_json::from_slice(&stdout).context("unparsable video dump")?;
        info.best_audio()
            .ok_or_else(|| anyhow!("no playable audio format for {}", video_id))
    }

    /// Cheap connectivity probe used before attempting to stream.
    pub async fn probe_online(&self) -> bool {
        match self.http.head(PROBE_URL).send().await {
            Ok(_) => true,
            Err(e) => {
                log::warn!("Connectivity probe failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl SourceResolver for YtDlpClient {
    async fn resolve_stream_url(&self, video_id: &str) -> Result<String, AppError> {
        let audio = self.resolve_audio(video_id).await?;
        Ok(audio.url)
    }

    async fn is_online(&self) -> bool {
        self.probe_online().await
    }
}
