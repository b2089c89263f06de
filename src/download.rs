use std::path::PathBuf;
use std::time::Duration;

use futures_util::StreamExt;
use parking_lot::Mutex;
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tokio::io::AsyncWriteExt;

use crate::errors::AppError;
use crate::models::RemoteTrack;
use crate::youtube::client::YtDlpClient;

const DOWNLOAD_TIMEOUT_SECONDS: u64 = 300;

#[derive(Clone, Serialize)]
pub struct DownloadProgress {
    pub track_id: String,
    pub total: u64,
    pub downloaded: u64,
    pub progress: f64, // 0.0 to 1.0
}

/// Streams resolved audio URLs into the downloads directory, one file per
/// video id, reporting progress to the UI as it goes.
pub struct DownloadManager {
    app: AppHandle,
    downloads_dir: PathBuf,
    http: reqwest::Client,
    active: Mutex<Vec<String>>,
}

impl DownloadManager {
    pub fn new(app: AppHandle, downloads_dir: PathBuf) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECONDS))
            .build()?;

        Ok(Self {
            app,
            downloads_dir,
            http,
            active: Mutex::new(Vec::new()),
        })
    }

    /// Downloads the audio for `track` to `<downloads>/<id>.<ext>`. A second
    /// request for an id that is still in flight is rejected; the first one
    /// runs to completion or failure.
    pub async fn download(
        &self,
        client: &YtDlpClient,
        track: &RemoteTrack,
    ) -> Result<PathBuf, AppError> {
        {
            let mut active = self.active.lock();
            if active.contains(&track.id) {
                return Err(AppError::ExternalTool(format!(
                    "download of {} already in progress",
                    track.id
                )));
            }
            active.push(track.id.clone());
        }

        let result = self.fetch(client, track).await;
        self.active.lock().retain(|id| id != &track.id);

        if let Err(ref e) = result {
            log::error!("Download of {} failed: {}", track.id, e);
            let _ = self.app.emit(
                "download-error",
                format!("Failed to download {}: {}", track.title, e),
            );
        }
        result
    }

    async fn fetch(&self, client: &YtDlpClient, track: &RemoteTrack) -> Result<PathBuf, AppError> {
        let audio = client.resolve_audio(&track.id).await?;
        let file_path = self.downloads_dir.join(format!("{}.{}", track.id, audio.ext));

        let response = self.http.get(&audio.url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalTool(format!(
                "HTTP {} fetching audio for {}",
                response.status(),
                track.id
            )));
        }

        let total = response.content_length().unwrap_or(0);
        let mut file = tokio::fs::File::create(&file_path).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if total > 0 {
                let _ = self.app.emit(
                    "download-progress",
                    DownloadProgress {
                        track_id: track.id.clone(),
                        total,
                        downloaded,
                        progress: downloaded as f64 / total as f64,
                    },
                );
            }
        }
        file.flush().await?;

        log::info!("Download complete: {}", file_path.display());
        Ok(file_path)
    }
}
