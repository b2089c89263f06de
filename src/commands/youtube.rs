use std::sync::Arc;

use tauri::{AppHandle, Emitter, State};

use crate::download::DownloadManager;
use crate::errors::AppError;
use crate::library::LibraryManager;
use crate::models::RemoteTrack;
use crate::youtube::client::YtDlpClient;
use crate::youtube::YouTubeManager;

/// Searches YouTube and annotates the results against the downloaded set
/// before they reach the UI.
#[tauri::command]
pub async fn search_youtube(
    youtube: State<'_, YouTubeManager>,
    client: State<'_, Arc<YtDlpClient>>,
    query: String,
) -> Result<Vec<RemoteTrack>, AppError> {
    let results = client.search(&query).await?;
    Ok(youtube.annotate(results))
}

/// Downloads the audio for a search result, records it in the downloaded
/// set, and best-effort mirrors it into the local library.
#[tauri::command]
pub async fn download_youtube(
    app: AppHandle,
    youtube: State<'_, YouTubeManager>,
    library: State<'_, LibraryManager>,
    downloads: State<'_, DownloadManager>,
    client: State<'_, Arc<YtDlpClient>>,
    track: RemoteTrack,
) -> Result<RemoteTrack, AppError> {
    let path = downloads.download(&client, &track).await?;
    let local_path = path.to_string_lossy().to_string();

    let downloaded = RemoteTrack {
        is_downloaded: true,
        local_path: Some(local_path.clone()),
        ..track
    };
    youtube.record_download(downloaded.clone())?;

    if let Err(e) = library.mirror_downloaded(&local_path) {
        log::warn!("Downloaded track not mirrored into library: {}", e);
    }

    let _ = app.emit("download-complete", downloaded.clone());
    Ok(downloaded)
}

#[tauri::command]
pub async fn get_downloaded_tracks(
    youtube: State<'_, YouTubeManager>,
) -> Result<Vec<RemoteTrack>, AppError> {
    Ok(youtube.all())
}

/// Deletes the downloaded file and its record. Playlist entries for the id
/// are left in place; they stay playable as streams.
#[tauri::command]
pub async fn delete_youtube_download(
    youtube: State<'_, YouTubeManager>,
    id: String,
) -> Result<Vec<RemoteTrack>, AppError> {
    youtube.delete_download(&id)?;
    Ok(youtube.all())
}
