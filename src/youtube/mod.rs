pub mod client;
pub mod models;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::AppError;
use crate::models::RemoteTrack;
use crate::storage::Storage;

/// Owns the downloaded-remote-track document: one record per video that was
/// downloaded (or whose download was later cleared), deduplicated by id,
/// persisted as a full rewrite on change. The audio file in the downloads
/// directory is owned by its record.
pub struct YouTubeManager {
    storage: Arc<Storage>,
    tracks: RwLock<Vec<RemoteTrack>>,
}

impl YouTubeManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        let tracks = match storage.load_youtube_tracks() {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Failed to load YouTube tracks, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            tracks: RwLock::new(tracks),
        }
    }

    pub fn all(&self) -> Vec<RemoteTrack> {
        self.tracks.read().clone()
    }

    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<RemoteTrack>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut next = self.tracks.read().clone();
        let out = mutate(&mut next)?;
        self.storage.save_youtube_tracks(&next)?;
        *self.tracks.write() = next;
        Ok(out)
    }

    /// Marks fresh search results that are already in the downloaded set,
    /// attaching their stored local path.
    pub fn annotate(&self, results: Vec<RemoteTrack>) -> Vec<RemoteTrack> {
        let downloaded = self.tracks.read();
        results
            .into_iter()
            .map(|mut result| {
                if let Some(record) = downloaded
                    .iter()
                    .find(|d| d.is_downloaded && d.id == result.id)
                {
                    result.is_downloaded = true;
                    result.local_path = record.local_path.clone();
                }
                result
            })
            .collect()
    }

    /// Records a completed download; an id already present is left as is.
    pub fn record_download(&self, track: RemoteTrack) -> Result<(), AppError> {
        self.commit(|tracks| {
            if let Some(existing) = tracks.iter_mut().find(|t| t.id == track.id) {
                *existing = track;
            } else {
                tracks.push(track);
            }
            Ok(())
        })
    }

    /// Deletes the audio file and drops the record. A file that is already
    /// gone does not block the record removal.
    pub fn delete_download(&self, id: &str) -> Result<(), AppError> {
        let path = self
            .tracks
            .read()
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.local_path.clone());

        if let Some(path) = path {
            match std::fs::remove_file(&path) {
                Ok(()) => log::info!("Deleted downloaded file {}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(AppError::Io(format!("deleting {}: {}", path, e))),
            }
        }

        self.commit(|tracks| {
            tracks.retain(|t| t.id != id);
            Ok(())
        })
    }

    /// Library-removal cascade: when the removed file was a download, flips
    /// its record back to not-downloaded (keeping the stream metadata) and
    /// best-effort deletes the file. Returns the affected video id.
    pub fn clear_download_by_path(&self, path: &str) -> Result<Option<String>, AppError> {
        let has_record = self
            .tracks
            .read()
            .iter()
            .any(|t| t.local_path.as_deref() == Some(path));
        if !has_record {
            return Ok(None);
        }

        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Could not delete downloaded file {}: {}", path, e);
        }

        self.commit(|tracks| {
            let Some(record) = tracks
                .iter_mut()
                .find(|t| t.local_path.as_deref() == Some(path))
            else {
                return Ok(None);
            };
            record.is_downloaded = false;
            record.local_path = None;
            Ok(Some(record.id.clone()))
        })
    }
}
