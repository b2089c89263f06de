pub mod metadata;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::errors::AppError;
use crate::models::LocalTrack;
use crate::playlist::PlaylistManager;
use crate::storage::Storage;
use crate::youtube::YouTubeManager;

/// Owns the local music library: an insertion-ordered set of file-backed
/// tracks deduplicated by path, persisted as a full rewrite on every change.
pub struct LibraryManager {
    storage: Arc<Storage>,
    tracks: RwLock<Vec<LocalTrack>>,
}

impl LibraryManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        let tracks = match storage.load_library() {
            Ok(tracks) => tracks,
            Err(e) => {
                log::warn!("Failed to load library, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            tracks: RwLock::new(tracks),
        }
    }

    pub fn all(&self) -> Vec<LocalTrack> {
        self.tracks.read().clone()
    }

    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<LocalTrack>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut next = self.tracks.read().clone();
        let out = mutate(&mut next)?;
        self.storage.save_library(&next)?;
        *self.tracks.write() = next;
        Ok(out)
    }

    /// Imports freshly picked files: tags are extracted per path (unreadable
    /// files are skipped), paths already in the library are dropped, the
    /// rest is appended and persisted. Returns the tracks actually added.
    pub fn import_paths(&self, paths: &[String]) -> Result<Vec<LocalTrack>, AppError> {
        let mut picked = Vec::new();
        for path in paths {
            if let Some(track) = metadata::read_local_track(path) {
                picked.push(track);
            }
        }
        let added = self.add_tracks(picked)?;
        log::info!("Imported {} new tracks", added.len());
        Ok(added)
    }

    /// Appends candidates whose path is not yet present. Persists once.
    pub fn add_tracks(&self, candidates: Vec<LocalTrack>) -> Result<Vec<LocalTrack>, AppError> {
        self.commit(|tracks| {
            let mut added = Vec::new();
            for candidate in candidates {
                if tracks.iter().all(|t| t.path != candidate.path) {
                    tracks.push(candidate.clone());
                    added.push(candidate);
                }
            }
            Ok(added)
        })
    }

    /// Removes the track with the given path; unknown paths are a no-op.
    pub fn remove_path(&self, path: &str) -> Result<(), AppError> {
        self.commit(|tracks| {
            tracks.retain(|t| t.path != path);
            Ok(())
        })
    }

    /// Mirrors a completed download into the library. Metadata failure or a
    /// path that is already present leaves the library untouched.
    pub fn mirror_downloaded(&self, local_path: &str) -> Result<(), AppError> {
        let Some(track) = metadata::read_local_track(local_path) else {
            return Err(AppError::SourceUnavailable(format!(
                "no readable metadata in {}",
                local_path
            )));
        };
        self.add_tracks(vec![track])?;
        Ok(())
    }
}

/// Removing a library track cascades beyond the library document: a download
/// record pointing at the file is flipped back to not-downloaded (the file
/// itself is deleted best-effort), and the track disappears from every
/// playlist that held it under any of its identities.
pub fn remove_local_track(
    library: &LibraryManager,
    playlists: &PlaylistManager,
    youtube: &YouTubeManager,
    path: &str,
) -> Result<Vec<LocalTrack>, AppError> {
    library.remove_path(path)?;
    let cleared_id = youtube.clear_download_by_path(path)?;
    playlists.purge_track(path, cleared_id.as_deref())?;
    Ok(library.all())
}
