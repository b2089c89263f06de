use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use super::models::Playlist;
use crate::errors::AppError;
use crate::models::Track;
use crate::storage::Storage;

/// Owns the playlist collection. Every mutation is applied to a copy of the
/// collection and persisted as a full rewrite; only a successful write
/// replaces the in-memory state, so a failed save leaves prior state intact.
pub struct PlaylistManager {
    storage: Arc<Storage>,
    playlists: RwLock<Vec<Playlist>>,
}

impl PlaylistManager {
    pub fn new(storage: Arc<Storage>) -> Self {
        let playlists = match storage.load_playlists() {
            Ok(playlists) => playlists,
            Err(e) => {
                log::warn!("Failed to load playlists, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            playlists: RwLock::new(playlists),
        }
    }

    pub fn all(&self) -> Vec<Playlist> {
        self.playlists.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<Playlist> {
        self.playlists.read().iter().find(|p| p.id == id).cloned()
    }

    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<Playlist>) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut next = self.playlists.read().clone();
        let out = mutate(&mut next)?;
        self.storage.save_playlists(&next)?;
        *self.playlists.write() = next;
        Ok(out)
    }

    /// Applies `apply` to one playlist; a `true` return means the playlist
    /// changed and its `updatedAt` is bumped.
    fn with_playlist(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Playlist) -> bool,
    ) -> Result<(), AppError> {
        self.commit(|playlists| {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::NotFound(format!("playlist {}", id)))?;

            if apply(playlist) {
                playlist.updated_at = Utc::now().timestamp_millis();
            }
            Ok(())
        })
    }

    pub fn create(&self, name: String) -> Result<Playlist, AppError> {
        self.commit(|playlists| {
            let now = Utc::now().timestamp_millis();
            let playlist = Playlist {
                id: Uuid::new_v4().to_string(),
                name,
                tracks: Vec::new(),
                cover_image: None,
                created_at: now,
                updated_at: now,
            };
            playlists.push(playlist.clone());
            Ok(playlist)
        })
    }

    /// Deleting an unknown id is a silent no-op.
    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        self.commit(|playlists| {
            playlists.retain(|p| p.id != id);
            Ok(())
        })
    }

    pub fn rename(&self, id: &str, new_name: &str) -> Result<(), AppError> {
        self.with_playlist(id, |playlist| {
            playlist.name = new_name.to_string();
            true
        })
    }

    pub fn set_cover(&self, id: &str, image: String) -> Result<(), AppError> {
        self.with_playlist(id, |playlist| {
            playlist.cover_image = Some(image);
            true
        })
    }

    /// Appends the track unless its identity is already present.
    pub fn add_track(&self, id: &str, track: Track) -> Result<(), AppError> {
        self.with_playlist(id, |playlist| {
            if playlist.contains(track.identity()) {
                false
            } else {
                playlist.tracks.push(track);
                true
            }
        })
    }

    /// Batch append, deduplicated against the evolving sequence. `updatedAt`
    /// bumps only when at least one track was actually appended.
    pub fn add_tracks(&self, id: &str, tracks: Vec<Track>) -> Result<(), AppError> {
        self.with_playlist(id, |playlist| {
            let mut appended = false;
            for track in tracks {
                if !playlist.contains(track.identity()) {
                    playlist.tracks.push(track);
                    appended = true;
                }
            }
            appended
        })
    }

    /// Removes every track matching the identity. `updatedAt` bumps only
    /// when the sequence actually changed.
    pub fn remove_track(&self, id: &str, identity: &str) -> Result<(), AppError> {
        self.with_playlist(id, |playlist| {
            let before = playlist.tracks.len();
            playlist.tracks.retain(|t| t.identity() != identity);
            playlist.tracks.len() != before
        })
    }

    /// Moves the element at `from` so that it ends up at position `to`.
    /// Out-of-range positions are rejected and leave the playlist untouched.
    pub fn reorder(&self, id: &str, from: usize, to: usize) -> Result<(), AppError> {
        self.commit(|playlists| {
            let playlist = playlists
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| AppError::NotFound(format!("playlist {}", id)))?;

            let len = playlist.tracks.len();
            if from >= len || to >= len {
                return Err(AppError::NotFound(format!(
                    "no track at position {} -> {} (playlist has {} tracks)",
                    from, to, len
                )));
            }

            let track = playlist.tracks.remove(from);
            playlist.tracks.insert(to, track);
            playlist.updated_at = Utc::now().timestamp_millis();
            Ok(())
        })
    }

    /// Library-removal cascade support: drops from every playlist any track
    /// tied to the removed file, whether it was added as a local track, as a
    /// downloaded remote copy pointing at the file, or under the remote id
    /// whose download record was just cleared.
    pub fn purge_track(&self, path: &str, remote_id: Option<&str>) -> Result<(), AppError> {
        self.commit(|playlists| {
            let now = Utc::now().timestamp_millis();
            for playlist in playlists.iter_mut() {
                let before = playlist.tracks.len();
                playlist.tracks.retain(|track| match track {
                    Track::Local(t) => t.path != path,
                    Track::RemoteStream(t) | Track::RemoteDownloaded(t) => {
                        t.local_path.as_deref() != Some(path)
                            && remote_id.is_none_or(|rid| t.id != rid)
                    }
                });
                if playlist.tracks.len() != before {
                    playlist.updated_at = now;
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocalTrack, RemoteTrack};

    fn manager() -> (tempfile::TempDir, PlaylistManager) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(Storage::at(dir.path().join("data")).unwrap());
        (dir, PlaylistManager::new(storage))
    }

    fn local(path: &str) -> Track {
        Track::Local(LocalTrack {
            path: path.to_string(),
            title: path.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration: 60.0,
            year: None,
            genre: None,
            cover: None,
        })
    }

    fn downloaded(id: &str, local_path: &str) -> Track {
        Track::RemoteDownloaded(RemoteTrack {
            id: id.to_string(),
            title: id.to_string(),
            channel: "Channel".to_string(),
            duration: 60.0,
            thumbnail: String::new(),
            url: String::new(),
            is_downloaded: true,
            local_path: Some(local_path.to_string()),
        })
    }

    #[test]
    fn create_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(Storage::at(dir.path().join("data")).unwrap());

        let created = {
            let manager = PlaylistManager::new(storage.clone());
            manager.create("Focus".to_string()).unwrap()
        };

        let reloaded = PlaylistManager::new(storage);
        assert_eq!(reloaded.all(), vec![created]);
    }

    #[test]
    fn add_track_skips_duplicate_identities() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();

        manager.add_track(&p.id, local("/a.mp3")).unwrap();
        manager.add_track(&p.id, local("/a.mp3")).unwrap();

        assert_eq!(manager.get(&p.id).unwrap().tracks.len(), 1);
    }

    #[test]
    fn add_tracks_dedups_against_the_evolving_sequence() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();

        manager.add_track(&p.id, local("/a.mp3")).unwrap();
        manager
            .add_tracks(
                &p.id,
                vec![local("/a.mp3"), local("/b.mp3"), local("/b.mp3"), local("/c.mp3")],
            )
            .unwrap();

        let ids: Vec<String> = manager
            .get(&p.id)
            .unwrap()
            .tracks
            .iter()
            .map(|t| t.identity().to_string())
            .collect();
        assert_eq!(ids, vec!["/a.mp3", "/b.mp3", "/c.mp3"]);
    }

    #[test]
    fn remove_track_is_idempotent() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();
        manager.add_tracks(&p.id, vec![local("/a.mp3"), local("/b.mp3")]).unwrap();

        manager.remove_track(&p.id, "/a.mp3").unwrap();
        let once = manager.get(&p.id).unwrap().tracks.clone();
        manager.remove_track(&p.id, "/a.mp3").unwrap();
        let twice = manager.get(&p.id).unwrap().tracks;

        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].identity(), "/b.mp3");
    }

    #[test]
    fn reorder_moves_first_to_last() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();
        manager
            .add_tracks(&p.id, vec![local("/x.mp3"), local("/y.mp3"), local("/z.mp3")])
            .unwrap();

        manager.reorder(&p.id, 0, 2).unwrap();

        let ids: Vec<String> = manager
            .get(&p.id)
            .unwrap()
            .tracks
            .iter()
            .map(|t| t.identity().to_string())
            .collect();
        assert_eq!(ids, vec!["/y.mp3", "/z.mp3", "/x.mp3"]);
    }

    #[test]
    fn reorder_rejects_out_of_range_positions() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();
        manager.add_track(&p.id, local("/x.mp3")).unwrap();

        assert!(manager.reorder(&p.id, 0, 3).is_err());
        assert_eq!(manager.get(&p.id).unwrap().tracks.len(), 1);
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let (_dir, manager) = manager();
        manager.create("Keep".to_string()).unwrap();

        manager.delete("missing").unwrap();
        assert_eq!(manager.all().len(), 1);
    }

    #[test]
    fn purge_removes_by_path_local_path_and_remote_id() {
        let (_dir, manager) = manager();
        let p = manager.create("P".to_string()).unwrap();
        manager
            .add_tracks(
                &p.id,
                vec![
                    local("/dl/v1.mp3"),
                    downloaded("v1", "/dl/v1.mp3"),
                    local("/keep.mp3"),
                ],
            )
            .unwrap();

        manager.purge_track("/dl/v1.mp3", Some("v1")).unwrap();

        let tracks = manager.get(&p.id).unwrap().tracks;
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].identity(), "/keep.mp3");
    }
}
