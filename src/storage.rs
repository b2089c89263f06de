use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{LocalTrack, RemoteTrack};
use crate::playlist::models::Playlist;

const LIBRARY_FILE: &str = "music-library.json";
const PLAYLISTS_FILE: &str = "playlists.json";
const YOUTUBE_TRACKS_FILE: &str = "youtube-tracks.json";

/// Gateway to the persisted JSON documents in the per-user data directory.
/// Every save is a full rewrite of the document; a missing document loads as
/// the empty collection.
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Result<Self, AppError> {
        let base = dirs::data_dir()
            .ok_or_else(|| AppError::Io("no user data directory available".to_string()))?;
        Self::at(base.join("resona"))
    }

    /// Storage rooted at an explicit directory. Tests point this at a
    /// temporary directory.
    pub fn at(data_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        let storage = Self { data_dir };
        fs::create_dir_all(storage.downloads_dir())?;
        Ok(storage)
    }

    /// Directory owning one audio file per downloaded remote track, named by
    /// its video id.
    pub fn downloads_dir(&self) -> PathBuf {
        self.data_dir.join("downloads").join("youtube")
    }

    fn read_document<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, AppError> {
        let path = self.data_dir.join(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_document<T: Serialize>(&self, name: &str, items: &[T]) -> Result<(), AppError> {
        let data = serde_json::to_string_pretty(items)?;
        fs::write(self.data_dir.join(name), data)?;
        Ok(())
    }

    pub fn load_library(&self) -> Result<Vec<LocalTrack>, AppError> {
        self.read_document(LIBRARY_FILE)
    }

    pub fn save_library(&self, tracks: &[LocalTrack]) -> Result<(), AppError> {
        self.write_document(LIBRARY_FILE, tracks)
    }

    pub fn load_playlists(&self) -> Result<Vec<Playlist>, AppError> {
        self.read_document(PLAYLISTS_FILE)
    }

    pub fn save_playlists(&self, playlists: &[Playlist]) -> Result<(), AppError> {
        self.write_document(PLAYLISTS_FILE, playlists)
    }

    pub fn load_youtube_tracks(&self) -> Result<Vec<RemoteTrack>, AppError> {
        self.read_document(YOUTUBE_TRACKS_FILE)
    }

    pub fn save_youtube_tracks(&self, tracks: &[RemoteTrack]) -> Result<(), AppError> {
        self.write_document(YOUTUBE_TRACKS_FILE, tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Track;

    fn sample_local(path: &str) -> LocalTrack {
        LocalTrack {
            path: path.to_string(),
            title: "Song".to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration: 240.5,
            year: Some(1999),
            genre: Some("Rock".to_string()),
            cover: None,
        }
    }

    #[test]
    fn missing_documents_load_as_empty_collections() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path().join("data")).unwrap();

        assert!(storage.load_library().unwrap().is_empty());
        assert!(storage.load_playlists().unwrap().is_empty());
        assert!(storage.load_youtube_tracks().unwrap().is_empty());
    }

    #[test]
    fn library_round_trips_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path().join("data")).unwrap();

        let tracks = vec![sample_local("/a.mp3"), sample_local("/b.mp3")];
        storage.save_library(&tracks).unwrap();

        assert_eq!(storage.load_library().unwrap(), tracks);
    }

    #[test]
    fn playlists_round_trip_preserving_track_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::at(dir.path().join("data")).unwrap();

        let playlist = Playlist {
            id: "p1".to_string(),
            name: "Morning".to_string(),
            tracks: vec![
                Track::Local(sample_local("/x.mp3")),
                Track::Local(sample_local("/y.mp3")),
            ],
            cover_image: None,
            created_at: 1,
            updated_at: 2,
        };

        storage.save_playlists(std::slice::from_ref(&playlist)).unwrap();
        let loaded = storage.load_playlists().unwrap();
        assert_eq!(loaded, vec![playlist]);
    }
}
