use tauri::State;

use crate::errors::AppError;
use crate::models::Track;
use crate::playlist::{Playlist, PlaylistManager};

#[tauri::command]
pub async fn get_playlists(manager: State<'_, PlaylistManager>) -> Result<Vec<Playlist>, AppError> {
    Ok(manager.all())
}

#[tauri::command]
pub async fn get_playlist(
    manager: State<'_, PlaylistManager>,
    id: String,
) -> Result<Playlist, AppError> {
    manager
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("playlist {}", id)))
}

#[tauri::command]
pub async fn create_playlist(
    manager: State<'_, PlaylistManager>,
    name: String,
) -> Result<Playlist, AppError> {
    manager.create(name)
}

#[tauri::command]
pub async fn delete_playlist(
    manager: State<'_, PlaylistManager>,
    id: String,
) -> Result<(), AppError> {
    manager.delete(&id)
}

#[tauri::command]
pub async fn rename_playlist(
    manager: State<'_, PlaylistManager>,
    id: String,
    new_name: String,
) -> Result<(), AppError> {
    manager.rename(&id, &new_name)
}

#[tauri::command]
pub async fn set_playlist_cover(
    manager: State<'_, PlaylistManager>,
    id: String,
    image: String,
) -> Result<(), AppError> {
    manager.set_cover(&id, image)
}

#[tauri::command]
pub async fn add_to_playlist(
    manager: State<'_, PlaylistManager>,
    playlist_id: String,
    track: Track,
) -> Result<(), AppError> {
    manager.add_track(&playlist_id, track)
}

#[tauri::command]
pub async fn add_tracks_to_playlist(
    manager: State<'_, PlaylistManager>,
    playlist_id: String,
    tracks: Vec<Track>,
) -> Result<(), AppError> {
    manager.add_tracks(&playlist_id, tracks)
}

/// `identity` is the track's dedup key: its path for local tracks, its video
/// id for remote ones.
#[tauri::command]
pub async fn remove_from_playlist(
    manager: State<'_, PlaylistManager>,
    playlist_id: String,
    identity: String,
) -> Result<(), AppError> {
    manager.remove_track(&playlist_id, &identity)
}

#[tauri::command]
pub async fn reorder_playlist(
    manager: State<'_, PlaylistManager>,
    playlist_id: String,
    from: usize,
    to: usize,
) -> Result<(), AppError> {
    manager.reorder(&playlist_id, from, to)
}
