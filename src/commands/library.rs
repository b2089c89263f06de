use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use crate::errors::AppError;
use crate::library::{self, LibraryManager};
use crate::models::LocalTrack;
use crate::playlist::PlaylistManager;
use crate::youtube::YouTubeManager;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac", "mp4", "opus"];

#[tauri::command]
pub async fn get_library(library: State<'_, LibraryManager>) -> Result<Vec<LocalTrack>, AppError> {
    Ok(library.all())
}

/// Opens the multi-select picker and imports the chosen files. Cancelling
/// the dialog imports nothing.
#[tauri::command]
pub async fn import_music(
    app: AppHandle,
    library: State<'_, LibraryManager>,
) -> Result<Vec<LocalTrack>, AppError> {
    let picked = app
        .dialog()
        .file()
        .add_filter("Audio Files", AUDIO_EXTENSIONS)
        .blocking_pick_files();

    let Some(paths) = picked else {
        return Ok(Vec::new());
    };

    let paths: Vec<String> = paths.into_iter().map(|p| p.to_string()).collect();
    library.import_paths(&paths)
}

/// Removes a track from the library and cascades into download records and
/// playlists. Returns the library as it stands afterwards.
#[tauri::command]
pub async fn remove_library_track(
    library: State<'_, LibraryManager>,
    playlists: State<'_, PlaylistManager>,
    youtube: State<'_, YouTubeManager>,
    path: String,
) -> Result<Vec<LocalTrack>, AppError> {
    library::remove_local_track(&library, &playlists, &youtube, &path)
}
