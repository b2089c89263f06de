pub mod commands;
pub mod download;
pub mod errors;
pub mod library;
pub mod models;
pub mod playback;
pub mod playlist;
pub mod storage;
pub mod youtube;

use std::sync::Arc;

use download::DownloadManager;
use library::LibraryManager;
use playback::sink::EventSink;
use playback::PlaybackEngine;
use playlist::PlaylistManager;
use storage::Storage;
use tauri::Manager;
use youtube::client::YtDlpClient;
use youtube::YouTubeManager;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_os::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let handle = app.handle().clone();

            let storage = Arc::new(Storage::new()?);
            let client = Arc::new(YtDlpClient::new()?);

            app.manage(LibraryManager::new(storage.clone()));
            app.manage(PlaylistManager::new(storage.clone()));
            app.manage(YouTubeManager::new(storage.clone()));
            app.manage(DownloadManager::new(
                handle.clone(),
                storage.downloads_dir(),
            )?);
            app.manage(client.clone());
            app.manage(PlaybackEngine::new(
                Box::new(EventSink::new(handle)),
                client,
            ));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::library::get_library,
            commands::library::import_music,
            commands::library::remove_library_track,
            commands::playlist::get_playlists,
            commands::playlist::get_playlist,
            commands::playlist::create_playlist,
            commands::playlist::delete_playlist,
            commands::playlist::rename_playlist,
            commands::playlist::set_playlist_cover,
            commands::playlist::add_to_playlist,
            commands::playlist::add_tracks_to_playlist,
            commands::playlist::remove_from_playlist,
            commands::playlist::reorder_playlist,
            commands::playback::play_track,
            commands::playback::pause_track,
            commands::playback::resume_track,
            commands::playback::seek_track,
            commands::playback::set_volume,
            commands::playback::next_track,
            commands::playback::prev_track,
            commands::playback::set_play_order,
            commands::playback::toggle_shuffle,
            commands::playback::cycle_repeat_mode,
            commands::playback::get_playback_state,
            commands::playback::notify_track_ended,
            commands::playback::notify_playback_error,
            commands::playback::notify_progress,
            commands::youtube::search_youtube,
            commands::youtube::download_youtube,
            commands::youtube::get_downloaded_tracks,
            commands::youtube::delete_youtube_download
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
