use tauri::State;

use crate::errors::AppError;
use crate::models::Track;
use crate::playback::{PlaybackEngine, PlaybackSnapshot, RepeatMode};

#[tauri::command]
pub async fn play_track(
    engine: State<'_, PlaybackEngine>,
    track: Track,
) -> Result<(), AppError> {
    log::info!("[Command] play_track: {}", track.title());
    engine.play(track).await
}

#[tauri::command]
pub async fn pause_track(engine: State<'_, PlaybackEngine>) -> Result<(), AppError> {
    engine.pause();
    Ok(())
}

#[tauri::command]
pub async fn resume_track(engine: State<'_, PlaybackEngine>) -> Result<(), AppError> {
    engine.resume();
    Ok(())
}

#[tauri::command]
pub async fn seek_track(engine: State<'_, PlaybackEngine>, time: f64) -> Result<(), AppError> {
    engine.seek(time);
    Ok(())
}

#[tauri::command]
pub async fn set_volume(engine: State<'_, PlaybackEngine>, volume: f64) -> Result<(), AppError> {
    engine.set_volume(volume);
    Ok(())
}

#[tauri::command]
pub async fn next_track(engine: State<'_, PlaybackEngine>) -> Result<(), AppError> {
    engine.next().await
}

#[tauri::command]
pub async fn prev_track(engine: State<'_, PlaybackEngine>) -> Result<(), AppError> {
    engine.previous().await
}

/// Replaces the play order that next/previous/auto-advance operate over.
#[tauri::command]
pub async fn set_play_order(
    engine: State<'_, PlaybackEngine>,
    tracks: Vec<Track>,
) -> Result<(), AppError> {
    engine.set_order(tracks);
    Ok(())
}

#[tauri::command]
pub async fn toggle_shuffle(engine: State<'_, PlaybackEngine>) -> Result<bool, AppError> {
    Ok(engine.toggle_shuffle())
}

#[tauri::command]
pub async fn cycle_repeat_mode(engine: State<'_, PlaybackEngine>) -> Result<RepeatMode, AppError> {
    Ok(engine.cycle_repeat_mode())
}

#[tauri::command]
pub async fn get_playback_state(
    engine: State<'_, PlaybackEngine>,
) -> Result<PlaybackSnapshot, AppError> {
    Ok(engine.snapshot())
}

/// The UI audio element reached the end of the loaded source.
#[tauri::command]
pub async fn notify_track_ended(engine: State<'_, PlaybackEngine>) -> Result<(), AppError> {
    engine.on_track_ended().await
}

/// The UI audio element failed on the loaded source.
#[tauri::command]
pub async fn notify_playback_error(
    engine: State<'_, PlaybackEngine>,
    message: String,
) -> Result<(), AppError> {
    engine.on_playback_error(&message);
    Ok(())
}

/// Periodic progress report from the UI audio element.
#[tauri::command]
pub async fn notify_progress(
    engine: State<'_, PlaybackEngine>,
    position: f64,
    duration: f64,
) -> Result<(), AppError> {
    engine.report_progress(position, duration);
    Ok(())
}
