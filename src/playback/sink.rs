use serde::Serialize;
use tauri::{AppHandle, Emitter};

/// What the UI audio element should load next.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediaSource {
    /// Raw audio bytes, base64-encoded; the UI wraps them in a blob URL.
    Bytes { data: String, mime: String },
    /// A resolved streaming URL, played directly.
    Url { url: String },
}

/// Seam to the external audio-rendering primitive. The production
/// implementation forwards every operation to the UI audio element as shell
/// events; tests substitute a recording sink.
pub trait AudioSink: Send + Sync {
    /// Replaces the loaded media source. `release` is always called first so
    /// the previous temporary resource (blob URL) can be dropped.
    fn load(&self, source: &MediaSource);
    fn play(&self);
    fn pause(&self);
    fn seek(&self, position: f64);
    fn set_volume(&self, volume: f64);
    /// Releases the currently loaded media resource.
    fn release(&self);
}

pub struct EventSink {
    app: AppHandle,
}

impl EventSink {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn emit<P: Serialize + Clone>(&self, event: &str, payload: P) {
        if let Err(e) = self.app.emit(event, payload) {
            log::error!("Failed to emit {}: {}", event, e);
        }
    }
}

impl AudioSink for EventSink {
    fn load(&self, source: &MediaSource) {
        self.emit("audio-load", source.clone());
    }

    fn play(&self) {
        self.emit("audio-play", ());
    }

    fn pause(&self) {
        self.emit("audio-pause", ());
    }

    fn seek(&self, position: f64) {
        self.emit("audio-seek", position);
    }

    fn set_volume(&self, volume: f64) {
        self.emit("audio-volume", volume);
    }

    fn release(&self) {
        self.emit("audio-release", ());
    }
}
