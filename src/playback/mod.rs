pub mod sink;

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Track;
use sink::{AudioSink, MediaSource};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    Off,
    All,
    One,
}

impl RepeatMode {
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Stopped,
    Playing,
    Paused,
}

/// Resolves a playable URL for remote tracks and answers the pre-playback
/// connectivity check. Implemented by the yt-dlp client in production.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve_stream_url(&self, video_id: &str) -> Result<String, AppError>;
    async fn is_online(&self) -> bool;
}

struct SessionState {
    current: Option<Track>,
    transport: Transport,
    position: f64,
    duration: f64,
    volume: f64,
    /// The loaded order as handed over by the UI.
    order: Vec<Track>,
    /// Derived permutation, regenerated when `order` or `shuffle` changes.
    shuffled: Vec<Track>,
    shuffle: bool,
    repeat: RepeatMode,
}

impl SessionState {
    fn new() -> Self {
        Self {
            current: None,
            transport: Transport::Stopped,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            order: Vec::new(),
            shuffled: Vec::new(),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }

    fn active_order(&self) -> &[Track] {
        if self.shuffle {
            &self.shuffled
        } else {
            &self.order
        }
    }

    /// Uniform shuffle of everything except the current track, which stays
    /// first so toggling shuffle does not interrupt what is playing.
    fn regenerate_shuffled(&mut self) {
        let mut rng = rand::rng();
        match self.current.clone() {
            Some(current) => {
                let mut rest: Vec<Track> = self
                    .order
                    .iter()
                    .filter(|t| t.identity() != current.identity())
                    .cloned()
                    .collect();
                rest.shuffle(&mut rng);

                let mut shuffled = Vec::with_capacity(rest.len() + 1);
                shuffled.push(current);
                shuffled.append(&mut rest);
                self.shuffled = shuffled;
            }
            None => {
                let mut all = self.order.clone();
                all.shuffle(&mut rng);
                self.shuffled = all;
            }
        }
    }
}

/// UI-facing view of the playback session.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSnapshot {
    pub current_track: Option<Track>,
    pub transport: Transport,
    pub position: f64,
    pub duration: f64,
    pub volume: f64,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

/// The playback state machine. Owns the session state; drives the external
/// audio primitive through the [`AudioSink`] seam and resolves remote
/// sources through the [`SourceResolver`] seam. The end-of-track handler
/// reads this state directly, so no mirroring of playlist/repeat/shuffle
/// values exists anywhere else.
pub struct PlaybackEngine {
    state: RwLock<SessionState>,
    sink: Box<dyn AudioSink>,
    resolver: Arc<dyn SourceResolver>,
}

impl PlaybackEngine {
    pub fn new(sink: Box<dyn AudioSink>, resolver: Arc<dyn SourceResolver>) -> Self {
        Self {
            state: RwLock::new(SessionState::new()),
            sink,
            resolver,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let st = self.state.read();
        PlaybackSnapshot {
            current_track: st.current.clone(),
            transport: st.transport,
            position: st.position,
            duration: st.duration,
            volume: st.volume,
            shuffle: st.shuffle,
            repeat: st.repeat,
        }
    }

    /// Resolves a media source for the track, swaps it into the sink and
    /// starts playing from zero. Resolution happens before any state or sink
    /// mutation, so a failed `play` leaves the previous session untouched.
    pub async fn play(&self, track: Track) -> Result<(), AppError> {
        let source = self.resolve_source(&track).await?;

        let mut st = self.state.write();
        self.sink.release();
        self.sink.load(&source);
        self.sink.set_volume(st.volume);
        self.sink.play();

        st.duration = track.duration();
        st.current = Some(track);
        st.position = 0.0;
        st.transport = Transport::Playing;
        Ok(())
    }

    async fn resolve_source(&self, track: &Track) -> Result<MediaSource, AppError> {
        match track {
            Track::Local(t) => read_file_source(&t.path).await,
            Track::RemoteDownloaded(t) => match &t.local_path {
                Some(path) => read_file_source(path).await,
                None => Err(AppError::SourceUnavailable(format!(
                    "downloaded track {} has no local file",
                    t.id
                ))),
            },
            Track::RemoteStream(t) => {
                if !self.resolver.is_online().await {
                    return Err(AppError::NetworkUnavailable);
                }
                let url = self
                    .resolver
                    .resolve_stream_url(&t.id)
                    .await
                    .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;
                Ok(MediaSource::Url { url })
            }
        }
    }

    pub fn pause(&self) {
        let mut st = self.state.write();
        if st.current.is_none() {
            return;
        }
        self.sink.pause();
        st.transport = Transport::Paused;
    }

    pub fn resume(&self) {
        let mut st = self.state.write();
        if st.current.is_none() {
            return;
        }
        self.sink.play();
        st.transport = Transport::Playing;
    }

    /// Clamps into the known duration; transport state is untouched.
    pub fn seek(&self, time: f64) {
        let mut st = self.state.write();
        if st.current.is_none() {
            return;
        }
        let position = if st.duration > 0.0 {
            time.clamp(0.0, st.duration)
        } else {
            time.max(0.0)
        };
        self.sink.seek(position);
        st.position = position;
    }

    /// `volume` is expected in [0, 1]; out-of-range values are a caller
    /// error and passed through unchanged.
    pub fn set_volume(&self, volume: f64) {
        let mut st = self.state.write();
        st.volume = volume;
        self.sink.set_volume(volume);
    }

    /// Replaces the loaded play order (the list the user is browsing).
    pub fn set_order(&self, tracks: Vec<Track>) {
        let mut st = self.state.write();
        st.order = tracks;
        if st.shuffle {
            st.regenerate_shuffled();
        }
    }

    pub fn toggle_shuffle(&self) -> bool {
        let mut st = self.state.write();
        st.shuffle = !st.shuffle;
        if st.shuffle {
            st.regenerate_shuffled();
        } else {
            st.shuffled.clear();
        }
        st.shuffle
    }

    pub fn cycle_repeat_mode(&self) -> RepeatMode {
        let mut st = self.state.write();
        st.repeat = st.repeat.cycle();
        st.repeat
    }

    /// Progress reported back by the audio element.
    pub fn report_progress(&self, position: f64, duration: f64) {
        let mut st = self.state.write();
        if duration > 0.0 {
            st.duration = duration;
        }
        st.position = if st.duration > 0.0 {
            position.clamp(0.0, st.duration)
        } else {
            position.max(0.0)
        };
    }

    /// A media error from the audio element halts playback; no retry.
    pub fn on_playback_error(&self, message: &str) {
        log::error!("Audio source error: {}", message);
        let mut st = self.state.write();
        st.transport = if st.current.is_some() {
            Transport::Paused
        } else {
            Transport::Stopped
        };
    }

    pub async fn next(&self) -> Result<(), AppError> {
        let target = {
            let st = self.state.read();
            let Some(current) = st.current.as_ref() else {
                return Ok(());
            };
            let order = st.active_order();
            if order.is_empty() {
                return Ok(());
            }
            let index = order.iter().position(|t| t.identity() == current.identity());
            let next = match index {
                Some(i) => (i + 1) % order.len(),
                None => 0,
            };
            order[next].clone()
        };
        self.play(target).await
    }

    pub async fn previous(&self) -> Result<(), AppError> {
        let target = {
            let st = self.state.read();
            let Some(current) = st.current.as_ref() else {
                return Ok(());
            };
            let order = st.active_order();
            if order.is_empty() {
                return Ok(());
            }
            let index = order.iter().position(|t| t.identity() == current.identity());
            let prev = match index {
                Some(0) | None => order.len() - 1,
                Some(i) => i - 1,
            };
            order[prev].clone()
        };
        self.play(target).await
    }

    /// Natural end of the loaded source. Repeat-one restarts the same source
    /// without re-resolving it; repeat-all wraps around; off advances until
    /// the order runs out and then returns to idle.
    pub async fn on_track_ended(&self) -> Result<(), AppError> {
        enum Next {
            Restart,
            Play(Track),
            Done,
        }

        let action = {
            let mut st = self.state.write();
            let Some(current) = st.current.clone() else {
                st.transport = Transport::Stopped;
                return Ok(());
            };

            if st.repeat == RepeatMode::One {
                Next::Restart
            } else {
                let order = st.active_order().to_vec();
                if order.is_empty() {
                    st.transport = Transport::Stopped;
                    Next::Done
                } else {
                    let index =
                        order.iter().position(|t| t.identity() == current.identity());
                    match st.repeat {
                        RepeatMode::All => {
                            let next = index.map_or(0, |i| (i + 1) % order.len());
                            Next::Play(order[next].clone())
                        }
                        RepeatMode::Off => match index {
                            Some(i) if i + 1 < order.len() => Next::Play(order[i + 1].clone()),
                            None => Next::Play(order[0].clone()),
                            _ => {
                                st.current = None;
                                st.position = 0.0;
                                st.transport = Transport::Stopped;
                                Next::Done
                            }
                        },
                        RepeatMode::One => unreachable!(),
                    }
                }
            }
        };

        match action {
            Next::Restart => {
                {
                    let mut st = self.state.write();
                    st.position = 0.0;
                    st.transport = Transport::Playing;
                }
                self.sink.seek(0.0);
                self.sink.play();
                Ok(())
            }
            Next::Play(track) => self.play(track).await,
            Next::Done => Ok(()),
        }
    }
}

async fn read_file_source(path: &str) -> Result<MediaSource, AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::SourceUnavailable(format!("{}: {}", path, e)))?;

    Ok(MediaSource::Bytes {
        data: general_purpose::STANDARD.encode(bytes),
        mime: mime_for_path(path).to_string(),
    })
}

fn mime_for_path(path: &str) -> &'static str {
    match path.rsplit('.').next().map(|ext| ext.to_ascii_lowercase()) {
        Some(ext) if ext == "flac" => "audio/flac",
        Some(ext) if ext == "wav" => "audio/wav",
        Some(ext) if ext == "ogg" || ext == "opus" => "audio/ogg",
        Some(ext) if ext == "m4a" || ext == "mp4" || ext == "aac" => "audio/mp4",
        Some(ext) if ext == "webm" => "audio/webm",
        _ => "audio/mpeg",
    }
}
