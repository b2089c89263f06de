use serde::Deserialize;

use crate::models::RemoteTrack;

/// One line of a `--flat-playlist` search dump.
#[derive(Debug, Deserialize)]
pub struct SearchEntry {
    pub id: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl SearchEntry {
    pub fn into_remote_track(self) -> RemoteTrack {
        RemoteTrack {
            url: format!("https://www.youtube.com/watch?v={}", self.id),
            thumbnail: self
                .thumbnails
                .first()
                .map(|t| t.url.clone())
                .unwrap_or_default(),
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            channel: self
                .channel
                .or(self.uploader)
                .unwrap_or_else(|| "Unknown".to_string()),
            duration: self.duration.unwrap_or(0.0),
            is_downloaded: false,
            local_path: None,
            id: self.id,
        }
    }
}

/// A `--dump-single-json` video dump, reduced to what playback needs.
#[derive(Debug, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub formats: Vec<VideoFormat>,
    /// Pre-selected url when yt-dlp already applied the format filter.
    pub url: Option<String>,
    pub ext: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoFormat {
    pub url: String,
    pub acodec: Option<String>,
    pub vcodec: Option<String>,
    pub ext: Option<String>,
}

/// A direct, playable audio URL plus the container extension used when the
/// stream is saved to disk.
#[derive(Debug, Clone)]
pub struct ResolvedAudio {
    pub url: String,
    pub ext: String,
}

impl VideoInfo {
    /// Picks the first audio-only format (audio codec present, no video
    /// codec), falling back to the dump's pre-selected url.
    pub fn best_audio(&self) -> Option<ResolvedAudio> {
        let audio_only = self.formats.iter().find(|f| {
            f.acodec.as_deref() != Some("none") && f.vcodec.as_deref() == Some("none")
        });

        if let Some(format) = audio_only {
            return Some(ResolvedAudio {
                url: format.url.clone(),
                ext: format.ext.clone().unwrap_or_else(|| "m4a".to_string()),
            });
        }

        self.url.as_ref().map(|url| ResolvedAudio {
            url: url.clone(),
            ext: self.ext.clone().unwrap_or_else(|| "m4a".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_entry_maps_to_remote_track() {
        let json = r#"{
            "id": "dQw4w9WgXcQ",
            "title": "Some Song",
            "uploader": "SomeChannel",
            "duration": 212.0,
            "thumbnails": [{"url": "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg"}]
        }"#;

        let entry: SearchEntry = serde_json::from_str(json).unwrap();
        let track = entry.into_remote_track();

        assert_eq!(track.id, "dQw4w9WgXcQ");
        assert_eq!(track.channel, "SomeChannel");
        assert_eq!(track.duration, 212.0);
        assert_eq!(track.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert!(!track.is_downloaded);
    }

    #[test]
    fn best_audio_prefers_audio_only_formats() {
        let json = r#"{
            "id": "v1",
            "formats": [
                {"url": "https://cdn/video", "acodec": "opus", "vcodec": "vp9", "ext": "webm"},
                {"url": "https://cdn/audio", "acodec": "opus", "vcodec": "none", "ext": "webm"}
            ],
            "url": "https://cdn/fallback",
            "ext": "mp4"
        }"#;

        let info: VideoInfo = serde_json::from_str(json).unwrap();
        let audio = info.best_audio().unwrap();
        assert_eq!(audio.url, "https://cdn/audio");
        assert_eq!(audio.ext, "webm");
    }

    #[test]
    fn best_audio_falls_back_to_preselected_url() {
        let json = r#"{"id": "v1", "url": "https://cdn/only", "ext": "m4a"}"#;

        let info: VideoInfo = serde_json::from_str(json).unwrap();
        let audio = info.best_audio().unwrap();
        assert_eq!(audio.url, "https://cdn/only");
        assert_eq!(audio.ext, "m4a");
    }
}
