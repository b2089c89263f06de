use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A track backed by an audio file already on the user's filesystem.
/// `path` is its identity within the library and playlists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTrack {
    pub path: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Cover art as a `data:` URL, ready for the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

/// A track backed by a remote video id, playable by streaming or from a
/// previously downloaded copy. `id` is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTrack {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub duration: f64,
    pub thumbnail: String,
    pub url: String,
    #[serde(default)]
    pub is_downloaded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

/// The playable item of the whole application. The serialized `type` tag
/// matches the historical on-disk documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Track {
    #[serde(rename = "local")]
    Local(LocalTrack),
    #[serde(rename = "youtube-stream")]
    RemoteStream(RemoteTrack),
    #[serde(rename = "youtube-downloaded")]
    RemoteDownloaded(RemoteTrack),
}

// Library documents written before the tag was introduced carry bare local
// records, so a missing `type` field must keep loading as `Local`.
impl<'de> Deserialize<'de> for Track {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("local")
            .to_string();

        match tag.as_str() {
            "youtube-stream" => serde_json::from_value(value)
                .map(Track::RemoteStream)
                .map_err(serde::de::Error::custom),
            "youtube-downloaded" => serde_json::from_value(value)
                .map(Track::RemoteDownloaded)
                .map_err(serde::de::Error::custom),
            _ => serde_json::from_value(value)
                .map(Track::Local)
                .map_err(serde::de::Error::custom),
        }
    }
}

impl Track {
    /// The deduplication key: file path for local tracks, video id for
    /// remote ones.
    pub fn identity(&self) -> &str {
        match self {
            Track::Local(t) => &t.path,
            Track::RemoteStream(t) | Track::RemoteDownloaded(t) => &t.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Track::Local(t) => &t.title,
            Track::RemoteStream(t) | Track::RemoteDownloaded(t) => &t.title,
        }
    }

    pub fn duration(&self) -> f64 {
        match self {
            Track::Local(t) => t.duration,
            Track::RemoteStream(t) | Track::RemoteDownloaded(t) => t.duration,
        }
    }
}

impl From<LocalTrack> for Track {
    fn from(t: LocalTrack) -> Self {
        Track::Local(t)
    }
}

/// Keeps only the candidates whose identity is not already present in
/// `existing`. Used on library import and on add-to-playlist.
pub fn filter_new_tracks(existing: &[Track], candidates: Vec<Track>) -> Vec<Track> {
    let known: HashSet<&str> = existing.iter().map(Track::identity).collect();
    candidates
        .into_iter()
        .filter(|t| !known.contains(t.identity()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(path: &str) -> Track {
        Track::Local(LocalTrack {
            path: path.to_string(),
            title: "Title".to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            duration: 180.0,
            year: None,
            genre: None,
            cover: None,
        })
    }

    fn remote(id: &str, downloaded: bool) -> Track {
        let track = RemoteTrack {
            id: id.to_string(),
            title: "Video".to_string(),
            channel: "Channel".to_string(),
            duration: 212.0,
            thumbnail: String::new(),
            url: format!("https://www.youtube.com/watch?v={}", id),
            is_downloaded: downloaded,
            local_path: None,
        };
        if downloaded {
            Track::RemoteDownloaded(track)
        } else {
            Track::RemoteStream(track)
        }
    }

    #[test]
    fn identity_is_path_for_local_and_id_for_remote() {
        assert_eq!(local("/music/a.mp3").identity(), "/music/a.mp3");
        assert_eq!(remote("v1", false).identity(), "v1");
        assert_eq!(remote("v1", true).identity(), "v1");
    }

    #[test]
    fn filter_new_tracks_drops_known_identities() {
        let existing = vec![local("/a.mp3"), remote("v1", true)];
        let fresh = filter_new_tracks(
            &existing,
            vec![local("/a.mp3"), local("/b.mp3"), remote("v1", false), remote("v2", false)],
        );

        let ids: Vec<&str> = fresh.iter().map(Track::identity).collect();
        assert_eq!(ids, vec!["/b.mp3", "v2"]);
    }

    #[test]
    fn untagged_record_deserializes_as_local() {
        let json = r#"{
            "path": "/music/old.mp3",
            "title": "Old",
            "artist": "Someone",
            "album": "Tape",
            "duration": 95.5
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert!(matches!(track, Track::Local(_)));
        assert_eq!(track.identity(), "/music/old.mp3");
    }

    #[test]
    fn remote_track_round_trips_with_camel_case_fields() {
        let track = Track::RemoteDownloaded(RemoteTrack {
            id: "v1".to_string(),
            title: "Video".to_string(),
            channel: "Channel".to_string(),
            duration: 212.0,
            thumbnail: "https://i.ytimg.com/vi/v1/default.jpg".to_string(),
            url: "https://www.youtube.com/watch?v=v1".to_string(),
            is_downloaded: true,
            local_path: Some("/dl/v1.mp3".to_string()),
        });

        let json = serde_json::to_string(&track).unwrap();
        assert!(json.contains("\"type\":\"youtube-downloaded\""));
        assert!(json.contains("\"isDownloaded\":true"));
        assert!(json.contains("\"localPath\":\"/dl/v1.mp3\""));

        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back, track);
    }
}
