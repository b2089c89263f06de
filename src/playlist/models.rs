use serde::{Deserialize, Serialize};

use crate::models::Track;

/// An ordered, user-curated track sequence. Field names stay camelCase on
/// disk to keep older `playlists.json` documents loadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub tracks: Vec<Track>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, bumped on every effective mutation.
    pub updated_at: i64,
}

impl Playlist {
    pub fn contains(&self, identity: &str) -> bool {
        self.tracks.iter().any(|t| t.identity() == identity)
    }
}
