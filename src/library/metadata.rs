use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use lofty::picture::MimeType;
use lofty::prelude::*;
use lofty::probe::Probe;

use crate::models::LocalTrack;

/// Reads a file's tags into a library record. A probe failure is the
/// caller's cue to skip the file; missing individual tags fall back to the
/// file name / placeholder values.
pub fn read_local_track(path_str: &str) -> Option<LocalTrack> {
    let path = Path::new(path_str);

    let tagged_file = match Probe::open(path).and_then(|p| p.read()) {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Could not read tags from {}: {}", path_str, e);
            return None;
        }
    };

    let tag = tagged_file.primary_tag();

    let title = tag
        .as_ref()
        .and_then(|t| t.title().map(|c| c.into_owned()))
        .unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Unknown Title")
                .to_string()
        });
    let artist = tag
        .as_ref()
        .and_then(|t| t.artist().map(|c| c.into_owned()))
        .unwrap_or_else(|| "Unknown Artist".to_string());
    let album = tag
        .as_ref()
        .and_then(|t| t.album().map(|c| c.into_owned()))
        .unwrap_or_else(|| "Unknown Album".to_string());
    let year = tag.as_ref().and_then(|t| t.year());
    let genre = tag.as_ref().and_then(|t| t.genre().map(|c| c.into_owned()));

    let duration = tagged_file.properties().duration().as_secs_f64();

    let mut cover = None;
    if let Some(t) = tag {
        if let Some(picture) = t.pictures().first() {
            let b64 = general_purpose::STANDARD.encode(picture.data());
            let mime = picture.mime_type();
            let mime_type = mime.unwrap_or(&MimeType::Jpeg);
            let mime_str = match mime_type {
                MimeType::Png => "image/png",
                MimeType::Jpeg => "image/jpeg",
                MimeType::Tiff => "image/tiff",
                MimeType::Bmp => "image/bmp",
                MimeType::Gif => "image/gif",
                _ => "application/octet-stream",
            };
            cover = Some(format!("data:{};base64,{}", mime_str, b64));
        }
    }

    Some(LocalTrack {
        path: path_str.to_string(),
        title,
        artist,
        album,
        duration,
        year,
        genre,
        cover,
    })
}
