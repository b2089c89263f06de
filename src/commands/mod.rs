pub mod library;
pub mod playback;
pub mod playlist;
pub mod youtube;
