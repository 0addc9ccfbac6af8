pub mod spotify;
pub mod youtube_music;

pub use spotify::{is_spotify_link, spotify_link_kind};
pub use youtube_music::is_youtube_music_link;
