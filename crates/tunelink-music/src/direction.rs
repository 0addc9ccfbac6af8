use tunelink_core::TargetService;

use crate::parsers::{is_spotify_link, is_youtube_music_link};

/// Which way a link is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    SpotifyToYoutubeMusic,
    YoutubeMusicToSpotify,
}

impl Direction {
    pub const ALL: [Direction; 2] = [
        Direction::SpotifyToYoutubeMusic,
        Direction::YoutubeMusicToSpotify,
    ];

    pub fn source(self) -> TargetService {
        match self {
            Self::SpotifyToYoutubeMusic => TargetService::Spotify,
            Self::YoutubeMusicToSpotify => TargetService::YoutubeMusic,
        }
    }

    pub fn target(self) -> TargetService {
        match self {
            Self::SpotifyToYoutubeMusic => TargetService::YoutubeMusic,
            Self::YoutubeMusicToSpotify => TargetService::Spotify,
        }
    }

    pub fn toward(target: TargetService) -> Self {
        match target {
            TargetService::YoutubeMusic => Self::SpotifyToYoutubeMusic,
            TargetService::Spotify => Self::YoutubeMusicToSpotify,
        }
    }

    /// Picks the direction whose source service the link belongs to.
    pub fn detect(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|direction| direction.accepts(url))
    }

    /// Trims raw user input and checks it against this direction's link
    /// shape, returning the rejection message on mismatch.
    pub fn accept(self, raw: &str) -> Result<String, &'static str> {
        let url = raw.trim();
        if self.accepts(url) {
            Ok(url.to_string())
        } else {
            Err(self.rejection_message())
        }
    }

    pub fn accepts(self, url: &str) -> bool {
        match self {
            Self::SpotifyToYoutubeMusic => is_spotify_link(url),
            Self::YoutubeMusicToSpotify => is_youtube_music_link(url),
        }
    }

    pub fn command_name(self) -> &'static str {
        match self {
            Self::SpotifyToYoutubeMusic => "spotify-to-yt-music",
            Self::YoutubeMusicToSpotify => "yt-music-to-spotify",
        }
    }

    pub fn from_command_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.command_name() == name)
    }

    pub fn command_description(self) -> &'static str {
        match self {
            Self::SpotifyToYoutubeMusic => "Convert a Spotify link to a YouTube Music link",
            Self::YoutubeMusicToSpotify => "Convert a YouTube Music link to a Spotify link",
        }
    }

    pub fn option_description(self) -> &'static str {
        match self {
            Self::SpotifyToYoutubeMusic => "The Spotify URL to convert (track, album, or artist)",
            Self::YoutubeMusicToSpotify => {
                "The YouTube Music URL to convert (song, playlist, or channel)"
            }
        }
    }

    pub fn rejection_message(self) -> &'static str {
        match self {
            Self::SpotifyToYoutubeMusic => {
                "❌ That doesn't look like a valid Spotify URL.\nExpected format: `https://open.spotify.com/track/...`, `https://open.spotify.com/album/...`, or `https://open.spotify.com/artist/...`"
            }
            Self::YoutubeMusicToSpotify => {
                "❌ That doesn't look like a valid YouTube Music URL.\nExpected format: `https://music.youtube.com/watch?v=...`, `https://music.youtube.com/playlist?list=...`, or `https://music.youtube.com/channel/...`"
            }
        }
    }
}
