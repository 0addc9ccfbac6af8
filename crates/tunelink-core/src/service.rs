use std::fmt;

use serde::{Deserialize, Serialize};

/// A streaming service the conversion API can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetService {
    Spotify,
    YoutubeMusic,
}

impl TargetService {
    pub const ALL: [TargetService; 2] = [TargetService::Spotify, TargetService::YoutubeMusic];

    /// Identifier sent as the `to_service` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::YoutubeMusic => "youtube_music",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Spotify => "Spotify",
            Self::YoutubeMusic => "YouTube Music",
        }
    }

    pub fn normalize(input: &str) -> Option<Self> {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "spotify" => Some(Self::Spotify),
            "youtubemusic" | "youtube-music" | "youtube_music" | "ytmusic" | "yt-music"
            | "ytm" => Some(Self::YoutubeMusic),
            _ => None,
        }
    }
}

impl fmt::Display for TargetService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source_url: String,
    pub target: TargetService,
}

impl ConversionRequest {
    pub fn new(source_url: impl Into<String>, target: TargetService) -> Self {
        Self {
            source_url: source_url.into(),
            target,
        }
    }
}
