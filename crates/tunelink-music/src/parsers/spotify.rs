use regex::Regex;

const SPOTIFY_LINK: &str = r"https?://open\.spotify\.com/(track|album|artist)/.+";

pub fn is_spotify_link(input: &str) -> bool {
    spotify_link_kind(input).is_some()
}

/// Returns the resource kind (`track`, `album` or `artist`) of a Spotify link.
pub fn spotify_link_kind(input: &str) -> Option<String> {
    let regex = Regex::new(SPOTIFY_LINK).ok()?;
    let captures = regex.captures(input)?;
    captures.get(1).map(|m| m.as_str().to_string())
}
