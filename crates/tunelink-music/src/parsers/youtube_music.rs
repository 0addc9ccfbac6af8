use regex::Regex;

const YOUTUBE_MUSIC_LINK: &str =
    r"https?://music\.youtube\.com/(watch\?v=|playlist\?list=|channel/).+";

pub fn is_youtube_music_link(input: &str) -> bool {
    Regex::new(YOUTUBE_MUSIC_LINK)
        .map(|regex| regex.is_match(input))
        .unwrap_or(false)
}
