use serde::{Deserialize, Serialize};

/// One candidate returned by the conversion API.
///
/// Only `description1` is guaranteed; the remaining description lines are
/// routinely absent and are modelled as plain `Option`s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub url: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub art_url: String,
    pub description1: String,
    #[serde(default)]
    pub description2: Option<String>,
    #[serde(default)]
    pub description3: Option<String>,
    #[serde(default)]
    pub description4: Option<String>,
}

impl SearchResultItem {
    /// Description lines shown to users: the first, third and fourth.
    /// `description2` is never displayed.
    pub fn display_parts(&self) -> Vec<&str> {
        [
            Some(self.description1.as_str()),
            self.description3.as_deref(),
            self.description4.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect()
    }

    pub fn display_text(&self) -> String {
        self.display_parts().join(" · ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Match {
        top: SearchResultItem,
        alternates: Vec<SearchResultItem>,
    },
    NoMatch {
        manual_search_link: String,
    },
    Failure {
        message: String,
    },
}

impl ConversionResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{ConversionResult, SearchResultItem};

    fn item(value: serde_json::Value) -> SearchResultItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn display_text_skips_second_description() {
        let item = item(serde_json::json!({
            "url": "https://music.youtube.com/watch?v=abc",
            "description1": "Song",
            "description2": "Song (duplicate)",
            "description3": "Artist",
            "description4": "Album"
        }));
        assert_eq!(item.display_text(), "Song · Artist · Album");
    }

    #[test]
    fn display_text_drops_missing_and_empty_parts() {
        let item = item(serde_json::json!({
            "url": "https://open.spotify.com/track/1",
            "uri": "spotify:track:1",
            "art_url": "https://i.scdn.co/image/1",
            "description1": "Song",
            "description3": "",
            "description4": null
        }));
        assert_eq!(item.display_parts(), vec!["Song"]);
        assert_eq!(item.uri, "spotify:track:1");
    }

    #[test]
    fn missing_uri_and_art_default_to_empty() {
        let item = item(serde_json::json!({
            "url": "https://x",
            "description1": "Only"
        }));
        assert!(item.uri.is_empty());
        assert!(item.art_url.is_empty());
        assert_eq!(item.description2, None);
    }

    #[test]
    fn only_failures_are_failures() {
        let failure = ConversionResult::Failure {
            message: "boom".to_string(),
        };
        assert!(failure.is_failure());

        let no_match = ConversionResult::NoMatch {
            manual_search_link: "https://x".to_string(),
        };
        assert!(!no_match.is_failure());
    }
}
