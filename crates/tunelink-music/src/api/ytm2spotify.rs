use reqwest::Client;
use serde::Deserialize;
use tunelink_core::{ConversionRequest, SearchResultItem, TunelinkError, TunelinkResult};
use url::Url;

#[derive(Debug, Clone)]
pub struct Ytm2SpotifyClient {
    client: Client,
    endpoint: Url,
}

impl Ytm2SpotifyClient {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn convert(&self, request: &ConversionRequest) -> TunelinkResult<ConvertResponse> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("url", request.source_url.as_str()),
                ("to_service", request.target.as_str()),
            ])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| TunelinkError::Transport(format!("ytm2spotify request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TunelinkError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<ConvertResponse>()
            .await
            .map_err(|err| TunelinkError::Parse(format!("ytm2spotify response parse failed: {err}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct ConvertResponse {
    #[serde(default)]
    pub results: Option<Vec<SearchResultItem>>,
    #[serde(default)]
    pub manual_search_link: String,
}

#[cfg(test)]
mod tests {
    use super::ConvertResponse;

    #[test]
    fn results_may_be_absent_or_null() {
        let absent: ConvertResponse =
            serde_json::from_str(r#"{"manual_search_link":"https://x"}"#).unwrap();
        assert!(absent.results.is_none());
        assert_eq!(absent.manual_search_link, "https://x");

        let null: ConvertResponse =
            serde_json::from_str(r#"{"results":null,"manual_search_link":"https://y"}"#).unwrap();
        assert!(null.results.is_none());
    }

    #[test]
    fn parses_full_entry() {
        let response: ConvertResponse = serde_json::from_value(serde_json::json!({
            "results": [{
                "url": "https://open.spotify.com/track/1",
                "uri": "spotify:track:1",
                "art_url": "https://i.scdn.co/image/1",
                "description1": "Song",
                "description2": "Song",
                "description3": "Artist",
                "description4": "Album"
            }],
            "manual_search_link": "https://open.spotify.com/search/Song"
        }))
        .unwrap();
        let results = response.results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].description4.as_deref(), Some("Album"));
    }
}
