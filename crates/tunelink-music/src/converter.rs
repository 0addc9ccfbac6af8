use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};
use tunelink_core::{
    ConversionRequest, ConversionResult, TargetService, TunelinkError, TunelinkResult,
};
use url::Url;

use crate::api::ytm2spotify::{ConvertResponse, Ytm2SpotifyClient};

const USER_AGENT: &str = concat!("tunelink/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct LinkConverter {
    client: Ytm2SpotifyClient,
}

impl LinkConverter {
    /// Builds a converter calling `endpoint`. Without a `timeout` the
    /// transport's defaults apply.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> TunelinkResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|err| {
            TunelinkError::Config(format!("invalid conversion endpoint '{endpoint}': {err}"))
        })?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TunelinkError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            client: Ytm2SpotifyClient::new(client, endpoint),
        })
    }

    /// Converts a link that has already passed its direction's shape check.
    /// Never retries; every failure is folded into [`ConversionResult::Failure`].
    pub async fn convert(&self, url: &str, target: TargetService) -> ConversionResult {
        let request = ConversionRequest::new(url, target);
        debug!(url = %request.source_url, target = %target, "converting link");

        match self.client.convert(&request).await {
            Ok(response) => Self::result_from_response(response),
            Err(err) => {
                error!(
                    url = %request.source_url,
                    target = %target,
                    error = %err,
                    "conversion failed"
                );
                ConversionResult::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    /// Keeps the API's ranking: the first entry is the match.
    pub fn result_from_response(response: ConvertResponse) -> ConversionResult {
        let mut results = response.results.unwrap_or_default().into_iter();
        match results.next() {
            Some(top) => ConversionResult::Match {
                top,
                alternates: results.collect(),
            },
            None => ConversionResult::NoMatch {
                manual_search_link: response.manual_search_link,
            },
        }
    }

    pub fn endpoint(&self) -> &Url {
        self.client.endpoint()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tunelink_core::{ConversionResult, TargetService};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::LinkConverter;

    fn converter_for(server: &MockServer) -> LinkConverter {
        LinkConverter::new(&format!("{}/convert", server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn sends_url_and_target_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/convert"))
            .and(query_param("url", "https://open.spotify.com/track/xyz"))
            .and(query_param("to_service", "youtube_music"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"results": [], "manual_search_link": "https://x"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let converter = converter_for(&server);
        converter
            .convert("https://open.spotify.com/track/xyz", TargetService::YoutubeMusic)
            .await;

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.query(),
            Some("url=https%3A%2F%2Fopen.spotify.com%2Ftrack%2Fxyz&to_service=youtube_music")
        );
    }

    #[tokio::test]
    async fn first_result_is_the_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/convert"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"url": "https://open.spotify.com/track/first", "uri": "spotify:track:first",
                     "art_url": "https://i/1", "description1": "First"},
                    {"url": "https://open.spotify.com/track/second", "uri": "spotify:track:second",
                     "art_url": "https://i/2", "description1": "Second"},
                    {"url": "https://open.spotify.com/track/third", "uri": "spotify:track:third",
                     "art_url": "https://i/3", "description1": "Third"}
                ],
                "manual_search_link": "https://open.spotify.com/search/First"
            })))
            .mount(&server)
            .await;

        let result = converter_for(&server)
            .convert("https://music.youtube.com/watch?v=abc", TargetService::Spotify)
            .await;

        match result {
            ConversionResult::Match { top, alternates } => {
                assert_eq!(top.url, "https://open.spotify.com/track/first");
                let urls: Vec<_> = alternates.iter().map(|item| item.url.as_str()).collect();
                assert_eq!(
                    urls,
                    vec![
                        "https://open.spotify.com/track/second",
                        "https://open.spotify.com/track/third"
                    ]
                );
            }
            other => panic!("expected Match, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_results_fall_back_to_manual_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "manual_search_link": "https://music.youtube.com/search?q=Song%20Artist"
            })))
            .mount(&server)
            .await;

        let result = converter_for(&server)
            .convert("https://open.spotify.com/album/1", TargetService::YoutubeMusic)
            .await;

        assert_eq!(
            result,
            ConversionResult::NoMatch {
                manual_search_link: "https://music.youtube.com/search?q=Song%20Artist".to_string()
            }
        );
    }

    #[tokio::test]
    async fn absent_results_fall_back_to_manual_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"manual_search_link": "https://m"})),
            )
            .mount(&server)
            .await;

        let result = converter_for(&server)
            .convert("https://open.spotify.com/artist/1", TargetService::YoutubeMusic)
            .await;

        assert_eq!(
            result,
            ConversionResult::NoMatch {
                manual_search_link: "https://m".to_string()
            }
        );
    }

    #[tokio::test]
    async fn error_status_embeds_code_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad gateway upstream"))
            .expect(1)
            .mount(&server)
            .await;

        let result = converter_for(&server)
            .convert("https://open.spotify.com/track/xyz", TargetService::YoutubeMusic)
            .await;

        match result {
            ConversionResult::Failure { message } => {
                assert!(message.contains("502"), "{message}");
                assert!(message.contains("Bad gateway upstream"), "{message}");
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = converter_for(&server)
            .convert("https://open.spotify.com/track/xyz", TargetService::YoutubeMusic)
            .await;

        match result {
            ConversionResult::Failure { message } => assert!(message.contains("parse error")),
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_a_failure() {
        // Reserve a free port, then release it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let endpoint = format!("http://127.0.0.1:{port}/convert");

        let converter = LinkConverter::new(&endpoint, None).unwrap();
        let result = converter
            .convert("https://open.spotify.com/track/xyz", TargetService::YoutubeMusic)
            .await;

        match result {
            ConversionResult::Failure { message } => {
                assert!(message.contains("transport error"), "{message}")
            }
            other => panic!("expected Failure, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(LinkConverter::new("not a url", None).is_err());
    }
}
