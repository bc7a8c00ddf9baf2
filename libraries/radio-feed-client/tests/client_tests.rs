//! Tests for the release feed client.
//!
//! These tests use mock servers to verify client behavior without
//! touching the real feed.

use radio_core::{FeedSettings, RadioError, RawEntry, TrackFeed};
use radio_feed_client::{FeedClientError, ReleaseFeedClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(url: impl Into<String>) -> FeedSettings {
    FeedSettings {
        url: url.into(),
        request_timeout_secs: Some(5),
    }
}

async fn client_for(server: &MockServer) -> ReleaseFeedClient {
    ReleaseFeedClient::new(&settings(format!("{}/releases/latest", server.uri()))).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_default_feed_is_valid() {
        assert!(ReleaseFeedClient::new(&FeedSettings::default()).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match ReleaseFeedClient::new(&settings("")) {
            Err(FeedClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match ReleaseFeedClient::new(&settings("api.github.com/repos/x/y/releases")) {
            Err(FeedClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            _ => panic!("Expected InvalidUrl error"),
        }
    }

    #[test]
    fn test_ftp_scheme_rejected() {
        assert!(matches!(
            ReleaseFeedClient::new(&settings("ftp://example.com/feed")),
            Err(FeedClientError::InvalidUrl(_))
        ));
    }
}

// =============================================================================
// Fetch Tests
// =============================================================================

mod fetch {
    use super::*;

    #[tokio::test]
    async fn test_fetch_entries_maps_assets() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tag_name": "2024-06",
                "assets": [
                    {
                        "name": "01-Morning_Show.mp3",
                        "browser_download_url": "https://cdn.example/01-Morning_Show.mp3",
                        "size": 123
                    },
                    {
                        "name": "02-Night_Drive.mp3",
                        "browser_download_url": "https://cdn.example/02-Night_Drive.mp3"
                    }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let entries = client.fetch_entries().await.unwrap();

        assert_eq!(
            entries,
            vec![
                RawEntry::new("https://cdn.example/01-Morning_Show.mp3", "01-Morning_Show.mp3"),
                RawEntry::new("https://cdn.example/02-Night_Drive.mp3", "02-Night_Drive.mp3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_release_without_assets_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tag_name": "empty" })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(client.fetch_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(403).set_body_string("rate limit exceeded"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        match client.fetch_release().await {
            Err(FeedClientError::ServerError { status, message }) => {
                assert_eq!(status, 403);
                assert!(message.contains("rate limit"));
            }
            other => panic!("Expected ServerError, got {:?}", other.map(|r| r.tag_name)),
        }
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/releases/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(matches!(
            client.fetch_release().await,
            Err(FeedClientError::ParseError(_))
        ));
    }
}

// =============================================================================
// TrackFeed Seam Tests
// =============================================================================

mod track_feed {
    use super::*;

    #[tokio::test]
    async fn test_errors_become_feed_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = TrackFeed::fetch_entries(&client).await.unwrap_err();

        assert!(matches!(err, RadioError::Feed(ref msg) if msg.contains("500")));
        assert_eq!(err.kind(), radio_core::ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_network_error() {
        // Nothing listens on the discard port
        let client = ReleaseFeedClient::new(&settings("http://127.0.0.1:9/feed")).unwrap();
        let err = TrackFeed::fetch_entries(&client).await.unwrap_err();
        assert_eq!(err.kind(), radio_core::ErrorKind::Network);
    }
}
