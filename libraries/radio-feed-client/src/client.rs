//! Release feed client.

use crate::error::{FeedClientError, Result};
use crate::types::Release;
use async_trait::async_trait;
use radio_core::{FeedSettings, RawEntry, TrackFeed};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Client for the GitHub-style releases endpoint listing the station's tracks.
///
/// # Example
///
/// ```ignore
/// use radio_feed_client::ReleaseFeedClient;
/// use radio_core::FeedSettings;
///
/// let client = ReleaseFeedClient::new(&FeedSettings::default())?;
/// let release = client.fetch_release().await?;
/// println!("{} assets", release.assets.len());
/// ```
pub struct ReleaseFeedClient {
    http: Client,
    url: Url,
}

impl ReleaseFeedClient {
    /// Create a client for the configured feed.
    pub fn new(settings: &FeedSettings) -> Result<Self> {
        let raw = settings.url.trim();
        if raw.is_empty() {
            return Err(FeedClientError::InvalidUrl("URL cannot be empty".into()));
        }
        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(FeedClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let url = Url::parse(raw).map_err(|e| FeedClientError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http: build_http(settings)?,
            url,
        })
    }

    /// The feed location.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Fetch and parse the release document.
    pub async fn fetch_release(&self) -> Result<Release> {
        debug!(url = %self.url, "fetching release feed");

        let response = self
            .http
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FeedClientError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let release: Release = serde_json::from_str(&body)
            .map_err(|e| FeedClientError::ParseError(format!("Failed to parse release: {}", e)))?;

        info!(
            tag = release.tag_name.as_deref().unwrap_or("-"),
            assets = release.assets.len(),
            "release feed fetched"
        );

        Ok(release)
    }

    /// Fetch the raw track entries.
    pub async fn fetch_entries(&self) -> Result<Vec<RawEntry>> {
        Ok(self.fetch_release().await?.entries())
    }
}

#[async_trait(?Send)]
impl TrackFeed for ReleaseFeedClient {
    async fn fetch_entries(&self) -> radio_core::Result<Vec<RawEntry>> {
        Ok(ReleaseFeedClient::fetch_entries(self).await?)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(settings: &FeedSettings) -> Result<Client> {
    let mut builder = Client::builder().user_agent(format!(
        "Radio24h/{} (CLI)",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = settings.request_timeout_secs {
        builder = builder.timeout(std::time::Duration::from_secs(secs));
    }
    builder.build().map_err(FeedClientError::Request)
}

// The browser's fetch sets its own user agent and has no timeout
#[cfg(target_arch = "wasm32")]
fn build_http(_settings: &FeedSettings) -> Result<Client> {
    Client::builder().build().map_err(FeedClientError::Request)
}
