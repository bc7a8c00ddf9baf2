/// Player configuration
///
/// All structs deserialize with per-field defaults so a partial file (or an
/// empty JS object) yields a working configuration.
use crate::error::{RadioError, Result};
use crate::types::Track;
use serde::{Deserialize, Serialize};

/// Default release feed listing the station's tracks
pub const DEFAULT_FEED_URL: &str =
    "https://api.github.com/repos/claviiisorg/radio-musicas/releases/tags/musicas";

/// Longest accepted persistence interval (one hour)
pub const MAX_PERSIST_INTERVAL_MS: u32 = 3_600_000;

/// Complete player configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RadioConfig {
    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub playlist: PlaylistSettings,

    #[serde(default)]
    pub feed: FeedSettings,

    #[serde(default)]
    pub navigation: NavigationSettings,
}

/// Playback session behavior
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Start muted when autoplay may be refused, unmute on first interaction
    #[serde(default = "default_true")]
    pub enable_muted_autoplay_fallback: bool,

    /// Wire play/previous/next controls (otherwise they are decorative)
    #[serde(default = "default_true")]
    pub enable_manual_controls: bool,

    /// Interval between position snapshots, in milliseconds
    #[serde(default = "default_persist_interval_ms")]
    pub persist_interval_ms: u32,

    /// Drift between live and last known position tolerated after a content swap
    #[serde(default = "default_drift_tolerance_secs")]
    pub drift_tolerance_secs: f64,

    /// Number of played tracks remembered for "previous"
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Element id of the track name label
    #[serde(default = "default_label_element_id")]
    pub label_element_id: String,

    /// Persistence slots
    #[serde(default)]
    pub storage_keys: StorageKeys,
}

/// Keys of the two persisted slots
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageKeys {
    #[serde(default = "default_index_key")]
    pub index: String,

    #[serde(default = "default_offset_key")]
    pub offset: String,
}

/// Playlist normalization and fallback
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaylistSettings {
    /// Drop leading ordering prefixes like `03-` from display names
    #[serde(default = "default_true")]
    pub strip_numeric_prefix: bool,

    /// Tracks played when the feed is unreachable or empty
    #[serde(default = "default_fallback_tracks")]
    pub fallback_tracks: Vec<Track>,
}

/// Remote feed location
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedSettings {
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// Request timeout; only honored on native targets
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

/// In-page navigation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavigationSettings {
    /// Element id of the region whose content is swapped
    #[serde(default = "default_region_id")]
    pub region_id: String,

    /// Image shown in place of one that failed to load
    #[serde(default = "default_image_placeholder_url")]
    pub image_placeholder_url: String,

    /// Alt text given to images that have none
    #[serde(default = "default_image_alt")]
    pub image_alt: String,
}

impl RadioConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.session.persist_interval_ms == 0
            || self.session.persist_interval_ms > MAX_PERSIST_INTERVAL_MS
        {
            return Err(RadioError::Config(format!(
                "session.persist_interval_ms must be between 1 and {MAX_PERSIST_INTERVAL_MS}"
            )));
        }

        if !self.session.drift_tolerance_secs.is_finite() || self.session.drift_tolerance_secs < 0.0
        {
            return Err(RadioError::Config(
                "session.drift_tolerance_secs must be a non-negative number".into(),
            ));
        }

        if self.session.storage_keys.index == self.session.storage_keys.offset {
            return Err(RadioError::Config(
                "session.storage_keys.index and .offset must differ".into(),
            ));
        }

        match url::Url::parse(&self.feed.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(RadioError::Config(format!(
                    "feed.url must use http or https, got {}",
                    url.scheme()
                )))
            }
            Err(e) => return Err(RadioError::Config(format!("feed.url is invalid: {e}"))),
        }

        if self.navigation.region_id.trim().is_empty() {
            return Err(RadioError::Config(
                "navigation.region_id must not be empty".into(),
            ));
        }

        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            enable_muted_autoplay_fallback: true,
            enable_manual_controls: true,
            persist_interval_ms: default_persist_interval_ms(),
            drift_tolerance_secs: default_drift_tolerance_secs(),
            history_size: default_history_size(),
            label_element_id: default_label_element_id(),
            storage_keys: StorageKeys::default(),
        }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            index: default_index_key(),
            offset: default_offset_key(),
        }
    }
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            strip_numeric_prefix: true,
            fallback_tracks: default_fallback_tracks(),
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            request_timeout_secs: None,
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            region_id: default_region_id(),
            image_placeholder_url: default_image_placeholder_url(),
            image_alt: default_image_alt(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_persist_interval_ms() -> u32 {
    1000
}

fn default_drift_tolerance_secs() -> f64 {
    2.0
}

fn default_history_size() -> usize {
    50
}

fn default_label_element_id() -> String {
    "trackName".to_string()
}

fn default_index_key() -> String {
    "currentSong".to_string()
}

fn default_offset_key() -> String {
    "currentTime".to_string()
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_region_id() -> String {
    "app-main".to_string()
}

fn default_image_placeholder_url() -> String {
    "https://via.placeholder.com/600x350?text=Image+unavailable".to_string()
}

fn default_image_alt() -> String {
    "Image".to_string()
}

fn default_fallback_tracks() -> Vec<Track> {
    vec![
        Track::new("audio/fallback-1.mp3", "Radio 24h - Station ID"),
        Track::new("audio/fallback-2.mp3", "Radio 24h - Night Loop"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RadioConfig::default();
        assert!(config.session.enable_muted_autoplay_fallback);
        assert!(config.session.enable_manual_controls);
        assert_eq!(config.session.persist_interval_ms, 1000);
        assert_eq!(config.session.storage_keys.index, "currentSong");
        assert_eq!(config.session.storage_keys.offset, "currentTime");
        assert_eq!(config.playlist.fallback_tracks.len(), 2);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.navigation.region_id, "app-main");
        assert_eq!(config.navigation.image_alt, "Image");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: RadioConfig = serde_json::from_str(
            r#"{ "session": { "enable_manual_controls": false }, "feed": { "url": "http://localhost:9000/feed" } }"#,
        )
        .unwrap();

        assert!(!config.session.enable_manual_controls);
        assert!(config.session.enable_muted_autoplay_fallback);
        assert_eq!(config.session.history_size, 50);
        assert_eq!(config.feed.url, "http://localhost:9000/feed");
        assert!(config.playlist.strip_numeric_prefix);
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = RadioConfig::default();
        config.session.persist_interval_ms = 0;
        assert!(matches!(config.validate(), Err(RadioError::Config(_))));
    }

    #[test]
    fn interval_beyond_an_hour_rejected() {
        let mut config = RadioConfig::default();
        config.session.persist_interval_ms = MAX_PERSIST_INTERVAL_MS;
        assert!(config.validate().is_ok());

        config.session.persist_interval_ms = u32::MAX;
        assert!(matches!(config.validate(), Err(RadioError::Config(_))));
    }

    #[test]
    fn blank_region_rejected() {
        let mut config = RadioConfig::default();
        config.navigation.region_id = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_tolerance_rejected() {
        let mut config = RadioConfig::default();
        config.session.drift_tolerance_secs = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_http_feed_rejected() {
        let mut config = RadioConfig::default();
        config.feed.url = "ftp://example.com/feed".into();
        assert!(config.validate().is_err());

        config.feed.url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn identical_storage_keys_rejected() {
        let mut config = RadioConfig::default();
        config.session.storage_keys.offset = "currentSong".into();
        assert!(config.validate().is_err());
    }
}
