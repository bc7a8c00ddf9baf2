/// Configuration loading
use radio_core::{RadioConfig, RadioError, Result};
use std::path::{Path, PathBuf};

/// Default configuration file, read from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "radio.toml";

/// Load configuration from file and environment
///
/// An explicit `path` must exist; otherwise `radio.toml` is used when present.
/// `RADIO_`-prefixed variables override file values, with `__` between
/// levels (`RADIO_SESSION__PERSIST_INTERVAL_MS=500`).
pub fn load_config(path: Option<&Path>) -> Result<RadioConfig> {
    load_with_env(path, None)
}

/// Like [`load_config`], reading overrides from `env` instead of the process
/// environment when given
pub fn load_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<RadioConfig> {
    let mut settings = config::Config::builder();

    // Load from config file
    settings = match path {
        Some(path) => settings.add_source(config::File::from(path.to_path_buf())),
        None => settings.add_source(
            config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        ),
    };

    // Override with environment variables (prefixed with RADIO_)
    settings = settings.add_source(
        config::Environment::with_prefix("RADIO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    let config: RadioConfig = settings
        .build()
        .and_then(config::Config::try_deserialize)
        .map_err(|e| RadioError::Config(e.to_string()))?;

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with_env(None, env(&[])).unwrap();
        assert_eq!(config.session.persist_interval_ms, 1000);
        assert_eq!(config.session.storage_keys.index, "currentSong");
        assert!(config.session.enable_muted_autoplay_fallback);
    }

    #[test]
    fn test_file_values() {
        let file = toml_file(
            r#"
            [session]
            enable_manual_controls = false
            drift_tolerance_secs = 5.0

            [playlist]
            strip_numeric_prefix = false
            fallback_tracks = [
                { url = "audio/house.mp3", display_name = "House Loop" },
            ]

            [feed]
            url = "https://feeds.example/releases/latest"
            request_timeout_secs = 10
            "#,
        );

        let config = load_with_env(Some(file.path()), env(&[])).unwrap();
        assert!(!config.session.enable_manual_controls);
        assert_eq!(config.session.drift_tolerance_secs, 5.0);
        assert_eq!(config.session.persist_interval_ms, 1000);
        assert!(!config.playlist.strip_numeric_prefix);
        assert_eq!(config.playlist.fallback_tracks.len(), 1);
        assert_eq!(
            config.playlist.fallback_tracks[0].display_name(),
            "House Loop"
        );
        assert_eq!(config.feed.request_timeout_secs, Some(10));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = toml_file("[session]\npersist_interval_ms = 2000\n");
        let config = load_with_env(
            Some(file.path()),
            env(&[("RADIO_SESSION__PERSIST_INTERVAL_MS", "500")]),
        )
        .unwrap();
        assert_eq!(config.session.persist_interval_ms, 500);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = toml_file("[session]\npersist_interval_ms = 0\n");
        let err = load_with_env(Some(file.path()), env(&[])).unwrap_err();
        assert!(matches!(err, RadioError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = load_with_env(Some(Path::new("/nonexistent/radio.toml")), env(&[])).unwrap_err();
        assert!(matches!(err, RadioError::Config(_)));
    }
}
