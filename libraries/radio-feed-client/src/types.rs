//! Release feed document types.

use radio_core::RawEntry;
use serde::Deserialize;
use serde_json::Value;

/// A release as published by the feed.
///
/// Only the asset list matters to the player. Assets are kept as loose JSON so
/// that one odd entry cannot fail the whole document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    /// Release tag, if any
    #[serde(default)]
    pub tag_name: Option<String>,

    /// Attached files
    #[serde(default)]
    pub assets: Vec<Value>,
}

impl Release {
    /// Map assets to raw playlist entries
    ///
    /// Assets that are not objects are skipped. Missing fields are left empty
    /// for the playlist normalizer to judge.
    pub fn entries(&self) -> Vec<RawEntry> {
        self.assets.iter().filter_map(asset_entry).collect()
    }
}

fn asset_entry(asset: &Value) -> Option<RawEntry> {
    let object = asset.as_object()?;
    let field = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    Some(RawEntry {
        url: field("browser_download_url"),
        name: field("name"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_assets_to_entries() {
        let release: Release = serde_json::from_value(json!({
            "tag_name": "v3",
            "assets": [
                { "name": "01-Intro.mp3", "browser_download_url": "https://cdn.example/01-Intro.mp3" },
                { "name": "02-Loop.mp3" },
                "garbage",
                { "name": 7, "browser_download_url": "https://cdn.example/x.mp3" }
            ]
        }))
        .unwrap();

        let entries = release.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            RawEntry::new("https://cdn.example/01-Intro.mp3", "01-Intro.mp3")
        );
        assert_eq!(entries[1].url, None);
        assert_eq!(entries[2].name, None);
    }

    #[test]
    fn missing_assets_is_empty() {
        let release: Release = serde_json::from_str("{}").unwrap();
        assert!(release.entries().is_empty());
    }
}
