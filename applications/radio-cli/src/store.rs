/// JSON file key-value store
///
/// Stands in for browser localStorage so snapshots survive between CLI runs.
use radio_core::{KeyValueStore, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value pairs kept in a single JSON object on disk, written through on
/// every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store, starting empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened state file");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored pairs
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radio_core::{PersistedSnapshot, StorageKeys};
    use radio_playback::Persistence;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.entries().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/state.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_item("currentSong", "2").unwrap();
        store.set_item("currentTime", "61").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("currentSong").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get_item("currentTime").unwrap().as_deref(), Some("61"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(JsonFileStore::open(&path).is_err());
    }

    #[test]
    fn test_backs_persistence_adapter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let mut persistence = Persistence::new(
            Box::new(JsonFileStore::open(&path).unwrap()),
            StorageKeys::default(),
        );
        persistence.write_snapshot(&PersistedSnapshot::new(1, 42.4));

        let persistence = Persistence::new(
            Box::new(JsonFileStore::open(&path).unwrap()),
            StorageKeys::default(),
        );
        assert_eq!(
            persistence.read_snapshot(),
            Some(PersistedSnapshot::new(1, 42.0))
        );
    }
}
