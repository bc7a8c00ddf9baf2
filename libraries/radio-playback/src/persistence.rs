//! Persistence adapter
//!
//! Typed access to the two persisted slots (track index, playback offset).
//! Reads never fail: missing or corrupt values mean "no prior state". Writes
//! are fire-and-forget.

use crate::recovery;
use radio_core::{KeyValueStore, PersistedSnapshot, RadioError, Result, StorageKeys};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Snapshot reader/writer over a key-value store
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
    keys: StorageKeys,
}

impl Persistence {
    /// Create an adapter using the given slot names
    pub fn new(store: Box<dyn KeyValueStore>, keys: StorageKeys) -> Self {
        Self { store, keys }
    }

    /// Read the last snapshot, or `None` if there is no usable prior state
    pub fn read_snapshot(&self) -> Option<PersistedSnapshot> {
        let index = self.read_slot(&self.keys.index);
        let offset = self.read_slot(&self.keys.offset);

        match PersistedSnapshot::parse(index.as_deref(), offset.as_deref()) {
            Ok(Some(snapshot)) => {
                debug!(
                    index = snapshot.last_index,
                    offset = snapshot.last_offset_secs,
                    "restored snapshot"
                );
                Some(snapshot)
            }
            Ok(None) => {
                debug!("no persisted snapshot");
                None
            }
            Err(e) => {
                recovery::report(&e);
                None
            }
        }
    }

    /// Overwrite the stored snapshot
    ///
    /// Failures are logged and otherwise ignored.
    pub fn write_snapshot(&mut self, snapshot: &PersistedSnapshot) {
        let (index, offset) = snapshot.encode();
        trace!(%index, %offset, "persisting snapshot");

        if let Err(e) = self
            .store
            .set_item(&self.keys.index, &index)
            .and_then(|()| self.store.set_item(&self.keys.offset, &offset))
        {
            recovery::report(&e);
        }
    }

    /// Forget the stored snapshot
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove_item(&self.keys.index)?;
        self.store.remove_item(&self.keys.offset)
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                recovery::report(&e);
                None
            }
        }
    }
}

/// In-memory store
///
/// Used where no durable store exists (tests, storage-less browsers).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
