/// Playlist domain type
use crate::error::{RadioError, Result};
use crate::types::{RawEntry, Track};
use std::sync::Arc;

/// Ordered, non-empty collection of tracks for one session
///
/// Built once and never mutated afterwards. Cloning is cheap: the tracks are
/// shared, which lets a cached playlist be handed out repeatedly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    tracks: Arc<[Track]>,
}

impl Playlist {
    /// Create a playlist, rejecting an empty track list
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        if tracks.is_empty() {
            return Err(RadioError::EmptyPlaylist);
        }
        Ok(Self {
            tracks: tracks.into(),
        })
    }

    /// Normalize raw feed entries into a playlist
    ///
    /// Unusable entries are skipped and returned alongside the playlist so the
    /// caller can report them.
    pub fn from_entries(
        entries: &[RawEntry],
        strip_numeric_prefix: bool,
    ) -> (Result<Self>, Vec<RadioError>) {
        let mut tracks = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            match Track::from_entry(entry, strip_numeric_prefix) {
                Ok(track) => tracks.push(track),
                Err(e) => skipped.push(e),
            }
        }

        (Self::new(tracks), skipped)
    }

    /// Number of tracks (always at least one)
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`, if in bounds
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Whether `index` addresses a track
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.tracks.len()
    }

    /// All tracks in order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Iterate over tracks in order
    pub fn iter(&self) -> std::slice::Iter<'_, Track> {
        self.tracks.iter()
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Track;
    type IntoIter = std::slice::Iter<'a, Track>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
