//! Playlist source adapter
//!
//! Fetches the track listing at most once per page session, normalizes it and
//! falls back to the configured local tracks when the feed is unreachable or
//! empty.

use crate::recovery;
use radio_core::{Playlist, PlaylistSettings, RadioError, Result, TrackFeed};
use std::cell::{Cell, OnceCell};
use tracing::{info, warn};

/// Caching playlist loader over a track feed
pub struct PlaylistLoader<F: TrackFeed> {
    feed: F,
    settings: PlaylistSettings,
    cache: OnceCell<Playlist>,
    fetches: Cell<u32>,
}

impl<F: TrackFeed> PlaylistLoader<F> {
    pub fn new(feed: F, settings: PlaylistSettings) -> Self {
        Self {
            feed,
            settings,
            cache: OnceCell::new(),
            fetches: Cell::new(0),
        }
    }

    /// Return the playlist, fetching it on first use
    ///
    /// Never fails while the fallback list is non-empty. If two calls race,
    /// the first result to arrive is kept and the later one is discarded.
    pub async fn fetch_playlist(&self) -> Result<Playlist> {
        if let Some(playlist) = self.cache.get() {
            return Ok(playlist.clone());
        }

        self.fetches.set(self.fetches.get() + 1);
        let playlist = self.resolve().await?;

        if self.cache.set(playlist.clone()).is_err() {
            warn!("discarding late playlist response");
        }
        // The cell is filled at this point, by us or by whoever won the race
        Ok(self.cache.get().cloned().unwrap_or(playlist))
    }

    /// Whether a playlist has already been resolved
    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Number of feed requests issued so far
    pub fn fetch_count(&self) -> u32 {
        self.fetches.get()
    }

    /// The wrapped feed
    pub fn feed(&self) -> &F {
        &self.feed
    }

    async fn resolve(&self) -> Result<Playlist> {
        match self.feed.fetch_entries().await {
            Ok(entries) => {
                let (playlist, skipped) =
                    Playlist::from_entries(&entries, self.settings.strip_numeric_prefix);
                for err in &skipped {
                    recovery::report(err);
                }
                match playlist {
                    Ok(playlist) => {
                        info!(tracks = playlist.len(), skipped = skipped.len(), "playlist loaded");
                        return Ok(playlist);
                    }
                    Err(_) => warn!(entries = entries.len(), "feed returned no usable tracks"),
                }
            }
            Err(e) => recovery::report(&e),
        }

        self.fallback()
    }

    fn fallback(&self) -> Result<Playlist> {
        let playlist = Playlist::new(self.settings.fallback_tracks.clone())
            .map_err(|_| RadioError::EmptyPlaylist)?;
        info!(tracks = playlist.len(), "using fallback playlist");
        Ok(playlist)
    }
}
