//! Radio 24h Core
//!
//! Platform-agnostic types, traits, and error handling for the Radio 24h
//! continuous player.
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `RawEntry`, `PersistedSnapshot`
//! - **Platform Traits**: `AudioOutput`, `DisplayLabel`, `LabelLocator`,
//!   `KeyValueStore`, `InteractionHooks`, `TrackFeed`
//! - **Configuration**: `RadioConfig` and its sections
//! - **Error Handling**: `RadioError`, its recovery `ErrorKind`, and `Result`
//!
//! # Example
//!
//! ```rust
//! use radio_core::{Playlist, RawEntry};
//!
//! let entries = vec![
//!     RawEntry::new("https://cdn.example.com/01-Morning_Call.mp3", "01-Morning_Call.mp3"),
//!     RawEntry::default(), // skipped
//! ];
//!
//! let (playlist, skipped) = Playlist::from_entries(&entries, true);
//! let playlist = playlist.unwrap();
//! assert_eq!(playlist.get(0).unwrap().display_name(), "Morning Call");
//! assert_eq!(skipped.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod settings;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, RadioError, Result};
pub use settings::{
    FeedSettings, NavigationSettings, PlaylistSettings, RadioConfig, SessionSettings, StorageKeys,
    MAX_PERSIST_INTERVAL_MS,
};
pub use traits::{AudioOutput, DisplayLabel, InteractionHooks, KeyValueStore, LabelLocator, TrackFeed};
pub use types::{
    display_name_from_filename, is_valid_offset, PersistedSnapshot, Playlist, RawEntry, Track,
};
