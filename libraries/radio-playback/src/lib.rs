//! Radio 24h - Playback Session
//!
//! Platform-agnostic continuous playback for the Radio 24h player.
//!
//! This crate provides:
//! - Playlist loading with a one-shot cache and local fallback
//! - Snapshot persistence (track index and offset) that survives reloads
//! - The playback session state machine with shuffle-on-end
//! - Autoplay recovery through a one-shot interaction gate
//! - Continuity across page content swaps
//!
//! # Architecture
//!
//! The session owns the audio output and never looks anything up from ambient
//! scope. Everything it talks to is injected through the traits in
//! `radio-core`. The browser bindings live behind the `wasm` feature; tests and
//! the CLI provide in-memory implementations.
//!
//! # Example
//!
//! ```rust
//! use radio_playback::{MemoryStore, Persistence, PlaybackSession, SessionState};
//! use radio_core::{
//!     AudioOutput, InteractionHooks, Playlist, Result, SessionSettings, StorageKeys, Track,
//! };
//!
//! struct SilentOutput;
//!
//! impl AudioOutput for SilentOutput {
//!     fn set_source(&mut self, _url: &str) -> Result<()> { Ok(()) }
//!     fn seek(&mut self, _offset_secs: f64) -> Result<()> { Ok(()) }
//!     fn request_play(&mut self) {}
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn set_muted(&mut self, _muted: bool) {}
//!     fn position(&self) -> f64 { 0.0 }
//! }
//!
//! struct NoHooks;
//!
//! impl InteractionHooks for NoHooks {
//!     fn attach(&mut self) {}
//!     fn detach(&mut self) {}
//! }
//!
//! let persistence = Persistence::new(Box::new(MemoryStore::new()), StorageKeys::default());
//! let mut session = PlaybackSession::new(
//!     SessionSettings::default(),
//!     Box::new(SilentOutput),
//!     persistence,
//!     Box::new(NoHooks),
//! );
//!
//! let playlist = Playlist::new(vec![
//!     Track::new("audio/a.mp3", "A"),
//!     Track::new("audio/b.mp3", "B"),
//! ])?;
//!
//! session.begin_loading()?;
//! session.start(playlist)?;
//!
//! // The platform reports what the environment did with the play request
//! session.handle_play_rejected("NotAllowedError");
//! assert_eq!(session.state(), SessionState::Blocked);
//! # Ok::<(), radio_core::RadioError>(())
//! ```

pub mod autoplay;
pub mod bridge;
pub mod events;
mod history;
pub mod loader;
pub mod navigation;
pub mod persistence;
pub mod recovery;
pub mod session;
mod shuffle;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use autoplay::AutoplayGate;
pub use bridge::{ContinuityBridge, SwapReport};
pub use events::SessionEvent;
pub use loader::PlaylistLoader;
pub use persistence::{MemoryStore, Persistence};
pub use session::PlaybackSession;
pub use shuffle::{pick_random_index, pick_random_index_excluding};
pub use types::{InteractionKind, Reconciliation, SessionState, NO_TRACKS_LABEL};
