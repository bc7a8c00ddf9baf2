//! Session events
//!
//! Event-based communication for UI synchronization. The session queues
//! events as it changes state; the platform layer drains them after each call
//! and forwards them (to JS callbacks in the browser build, to the log in the
//! CLI).

use crate::types::{InteractionKind, SessionState};
use serde::Serialize;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SessionEvent {
    /// Session state changed
    StateChanged {
        /// The new state
        state: SessionState,
    },

    /// A different track was loaded
    #[serde(rename_all = "camelCase")]
    TrackChanged {
        /// Playlist index of the new track
        index: usize,
        /// Index of the track it replaced, if any
        previous_index: Option<usize>,
        /// Display name of the new track
        display_name: String,
    },

    /// The environment refused to start playback
    PlayRejected,

    /// Interaction listeners were registered
    AutoplayGateArmed,

    /// A user interaction lifted autoplay gating
    AutoplayResumed {
        /// Interaction that won
        via: InteractionKind,
    },

    /// The current track's media failed to load
    TrackFailed {
        /// Index of the failing track
        index: usize,
        /// Reason reported by the output
        reason: String,
    },

    /// A snapshot was written to the store
    #[serde(rename_all = "camelCase")]
    SnapshotPersisted {
        /// Persisted track index
        index: usize,
        /// Persisted offset in seconds
        offset_secs: f64,
    },
}
