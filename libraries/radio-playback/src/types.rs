//! Core types for the playback session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session state
///
/// `Playing`, `Paused`, `Blocked` and `LoadFailed` are the "ready" states: a
/// playlist is loaded and a track is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// No playlist requested yet
    Idle,

    /// Playlist fetch in flight
    Loading,

    /// Playback requested and not refused
    Playing,

    /// Paused by the user
    Paused,

    /// The environment refused to start playback; waiting for interaction
    Blocked,

    /// The current track's media could not be loaded
    LoadFailed,

    /// Neither the feed nor the fallback provided any track
    NoTracks,

    /// Page is unloading; terminal
    Closed,
}

impl SessionState {
    /// Whether a playlist is loaded and a track selected
    pub fn is_ready(self) -> bool {
        matches!(
            self,
            Self::Playing | Self::Paused | Self::Blocked | Self::LoadFailed
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Blocked => "blocked",
            Self::LoadFailed => "load-failed",
            Self::NoTracks => "no-tracks",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// User interaction categories that lift autoplay gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionKind {
    Click,
    KeyPress,
    Touch,
}

impl InteractionKind {
    /// All categories, in registration order
    pub const ALL: [InteractionKind; 3] = [Self::Click, Self::KeyPress, Self::Touch];

    /// DOM event name listened for
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyPress => "keydown",
            Self::Touch => "touchstart",
        }
    }
}

/// Outcome of comparing the live audio position with the last known offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Reconciliation {
    /// No track selected; nothing to compare
    NoTrack,

    /// The output reported NaN or a negative position; left alone
    PositionUnavailable,

    /// Drift within tolerance; nothing done
    InSync { drift_secs: f64 },

    /// Audio ran ahead of the last snapshot; the live position was adopted
    Adopted { offset_secs: f64 },

    /// Audio fell behind the known offset; the output was sought back to it
    Resynced { offset_secs: f64 },
}

/// Text shown in the track label when no track is available
pub const NO_TRACKS_LABEL: &str = "No tracks available.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_states() {
        assert!(SessionState::Playing.is_ready());
        assert!(SessionState::Blocked.is_ready());
        assert!(SessionState::LoadFailed.is_ready());
        assert!(!SessionState::Loading.is_ready());
        assert!(!SessionState::NoTracks.is_ready());
        assert!(!SessionState::Closed.is_ready());
    }

    #[test]
    fn interaction_event_names() {
        let names: Vec<_> = InteractionKind::ALL.iter().map(|k| k.event_name()).collect();
        assert_eq!(names, vec!["click", "keydown", "touchstart"]);
    }
}
