/// Core error types for Radio 24h
use thiserror::Error;

/// Result type alias using `RadioError`
pub type Result<T> = std::result::Result<T, RadioError>;

/// Core error type for Radio 24h
#[derive(Error, Debug)]
pub enum RadioError {
    /// The playlist has no tracks
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// Track index outside the playlist
    #[error("Track index {index} out of bounds (playlist has {len} tracks)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Operation not allowed in the current session state
    #[error("Invalid transition: cannot {action} while {state}")]
    InvalidTransition { action: String, state: String },

    /// Playlist feed could not be read
    #[error("Feed error: {0}")]
    Feed(String),

    /// A raw feed entry could not be turned into a track
    #[error("Malformed playlist entry: {0}")]
    MalformedEntry(String),

    /// Persisted state was missing fields or unparseable
    #[error("Invalid persisted state: {0}")]
    InvalidSnapshot(String),

    /// Key-value store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The environment refused to start playback
    #[error("Playback rejected: {0}")]
    PlaybackRejected(String),

    /// The audio output could not load the current track
    #[error("Track failed to load: {0}")]
    LoadFailed(String),

    /// Audio output errors other than rejection
    #[error("Playback error: {0}")]
    Playback(String),

    /// Content swap errors
    #[error("Navigation error: {0}")]
    Navigation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Recovery category for an error
///
/// No error is fatal to a session. Each kind maps to one recovery path and one
/// log level, so recovered errors are reported once and then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Playlist or page fetch failed; recovered with fallback data
    Network,
    /// Environment policy refused playback; recovered by the autoplay gate
    PlaybackRejected,
    /// Out-of-range index or non-numeric offset; discarded
    InvalidPersistedState,
    /// A single feed entry was unusable; skipped
    MalformedEntry,
    /// A track's media could not be loaded; another track is picked
    LoadFailed,
    /// Caller asked for something the current state does not allow
    InvalidOperation,
    /// Anything else (storage, I/O, configuration)
    Other,
}

impl RadioError {
    /// Create a feed error
    pub fn feed(msg: impl Into<String>) -> Self {
        Self::Feed(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a navigation error
    pub fn navigation(msg: impl Into<String>) -> Self {
        Self::Navigation(msg.into())
    }

    /// Create an invalid transition error
    pub fn invalid_transition(action: impl Into<String>, state: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            state: state.to_string(),
        }
    }

    /// Recovery category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Feed(_) | Self::Navigation(_) => ErrorKind::Network,
            Self::PlaybackRejected(_) => ErrorKind::PlaybackRejected,
            Self::InvalidSnapshot(_) => ErrorKind::InvalidPersistedState,
            Self::MalformedEntry(_) => ErrorKind::MalformedEntry,
            Self::LoadFailed(_) => ErrorKind::LoadFailed,
            Self::EmptyPlaylist | Self::IndexOutOfBounds { .. } | Self::InvalidTransition { .. } => {
                ErrorKind::InvalidOperation
            }
            Self::Storage(_)
            | Self::Playback(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorKind::Other,
        }
    }
}
