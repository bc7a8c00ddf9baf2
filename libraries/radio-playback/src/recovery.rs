//! Logging of recovered errors
//!
//! Nothing in the session is fatal. Each recovered error is reported here
//! once, at the level its kind calls for, and then dropped.

use radio_core::{ErrorKind, RadioError};
use tracing::{debug, error, warn};

/// Log a recovered error once
pub fn report(err: &RadioError) {
    let kind = err.kind();
    match kind {
        // Expected under browser autoplay policy
        ErrorKind::PlaybackRejected => debug!(?kind, error = %err, "playback refused, waiting for interaction"),
        ErrorKind::Network => warn!(?kind, error = %err, "fetch failed, using fallback"),
        ErrorKind::InvalidPersistedState => warn!(?kind, error = %err, "discarding persisted state"),
        ErrorKind::MalformedEntry => warn!(?kind, error = %err, "skipping playlist entry"),
        ErrorKind::LoadFailed => warn!(?kind, error = %err, "track failed to load"),
        ErrorKind::InvalidOperation => warn!(?kind, error = %err, "ignoring request"),
        ErrorKind::Other => error!(?kind, error = %err, "recovered from error"),
    }
}
