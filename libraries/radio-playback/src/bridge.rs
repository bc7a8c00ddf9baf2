//! Session continuity bridge
//!
//! Called by the navigation layer after the page content region has been
//! replaced. The audio output lives outside that region and is never touched
//! here beyond a drift check; only the label binding is refreshed.

use crate::session::PlaybackSession;
use crate::types::Reconciliation;
use radio_core::LabelLocator;
use serde::Serialize;
use tracing::debug;

/// What a content swap changed
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapReport {
    /// Whether the new content had a track label
    pub label_rebound: bool,

    /// Result of the drift check
    pub reconciliation: Reconciliation,
}

/// Rebinds the session to freshly swapped content
pub struct ContinuityBridge<L: LabelLocator> {
    locator: L,
    drift_tolerance_secs: f64,
}

impl<L: LabelLocator> ContinuityBridge<L> {
    pub fn new(locator: L, drift_tolerance_secs: f64) -> Self {
        Self {
            locator,
            drift_tolerance_secs,
        }
    }

    /// Rebind the label and check position drift
    pub fn after_content_swap(&self, session: &mut PlaybackSession) -> SwapReport {
        let label = self.locator.locate();
        let label_rebound = label.is_some();
        session.rebind_display(label);

        let reconciliation = session.reconcile_position(self.drift_tolerance_secs);
        debug!(label_rebound, ?reconciliation, "content swapped");

        SwapReport {
            label_rebound,
            reconciliation,
        }
    }

    pub fn drift_tolerance_secs(&self) -> f64 {
        self.drift_tolerance_secs
    }
}
