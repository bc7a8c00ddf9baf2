//! Playback session - core orchestration
//!
//! Owns the single audio output for the lifetime of the page, selects and
//! loads tracks, persists the position, and coordinates autoplay recovery.
//!
//! The session is platform-agnostic. The platform layer feeds it outcomes
//! (`handle_play_started`, `handle_play_rejected`, `handle_track_ended`,
//! `handle_load_failed`, `handle_user_interaction`) and calls `tick()` on a
//! timer, then drains the queued [`SessionEvent`]s.

use crate::{
    autoplay::AutoplayGate,
    events::SessionEvent,
    history::History,
    persistence::Persistence,
    recovery,
    shuffle::{pick_random_index, pick_random_index_excluding},
    types::{InteractionKind, Reconciliation, SessionState, NO_TRACKS_LABEL},
};
use radio_core::{
    is_valid_offset, AudioOutput, DisplayLabel, InteractionHooks, PersistedSnapshot, Playlist,
    RadioError, Result, SessionSettings, Track,
};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, error, info, trace, warn};

/// The persistent playback session
pub struct PlaybackSession {
    settings: SessionSettings,

    // State
    state: SessionState,
    playlist: Option<Playlist>,
    current_index: Option<usize>,
    offset_secs: f64,
    muted: bool,

    // Offset the current track was loaded at, and whether the output has
    // confirmed playback since. Until it has, positions below the load offset
    // are a seek the environment has not applied yet.
    load_offset: f64,
    playback_confirmed: bool,

    // Collaborators
    output: Box<dyn AudioOutput>,
    label: Option<Box<dyn DisplayLabel>>,
    persistence: Persistence,
    gate: AutoplayGate,

    history: History,
    rng: StdRng,

    // Tracks that failed to load since the last successful start
    failed: HashSet<usize>,

    // Event queue for UI synchronization
    pending_events: Vec<SessionEvent>,
}

impl PlaybackSession {
    /// Create an idle session
    pub fn new(
        settings: SessionSettings,
        output: Box<dyn AudioOutput>,
        persistence: Persistence,
        hooks: Box<dyn InteractionHooks>,
    ) -> Self {
        let history = History::new(settings.history_size);
        Self {
            settings,
            state: SessionState::Idle,
            playlist: None,
            current_index: None,
            offset_secs: 0.0,
            muted: false,
            load_offset: 0.0,
            playback_confirmed: false,
            output,
            label: None,
            persistence,
            gate: AutoplayGate::new(hooks),
            history,
            rng: StdRng::from_entropy(),
            failed: HashSet::new(),
            pending_events: Vec::new(),
        }
    }

    /// Attach the initial track label
    pub fn with_label(mut self, label: Box<dyn DisplayLabel>) -> Self {
        self.label = Some(label);
        self
    }

    /// Use a deterministic random source
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Lifecycle =====

    /// Mark the playlist fetch as started
    ///
    /// Valid exactly once, from `Idle`.
    pub fn begin_loading(&mut self) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(RadioError::invalid_transition("begin_loading", self.state));
        }
        self.set_state(SessionState::Loading);
        Ok(())
    }

    /// Seed the session with the resolved playlist
    ///
    /// Restores the persisted track and offset when the stored index is within
    /// bounds, otherwise picks a random track at offset zero.
    pub fn start(&mut self, playlist: Playlist) -> Result<()> {
        if self.state != SessionState::Loading {
            return Err(RadioError::invalid_transition("start", self.state));
        }

        info!(tracks = playlist.len(), "starting session");
        let len = playlist.len();
        self.playlist = Some(playlist);

        if self.settings.enable_muted_autoplay_fallback {
            // Muted playback is usually allowed without a gesture; the first
            // interaction unmutes
            self.muted = true;
            self.output.set_muted(true);
            self.arm_gate();
        }

        match self.persistence.read_snapshot() {
            Some(snapshot) => match snapshot.index_within(len) {
                Some(index) => self.load_track(index, snapshot.last_offset_secs),
                None => {
                    recovery::report(&RadioError::InvalidSnapshot(format!(
                        "index {} outside playlist of {len}",
                        snapshot.last_index
                    )));
                    self.advance_random()
                }
            },
            None => self.advance_random(),
        }
    }

    /// Record that neither the feed nor the fallback produced a track
    pub fn playlist_unavailable(&mut self) -> Result<()> {
        if !matches!(self.state, SessionState::Idle | SessionState::Loading) {
            return Err(RadioError::invalid_transition("playlist_unavailable", self.state));
        }
        error!("no tracks available");
        self.set_state(SessionState::NoTracks);
        self.refresh_display();
        Ok(())
    }

    /// Write the live position without ending the session
    ///
    /// Used when the page is hidden but may be restored from the
    /// back/forward cache.
    pub fn flush(&mut self) {
        if self.state == SessionState::Closed || self.current_index.is_none() {
            return;
        }
        let position = self.output.position();
        if self.position_is_trustworthy(position) {
            self.offset_secs = position;
        }
        self.persist();
    }

    /// Final persistence before the page goes away
    ///
    /// Terminal: every later call is ignored or rejected.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.flush();
        self.gate.disarm();
        self.set_state(SessionState::Closed);
        debug!("session closed");
    }

    // ===== Track selection =====

    /// Load a track and attempt playback
    ///
    /// Out-of-range indices are logged and leave the session untouched.
    pub fn load_track(&mut self, index: usize, start_offset_secs: f64) -> Result<()> {
        self.load_track_inner(index, start_offset_secs, true)
    }

    /// Load a random track at offset zero, never the current one unless the
    /// playlist has a single entry
    pub fn advance_random(&mut self) -> Result<()> {
        let len = self.playlist_len()?;
        let index = pick_random_index(len, self.current_index, &mut self.rng)
            .ok_or(RadioError::EmptyPlaylist)?;
        self.load_track(index, 0.0)
    }

    /// Advance to the next index, wrapping
    pub fn next(&mut self) -> Result<()> {
        if !self.manual_controls("next") {
            return Ok(());
        }
        let (len, current) = self.selection("next")?;
        self.load_track((current + 1) % len, 0.0)
    }

    /// Return to the previously played track
    ///
    /// Uses the play history, skipping tracks that failed to load since the
    /// last successful start; with no usable history, steps back one index.
    pub fn previous(&mut self) -> Result<()> {
        if !self.manual_controls("previous") {
            return Ok(());
        }
        let (len, current) = self.selection("previous")?;

        let target = std::iter::from_fn(|| self.history.pop())
            .find(|&index| index < len && index != current && !self.failed.contains(&index))
            .unwrap_or((current + len - 1) % len);

        self.load_track_inner(target, 0.0, false)
    }

    fn load_track_inner(
        &mut self,
        index: usize,
        start_offset_secs: f64,
        record_history: bool,
    ) -> Result<()> {
        if !(self.state.is_ready() || self.state == SessionState::Loading) {
            return Err(RadioError::invalid_transition("load_track", self.state));
        }

        let Some(track) = self.playlist.as_ref().and_then(|p| p.get(index)).cloned() else {
            let err = RadioError::IndexOutOfBounds {
                index,
                len: self.playlist.as_ref().map_or(0, Playlist::len),
            };
            recovery::report(&err);
            return Err(err);
        };

        let previous_index = self.current_index;
        if record_history {
            if let Some(previous) = previous_index.filter(|&p| p != index) {
                self.history.push(previous);
            }
        }

        let offset = if is_valid_offset(start_offset_secs) {
            start_offset_secs
        } else {
            0.0
        };

        info!(index, offset, url = track.url(), name = track.display_name(), "loading track");

        self.current_index = Some(index);
        self.offset_secs = offset;
        self.load_offset = offset;
        self.playback_confirmed = false;

        self.refresh_display();
        self.persist();
        self.pending_events.push(SessionEvent::TrackChanged {
            index,
            previous_index,
            display_name: track.display_name().to_string(),
        });

        if let Err(e) = self.output.set_source(track.url()) {
            self.handle_load_failed(&e.to_string());
            return Ok(());
        }

        if offset > 0.0 {
            if let Err(e) = self.output.seek(offset) {
                // Some environments apply the seek only once enough has buffered
                debug!(offset, error = %e, "seek deferred");
            }
        }

        self.request_playback();
        Ok(())
    }

    // ===== Output outcomes =====

    /// The output confirmed that playback started
    pub fn handle_play_started(&mut self) {
        if !matches!(
            self.state,
            SessionState::Playing | SessionState::Blocked | SessionState::LoadFailed
        ) {
            trace!(state = %self.state, "ignoring late play confirmation");
            return;
        }

        self.playback_confirmed = true;
        self.failed.clear();
        self.set_state(SessionState::Playing);

        if !self.muted && self.gate.disarm() {
            debug!("playback resumed without interaction");
        }
    }

    /// The environment refused to start playback
    pub fn handle_play_rejected(&mut self, reason: &str) {
        if !matches!(self.state, SessionState::Playing | SessionState::Blocked) {
            trace!(state = %self.state, "ignoring late play rejection");
            return;
        }

        recovery::report(&RadioError::PlaybackRejected(reason.to_string()));
        self.set_state(SessionState::Blocked);
        self.arm_gate();
        self.pending_events.push(SessionEvent::PlayRejected);
    }

    /// The current track played to its end
    pub fn handle_track_ended(&mut self) -> Result<()> {
        if !self.state.is_ready() {
            return Err(RadioError::invalid_transition("track_ended", self.state));
        }
        debug!(index = ?self.current_index, "track ended");
        self.advance_random()
    }

    /// The current track's media could not be loaded
    ///
    /// Moves to another random track that has not failed yet. Once every
    /// track has failed without a successful start, stays in `LoadFailed`.
    pub fn handle_load_failed(&mut self, reason: &str) {
        if !self.state.is_ready() && self.state != SessionState::Loading {
            trace!(state = %self.state, "ignoring load failure");
            return;
        }
        let Some(index) = self.current_index else {
            return;
        };

        recovery::report(&RadioError::LoadFailed(format!("track {index}: {reason}")));
        self.failed.insert(index);
        self.pending_events.push(SessionEvent::TrackFailed {
            index,
            reason: reason.to_string(),
        });
        self.set_state(SessionState::LoadFailed);

        let len = self.playlist.as_ref().map_or(0, Playlist::len);
        match pick_random_index_excluding(len, &self.failed, &mut self.rng) {
            Some(next) => {
                // A broken track stays out of the play history; errors were
                // reported where they happened
                let _ = self.load_track_inner(next, 0.0, false);
            }
            None => error!(tracks = len, "every track failed to load"),
        }
    }

    // ===== Autoplay recovery =====

    /// A qualifying user interaction happened
    ///
    /// Returns `true` if it consumed the autoplay gate. Only the first
    /// interaction of a gating episode does anything.
    pub fn handle_user_interaction(&mut self, kind: InteractionKind) -> bool {
        if self.state == SessionState::Closed || !self.gate.trigger(kind) {
            return false;
        }

        info!(?kind, "user interaction, resuming audio");
        self.pending_events.push(SessionEvent::AutoplayResumed { via: kind });

        if self.muted {
            self.set_muted(false);
        }
        if self.state == SessionState::Blocked {
            self.request_playback();
        }
        true
    }

    /// Whether interaction listeners are registered
    pub fn autoplay_gate_armed(&self) -> bool {
        self.gate.is_armed()
    }

    // ===== Manual controls =====

    /// Play/pause button
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if !self.manual_controls("toggle_play_pause") {
            return Ok(());
        }
        match self.state {
            SessionState::Playing => self.pause(),
            SessionState::Paused => self.resume(),
            SessionState::Blocked => {
                // The button press is itself a gesture
                if !self.handle_user_interaction(InteractionKind::Click) {
                    self.request_playback();
                }
                Ok(())
            }
            state => Err(RadioError::invalid_transition("toggle_play_pause", state)),
        }
    }

    /// Pause playback
    pub fn pause(&mut self) -> Result<()> {
        match self.state {
            SessionState::Playing => {
                self.output.pause()?;
                self.set_state(SessionState::Paused);
                Ok(())
            }
            SessionState::Paused => Ok(()),
            state => Err(RadioError::invalid_transition("pause", state)),
        }
    }

    /// Resume after a pause
    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            SessionState::Paused => {
                self.request_playback();
                Ok(())
            }
            SessionState::Playing => Ok(()),
            state => Err(RadioError::invalid_transition("resume", state)),
        }
    }

    /// Mute or unmute the output
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.output.set_muted(muted);
    }

    // ===== Persistence =====

    /// Periodic persistence
    ///
    /// Writes the live position if it is usable. Returns whether a snapshot
    /// was written.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_ready() || self.current_index.is_none() {
            return false;
        }

        let position = self.output.position();
        if !self.position_is_trustworthy(position) {
            trace!(position, "skipping tick");
            return false;
        }

        self.offset_secs = position;
        self.persist();
        true
    }

    fn position_is_trustworthy(&self, position: f64) -> bool {
        is_valid_offset(position) && (self.playback_confirmed || position >= self.load_offset)
    }

    fn persist(&mut self) {
        let Some(index) = self.current_index else {
            return;
        };
        let snapshot = PersistedSnapshot::new(index, self.offset_secs);
        self.persistence.write_snapshot(&snapshot);
        self.pending_events.push(SessionEvent::SnapshotPersisted {
            index,
            offset_secs: snapshot.last_offset_secs,
        });
    }

    // ===== Display =====

    /// Point the session at a new label element
    ///
    /// Playback state is untouched; the label is refreshed with the current
    /// track name.
    pub fn rebind_display(&mut self, label: Option<Box<dyn DisplayLabel>>) {
        self.label = label;
        self.refresh_display();
    }

    /// Write the current track name (or the no-tracks notice) to the label
    pub fn refresh_display(&mut self) {
        let text = match self.state {
            SessionState::NoTracks => Some(NO_TRACKS_LABEL.to_string()),
            _ => self.current_track().map(|t| t.display_name().to_string()),
        };
        if let (Some(label), Some(text)) = (self.label.as_mut(), text) {
            label.set_text(&text);
        }
    }

    /// Compare the live position with the last known offset
    ///
    /// Within `tolerance_secs` nothing happens. Beyond it, a live position from
    /// confirmed playback is adopted; before confirmation, a position short of
    /// the known offset means the restore seek was lost and it is reissued.
    pub fn reconcile_position(&mut self, tolerance_secs: f64) -> Reconciliation {
        let Some(index) = self.current_index else {
            return Reconciliation::NoTrack;
        };

        let position = self.output.position();
        if !is_valid_offset(position) {
            return Reconciliation::PositionUnavailable;
        }

        let drift = position - self.offset_secs;
        if drift.abs() <= tolerance_secs {
            return Reconciliation::InSync { drift_secs: drift };
        }

        if !self.playback_confirmed && position < self.offset_secs {
            let offset = self.offset_secs;
            if let Err(e) = self.output.seek(offset) {
                debug!(offset, error = %e, "seek deferred");
            }
            debug!(index, offset, drift, "reissued restore seek");
            return Reconciliation::Resynced { offset_secs: offset };
        }

        debug!(index, position, drift, "adopting live position");
        self.offset_secs = position;
        self.persist();
        Reconciliation::Adopted {
            offset_secs: position,
        }
    }

    // ===== Queries =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist
            .as_ref()
            .zip(self.current_index)
            .and_then(|(playlist, index)| playlist.get(index))
    }

    /// Last known offset into the current track, in seconds
    pub fn offset_secs(&self) -> f64 {
        self.offset_secs
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    /// Previously played indices, oldest first
    pub fn history(&self) -> Vec<usize> {
        self.history.get_all()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Get and clear pending events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn request_playback(&mut self) {
        self.output.request_play();
        // Optimistic until the output reports otherwise
        self.set_state(SessionState::Playing);
    }

    fn arm_gate(&mut self) {
        if self.gate.arm() {
            self.pending_events.push(SessionEvent::AutoplayGateArmed);
        }
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "state change");
            self.state = state;
            self.pending_events.push(SessionEvent::StateChanged { state });
        }
    }

    fn manual_controls(&self, action: &str) -> bool {
        if !self.settings.enable_manual_controls {
            debug!(action, "manual controls disabled");
        }
        self.settings.enable_manual_controls
    }

    fn selection(&self, action: &str) -> Result<(usize, usize)> {
        if !self.state.is_ready() {
            return Err(RadioError::invalid_transition(action.to_string(), self.state));
        }
        let len = self.playlist_len()?;
        let current = self.current_index.unwrap_or(0);
        Ok((len, current))
    }

    fn playlist_len(&self) -> Result<usize> {
        match &self.playlist {
            Some(playlist) => Ok(playlist.len()),
            None => {
                warn!("no playlist loaded");
                Err(RadioError::EmptyPlaylist)
            }
        }
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("state", &self.state)
            .field("current_index", &self.current_index)
            .field("offset_secs", &self.offset_secs)
            .field("muted", &self.muted)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
