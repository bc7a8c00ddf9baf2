//! Simulated playback session
//!
//! Drives a real `PlaybackSession` against an audio output that only keeps a
//! virtual clock. Useful for checking restore, shuffle and autoplay behavior
//! without a browser.

use radio_core::{
    AudioOutput, InteractionHooks, KeyValueStore, Playlist, Result, SessionSettings,
};
use radio_playback::{InteractionKind, Persistence, PlaybackSession, SessionEvent, SessionState};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Knobs for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub ticks: u32,
    pub seconds_per_tick: f64,
    pub track_secs: f64,
    /// Refuse playback until the first interaction
    pub reject_autoplay: bool,
    /// Tick at which a click happens
    pub interact_at: Option<u32>,
    pub seed: Option<u64>,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            ticks: 30,
            seconds_per_tick: 1.0,
            track_secs: 180.0,
            reject_autoplay: false,
            interact_at: None,
            seed: None,
        }
    }
}

/// Where a run ended up
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub final_state: SessionState,
    pub current_index: Option<usize>,
    pub current_track: Option<String>,
    pub offset_secs: f64,
    pub muted: bool,
    pub tracks_started: u32,
    pub events: Vec<SessionEvent>,
}

#[derive(Debug, Default)]
struct Clock {
    source: Option<String>,
    position: f64,
    playing: bool,
    muted: bool,
    play_pending: bool,
}

struct SimulatedOutput(Rc<RefCell<Clock>>);

impl AudioOutput for SimulatedOutput {
    fn set_source(&mut self, url: &str) -> Result<()> {
        let mut clock = self.0.borrow_mut();
        clock.source = Some(url.to_string());
        clock.position = 0.0;
        clock.playing = false;
        Ok(())
    }

    fn seek(&mut self, offset_secs: f64) -> Result<()> {
        self.0.borrow_mut().position = offset_secs;
        Ok(())
    }

    fn request_play(&mut self) {
        self.0.borrow_mut().play_pending = true;
    }

    fn pause(&mut self) -> Result<()> {
        self.0.borrow_mut().playing = false;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.0.borrow_mut().muted = muted;
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }
}

struct LoggedHooks;

impl InteractionHooks for LoggedHooks {
    fn attach(&mut self) {
        debug!("waiting for interaction");
    }

    fn detach(&mut self) {
        debug!("stopped waiting for interaction");
    }
}

/// A session wired to a virtual clock
pub struct Simulator {
    session: PlaybackSession,
    clock: Rc<RefCell<Clock>>,
    options: SimulationOptions,
    unlocked: bool,
    tracks_started: u32,
    events: Vec<SessionEvent>,
}

impl Simulator {
    pub fn new(
        settings: SessionSettings,
        store: Box<dyn KeyValueStore>,
        options: SimulationOptions,
    ) -> Self {
        let clock = Rc::new(RefCell::new(Clock::default()));
        let persistence = Persistence::new(store, settings.storage_keys.clone());

        let mut session = PlaybackSession::new(
            settings,
            Box::new(SimulatedOutput(clock.clone())),
            persistence,
            Box::new(LoggedHooks),
        );
        if let Some(seed) = options.seed {
            session = session.with_seed(seed);
        }

        Self {
            session,
            clock,
            options,
            unlocked: false,
            tracks_started: 0,
            events: Vec::new(),
        }
    }

    /// Start on `playlist`, run every tick, then close the session
    pub fn run(mut self, playlist: Playlist) -> Result<SimulationReport> {
        self.session.begin_loading()?;
        self.session.start(playlist)?;
        self.settle();

        for tick in 1..=self.options.ticks {
            if self.options.interact_at == Some(tick) {
                info!(tick, "simulated click");
                self.unlocked = true;
                self.session.handle_user_interaction(InteractionKind::Click);
                self.settle();
            }

            self.advance()?;
            self.session.tick();
            self.collect();
        }

        let report = SimulationReport {
            final_state: self.session.state(),
            current_index: self.session.current_index(),
            current_track: self
                .session
                .current_track()
                .map(|t| t.display_name().to_string()),
            offset_secs: self.session.offset_secs(),
            muted: self.session.is_muted(),
            tracks_started: self.tracks_started,
            events: Vec::new(),
        };

        self.session.close();
        self.collect();

        Ok(SimulationReport {
            events: self.events,
            ..report
        })
    }

    /// Resolve outstanding play requests the way the environment would
    fn settle(&mut self) {
        while std::mem::take(&mut self.clock.borrow_mut().play_pending) {
            if self.options.reject_autoplay && !self.unlocked {
                self.session.handle_play_rejected("NotAllowedError");
            } else {
                self.clock.borrow_mut().playing = true;
                self.session.handle_play_started();
            }
        }
        self.collect();
    }

    fn advance(&mut self) -> Result<()> {
        let ended = {
            let mut clock = self.clock.borrow_mut();
            if clock.playing {
                clock.position += self.options.seconds_per_tick;
                if clock.position >= self.options.track_secs {
                    clock.playing = false;
                    true
                } else {
                    false
                }
            } else {
                false
            }
        };

        if ended {
            self.session.handle_track_ended()?;
            self.settle();
        }
        Ok(())
    }

    fn collect(&mut self) {
        for event in self.session.drain_events() {
            match &event {
                SessionEvent::TrackChanged {
                    index,
                    display_name,
                    ..
                } => {
                    self.tracks_started += 1;
                    info!(index, name = %display_name, "now playing");
                }
                other => debug!(event = ?other, "session event"),
            }
            self.events.push(event);
        }
    }
}
