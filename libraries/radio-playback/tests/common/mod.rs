//! Recording test doubles shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use radio_core::{
    AudioOutput, DisplayLabel, InteractionHooks, KeyValueStore, LabelLocator, Playlist,
    RadioError, RawEntry, Result, SessionSettings, StorageKeys, Track, TrackFeed,
};
use radio_playback::{Persistence, PlaybackSession, SessionEvent};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

// ===== Audio output =====

#[derive(Debug, Default)]
pub struct OutputState {
    pub sources: Vec<String>,
    pub seeks: Vec<f64>,
    pub play_requests: u32,
    pub pauses: u32,
    pub muted: bool,
    pub position: f64,
    pub broken_sources: HashSet<String>,
}

#[derive(Clone, Default)]
pub struct RecordingOutput(pub Rc<RefCell<OutputState>>);

impl RecordingOutput {
    pub fn set_position(&self, secs: f64) {
        self.0.borrow_mut().position = secs;
    }

    pub fn break_source(&self, url: &str) {
        self.0.borrow_mut().broken_sources.insert(url.to_string());
    }

    pub fn sources(&self) -> Vec<String> {
        self.0.borrow().sources.clone()
    }

    pub fn seeks(&self) -> Vec<f64> {
        self.0.borrow().seeks.clone()
    }

    pub fn play_requests(&self) -> u32 {
        self.0.borrow().play_requests
    }

    pub fn is_muted(&self) -> bool {
        self.0.borrow().muted
    }
}

impl AudioOutput for RecordingOutput {
    fn set_source(&mut self, url: &str) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.sources.push(url.to_string());
        state.position = 0.0;
        if state.broken_sources.contains(url) {
            return Err(RadioError::playback(format!("cannot load {url}")));
        }
        Ok(())
    }

    fn seek(&mut self, offset_secs: f64) -> Result<()> {
        self.0.borrow_mut().seeks.push(offset_secs);
        Ok(())
    }

    fn request_play(&mut self) {
        self.0.borrow_mut().play_requests += 1;
    }

    fn pause(&mut self) -> Result<()> {
        self.0.borrow_mut().pauses += 1;
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) {
        self.0.borrow_mut().muted = muted;
    }

    fn position(&self) -> f64 {
        self.0.borrow().position
    }
}

// ===== Label =====

#[derive(Clone, Default)]
pub struct RecordingLabel(pub Rc<RefCell<Vec<String>>>);

impl RecordingLabel {
    pub fn text(&self) -> Option<String> {
        self.0.borrow().last().cloned()
    }

    pub fn writes(&self) -> usize {
        self.0.borrow().len()
    }
}

impl DisplayLabel for RecordingLabel {
    fn set_text(&mut self, text: &str) {
        self.0.borrow_mut().push(text.to_string());
    }
}

/// Locator over a fixed (possibly missing) label
pub struct FixedLocator(pub Option<RecordingLabel>);

impl LabelLocator for FixedLocator {
    fn locate(&self) -> Option<Box<dyn DisplayLabel>> {
        self.0
            .clone()
            .map(|label| Box::new(label) as Box<dyn DisplayLabel>)
    }
}

// ===== Store =====

#[derive(Clone, Default)]
pub struct SharedStore(pub Rc<RefCell<HashMap<String, String>>>);

impl SharedStore {
    pub fn with_snapshot(index: &str, offset: &str) -> Self {
        let store = Self::default();
        {
            let mut map = store.0.borrow_mut();
            map.insert("currentSong".into(), index.into());
            map.insert("currentTime".into(), offset.into());
        }
        store
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.0.borrow().get(key).cloned()
    }
}

impl KeyValueStore for SharedStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.0.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.0.borrow_mut().remove(key);
        Ok(())
    }
}

// ===== Interaction hooks =====

#[derive(Default)]
pub struct HookCounts {
    pub attached: Cell<u32>,
    pub detached: Cell<u32>,
}

pub struct CountingHooks(pub Rc<HookCounts>);

impl InteractionHooks for CountingHooks {
    fn attach(&mut self) {
        self.0.attached.set(self.0.attached.get() + 1);
    }

    fn detach(&mut self) {
        self.0.detached.set(self.0.detached.get() + 1);
    }
}

// ===== Feed =====

pub struct CountingFeed {
    pub entries: Vec<RawEntry>,
    pub fetches: Rc<Cell<u32>>,
}

#[async_trait(?Send)]
impl TrackFeed for CountingFeed {
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.entries.clone())
    }
}

// ===== Harness =====

pub struct Harness {
    pub session: PlaybackSession,
    pub output: RecordingOutput,
    pub store: SharedStore,
    pub label: RecordingLabel,
    pub hooks: Rc<HookCounts>,
}

impl Harness {
    pub fn new(settings: SessionSettings, store: SharedStore) -> Self {
        Self::seeded(settings, store, 42)
    }

    pub fn seeded(settings: SessionSettings, store: SharedStore, seed: u64) -> Self {
        let output = RecordingOutput::default();
        let label = RecordingLabel::default();
        let hooks = Rc::new(HookCounts::default());

        let session = PlaybackSession::new(
            settings,
            Box::new(output.clone()),
            Persistence::new(Box::new(store.clone()), StorageKeys::default()),
            Box::new(CountingHooks(hooks.clone())),
        )
        .with_label(Box::new(label.clone()))
        .with_seed(seed);

        Self {
            session,
            output,
            store,
            label,
            hooks,
        }
    }

    /// Default settings, empty store
    pub fn fresh() -> Self {
        Self::new(SessionSettings::default(), SharedStore::default())
    }

    /// Run the startup sequence against `playlist`
    pub fn start(&mut self, playlist: Playlist) {
        self.session.begin_loading().unwrap();
        self.session.start(playlist).unwrap();
    }

    pub fn url_of(&self, index: usize) -> String {
        self.session
            .playlist()
            .and_then(|p| p.get(index))
            .map(|t| t.url().to_string())
            .unwrap()
    }

    pub fn events(&mut self) -> Vec<SessionEvent> {
        self.session.drain_events()
    }
}

/// Playlist with one track per name, at `audio/<name>.mp3`
pub fn playlist(names: &[&str]) -> Playlist {
    Playlist::new(
        names
            .iter()
            .map(|name| Track::new(format!("audio/{name}.mp3"), *name))
            .collect(),
    )
    .unwrap()
}

pub fn entries(names: &[&str]) -> Vec<RawEntry> {
    names
        .iter()
        .map(|name| RawEntry::new(format!("https://cdn.example/{name}.mp3"), format!("{name}.mp3")))
        .collect()
}
