/// Core traits for Radio 24h
///
/// Everything the session touches in the outside world sits behind one of
/// these traits: the browser build implements them over the DOM, tests and the
/// CLI implement them in memory.
use crate::error::Result;
use crate::types::RawEntry;
use async_trait::async_trait;

/// The single audio output handle
///
/// Owned exclusively by the playback session. No other component sets its
/// source or position.
pub trait AudioOutput {
    /// Point the output at a new media location
    fn set_source(&mut self, url: &str) -> Result<()>;

    /// Seek to an offset in seconds
    ///
    /// Best-effort: some environments defer the seek until enough of the
    /// media has buffered. Callers tolerate errors here.
    fn seek(&mut self, offset_secs: f64) -> Result<()>;

    /// Ask the environment to start playback
    ///
    /// The outcome arrives later and is reported back to the session
    /// (`handle_play_started` / `handle_play_rejected`).
    fn request_play(&mut self);

    /// Pause playback
    fn pause(&mut self) -> Result<()>;

    /// Mute or unmute without touching volume
    fn set_muted(&mut self, muted: bool);

    /// Current position in seconds
    ///
    /// May be NaN or infinite while nothing is loaded.
    fn position(&self) -> f64;
}

/// Text element showing the current track name
pub trait DisplayLabel {
    /// Replace the label's text
    fn set_text(&mut self, text: &str);
}

/// Finds the track label in freshly swapped page content
pub trait LabelLocator {
    /// The label, if the current content has one
    fn locate(&self) -> Option<Box<dyn DisplayLabel>>;
}

/// Durable string key-value store (e.g. browser localStorage)
pub trait KeyValueStore {
    /// Read a value
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, overwriting in place
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// One-shot user interaction listeners (click, keypress, touch)
///
/// `attach` registers all three, `detach` removes all three together. The
/// session guarantees it never attaches twice without detaching in between.
pub trait InteractionHooks {
    /// Register listeners for every interaction category
    fn attach(&mut self);

    /// Remove every listener registered by `attach`
    fn detach(&mut self);
}

/// Remote source of track entries
///
/// Futures are not `Send`: the player runs on a single cooperative thread.
#[async_trait(?Send)]
pub trait TrackFeed {
    /// Fetch the raw track listing once
    async fn fetch_entries(&self) -> Result<Vec<RawEntry>>;
}
