//! Browser implementations of the session's collaborators

use super::link::SessionLink;
use crate::types::InteractionKind;
use radio_core::{
    AudioOutput, DisplayLabel, InteractionHooks, KeyValueStore, LabelLocator, RadioError, Result,
};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlAudioElement, PageTransitionEvent, Storage, Window};

/// Message of a thrown JS value
pub fn js_error_message(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

fn js_error_name(value: &JsValue) -> Option<String> {
    js_sys::Reflect::get(value, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
}

// ===== Audio output =====

/// The page's persistent `<audio>` element
///
/// Play outcomes are reported back through the link once the promise
/// returned by `play()` settles. Outcomes for a source that has since been
/// replaced are dropped.
pub struct WebAudioOutput {
    audio: HtmlAudioElement,
    link: SessionLink,
    generation: Rc<Cell<u64>>,
}

impl WebAudioOutput {
    pub fn new(audio: HtmlAudioElement, link: SessionLink) -> Self {
        audio.set_preload("auto");
        Self {
            audio,
            link,
            generation: Rc::new(Cell::new(0)),
        }
    }

    /// Forward `ended` and `error` from the element to the session
    pub fn listen(&self) -> std::result::Result<AudioListeners, JsValue> {
        let link = self.link.clone();
        let ended = Closure::wrap(Box::new(move || {
            if let Some(Err(e)) = link.dispatch(|s| s.handle_track_ended()) {
                debug!(error = %e, "track end ignored");
            }
        }) as Box<dyn FnMut()>);

        let link = self.link.clone();
        let audio = self.audio.clone();
        let error = Closure::wrap(Box::new(move || {
            let reason = format!("media error loading {}", audio.current_src());
            link.dispatch(|s| s.handle_load_failed(&reason));
        }) as Box<dyn FnMut()>);

        self.audio
            .add_event_listener_with_callback("ended", ended.as_ref().unchecked_ref())?;
        self.audio
            .add_event_listener_with_callback("error", error.as_ref().unchecked_ref())?;

        Ok(AudioListeners {
            audio: self.audio.clone(),
            ended,
            error,
        })
    }

    fn settle(&self, outcome: JsFuture) {
        let link = self.link.clone();
        let generation = self.generation.clone();
        let requested = generation.get();

        spawn_local(async move {
            let result = outcome.await;
            if generation.get() != requested {
                return;
            }
            match result {
                Ok(_) => {
                    link.dispatch(|s| s.handle_play_started());
                }
                Err(e) => report_play_error(&link, &e),
            }
        });
    }
}

fn report_play_error(link: &SessionLink, error: &JsValue) {
    match js_error_name(error).as_deref() {
        // A newer load interrupted this request
        Some("AbortError") => {}
        Some("NotSupportedError") => {
            let reason = js_error_message(error);
            link.dispatch(|s| s.handle_load_failed(&reason));
        }
        _ => {
            let reason = js_error_message(error);
            link.dispatch(|s| s.handle_play_rejected(&reason));
        }
    }
}

impl AudioOutput for WebAudioOutput {
    fn set_source(&mut self, url: &str) -> Result<()> {
        self.generation.set(self.generation.get() + 1);
        self.audio.set_src(url);
        Ok(())
    }

    fn seek(&mut self, offset_secs: f64) -> Result<()> {
        self.audio.set_current_time(offset_secs);
        Ok(())
    }

    fn request_play(&mut self) {
        match self.audio.play() {
            Ok(promise) => self.settle(JsFuture::from(promise)),
            Err(e) => {
                // Report on a later turn, like a rejected promise would be
                let link = self.link.clone();
                spawn_local(async move { report_play_error(&link, &e) });
            }
        }
    }

    fn pause(&mut self) -> Result<()> {
        self.audio
            .pause()
            .map_err(|e| RadioError::playback(js_error_message(&e)))
    }

    fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    fn position(&self) -> f64 {
        self.audio.current_time()
    }
}

/// Keeps the audio element's listeners registered while alive
pub struct AudioListeners {
    audio: HtmlAudioElement,
    ended: Closure<dyn FnMut()>,
    error: Closure<dyn FnMut()>,
}

impl Drop for AudioListeners {
    fn drop(&mut self) {
        let _ = self
            .audio
            .remove_event_listener_with_callback("ended", self.ended.as_ref().unchecked_ref());
        let _ = self
            .audio
            .remove_event_listener_with_callback("error", self.error.as_ref().unchecked_ref());
    }
}

// ===== Track label =====

/// A label element in the current content
pub struct DomLabel {
    element: Element,
}

impl DomLabel {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl DisplayLabel for DomLabel {
    fn set_text(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}

/// Finds the label by element id
pub struct DomLabelLocator {
    document: Document,
    element_id: String,
}

impl DomLabelLocator {
    pub fn new(document: Document, element_id: impl Into<String>) -> Self {
        Self {
            document,
            element_id: element_id.into(),
        }
    }
}

impl LabelLocator for DomLabelLocator {
    fn locate(&self) -> Option<Box<dyn DisplayLabel>> {
        self.document
            .get_element_by_id(&self.element_id)
            .map(|element| Box::new(DomLabel::new(element)) as Box<dyn DisplayLabel>)
    }
}

// ===== Storage =====

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn new(window: &Window) -> Result<Self> {
        let storage = window
            .local_storage()
            .map_err(|e| RadioError::storage(js_error_message(&e)))?
            .ok_or_else(|| RadioError::storage("localStorage unavailable"))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| RadioError::storage(js_error_message(&e)))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| RadioError::storage(js_error_message(&e)))
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| RadioError::storage(js_error_message(&e)))
    }
}

// ===== Interaction listeners =====

/// Click, keydown and touchstart listeners on the document
///
/// The closures are created once and kept for the page lifetime; `attach`
/// and `detach` only add and remove them, so detaching from inside a handler
/// never frees the running closure.
pub struct DocumentInteractionHooks {
    document: Document,
    listeners: Vec<(InteractionKind, Closure<dyn FnMut()>)>,
}

impl DocumentInteractionHooks {
    pub fn new(document: Document, link: &SessionLink) -> Self {
        let listeners = InteractionKind::ALL
            .iter()
            .map(|&kind| {
                let link = link.clone();
                let closure = Closure::wrap(Box::new(move || {
                    link.dispatch(|s| s.handle_user_interaction(kind));
                }) as Box<dyn FnMut()>);
                (kind, closure)
            })
            .collect();

        Self {
            document,
            listeners,
        }
    }
}

impl InteractionHooks for DocumentInteractionHooks {
    fn attach(&mut self) {
        for (kind, closure) in &self.listeners {
            if let Err(e) = self.document.add_event_listener_with_callback(
                kind.event_name(),
                closure.as_ref().unchecked_ref(),
            ) {
                warn!(?kind, error = %js_error_message(&e), "could not register listener");
            }
        }
    }

    fn detach(&mut self) {
        for (kind, closure) in &self.listeners {
            let _ = self.document.remove_event_listener_with_callback(
                kind.event_name(),
                closure.as_ref().unchecked_ref(),
            );
        }
    }
}

// ===== Timers and page lifecycle =====

/// Periodic persistence tick
pub struct Ticker {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Ticker {
    pub fn start(
        window: &Window,
        link: SessionLink,
        interval_ms: u32,
    ) -> std::result::Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(move || {
            link.dispatch(|s| s.tick());
        }) as Box<dyn FnMut()>);

        let timeout = i32::try_from(interval_ms)
            .map_err(|_| JsValue::from_str("persist interval out of range"))?;
        let handle = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            timeout,
        )?;

        Ok(Self {
            window: window.clone(),
            handle,
            _closure: closure,
        })
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

/// Persists on `pagehide`
///
/// A page entering the back/forward cache may be shown again, so the session
/// is only flushed; any other hide is an unload and closes it.
pub struct PageHideListener {
    window: Window,
    closure: Closure<dyn FnMut(Event)>,
}

impl PageHideListener {
    pub fn install(window: &Window, link: SessionLink) -> std::result::Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let cached = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(PageTransitionEvent::persisted);
            if cached {
                debug!("page cached, keeping session open");
                link.dispatch(|s| s.flush());
            } else {
                link.dispatch(|s| s.close());
            }
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for PageHideListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("pagehide", self.closure.as_ref().unchecked_ref());
    }
}
