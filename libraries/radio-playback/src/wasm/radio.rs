//! JavaScript entry point

use super::dom::{
    AudioListeners, DocumentInteractionHooks, DomLabelLocator, LocalStorageStore,
    PageHideListener, Ticker, WebAudioOutput,
};
use super::link::SessionLink;
use super::logging;
use super::navigation::WebNavigator;
use crate::{
    bridge::ContinuityBridge,
    loader::PlaylistLoader,
    navigation::ImageFallback,
    persistence::{MemoryStore, Persistence},
    recovery,
    session::PlaybackSession,
};
use js_sys::{Function, Promise};
use radio_core::{KeyValueStore, LabelLocator, RadioConfig, RadioError};
use radio_feed_client::ReleaseFeedClient;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{Document, HtmlAudioElement, Window};

/// The radio player, exported to JavaScript
///
/// ```js
/// const radio = new WebRadio({ session: { enable_manual_controls: true } },
///                            document.getElementById("audioPlayer"));
/// radio.onTrackChange(e => console.log(e.displayName));
/// await radio.start();
/// radio.enableNavigation("app-main");
/// ```
#[wasm_bindgen]
pub struct WebRadio {
    config: RadioConfig,
    window: Window,
    document: Document,
    link: SessionLink,
    session: Rc<RefCell<PlaybackSession>>,
    loader: Rc<PlaylistLoader<ReleaseFeedClient>>,

    _audio_listeners: AudioListeners,
    _pagehide: PageHideListener,
    ticker: Option<Ticker>,
    navigator: Option<WebNavigator>,
}

#[wasm_bindgen]
impl WebRadio {
    /// Create the player around the page's persistent audio element
    ///
    /// `config` is a plain object shaped like `RadioConfig`; `undefined`
    /// uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, audio: HtmlAudioElement) -> Result<WebRadio, JsValue> {
        logging::init();

        let config: RadioConfig = if config.is_undefined() || config.is_null() {
            RadioConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        config.validate().map_err(to_js)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let link = SessionLink::new();
        let output = WebAudioOutput::new(audio, link.clone());

        let store: Box<dyn KeyValueStore> = match LocalStorageStore::new(&window) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!(error = %e, "localStorage unavailable, position will not survive reloads");
                Box::new(MemoryStore::new())
            }
        };
        let persistence = Persistence::new(store, config.session.storage_keys.clone());
        let hooks = DocumentInteractionHooks::new(document.clone(), &link);

        let audio_listeners = output.listen()?;
        let mut session = PlaybackSession::new(
            config.session.clone(),
            Box::new(output),
            persistence,
            Box::new(hooks),
        );
        let locator = DomLabelLocator::new(document.clone(), &config.session.label_element_id);
        if let Some(label) = locator.locate() {
            session = session.with_label(label);
        }

        let session = Rc::new(RefCell::new(session));
        link.bind(&session);

        let pagehide = PageHideListener::install(&window, link.clone())?;

        let feed = ReleaseFeedClient::new(&config.feed).map_err(|e| to_js(e.into()))?;
        let loader = Rc::new(PlaylistLoader::new(feed, config.playlist.clone()));

        Ok(Self {
            config,
            window,
            document,
            link,
            session,
            loader,
            _audio_listeners: audio_listeners,
            _pagehide: pagehide,
            ticker: None,
            navigator: None,
        })
    }

    /// Fetch the playlist and start playing
    ///
    /// Resolves once the first track has been requested. Never rejects for
    /// feed trouble; the fallback playlist or the no-tracks state covers it.
    pub fn start(&mut self) -> Result<Promise, JsValue> {
        if self.ticker.is_none() {
            self.ticker = Some(Ticker::start(
                &self.window,
                self.link.clone(),
                self.config.session.persist_interval_ms,
            )?);
        }

        let link = self.link.clone();
        let loader = self.loader.clone();

        Ok(future_to_promise(async move {
            link.dispatch(|s| s.begin_loading())
                .transpose()
                .map_err(to_js)?;

            match loader.fetch_playlist().await {
                Ok(playlist) => {
                    info!(tracks = playlist.len(), "playlist ready");
                    link.dispatch(|s| s.start(playlist))
                        .transpose()
                        .map_err(to_js)?;
                }
                Err(e) => {
                    recovery::report(&e);
                    link.dispatch(|s| s.playlist_unavailable());
                }
            }
            Ok(JsValue::UNDEFINED)
        }))
    }

    /// Take over `a[data-nav]` links, swapping content into `region_id`
    /// (`navigation.region_id` from the config by default)
    #[wasm_bindgen(js_name = enableNavigation)]
    pub fn enable_navigation(&mut self, region_id: Option<String>) -> Result<(), JsValue> {
        if self.navigator.is_some() {
            return Ok(());
        }
        let bridge = ContinuityBridge::new(
            DomLabelLocator::new(self.document.clone(), &self.config.session.label_element_id),
            self.config.session.drift_tolerance_secs,
        );
        self.navigator = Some(WebNavigator::install(
            self.window.clone(),
            self.document.clone(),
            region_id.unwrap_or_else(|| self.config.navigation.region_id.clone()),
            self.link.clone(),
            bridge,
            ImageFallback::new(&self.config.navigation),
        )?);
        Ok(())
    }

    /// Navigate to `href` through the shim
    pub fn navigate(&self, href: &str) -> Result<(), JsValue> {
        let navigator = self
            .navigator
            .as_ref()
            .ok_or_else(|| JsValue::from_str("navigation not enabled"))?;
        navigator.navigate(href);
        Ok(())
    }

    // ===== Controls =====

    /// Play/pause button
    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> Result<(), JsValue> {
        self.control(PlaybackSession::toggle_play_pause)
    }

    /// Next button
    pub fn next(&self) -> Result<(), JsValue> {
        self.control(PlaybackSession::next)
    }

    /// Previous button
    pub fn previous(&self) -> Result<(), JsValue> {
        self.control(PlaybackSession::previous)
    }

    // ===== State =====

    /// Current state name (`playing`, `blocked`, ...)
    pub fn state(&self) -> String {
        self.session.borrow().state().to_string()
    }

    /// Current track as `{ url, display_name }`, or `null`
    #[wasm_bindgen(js_name = currentTrack)]
    pub fn current_track(&self) -> Result<JsValue, JsValue> {
        match self.session.borrow().current_track() {
            Some(track) => Ok(serde_wasm_bindgen::to_value(track)?),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.session.borrow().is_muted()
    }

    // ===== Event Listeners =====

    /// Register state change callback (receives the state name)
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, callback: Function) {
        self.link.set_on_state_change(callback);
    }

    /// Register track change callback
    #[wasm_bindgen(js_name = onTrackChange)]
    pub fn on_track_change(&self, callback: Function) {
        self.link.set_on_track_change(callback);
    }

    /// Register a callback receiving every session event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        self.link.set_on_event(callback);
    }

    fn control(
        &self,
        action: fn(&mut PlaybackSession) -> radio_core::Result<()>,
    ) -> Result<(), JsValue> {
        self.link
            .dispatch(action)
            .transpose()
            .map(|_| ())
            .map_err(to_js)
    }
}

fn to_js(error: RadioError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
