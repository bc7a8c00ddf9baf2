//! Navigation shim
//!
//! Intercepts `a[data-nav]` clicks and back/forward, fetches the target page,
//! and swaps its main content into the content region, fixing its images.
//! The audio element sits outside that region and keeps playing; afterwards
//! the continuity bridge rebinds the track label.

use super::dom::{js_error_message, DomLabelLocator};
use super::link::SessionLink;
use crate::bridge::ContinuityBridge;
use crate::navigation::{is_home_path, resolve_url, same_path, ImageFallback, NavigationSequence};
use crate::recovery;
use radio_core::{RadioError, Result};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info};
use url::Url;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, Document, DomParser, Element, Event, HtmlImageElement, NodeList,
    PopStateEvent, Request, RequestCache, RequestInit, Response, SupportedType, Window,
};

const NAV_LINK_SELECTOR: &str = "a[data-nav]";
const ACTIVE_NAV_SELECTOR: &str = "nav a[data-nav]";

/// Installed navigation shim
///
/// Dropping it removes the click and popstate listeners.
pub struct WebNavigator {
    inner: Rc<NavInner>,
}

struct NavInner {
    window: Window,
    document: Document,
    region_id: String,
    link: SessionLink,
    bridge: ContinuityBridge<DomLabelLocator>,
    sequence: RefCell<NavigationSequence>,
    listeners: RefCell<Vec<Listener>>,
    images: ImageFallback,
    image_error: Closure<dyn FnMut(Event)>,
}

struct Listener {
    target: web_sys::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl WebNavigator {
    /// Register listeners and load the current page through the shim when it
    /// is not the home page
    pub fn install(
        window: Window,
        document: Document,
        region_id: impl Into<String>,
        link: SessionLink,
        bridge: ContinuityBridge<DomLabelLocator>,
        images: ImageFallback,
    ) -> std::result::Result<Self, JsValue> {
        let inner = Rc::new(NavInner {
            window,
            document,
            region_id: region_id.into(),
            link,
            bridge,
            sequence: RefCell::new(NavigationSequence::new()),
            listeners: RefCell::new(Vec::new()),
            image_error: image_error_handler(images.clone()),
            images,
        });
        if let Ok(images) = inner.document.query_selector_all("img") {
            inner.fix_images(&images);
        }

        let weak = Rc::downgrade(&inner);
        inner.listen(inner.document.clone().into(), "click", move |event| {
            on_link_click(&weak, &event);
        })?;

        let weak = Rc::downgrade(&inner);
        inner.listen(inner.window.clone().into(), "popstate", move |event| {
            on_popstate(&weak, &event);
        })?;

        let path = inner.window.location().pathname()?;
        if !is_home_path(&path) {
            debug!(%path, "loading initial page through shim");
            NavInner::spawn(&inner, path, false);
        }

        Ok(Self { inner })
    }

    /// Navigate programmatically, as if a nav link to `href` was clicked
    pub fn navigate(&self, href: &str) {
        NavInner::spawn(&self.inner, href.to_string(), true);
    }
}

impl Drop for WebNavigator {
    fn drop(&mut self) {
        for listener in self.inner.listeners.borrow_mut().drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

fn on_link_click(inner: &Weak<NavInner>, event: &Event) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let Some(anchor) = event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .and_then(|el| el.closest(NAV_LINK_SELECTOR).ok().flatten())
    else {
        return;
    };
    let Some(href) = anchor.get_attribute("href") else {
        return;
    };

    event.prevent_default();
    NavInner::spawn(&inner, href, true);
}

fn on_popstate(inner: &Weak<NavInner>, event: &Event) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let from_state = event
        .dyn_ref::<PopStateEvent>()
        .map(PopStateEvent::state)
        .and_then(|state| js_sys::Reflect::get(&state, &JsValue::from_str("url")).ok())
        .and_then(|url| url.as_string());

    let target = match from_state {
        Some(url) => url,
        None => match inner.window.location().pathname() {
            Ok(path) => path,
            Err(_) => return,
        },
    };
    NavInner::spawn(&inner, target, false);
}

impl NavInner {
    fn listen(
        &self,
        target: web_sys::EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> std::result::Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().push(Listener {
            target,
            event,
            closure,
        });
        Ok(())
    }

    fn spawn(inner: &Rc<NavInner>, href: String, push_history: bool) {
        let inner = inner.clone();
        spawn_local(async move {
            if let Err(e) = inner.navigate(&href, push_history).await {
                recovery::report(&e);
            }
        });
    }

    async fn navigate(&self, href: &str, push_history: bool) -> Result<()> {
        let base = self.window.location().href().map_err(nav_error)?;
        let target = resolve_url(&base, href)?;
        let ticket = self.sequence.borrow_mut().begin();

        debug!(url = %target, "fetching page");
        let html = self.fetch_page(&target).await?;

        if !self.sequence.borrow().is_current(ticket) {
            debug!(url = %target, "navigation superseded");
            return Ok(());
        }

        self.swap_content(&target, &html)?;
        self.mark_active(&target);

        if push_history {
            let state = js_sys::Object::new();
            js_sys::Reflect::set(
                &state,
                &JsValue::from_str("url"),
                &JsValue::from_str(target.as_str()),
            )
            .map_err(nav_error)?;
            self.window
                .history()
                .and_then(|h| h.push_state_with_url(&state, "", Some(target.as_str())))
                .map_err(nav_error)?;
        }

        let report = self
            .link
            .dispatch(|session| self.bridge.after_content_swap(session));
        info!(url = %target, ?report, "page swapped");
        Ok(())
    }

    /// GET the page, bypassing the HTTP cache
    async fn fetch_page(&self, target: &Url) -> Result<String> {
        let init = RequestInit::new();
        init.set_method("GET");
        init.set_cache(RequestCache::NoStore);
        let request = Request::new_with_str_and_init(target.as_str(), &init).map_err(nav_error)?;

        let response: Response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(nav_error)?
            .dyn_into()
            .map_err(nav_error)?;
        if !response.ok() {
            return Err(RadioError::navigation(format!(
                "{target} returned {}",
                response.status()
            )));
        }

        JsFuture::from(response.text().map_err(nav_error)?)
            .await
            .map_err(nav_error)?
            .as_string()
            .ok_or_else(|| RadioError::navigation(format!("{target} returned no text")))
    }

    fn swap_content(&self, target: &Url, html: &str) -> Result<()> {
        let parsed = DomParser::new()
            .and_then(|parser| parser.parse_from_string(html, SupportedType::TextHtml))
            .map_err(nav_error)?;

        let content = match parsed.query_selector("main").map_err(nav_error)? {
            Some(main) => main.inner_html(),
            None => parsed.body().map(|b| b.inner_html()).unwrap_or_default(),
        };

        let region = self
            .document
            .get_element_by_id(&self.region_id)
            .ok_or_else(|| RadioError::navigation(format!("no #{} region", self.region_id)))?;
        region.set_inner_html(&content);
        self.fix_images(&region.query_selector_all("img").map_err(nav_error)?);

        // The home page markup carries its own player; the live one stays
        if is_home_path(target.path()) {
            let stray = region.query_selector_all("audio").map_err(nav_error)?;
            for i in 0..stray.length() {
                if let Some(el) = stray.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                    el.remove();
                }
            }
        }

        let title = parsed.title();
        if !title.trim().is_empty() {
            self.document.set_title(&title);
        }
        Ok(())
    }

    /// Default alt text, and a one-shot switch to the placeholder on error
    fn fix_images(&self, images: &NodeList) {
        let options = AddEventListenerOptions::new();
        options.set_once(true);

        for i in 0..images.length() {
            let Some(img) = images.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            if let Some(alt) = self.images.alt_for(img.get_attribute("alt").as_deref()) {
                let _ = img.set_attribute("alt", alt);
            }
            // Same closure and options: re-adding to an image is a no-op
            let _ = img.add_event_listener_with_callback_and_add_event_listener_options(
                "error",
                self.image_error.as_ref().unchecked_ref(),
                &options,
            );
        }
    }

    fn mark_active(&self, target: &Url) {
        let Ok(links) = self.document.query_selector_all(ACTIVE_NAV_SELECTOR) else {
            return;
        };
        for i in 0..links.length() {
            let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let active = link
                .get_attribute("href")
                .and_then(|href| target.join(&href).ok())
                .is_some_and(|url| same_path(&url, target));
            let _ = link.class_list().toggle_with_force("active", active);
        }
    }
}

fn image_error_handler(images: ImageFallback) -> Closure<dyn FnMut(Event)> {
    Closure::wrap(Box::new(move |event: Event| {
        let Some(img) = event
            .target()
            .and_then(|t| t.dyn_into::<HtmlImageElement>().ok())
        else {
            return;
        };
        if let Some(placeholder) = images.replacement_for(&img.src()) {
            debug!(src = %img.src(), "image failed, using placeholder");
            img.set_src(placeholder);
        }
    }) as Box<dyn FnMut(Event)>)
}

fn nav_error(value: JsValue) -> RadioError {
    RadioError::navigation(js_error_message(&value))
}
