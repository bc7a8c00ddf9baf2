//! Shared handle for browser callbacks to reach the session

use crate::events::SessionEvent;
use crate::session::PlaybackSession;
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::debug;
use wasm_bindgen::JsValue;

/// Cloneable route from DOM callbacks into the session
///
/// Holds the session weakly, so collaborators owned by the session (audio
/// output, interaction hooks) can keep a link without forming a cycle.
/// Every call drains the session's events afterwards and forwards them to
/// the registered JS callbacks once the session borrow is released.
#[derive(Clone, Default)]
pub struct SessionLink {
    inner: Rc<RefCell<LinkInner>>,
}

#[derive(Default)]
struct LinkInner {
    session: Weak<RefCell<PlaybackSession>>,

    // Event callbacks
    on_state_change: Option<Function>,
    on_track_change: Option<Function>,
    on_event: Option<Function>,
}

impl SessionLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the link at the session
    pub fn bind(&self, session: &Rc<RefCell<PlaybackSession>>) {
        self.inner.borrow_mut().session = Rc::downgrade(session);
    }

    pub fn set_on_state_change(&self, callback: Function) {
        self.inner.borrow_mut().on_state_change = Some(callback);
    }

    pub fn set_on_track_change(&self, callback: Function) {
        self.inner.borrow_mut().on_track_change = Some(callback);
    }

    pub fn set_on_event(&self, callback: Function) {
        self.inner.borrow_mut().on_event = Some(callback);
    }

    /// Run `f` against the session and forward the events it produced
    ///
    /// Returns `None` if the session is gone or already borrowed further up
    /// the stack.
    pub fn dispatch<R>(&self, f: impl FnOnce(&mut PlaybackSession) -> R) -> Option<R> {
        let session = self.inner.borrow().session.upgrade()?;

        let (result, events) = {
            let Ok(mut session) = session.try_borrow_mut() else {
                debug!("session busy, dropping callback");
                return None;
            };
            let result = f(&mut session);
            (result, session.drain_events())
        };

        self.forward(&events);
        Some(result)
    }

    fn forward(&self, events: &[SessionEvent]) {
        if events.is_empty() {
            return;
        }

        // Clone out so callbacks may register new callbacks
        let (on_state_change, on_track_change, on_event) = {
            let inner = self.inner.borrow();
            (
                inner.on_state_change.clone(),
                inner.on_track_change.clone(),
                inner.on_event.clone(),
            )
        };

        for event in events {
            match event {
                SessionEvent::StateChanged { state } => {
                    if let Some(cb) = &on_state_change {
                        cb.call1(&JsValue::NULL, &JsValue::from_str(&state.to_string()))
                            .ok();
                    }
                }
                SessionEvent::TrackChanged { .. } => {
                    if let (Some(cb), Ok(value)) =
                        (&on_track_change, serde_wasm_bindgen::to_value(event))
                    {
                        cb.call1(&JsValue::NULL, &value).ok();
                    }
                }
                _ => {}
            }

            if let (Some(cb), Ok(value)) = (&on_event, serde_wasm_bindgen::to_value(event)) {
                cb.call1(&JsValue::NULL, &value).ok();
            }
        }
    }
}
