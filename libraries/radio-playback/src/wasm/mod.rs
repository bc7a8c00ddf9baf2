//! WASM bindings for radio-playback
//!
//! Browser implementations of the session's collaborators (the `<audio>`
//! element, localStorage, the track label, document interaction listeners),
//! the persistence ticker, the navigation shim, and the `WebRadio` entry point
//! exported to JavaScript.

pub mod dom;
pub mod link;
pub mod logging;
pub mod navigation;
pub mod radio;

pub use link::SessionLink;
pub use navigation::WebNavigator;
pub use radio::WebRadio;
