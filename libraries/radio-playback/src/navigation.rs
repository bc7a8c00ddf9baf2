//! Path and image helpers for the navigation shim
//!
//! Pure functions, kept apart from the DOM code so they can be tested on any
//! target.

use radio_core::{NavigationSettings, RadioError, Result};
use url::Url;

/// Whether a path names the home page
///
/// The home page already hosts the player, so the audio element in its
/// markup is dropped when it is swapped in.
pub fn is_home_path(path: &str) -> bool {
    path.is_empty() || path == "/" || path.ends_with("index.html")
}

/// Resolve a link target against the current document location
pub fn resolve_url(base: &str, href: &str) -> Result<Url> {
    let base = Url::parse(base)
        .map_err(|e| RadioError::navigation(format!("bad document URL {base}: {e}")))?;
    base.join(href)
        .map_err(|e| RadioError::navigation(format!("bad link {href}: {e}")))
}

/// Whether two URLs point at the same page, ignoring query and fragment
pub fn same_path(a: &Url, b: &Url) -> bool {
    normalize(a.path()) == normalize(b.path())
}

fn normalize(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Monotonic navigation counter
///
/// Each navigation takes a ticket; a response is applied only if its ticket
/// is still the latest, so a slow page never overwrites a newer one.
#[derive(Debug, Default)]
pub struct NavigationSequence {
    latest: u64,
}

impl NavigationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a navigation
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Whether `ticket` belongs to the most recent navigation
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest
    }
}

/// Replacement rules for images in swapped content
#[derive(Debug, Clone)]
pub struct ImageFallback {
    placeholder_src: String,
    default_alt: String,
}

impl ImageFallback {
    pub fn new(settings: &NavigationSettings) -> Self {
        Self {
            placeholder_src: settings.image_placeholder_url.clone(),
            default_alt: settings.image_alt.clone(),
        }
    }

    /// Alt text to set, if the image has none
    pub fn alt_for(&self, current: Option<&str>) -> Option<&str> {
        match current {
            Some(alt) if !alt.trim().is_empty() => None,
            _ => Some(&self.default_alt),
        }
    }

    /// Source to switch to after `failed_src` failed to load
    ///
    /// `None` once the placeholder itself is failing.
    pub fn replacement_for(&self, failed_src: &str) -> Option<&str> {
        (failed_src != self.placeholder_src).then_some(self.placeholder_src.as_str())
    }
}
