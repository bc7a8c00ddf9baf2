/// Track domain types and display-name normalization
use crate::error::{RadioError, Result};
use serde::{Deserialize, Serialize};

/// One playable media item
///
/// Immutable once constructed: the session only ever reads tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    url: String,
    display_name: String,
}

impl Track {
    /// Create a track from a media location and a ready-made display name
    pub fn new(url: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            display_name: display_name.into(),
        }
    }

    /// Build a track from a raw feed entry
    ///
    /// The display name is derived from the entry's file name, or from the last
    /// path segment of its URL when the feed omitted the name.
    pub fn from_entry(entry: &RawEntry, strip_numeric_prefix: bool) -> Result<Self> {
        let url = entry
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| RadioError::MalformedEntry(format!("missing url in {entry:?}")))?;

        let file_name = entry
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| last_path_segment(url));

        let display_name = display_name_from_filename(file_name, strip_numeric_prefix)
            .ok_or_else(|| {
                RadioError::MalformedEntry(format!("no usable name for {url} ({file_name:?})"))
            })?;

        Ok(Self::new(url, display_name))
    }

    /// Media location (absolute or relative)
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Human-readable name shown in the track label
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

/// Unvalidated entry as delivered by a track feed
///
/// Either field may be missing; [`Track::from_entry`] decides whether the entry
/// is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Download location
    pub url: Option<String>,

    /// File name as published (e.g. `03-Night_Drive.mp3`)
    pub name: Option<String>,
}

impl RawEntry {
    /// Create an entry with both fields present
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            name: Some(name.into()),
        }
    }
}

/// Derive a display name from a published file name
///
/// Strips a trailing extension, turns underscores into spaces, optionally
/// drops a leading ordering prefix such as `03-` or `7. `, collapses runs of
/// whitespace and trims. Returns `None` when nothing readable is left.
pub fn display_name_from_filename(file_name: &str, strip_numeric_prefix: bool) -> Option<String> {
    let stem = strip_extension(file_name.trim());
    let spaced = stem.replace('_', " ");

    let named = if strip_numeric_prefix {
        strip_ordering_prefix(&spaced).unwrap_or(&spaced)
    } else {
        &spaced
    };

    let collapsed = named.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Remove the final `.ext` segment, if any
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos + 1 < name.len() && !name[pos + 1..].contains('/') => &name[..pos],
        _ => name,
    }
}

/// Remainder after a `<digits><sep>` prefix, where sep is `-`, `.` or `)`
///
/// The separator must not be followed by another digit, so `1.5 Hours` and
/// `2-4-6` are left alone. Returns `None` when there is no prefix or nothing
/// would remain.
fn strip_ordering_prefix(name: &str) -> Option<&str> {
    let trimmed = name.trim_start();
    let digits = trimmed.len() - trimmed.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }

    let after_digits = trimmed[digits..].trim_start();
    let mut chars = after_digits.chars();
    if !matches!(chars.next(), Some('-' | '.' | ')')) {
        return None;
    }

    let rest = chars.as_str();
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let rest = rest.trim_start();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Last path segment of a URL, ignoring query and fragment
fn last_path_segment(url: &str) -> &str {
    let path = url.split(|c| c == '?' || c == '#').next().unwrap_or(url);
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_and_underscores() {
        assert_eq!(
            display_name_from_filename("Night_Drive.mp3", true).as_deref(),
            Some("Night Drive")
        );
    }

    #[test]
    fn strips_ordering_prefixes() {
        assert_eq!(
            display_name_from_filename("03-Night_Drive.mp3", true).as_deref(),
            Some("Night Drive")
        );
        assert_eq!(
            display_name_from_filename("07 - Ocean.ogg", true).as_deref(),
            Some("Ocean")
        );
        assert_eq!(
            display_name_from_filename("1. Intro.flac", true).as_deref(),
            Some("Intro")
        );
        assert_eq!(
            display_name_from_filename("12)_Outro.mp3", true).as_deref(),
            Some("Outro")
        );
    }

    #[test]
    fn keeps_numbers_that_are_part_of_the_title() {
        assert_eq!(
            display_name_from_filename("1.5_Hours_Of_Rain.mp3", true).as_deref(),
            Some("1.5 Hours Of Rain")
        );
        assert_eq!(
            display_name_from_filename("50_Ways.mp3", true).as_deref(),
            Some("50 Ways")
        );
        assert_eq!(
            display_name_from_filename("2-4-6.mp3", true).as_deref(),
            Some("2-4-6")
        );
    }

    #[test]
    fn prefix_stripping_can_be_disabled() {
        assert_eq!(
            display_name_from_filename("03-Night_Drive.mp3", false).as_deref(),
            Some("03-Night Drive")
        );
    }

    #[test]
    fn prefix_only_name_is_kept() {
        assert_eq!(display_name_from_filename("01-.mp3", true).as_deref(), Some("01-"));
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(
            display_name_from_filename("  Late__Night   Mix .wav", true).as_deref(),
            Some("Late Night Mix")
        );
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(display_name_from_filename("", true), None);
        assert_eq!(display_name_from_filename("___.mp3", true), None);
        assert_eq!(display_name_from_filename(".mp3", true), None);
    }

    #[test]
    fn trailing_dot_is_not_an_extension() {
        assert_eq!(
            display_name_from_filename("Encore.", true).as_deref(),
            Some("Encore.")
        );
    }

    #[test]
    fn track_from_complete_entry() {
        let entry = RawEntry::new("https://cdn.example.com/03-Song_A.mp3", "03-Song_A.mp3");
        let track = Track::from_entry(&entry, true).unwrap();
        assert_eq!(track.url(), "https://cdn.example.com/03-Song_A.mp3");
        assert_eq!(track.display_name(), "Song A");
    }

    #[test]
    fn track_name_falls_back_to_url_segment() {
        let entry = RawEntry {
            url: Some("https://cdn.example.com/music/Blue_Hour.mp3?download=1".into()),
            name: None,
        };
        let track = Track::from_entry(&entry, true).unwrap();
        assert_eq!(track.display_name(), "Blue Hour");
    }

    #[test]
    fn entry_without_url_is_malformed() {
        let entry = RawEntry {
            url: Some("   ".into()),
            name: Some("Song.mp3".into()),
        };
        let err = Track::from_entry(&entry, true).unwrap_err();
        assert!(matches!(err, RadioError::MalformedEntry(_)));
    }
}
