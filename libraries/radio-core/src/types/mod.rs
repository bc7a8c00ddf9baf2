mod playlist;
mod snapshot;
mod track;

pub use playlist::Playlist;
pub use snapshot::{is_valid_offset, PersistedSnapshot};
pub use track::{display_name_from_filename, RawEntry, Track};
