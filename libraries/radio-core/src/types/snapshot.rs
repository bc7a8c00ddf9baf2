/// Persisted playback position
use crate::error::{RadioError, Result};

/// Last track index and playback offset, surviving page loads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistedSnapshot {
    /// Index into the playlist the snapshot was taken against
    pub last_index: usize,

    /// Offset into that track, in seconds (finite, non-negative)
    pub last_offset_secs: f64,
}

impl PersistedSnapshot {
    /// Create a snapshot, clamping an invalid offset to zero
    pub fn new(last_index: usize, last_offset_secs: f64) -> Self {
        Self {
            last_index,
            last_offset_secs: sanitize_offset(last_offset_secs),
        }
    }

    /// Parse the two stored string slots
    ///
    /// A missing index means there is no prior state (`Ok(None)`). A present
    /// but unusable index is an error the caller reports and then ignores. A
    /// missing or invalid offset degrades to zero.
    pub fn parse(index: Option<&str>, offset: Option<&str>) -> Result<Option<Self>> {
        let Some(raw_index) = index.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };

        let last_index = parse_index(raw_index)?;
        let last_offset_secs = offset
            .and_then(|s| s.trim().parse::<f64>().ok())
            .map(sanitize_offset)
            .unwrap_or(0.0);

        Ok(Some(Self {
            last_index,
            last_offset_secs,
        }))
    }

    /// String slots to store: index, then offset rounded to whole seconds
    pub fn encode(&self) -> (String, String) {
        (
            self.last_index.to_string(),
            (sanitize_offset(self.last_offset_secs).round() as u64).to_string(),
        )
    }

    /// The stored index, if it addresses a track in a playlist of `len` tracks
    pub fn index_within(&self, len: usize) -> Option<usize> {
        (self.last_index < len).then_some(self.last_index)
    }
}

/// Whether an audio position may be persisted
pub fn is_valid_offset(offset_secs: f64) -> bool {
    offset_secs.is_finite() && offset_secs >= 0.0
}

fn sanitize_offset(offset_secs: f64) -> f64 {
    if is_valid_offset(offset_secs) {
        offset_secs
    } else {
        0.0
    }
}

fn parse_index(raw: &str) -> Result<usize> {
    let value: f64 = raw
        .parse()
        .map_err(|_| RadioError::InvalidSnapshot(format!("index {raw:?} is not a number")))?;

    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(RadioError::InvalidSnapshot(format!(
            "index {raw:?} is not a track position"
        )));
    }

    Ok(value as usize)
}
