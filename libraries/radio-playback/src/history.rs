//! Play history
//!
//! Bounded record of playlist indices that were actually loaded, used by the
//! "previous" control.

use std::collections::VecDeque;

/// Play history with bounded size
///
/// Ring buffer: once full, the oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct History {
    /// Played indices (most recent = back)
    indices: VecDeque<usize>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            indices: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Record a played index
    ///
    /// If history is full, the oldest entry is discarded. A zero-sized history
    /// records nothing.
    pub fn push(&mut self, index: usize) {
        if self.max_size == 0 {
            return;
        }
        if self.indices.len() >= self.max_size {
            self.indices.pop_front();
        }
        self.indices.push_back(index);
    }

    /// Take the most recent index
    pub fn pop(&mut self) -> Option<usize> {
        self.indices.pop_back()
    }

    /// All entries, oldest first
    pub fn get_all(&self) -> Vec<usize> {
        self.indices.iter().copied().collect()
    }

    /// Number of entries
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if history is empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Clear all history
    #[cfg(test)]
    pub fn clear(&mut self) {
        self.indices.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}
