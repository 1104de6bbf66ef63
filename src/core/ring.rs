//! Bounded ring of previously-visited directories.
//!
//! Insertion order is recency order: `record` appends as most-recent and
//! evicts the oldest entry once the ring is full. Duplicates are allowed —
//! two consecutive `cd`s to the same directory produce two entries.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Fixed-capacity directory history.
///
/// The ring is created with a *seed* path (the working directory at enable
/// time) so that `peek` has a sane answer before anything was recorded.
#[derive(Debug, Clone)]
pub struct HistoryRing {
    slots: VecDeque<PathBuf>,
    capacity: usize,
    seed: PathBuf,
}

impl HistoryRing {
    pub fn new(capacity: usize, seed: PathBuf) -> Self {
        Self {
            slots: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            seed,
        }
    }

    /// Append `path` as the most-recent entry, evicting the oldest at capacity.
    pub fn record(&mut self, path: PathBuf) {
        if self.slots.len() == self.capacity {
            self.slots.pop_front();
        }
        self.slots.push_back(path);
    }

    /// Entry at `offset` steps back from the most-recent one (offset 0 = most
    /// recent). Out-of-range offsets clamp to the oldest entry rather than
    /// wrapping; an empty ring yields the seed.
    pub fn peek(&self, offset: usize) -> &Path {
        if self.slots.is_empty() {
            return &self.seed;
        }
        let offset = offset.min(self.slots.len() - 1);
        &self.slots[self.slots.len() - 1 - offset]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
