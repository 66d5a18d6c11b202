//! Pending tracks for one deck
//!
//! A plain FIFO list. Duplicates are allowed, nothing is persisted, and the
//! list never talks to playback; `Deck` does the hand-off when an entry is
//! taken for playing.

use crate::model::TrackSource;
use std::collections::VecDeque;

/// One queued track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTrack {
    pub source: TrackSource,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeckQueue {
    entries: VecDeque<QueuedTrack>,
}

impl DeckQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail
    pub fn enqueue(&mut self, source: TrackSource, title: String) {
        self.entries.push_back(QueuedTrack { source, title });
    }

    /// Remove and return the head
    pub fn pop_front(&mut self) -> Option<QueuedTrack> {
        self.entries.pop_front()
    }

    /// Remove and return the entry at `index`
    pub fn take_at(&mut self, index: usize) -> Option<QueuedTrack> {
        self.entries.remove(index)
    }

    /// Drop the entry at `index`; `false` when out of range
    pub fn remove_at(&mut self, index: usize) -> bool {
        self.entries.remove(index).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&QueuedTrack> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedTrack> {
        self.entries.iter()
    }
}
