//! Routes playlist rows to decks and queues

use super::config::LibraryConfig;
use crate::analysis::DurationProbe;
use crate::deck::{Deck, DeckId, NowPlayingDisplay, PlaybackDevice};
use crate::error::PlaylistError;
use crate::model::TrackSource;
use crate::playlist::PlaylistStore;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Owns the playlist and both decks and carries out user actions on them
pub struct LibraryCoordinator<P, D, V>
where
    P: DurationProbe,
    D: PlaybackDevice,
    V: NowPlayingDisplay,
{
    config: LibraryConfig,
    playlist: PlaylistStore<P>,
    deck_one: Deck<D, V>,
    deck_two: Deck<D, V>,
}

impl<P, D, V> LibraryCoordinator<P, D, V>
where
    P: DurationProbe,
    D: PlaybackDevice,
    V: NowPlayingDisplay,
{
    /// Wire an empty playlist and two decks from their collaborators
    pub fn new(config: LibraryConfig, probe: P, deck_one: (D, V), deck_two: (D, V)) -> Self {
        Self {
            config,
            playlist: PlaylistStore::new(probe),
            deck_one: Deck::new(DeckId::One, deck_one.0, deck_one.1),
            deck_two: Deck::new(DeckId::Two, deck_two.0, deck_two.1),
        }
    }

    /// Load the persisted playlist; returns the number of tracks
    pub fn open(&mut self) -> usize {
        self.playlist.load(&self.config.playlist_path)
    }

    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }

    pub fn playlist(&self) -> &PlaylistStore<P> {
        &self.playlist
    }

    pub fn deck(&self, id: DeckId) -> &Deck<D, V> {
        match id {
            DeckId::One => &self.deck_one,
            DeckId::Two => &self.deck_two,
        }
    }

    pub fn deck_mut(&mut self, id: DeckId) -> &mut Deck<D, V> {
        match id {
            DeckId::One => &mut self.deck_one,
            DeckId::Two => &mut self.deck_two,
        }
    }

    /// Load a source straight onto a deck, skipping its queue
    pub fn load_to_deck(&mut self, id: DeckId, source: &TrackSource) {
        let title = source.title();
        self.deck_mut(id).load(source, &title);
    }

    /// Append a source to a deck's queue
    pub fn enqueue_to_deck(&mut self, id: DeckId, source: TrackSource, title: String) {
        self.deck_mut(id).enqueue(source, title);
    }

    /// "Load" button on a playlist row
    pub fn load_row_to_deck(&mut self, id: DeckId, row: usize) -> bool {
        let Some(source) = self.playlist.get(row).map(|t| t.source.clone()) else {
            return false;
        };
        self.load_to_deck(id, &source);
        true
    }

    /// "Queue" button on a playlist row
    pub fn queue_row_to_deck(&mut self, id: DeckId, row: usize) -> bool {
        let Some(track) = self.playlist.get(row) else {
            return false;
        };
        let source = track.source.clone();
        let title = track.title.clone();
        self.enqueue_to_deck(id, source, title);
        true
    }

    /// "Delete" button on a playlist row; queued copies are unaffected
    pub fn delete_row(&mut self, row: usize) -> bool {
        let removed = self.playlist.remove_at(row);
        if removed {
            self.autosave();
        }
        removed
    }

    /// Add a single source to the playlist
    pub fn add_track(&mut self, source: TrackSource) -> bool {
        let added = self.playlist.add_track(source);
        if added {
            self.autosave();
        }
        added
    }

    /// Files dropped on the playlist; directories are searched recursively
    ///
    /// Returns how many new tracks were added.
    pub fn add_files(&mut self, paths: &[PathBuf]) -> usize {
        let mut added = 0;

        for path in paths {
            if path.is_dir() {
                for file in self.audio_files_in(path) {
                    if self.playlist.add_file(&file) {
                        added += 1;
                    }
                }
            } else if self.config.is_supported_audio(path) {
                if self.playlist.add_file(path) {
                    added += 1;
                }
            } else {
                log::warn!("Not an audio file, ignoring: {:?}", path);
            }
        }

        if added > 0 {
            log::info!("Added {} of {} dropped item(s)", added, paths.len());
            self.autosave();
        }
        added
    }

    /// Write the playlist to its configured location
    pub fn save(&mut self) -> Result<(), PlaylistError> {
        self.playlist.save(&self.config.playlist_path)
    }

    fn audio_files_in(&self, dir: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {:?}: {}", dir, e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.config.is_supported_audio(path))
            .collect()
    }

    fn autosave(&mut self) {
        if !self.config.autosave || !self.playlist.is_dirty() {
            return;
        }
        if let Err(e) = self.save() {
            log::warn!("Autosave to {:?} failed: {}", self.config.playlist_path, e);
        }
    }
}
