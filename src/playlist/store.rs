use super::document::{read_playlist, write_playlist};
use crate::analysis::DurationProbe;
use crate::error::PlaylistError;
use crate::model::{TrackRecord, TrackSource};
use std::path::Path;

/// Ordered, deduplicated collection of playlist entries
///
/// Rows are addressed by position only. Any index handed out before a
/// mutation may point at a different track afterwards.
pub struct PlaylistStore<P: DurationProbe> {
    /// Entries in display order; no two share a source
    tracks: Vec<TrackRecord>,

    /// Where durations come from when a track is added
    probe: P,

    /// Bumped on every structural change so views know to refresh
    revision: u64,

    /// Revision that was last loaded from or written to disk
    saved_revision: u64,
}

impl<P: DurationProbe> PlaylistStore<P> {
    /// Create an empty store
    pub fn new(probe: P) -> Self {
        Self {
            tracks: Vec::new(),
            probe,
            revision: 0,
            saved_revision: 0,
        }
    }

    /// Add a track unless its source is already present
    ///
    /// Returns `false` for a duplicate. A failed duration probe still adds the
    /// track, with a duration of 0.
    pub fn add_track(&mut self, source: TrackSource) -> bool {
        if self.contains(&source) {
            log::debug!("Already in playlist: {}", source);
            return false;
        }

        let duration_secs = match self.probe.probe_duration(&source) {
            Ok(secs) => secs,
            Err(e) => {
                log::debug!("No duration for {}: {:#}", source, e);
                0.0
            }
        };

        let record = TrackRecord::new(source, duration_secs);
        log::info!("Added to playlist: {} ({})", record.title, record.length_label());
        self.tracks.push(record);
        self.touch();
        true
    }

    /// Add a file from disk; missing files and non-files are ignored
    pub fn add_file(&mut self, path: &Path) -> bool {
        if !path.is_file() {
            log::warn!("Not a file, ignoring: {:?}", path);
            return false;
        }

        self.add_track(TrackSource::from_file(path))
    }

    /// Remove the entry at `index`; later entries shift down by one
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.tracks.len() {
            return false;
        }

        let removed = self.tracks.remove(index);
        log::info!("Removed from playlist: {}", removed.title);
        self.touch();
        true
    }

    pub fn get(&self, index: usize) -> Option<&TrackRecord> {
        self.tracks.get(index)
    }

    /// Whether a track with exactly this source is present
    pub fn contains(&self, source: &TrackSource) -> bool {
        self.tracks.iter().any(|t| &t.source == source)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// All entries in display order
    pub fn tracks(&self) -> &[TrackRecord] {
        &self.tracks
    }

    /// Changes whenever rows are added or removed
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether there are changes that have not been saved
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Replace the contents with the document at `path`
    ///
    /// A missing or unreadable document leaves the store empty. Returns the
    /// number of entries loaded.
    pub fn load(&mut self, path: &Path) -> usize {
        self.tracks = if path.exists() {
            match read_playlist(path) {
                Ok(tracks) => tracks,
                Err(e) => {
                    log::warn!("Ignoring unreadable playlist {:?}: {}", path, e);
                    Vec::new()
                }
            }
        } else {
            log::info!("No playlist at {:?}, starting empty", path);
            Vec::new()
        };

        self.touch();
        self.saved_revision = self.revision;
        log::info!("Loaded {} tracks from {:?}", self.tracks.len(), path);
        self.tracks.len()
    }

    /// Write the contents to `path`, replacing any existing file
    pub fn save(&mut self, path: &Path) -> Result<(), PlaylistError> {
        write_playlist(path, &self.tracks)?;
        self.saved_revision = self.revision;
        log::info!("Saved {} tracks to {:?}", self.tracks.len(), path);
        Ok(())
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
