//! Library configuration

use std::path::{Path, PathBuf};

/// Where the playlist lives unless told otherwise
pub const DEFAULT_PLAYLIST_PATH: &str = "~/Documents/DJPlaylist.xml";

/// Extensions accepted when files are dropped onto the playlist
pub const DEFAULT_EXTENSIONS: &[&str] = &["wav", "mp3", "aif", "aiff", "flac", "ogg"];

/// Configuration for the playlist and decks
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Persisted playlist document
    pub playlist_path: PathBuf,

    /// Save after every add/delete, not only on shutdown
    pub autosave: bool,

    /// Lower-case file extensions treated as audio
    pub supported_extensions: Vec<String>,
}

impl LibraryConfig {
    /// Create a configuration for the playlist at `playlist_path`
    pub fn new(playlist_path: PathBuf) -> Self {
        Self {
            playlist_path,
            autosave: true,
            supported_extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Enable or disable saving after each change
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    /// Replace the accepted audio extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.supported_extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Whether a dropped file looks like audio we can play
    pub fn is_supported_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.supported_extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(default_playlist_path())
    }
}

/// `~/Documents/DJPlaylist.xml` with `~` expanded
pub fn default_playlist_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_PLAYLIST_PATH).as_ref())
}
