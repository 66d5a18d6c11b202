//! Canonical track source references
//!
//! A source is stored as a `file://` URI string. Equality on that string is the
//! only identity a playlist entry has, so every way of building a source from a
//! filesystem path must produce the same text for the same path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

const FILE_SCHEME: &str = "file://";

/// Opaque reference to an audio file (a URI, usually `file://`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackSource(String);

impl TrackSource {
    /// Build a `file://` source from a filesystem path, percent-encoding each segment
    pub fn from_path(path: &Path) -> Self {
        let raw = path.to_string_lossy();
        let encoded: Vec<String> = raw
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        Self(format!("{}{}", FILE_SCHEME, encoded.join("/")))
    }

    /// Build a source for a file on disk, resolving `..` and symlinks
    ///
    /// Falls back to the absolute (unresolved) path when the file cannot be
    /// canonicalized, e.g. because it no longer exists.
    pub fn from_file(path: &Path) -> Self {
        let resolved = std::fs::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf());
        Self::from_path(&resolved)
    }

    /// Rewrite a local URI into the form `from_path` produces
    ///
    /// Non-local sources are returned unchanged.
    pub fn normalized(self) -> Self {
        match self.to_local_path() {
            Some(path) => Self::from_path(&path),
            None => self,
        }
    }

    /// Wrap a URI string as-is
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Interpret user input: anything with a scheme is a URI, everything else a path
    pub fn parse(input: &str) -> Self {
        if input.contains("://") {
            Self::from_uri(input)
        } else {
            Self::from_path(Path::new(input))
        }
    }

    /// The canonical string form used for equality and persistence
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this source refers to a file on the local filesystem
    pub fn is_local(&self) -> bool {
        self.to_local_path().is_some()
    }

    /// Convert a `file://` URI back to a path
    pub fn to_local_path(&self) -> Option<PathBuf> {
        self.0
            .strip_prefix(FILE_SCHEME)
            .filter(|rest| !rest.is_empty())
            .and_then(|rest| urlencoding::decode(rest).ok())
            .map(|decoded| PathBuf::from(decoded.into_owned()))
    }

    /// Display title: the file name without its extension
    pub fn title(&self) -> String {
        let name = match self.to_local_path() {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            None => {
                let last = self.0.rsplit('/').next().unwrap_or(&self.0);
                urlencoding::decode(last)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| last.to_string())
            }
        };

        match Path::new(&name).file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None if name.is_empty() => self.0.clone(),
            None => name,
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Path> for TrackSource {
    fn from(path: &Path) -> Self {
        Self::from_path(path)
    }
}

impl From<&str> for TrackSource {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_encodes_segments() {
        let source = TrackSource::from_path(Path::new("/music/My Song #1.wav"));
        assert_eq!(source.as_str(), "file:///music/My%20Song%20%231.wav");
        assert_eq!(
            source.to_local_path(),
            Some(PathBuf::from("/music/My Song #1.wav"))
        );
    }

    #[test]
    fn test_parse_keeps_uris() {
        let remote = TrackSource::parse("https://example.com/mix.mp3");
        assert_eq!(remote.as_str(), "https://example.com/mix.mp3");
        assert!(!remote.is_local());
        assert_eq!(remote.title(), "mix");

        let local = TrackSource::parse("a.wav");
        assert!(local.is_local());
        assert_eq!(local.title(), "a");
    }

    #[test]
    fn test_title_strips_only_last_extension() {
        let source = TrackSource::from_path(Path::new("/music/live.set.flac"));
        assert_eq!(source.title(), "live.set");

        let bare = TrackSource::from_path(Path::new("/music/intro"));
        assert_eq!(bare.title(), "intro");
    }

    #[test]
    fn test_normalized_encodes_raw_local_uris() {
        let raw = TrackSource::from_uri("file:///music/My Song.wav");
        assert_eq!(raw.normalized().as_str(), "file:///music/My%20Song.wav");

        let remote = TrackSource::from_uri("http://example.com/a b.mp3");
        assert_eq!(remote.clone().normalized(), remote);
    }

    #[test]
    fn test_from_file_resolves_parent_components() {
        let dir = tempfile::tempdir().unwrap();
        let music = dir.path().join("music");
        std::fs::create_dir_all(&music).unwrap();
        let file = music.join("a.wav");
        std::fs::write(&file, b"RIFF").unwrap();

        let direct = TrackSource::from_file(&file);
        let roundabout = TrackSource::from_file(&music.join("..").join("music").join("a.wav"));
        assert_eq!(direct, roundabout);
    }

    #[test]
    fn test_empty_file_uri_is_not_local() {
        assert!(!TrackSource::from_uri("file://").is_local());
    }
}
