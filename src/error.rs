//! Error types shared across the crate

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading or writing a persisted playlist document
#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("playlist file I/O failed for {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("playlist document is not well-formed XML")]
    Xml(#[from] quick_xml::Error),

    #[error("playlist document I/O failed")]
    Write(#[from] std::io::Error),

    #[error("unexpected root element <{0}>, expected <PLAYLIST>")]
    UnexpectedRoot(String),
}

/// A deck number outside the fixed set of decks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown deck {0}, expected 1 or 2")]
pub struct DeckIdError(pub u8);
