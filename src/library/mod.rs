//! Library coordination: the playlist, both decks, and the actions between them

pub mod config;
pub mod coordinator;

pub use config::{default_playlist_path, LibraryConfig};
pub use coordinator::LibraryCoordinator;
