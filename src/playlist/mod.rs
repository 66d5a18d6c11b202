//! The persisted playlist
//!
//! An ordered, deduplicated list of known tracks, loaded from and saved to an
//! XML document in the user's documents folder.

mod document;
mod store;

pub use document::{parse_playlist, read_playlist, render_playlist, write_playlist};
pub use store::PlaylistStore;
