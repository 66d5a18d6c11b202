//! Otodecks - track library and deck queues for a two-deck DJ setup
//!
//! This library keeps the persisted playlist, a pending-track queue per deck,
//! and the actions that move tracks between them. Playback and display are
//! collaborators behind traits, so any audio backend or UI can drive it.

pub mod analysis;
pub mod deck;
pub mod error;
pub mod library;
pub mod model;
pub mod playlist;

pub use deck::{Deck, DeckId};
pub use library::{LibraryConfig, LibraryCoordinator};
pub use playlist::PlaylistStore;
