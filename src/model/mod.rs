//! Track data model
//!
//! Track records and the source references that identify them. These types are
//! independent of the persisted document format and of any playback backend.

mod source;
mod track;

pub use source::TrackSource;
pub use track::{format_duration, sanitize_duration, TrackRecord};
