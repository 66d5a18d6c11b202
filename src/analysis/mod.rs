//! Audio analysis layer
//!
//! Duration probing for playlist entries and waveform overviews for decks.
//! The probe sits behind a trait so tests and offline sessions can swap it out.

mod probe;
mod stub;
mod traits;
mod waveform;

pub use probe::MetadataProbe;
pub use stub::StubProbe;
pub use traits::{DurationProbe, WaveformOverview};
pub use waveform::{generate_overview, overview_from_samples, OVERVIEW_COLUMNS};
