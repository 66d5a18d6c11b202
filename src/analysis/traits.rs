//! Analysis trait definitions and data structures

use crate::model::TrackSource;
use anyhow::Result;

/// Metadata probe - reports how long a source plays for
///
/// Implemented by the playback backend; the playlist only needs this one call.
pub trait DurationProbe {
    /// Duration of the source in seconds
    fn probe_duration(&self, source: &TrackSource) -> Result<f64>;
}

impl<P: DurationProbe + ?Sized> DurationProbe for &P {
    fn probe_duration(&self, source: &TrackSource) -> Result<f64> {
        (**self).probe_duration(source)
    }
}

impl<P: DurationProbe + ?Sized> DurationProbe for Box<P> {
    fn probe_duration(&self, source: &TrackSource) -> Result<f64> {
        (**self).probe_duration(source)
    }
}

/// Low-resolution amplitude overview of a whole track
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformOverview {
    /// Peak amplitude per column, normalised to 0.0-1.0
    pub peaks: Vec<f32>,

    /// Decoded length in seconds
    pub duration_secs: f64,
}

impl WaveformOverview {
    /// Render the overview as a single line of block characters
    pub fn render(&self) -> String {
        const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        self.peaks
            .iter()
            .map(|&peak| {
                let level = (peak.clamp(0.0, 1.0) * (LEVELS.len() - 1) as f32).round() as usize;
                LEVELS[level]
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }
}
