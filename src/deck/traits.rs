//! Collaborator contracts a deck is built from

use crate::analysis::DurationProbe;
use crate::model::TrackSource;

/// Playback backend for one deck
///
/// Calls are short control operations; any decoding or buffering happens
/// inside the implementation and is not awaited.
pub trait PlaybackDevice: DurationProbe {
    /// Begin preparing `source` for playback
    fn load_source(&mut self, source: &TrackSource);

    fn start(&mut self);

    fn stop(&mut self);

    /// Output gain, 0.0-1.0
    fn set_gain(&mut self, gain: f64);

    /// Playback speed ratio, 0.0-3.0
    fn set_speed(&mut self, ratio: f64);

    /// Seek to a fraction of the loaded track, 0.0-1.0
    fn set_position_relative(&mut self, position: f64);

    /// Current play head as a fraction of the loaded track
    fn position_relative(&self) -> f64;
}

/// What a deck shows about its loaded track
pub trait NowPlayingDisplay {
    /// Show the waveform of `source`
    fn update_waveform(&mut self, source: &TrackSource);

    /// Show `title` as the loaded track's name
    fn update_track_name(&mut self, title: &str);

    /// Move the play head marker, 0.0-1.0
    fn update_position(&mut self, position: f64);
}
