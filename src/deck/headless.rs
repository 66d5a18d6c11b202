//! Playback device without audio output
//!
//! Keeps the transport state a real device would have (loaded source, play
//! head, gain, speed) and probes track lengths from disk, but produces no
//! sound. Time only moves when `advance` is called.

use super::traits::PlaybackDevice;
use crate::analysis::{DurationProbe, MetadataProbe};
use crate::model::{format_duration, TrackSource};
use anyhow::Result;
use std::time::Duration;

pub struct HeadlessDeck<P: DurationProbe = MetadataProbe> {
    probe: P,
    loaded: Option<TrackSource>,
    length_secs: f64,
    position_secs: f64,
    playing: bool,
    gain: f64,
    speed: f64,
}

impl HeadlessDeck<MetadataProbe> {
    pub fn new() -> Self {
        Self::with_probe(MetadataProbe::new())
    }
}

impl Default for HeadlessDeck<MetadataProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DurationProbe> HeadlessDeck<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            loaded: None,
            length_secs: 0.0,
            position_secs: 0.0,
            playing: false,
            gain: 1.0,
            speed: 1.0,
        }
    }

    pub fn loaded(&self) -> Option<&TrackSource> {
        self.loaded.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn length_secs(&self) -> f64 {
        self.length_secs
    }

    pub fn position_secs(&self) -> f64 {
        self.position_secs
    }

    /// Move the play head as if `elapsed` wall time had passed
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.playing {
            return;
        }

        self.position_secs += elapsed.as_secs_f64() * self.speed;
        if self.position_secs >= self.length_secs {
            self.position_secs = self.length_secs;
            self.playing = false;
            log::debug!("Reached end of {:?}", self.loaded);
        }
    }

    /// One-line transport summary
    pub fn status_line(&self) -> String {
        let state = if self.playing { "playing" } else { "stopped" };
        format!(
            "{} {}/{} gain {:.2} speed {:.2}x",
            state,
            format_duration(self.position_secs),
            format_duration(self.length_secs),
            self.gain,
            self.speed
        )
    }
}

impl<P: DurationProbe> DurationProbe for HeadlessDeck<P> {
    fn probe_duration(&self, source: &TrackSource) -> Result<f64> {
        self.probe.probe_duration(source)
    }
}

impl<P: DurationProbe> PlaybackDevice for HeadlessDeck<P> {
    fn load_source(&mut self, source: &TrackSource) {
        self.length_secs = match self.probe.probe_duration(source) {
            Ok(secs) => secs,
            Err(e) => {
                log::warn!("Could not read length of {}: {:#}", source, e);
                0.0
            }
        };
        self.loaded = Some(source.clone());
        self.position_secs = 0.0;
        self.playing = false;
    }

    fn start(&mut self) {
        self.playing = self.loaded.is_some();
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
    }

    fn set_speed(&mut self, ratio: f64) {
        self.speed = ratio;
    }

    fn set_position_relative(&mut self, position: f64) {
        self.position_secs = position * self.length_secs;
    }

    fn position_relative(&self) -> f64 {
        if self.length_secs > 0.0 {
            self.position_secs / self.length_secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TenSeconds;

    impl DurationProbe for TenSeconds {
        fn probe_duration(&self, _source: &TrackSource) -> Result<f64> {
            Ok(10.0)
        }
    }

    #[test]
    fn test_start_requires_loaded_track() {
        let mut device = HeadlessDeck::with_probe(TenSeconds);
        device.start();
        assert!(!device.is_playing());

        device.load_source(&TrackSource::parse("/music/a.wav"));
        assert!(!device.is_playing());
        device.start();
        assert!(device.is_playing());
    }

    #[test]
    fn test_advance_respects_speed_and_stops_at_end() {
        let mut device = HeadlessDeck::with_probe(TenSeconds);
        device.load_source(&TrackSource::parse("/music/a.wav"));
        device.set_speed(2.0);
        device.start();

        device.advance(Duration::from_secs(2));
        assert!((device.position_relative() - 0.4).abs() < 1e-9);

        device.advance(Duration::from_secs(60));
        assert_eq!(device.position_relative(), 1.0);
        assert!(!device.is_playing());
    }

    #[test]
    fn test_seek_is_relative_to_length() {
        let mut device = HeadlessDeck::with_probe(TenSeconds);
        device.load_source(&TrackSource::parse("/music/a.wav"));
        device.set_position_relative(0.5);
        assert_eq!(device.position_secs(), 5.0);
        assert_eq!(device.status_line(), "stopped 0:05/0:10 gain 1.00 speed 1.00x");
    }

    #[test]
    fn test_unreadable_track_has_no_length() {
        let mut device = HeadlessDeck::new();
        device.load_source(&TrackSource::parse("/nonexistent/a.wav"));
        assert_eq!(device.length_secs(), 0.0);
        assert_eq!(device.position_relative(), 0.0);
    }
}
