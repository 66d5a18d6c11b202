//! Text now-playing display

use super::traits::NowPlayingDisplay;
use crate::analysis::{generate_overview, WaveformOverview, OVERVIEW_COLUMNS};
use crate::model::TrackSource;

const NO_TRACK: &str = "No Track Loaded";

/// Track name, waveform overview and play head of one deck
pub struct TrackDisplay {
    track_name: Option<String>,
    waveform: Option<WaveformOverview>,
    position: f64,
    /// Overview width; 0 skips decoding entirely
    columns: usize,
}

impl TrackDisplay {
    pub fn new() -> Self {
        Self::with_columns(OVERVIEW_COLUMNS)
    }

    pub fn with_columns(columns: usize) -> Self {
        Self {
            track_name: None,
            waveform: None,
            position: 0.0,
            columns,
        }
    }

    /// Display that never decodes audio for a waveform
    pub fn without_waveform() -> Self {
        Self::with_columns(0)
    }

    pub fn track_name(&self) -> &str {
        self.track_name.as_deref().unwrap_or(NO_TRACK)
    }

    pub fn waveform(&self) -> Option<&WaveformOverview> {
        self.waveform.as_ref()
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    /// Name, waveform with play head marker, and percentage
    pub fn render(&self) -> String {
        let waveform = match &self.waveform {
            Some(overview) if !overview.is_empty() => {
                let mut columns: Vec<char> = overview.render().chars().collect();
                let head = ((self.position * columns.len() as f64) as usize).min(columns.len() - 1);
                columns[head] = '|';
                columns.into_iter().collect()
            }
            _ => "File not loaded...".to_string(),
        };

        format!(
            "{}\n  {} {:>3.0}%",
            self.track_name(),
            waveform,
            self.position * 100.0
        )
    }
}

impl Default for TrackDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl NowPlayingDisplay for TrackDisplay {
    fn update_waveform(&mut self, source: &TrackSource) {
        self.position = 0.0;
        self.waveform = None;

        if self.columns == 0 {
            return;
        }

        let Some(path) = source.to_local_path() else {
            log::debug!("No waveform for non-local source {}", source);
            return;
        };

        match generate_overview(&path, self.columns) {
            Ok(overview) => self.waveform = Some(overview),
            Err(e) => log::warn!("Waveform unavailable for {:?}: {:#}", path, e),
        }
    }

    fn update_track_name(&mut self, title: &str) {
        self.track_name = Some(title.to_string());
    }

    fn update_position(&mut self, position: f64) {
        self.position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
    }
}
