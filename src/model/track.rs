use super::TrackSource;
use serde::{Deserialize, Serialize};

/// A playlist entry: display title, source reference and duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Display name, derived from the source file name minus extension
    pub title: String,

    /// Where the audio lives
    pub source: TrackSource,

    /// Track duration in seconds (0 when unknown)
    pub duration_secs: f64,
}

impl TrackRecord {
    /// Create a record, deriving the title from the source
    pub fn new(source: TrackSource, duration_secs: f64) -> Self {
        Self {
            title: source.title(),
            source,
            duration_secs: sanitize_duration(duration_secs),
        }
    }

    /// Create a record with an explicit title
    pub fn with_title(title: String, source: TrackSource, duration_secs: f64) -> Self {
        Self {
            title,
            source,
            duration_secs: sanitize_duration(duration_secs),
        }
    }

    /// Duration formatted as `m:ss`
    pub fn length_label(&self) -> String {
        format_duration(self.duration_secs)
    }
}

/// Durations are non-negative and finite; anything else is "unknown"
pub fn sanitize_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

/// Format seconds as `m:ss`, truncating fractional seconds
pub fn format_duration(secs: f64) -> String {
    let total = sanitize_duration(secs) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}
