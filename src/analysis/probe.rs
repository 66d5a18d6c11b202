//! Duration probing using lofty and symphonia
//!
//! Durations come from the container header via lofty. Files lofty cannot
//! read, or that report a zero length, fall back to symphonia's frame count.

use super::traits::DurationProbe;
use crate::model::TrackSource;
use anyhow::{Context, Result};
use lofty::prelude::*;
use lofty::probe::Probe;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Reads track durations from local audio files
pub struct MetadataProbe {
    /// Whether to decode headers with symphonia when lofty fails
    symphonia_fallback: bool,
}

impl MetadataProbe {
    pub fn new() -> Self {
        Self {
            symphonia_fallback: true,
        }
    }

    /// Only trust lofty's header parsing
    pub fn without_fallback(mut self) -> Self {
        self.symphonia_fallback = false;
        self
    }
}

impl Default for MetadataProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for MetadataProbe {
    fn probe_duration(&self, source: &TrackSource) -> Result<f64> {
        let path = source
            .to_local_path()
            .with_context(|| format!("Not a local file: {}", source))?;

        match duration_from_tags(&path) {
            Ok(secs) if secs > 0.0 => return Ok(secs),
            Ok(_) => log::debug!("lofty reported zero length for {:?}", path),
            Err(e) => log::debug!("lofty could not read {:?}: {}", path, e),
        }

        if !self.symphonia_fallback {
            anyhow::bail!("No duration available for {:?}", path);
        }

        duration_from_stream(&path)
    }
}

/// Duration from the file's audio properties (header only)
fn duration_from_tags(path: &Path) -> Result<f64> {
    let tagged_file = Probe::open(path)
        .with_context(|| format!("Failed to open audio file: {:?}", path))?
        .read()
        .with_context(|| format!("Failed to read audio properties: {:?}", path))?;

    Ok(tagged_file.properties().duration().as_secs_f64())
}

/// Duration from the stream's frame count and sample rate
fn duration_from_stream(path: &Path) -> Result<f64> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {:?}", path))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(ext.to_str().unwrap_or(""));
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Failed to probe audio format: {:?}", path))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .context("No sample rate in audio track")?;
    let frames = track
        .codec_params
        .n_frames
        .context("Stream does not report its length")?;

    Ok(frames as f64 / sample_rate as f64)
}
