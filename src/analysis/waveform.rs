//! Waveform overview generation
//!
//! Decodes a whole track to mono and reduces it to one peak value per column,
//! scaled so the loudest column reaches 1.0. This is what a deck shows while a
//! track is loaded. Peaks are folded into bins while decoding, so memory stays
//! bounded by the bin count rather than the track length.

use super::traits::WaveformOverview;
use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Default number of columns in an overview
pub const OVERVIEW_COLUMNS: usize = 64;

/// Frames per bin when the decoder cannot tell the track length up front
const UNKNOWN_LENGTH_BIN_FRAMES: u64 = 4096;

/// Decode an audio file and build its overview
pub fn generate_overview(audio_path: &Path, columns: usize) -> Result<WaveformOverview> {
    log::debug!("Generating waveform overview for {:?}", audio_path);

    let (bins, frames, sample_rate) = decode_mono_peaks(audio_path, columns)?;
    let overview = WaveformOverview {
        peaks: reduce_peaks(&bins, columns),
        duration_secs: duration_of(frames, sample_rate),
    };

    log::debug!(
        "Overview: {} columns from {} frames ({:.1}s)",
        overview.peaks.len(),
        frames,
        overview.duration_secs
    );

    Ok(overview)
}

/// Reduce mono samples to `columns` normalised peaks
pub fn overview_from_samples(samples: &[f32], sample_rate: u32, columns: usize) -> WaveformOverview {
    WaveformOverview {
        peaks: reduce_peaks(samples, columns),
        duration_secs: duration_of(samples.len() as u64, sample_rate),
    }
}

fn duration_of(frames: u64, sample_rate: u32) -> f64 {
    if sample_rate > 0 {
        frames as f64 / sample_rate as f64
    } else {
        0.0
    }
}

/// Group `values` into at most `columns` peaks, scaled so the loudest is 1.0
fn reduce_peaks(values: &[f32], columns: usize) -> Vec<f32> {
    if values.is_empty() || columns == 0 {
        return Vec::new();
    }

    // Short tracks get fewer columns rather than empty ones
    let columns = columns.min(values.len());
    let mut peaks = Vec::with_capacity(columns);

    for col in 0..columns {
        let start = col * values.len() / columns;
        let end = ((col + 1) * values.len() / columns).min(values.len());
        peaks.push(column_peak(&values[start..end]));
    }

    let loudest = peaks.iter().copied().fold(0.0f32, f32::max);
    if loudest > 0.0 {
        for peak in &mut peaks {
            *peak /= loudest;
        }
    }

    peaks
}

fn column_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Running per-bin peaks of a mono stream
struct PeakAccumulator {
    bin_frames: u64,
    bins: Vec<f32>,
    current: f32,
    in_bin: u64,
    frames: u64,
}

impl PeakAccumulator {
    /// Size bins so a track of `n_frames` fills at most `columns` of them
    fn new(n_frames: Option<u64>, columns: usize) -> Self {
        let bin_frames = match n_frames {
            Some(n) if n > 0 => n.div_ceil(columns.max(1) as u64),
            _ => UNKNOWN_LENGTH_BIN_FRAMES,
        };

        Self {
            bin_frames,
            bins: Vec::new(),
            current: 0.0,
            in_bin: 0,
            frames: 0,
        }
    }

    fn push(&mut self, sample: f32) {
        self.current = self.current.max(sample.abs());
        self.in_bin += 1;
        self.frames += 1;

        if self.in_bin == self.bin_frames {
            self.bins.push(self.current);
            self.current = 0.0;
            self.in_bin = 0;
        }
    }

    /// Bin peaks and the total number of frames seen
    fn finish(mut self) -> (Vec<f32>, u64) {
        if self.in_bin > 0 {
            self.bins.push(self.current);
        }
        (self.bins, self.frames)
    }
}

/// Decode an audio file to mono and fold it into peak bins
fn decode_mono_peaks(path: &Path, columns: usize) -> Result<(Vec<f32>, u64, u32)> {
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

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("No sample rate in audio track")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut peaks = PeakAccumulator::new(track.codec_params.n_frames, columns);

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Error reading packet: {:?}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Error decoding packet: {:?}", e);
                continue;
            }
        };

        let spec = *decoded.spec();
        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let channels = spec.channels.count();
        if channels > 1 {
            for frame in sample_buf.samples().chunks(channels) {
                peaks.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            for &sample in sample_buf.samples() {
                peaks.push(sample);
            }
        }
    }

    let (bins, frames) = peaks.finish();
    Ok((bins, frames, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_normalises_peaks() {
        let samples = vec![0.1, -0.2, 0.05, 0.0, 0.4, -0.1, 0.2, 0.2];
        let overview = overview_from_samples(&samples, 4, 4);

        assert_eq!(overview.peaks.len(), 4);
        assert!((overview.peaks[2] - 1.0).abs() < 1e-6);
        assert!((overview.peaks[0] - 0.5).abs() < 1e-6);
        assert!((overview.duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_overview_of_short_input_uses_fewer_columns() {
        let overview = overview_from_samples(&[0.5, -0.5], 44100, 64);
        assert_eq!(overview.peaks.len(), 2);
    }

    #[test]
    fn test_overview_of_silence_stays_flat() {
        let overview = overview_from_samples(&[0.0; 100], 100, 10);
        assert!(overview.peaks.iter().all(|&p| p == 0.0));
        assert_eq!(overview.render(), "▁".repeat(10));
    }

    #[test]
    fn test_known_length_bins_fit_the_columns() {
        let mut acc = PeakAccumulator::new(Some(1000), 64);
        for i in 0..1000 {
            acc.push(if i == 999 { -0.8 } else { 0.1 });
        }
        let (bins, frames) = acc.finish();

        assert_eq!(frames, 1000);
        assert!(bins.len() <= 64);
        assert!((bins[bins.len() - 1] - 0.8).abs() < 1e-6);

        let peaks = reduce_peaks(&bins, 64);
        assert_eq!(peaks.len(), bins.len());
        assert!((peaks[peaks.len() - 1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_length_uses_fixed_bins() {
        let mut acc = PeakAccumulator::new(None, 64);
        for _ in 0..10_000 {
            acc.push(0.25);
        }
        let (bins, frames) = acc.finish();

        assert_eq!(frames, 10_000);
        assert_eq!(bins.len(), 3);
        assert_eq!(reduce_peaks(&bins, 64), vec![1.0; 3]);
    }

    #[test]
    fn test_generate_overview_requires_file() {
        assert!(generate_overview(Path::new("/nonexistent/file.wav"), 16).is_err());
    }
}
