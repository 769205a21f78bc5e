//! Leading/trailing silence removal
//!
//! Partitions the waveform into non-overlapping analysis chunks and strips
//! the leading and trailing runs whose short-time level stays at or below
//! the threshold. Trimming precision is bounded by the chunk size.
//!
//! The short-time metric is RMS per chunk in dBFS (the same rule the chunk
//! scan applies from both ends). An entirely quiet waveform trims down to an
//! empty one; that is a valid result, not an error, and downstream stages
//! tolerate it.

use coinbox_core::Waveform;
use tracing::debug;

/// Silence trimmer configured with a threshold and analysis granularity
#[derive(Debug, Clone, Copy)]
pub struct SilenceTrimmer {
    threshold_dbfs: f64,
    chunk_ms: u32,
}

impl SilenceTrimmer {
    /// Create a trimmer
    ///
    /// `threshold_dbfs`: chunks at or below this RMS level count as silence.
    /// `chunk_ms`: analysis chunk size in milliseconds.
    pub fn new(threshold_dbfs: f64, chunk_ms: u32) -> Self {
        Self {
            threshold_dbfs,
            chunk_ms,
        }
    }

    /// Remove leading and trailing silence, returning a new waveform.
    pub fn trim(&self, wave: &Waveform) -> Waveform {
        let channels = wave.format.channels as usize;
        let chunk_frames =
            (wave.format.sample_rate.as_hz() as u64 * u64::from(self.chunk_ms) / 1000) as usize;
        let chunk_frames = chunk_frames.max(1);
        let total_frames = wave.frames();

        if total_frames == 0 {
            return wave.clone();
        }

        let lead_frames = self.leading_quiet_frames(wave, chunk_frames, channels, false);
        let tail_frames = self.leading_quiet_frames(wave, chunk_frames, channels, true);

        if lead_frames + tail_frames >= total_frames {
            debug!("waveform is entirely below the silence threshold");
            return Waveform::empty(wave.format);
        }

        let start = lead_frames * channels;
        let end = (total_frames - tail_frames) * channels;
        let trimmed = wave.samples[start..end].to_vec();

        debug!(
            lead_ms = lead_frames as f64 * 1000.0 / f64::from(wave.format.sample_rate.as_hz()),
            tail_ms = tail_frames as f64 * 1000.0 / f64::from(wave.format.sample_rate.as_hz()),
            "trimmed silence"
        );

        Waveform::new(trimmed, wave.format)
    }

    /// Count quiet frames from one end, at chunk granularity.
    ///
    /// Scans chunk by chunk (from the tail when `reversed`) and stops at the
    /// first chunk whose RMS exceeds the threshold.
    fn leading_quiet_frames(
        &self,
        wave: &Waveform,
        chunk_frames: usize,
        channels: usize,
        reversed: bool,
    ) -> usize {
        let total_frames = wave.frames();
        let mut quiet_frames = 0;
        let mut frame = 0;

        while frame < total_frames {
            let len = chunk_frames.min(total_frames - frame);
            let (start, end) = if reversed {
                ((total_frames - frame - len) * channels, (total_frames - frame) * channels)
            } else {
                (frame * channels, (frame + len) * channels)
            };

            if rms_dbfs(&wave.samples[start..end]) > self.threshold_dbfs {
                break;
            }

            quiet_frames += len;
            frame += len;
        }

        quiet_frames
    }
}

/// RMS level of a sample slice in dBFS; silence measures -inf.
fn rms_dbfs(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return f64::NEG_INFINITY;
    }
    let mean_square =
        samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum::<f64>() / samples.len() as f64;
    if mean_square <= 0.0 {
        f64::NEG_INFINITY
    } else {
        10.0 * mean_square.log10()
    }
}
