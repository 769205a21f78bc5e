/// Pipeline configuration
///
/// These values are deploy-time constants shared between the preparation
/// pipeline (producer) and the device firmware playback routine (consumer).
/// They are not user-adjustable at runtime; both sides must agree on the
/// output format or playback misbehaves.
use serde::{Deserialize, Serialize};

use crate::types::SampleRate;

/// Silence threshold for leading/trailing trim, in dBFS
pub const SILENCE_THRESH_DBFS: f64 = -50.0;

/// Analysis granularity for silence detection, in milliseconds
pub const CHUNK_MS: u32 = 10;

/// Maximum sample length, in milliseconds (5 seconds)
pub const MAX_LENGTH_MS: u32 = 5_000;

/// Target integrated loudness, in LUFS
pub const TARGET_LUFS: f64 = -16.0;

/// High-pass cutoff to remove low rumble, in Hz
pub const CUTOFF_HZ: f64 = 1_000.0;

/// Static parameter set for the sample preparation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Chunks at or below this short-time level are considered silence (dBFS)
    pub silence_thresh_dbfs: f64,
    /// Silence analysis chunk size (ms); bounds trimming precision
    pub chunk_ms: u32,
    /// Hard cap on output duration (ms)
    pub max_length_ms: u32,
    /// Target integrated loudness (LUFS)
    pub target_lufs: f64,
    /// High-pass cutoff frequency (Hz)
    pub cutoff_hz: f64,
    /// Fixed device output sample rate (Hz)
    pub output_sample_rate: SampleRate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            silence_thresh_dbfs: SILENCE_THRESH_DBFS,
            chunk_ms: CHUNK_MS,
            max_length_ms: MAX_LENGTH_MS,
            target_lufs: TARGET_LUFS,
            cutoff_hz: CUTOFF_HZ,
            output_sample_rate: SampleRate::DEVICE,
        }
    }
}

impl PipelineConfig {
    /// Maximum data chunk size of the output WAV in bytes
    /// (mono, 8-bit, so one byte per frame)
    pub fn max_output_bytes(&self) -> u32 {
        self.output_sample_rate.as_hz() * self.max_length_ms / 1000
    }
}
