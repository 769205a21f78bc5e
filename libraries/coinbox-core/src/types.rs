/// Audio-related types
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// CD quality (44.1 kHz)
    pub const CD_QUALITY: Self = Self(44_100);
    /// Coinbox playback rate (16 kHz), fixed by the device firmware
    pub const DEVICE: Self = Self(16_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

/// Audio format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo, etc.)
    pub channels: u16,

    /// Bits per sample of the source material.
    ///
    /// Decoded samples are always stored as normalized f32; this records the
    /// bit depth of the original PCM so downstream stages know the source
    /// full-scale value.
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
        }
    }

    /// The fixed device playback format: mono, 16 kHz, 8-bit unsigned PCM
    pub fn device() -> Self {
        Self {
            sample_rate: SampleRate::DEVICE,
            channels: 1,
            bits_per_sample: 8,
        }
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * u32::from(self.channels) * u32::from(self.bits_per_sample) / 8
    }
}

/// Decoded audio signal plus its format metadata
///
/// Samples are stored as f32 in the range [-1.0, 1.0), interleaved
/// ([L, R, L, R, ...] for stereo). Every pipeline stage consumes a `Waveform`
/// and returns a new, fully independent one; no stage retains a reference to
/// its input.
#[derive(Debug, Clone)]
pub struct Waveform {
    /// Audio samples (f32, interleaved)
    pub samples: Vec<f32>,

    /// Audio format information
    pub format: AudioFormat,
}

impl Waveform {
    /// Create a new waveform
    pub fn new(samples: Vec<f32>, format: AudioFormat) -> Self {
        Self { samples, format }
    }

    /// Create an empty waveform with the given format
    pub fn empty(format: AudioFormat) -> Self {
        Self {
            samples: Vec::new(),
            format,
        }
    }

    /// Get the number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels as usize
    }

    /// Get the duration in seconds (always recomputed, never cached)
    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / f64::from(self.format.sample_rate.as_hz())
    }

    /// Get the duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.duration_secs() * 1000.0
    }

    /// Check if the waveform is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the length in samples (all channels)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check the structural invariants: a positive sample rate, a positive
    /// channel count, and a sample buffer length that is an exact multiple of
    /// the channel count.
    pub fn validate(&self) -> Result<()> {
        if self.format.sample_rate.as_hz() == 0 {
            return Err(CoreError::invalid_waveform("sample rate is zero"));
        }
        if self.format.channels == 0 {
            return Err(CoreError::invalid_waveform("channel count is zero"));
        }
        if self.samples.len() % self.format.channels as usize != 0 {
            return Err(CoreError::invalid_waveform(format!(
                "sample count {} is not a multiple of channel count {}",
                self.samples.len(),
                self.format.channels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_rate_common_values() {
        assert_eq!(SampleRate::CD_QUALITY.as_hz(), 44_100);
        assert_eq!(SampleRate::DEVICE.as_hz(), 16_000);
    }

    #[test]
    fn device_format_byte_rate() {
        // 16000 Hz * 1 channel * 8 bits / 8 = 16000 bytes/sec, block align 1
        assert_eq!(AudioFormat::device().byte_rate(), 16_000);
    }

    #[test]
    fn waveform_frames_calculation() {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
        // 8 samples with 2 channels = 4 frames
        let wave = Waveform::new(vec![0.0; 8], format);
        assert_eq!(wave.frames(), 4);
    }

    #[test]
    fn waveform_duration() {
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);
        // 88200 samples with 2 channels = 44100 frames = 1 second
        let wave = Waveform::new(vec![0.0; 88_200], format);
        assert!((wave.duration_secs() - 1.0).abs() < 0.01);
        assert!((wave.duration_ms() - 1000.0).abs() < 0.01);
    }

    #[test]
    fn waveform_invariants() {
        let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
        assert!(Waveform::new(vec![0.0; 8], format).validate().is_ok());
        // 7 samples with 2 channels violates the interleaving invariant
        assert!(Waveform::new(vec![0.0; 7], format).validate().is_err());

        let bad_rate = AudioFormat::new(SampleRate::new(0), 1, 16);
        assert!(Waveform::new(vec![0.0; 4], bad_rate).validate().is_err());
    }

    #[test]
    fn empty_waveform_is_valid() {
        // An all-silence source trims down to nothing; that is a valid
        // waveform, not an error.
        let wave = Waveform::empty(AudioFormat::device());
        assert!(wave.validate().is_ok());
        assert_eq!(wave.duration_ms(), 0.0);
    }
}
