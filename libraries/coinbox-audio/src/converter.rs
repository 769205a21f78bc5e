//! Device format conversion
//!
//! Final, lossy stage of the pipeline: downmix to mono, resample to the
//! device playback rate, and requantize to 8-bit unsigned PCM. Runs after
//! loudness correction; nothing may alter the signal afterwards.
//!
//! - Downmix rule: arithmetic mean of the input channels per time index.
//! - Requantization maps [-1.0, 1.0) linearly onto [0, 255] with 128 as
//!   zero amplitude, using rounding rather than truncation.

use crate::error::{AudioError, Result};
use crate::resampler::resample_mono;
use coinbox_core::{SampleRate, Waveform};
use tracing::debug;

/// 8-bit unsigned PCM in the fixed device format (mono)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSample {
    /// Raw PCM bytes, one per frame, 128 = silence
    pub pcm: Vec<u8>,
    /// Playback sample rate
    pub sample_rate: SampleRate,
}

impl DeviceSample {
    /// Number of frames (one byte per frame)
    pub fn frames(&self) -> usize {
        self.pcm.len()
    }

    /// Duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.frames() as f64 * 1000.0 / f64::from(self.sample_rate.as_hz())
    }

    /// Check if the sample is empty
    pub fn is_empty(&self) -> bool {
        self.pcm.is_empty()
    }
}

/// Converter from an arbitrary waveform to the device playback format
#[derive(Debug, Clone, Copy)]
pub struct FormatConverter {
    output_rate: SampleRate,
}

impl FormatConverter {
    /// Create a converter targeting the given output rate
    pub fn new(output_rate: SampleRate) -> Self {
        Self { output_rate }
    }

    /// Convert a waveform to mono 8-bit unsigned PCM at the output rate
    pub fn convert(&self, wave: &Waveform) -> Result<DeviceSample> {
        if wave.format.channels == 0 {
            return Err(AudioError::InvalidBuffer("channel count is zero".into()));
        }

        let mono = downmix_to_mono(wave);
        let resampled = resample_mono(
            &mono,
            wave.format.sample_rate.as_hz(),
            self.output_rate.as_hz(),
        )?;
        let pcm = quantize_u8(&resampled);

        debug!(
            input_rate = wave.format.sample_rate.as_hz(),
            input_channels = wave.format.channels,
            output_rate = self.output_rate.as_hz(),
            output_frames = pcm.len(),
            "converted to device format"
        );

        Ok(DeviceSample {
            pcm,
            sample_rate: self.output_rate,
        })
    }
}

/// Downmix interleaved samples to mono by arithmetic mean of the channels.
pub fn downmix_to_mono(wave: &Waveform) -> Vec<f32> {
    let channels = wave.format.channels as usize;
    if channels <= 1 {
        return wave.samples.clone();
    }

    wave.samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Requantize normalized floats to 8-bit unsigned PCM.
///
/// [-1.0, 1.0) maps linearly to [0, 255] with 128 = zero; values are
/// rounded, and anything outside the representable range clamps to the rail.
pub fn quantize_u8(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .map(|&s| {
            let level = (f64::from(s) * 128.0).round() as i32 + 128;
            level.clamp(0, 255) as u8
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbox_core::{AudioFormat, SampleRate, Waveform};

    #[test]
    fn quantize_maps_zero_to_128() {
        assert_eq!(quantize_u8(&[0.0]), vec![128]);
    }

    #[test]
    fn quantize_full_scale_and_clamp() {
        // -1.0 hits the bottom rail, +1.0 clamps to the top one
        assert_eq!(quantize_u8(&[-1.0, 1.0, 2.0, -2.0]), vec![0, 255, 255, 0]);
    }

    #[test]
    fn quantize_rounds_instead_of_truncating() {
        // 0.9 * 128 = 115.2 -> 115; 0.996 * 128 = 127.5 -> rounds away from zero
        assert_eq!(quantize_u8(&[0.9]), vec![243]);
        assert_eq!(quantize_u8(&[0.996_093_75]), vec![255]);
    }

    #[test]
    fn downmix_averages_channels() {
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);
        let wave = Waveform::new(vec![0.5, -0.5, 1.0, 0.0], format);
        assert_eq!(downmix_to_mono(&wave), vec![0.0, 0.5]);
    }

    #[test]
    fn downmix_mono_is_identity() {
        let format = AudioFormat::new(SampleRate::new(44_100), 1, 16);
        let wave = Waveform::new(vec![0.1, 0.2, 0.3], format);
        assert_eq!(downmix_to_mono(&wave), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn convert_produces_device_rate_pcm() {
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);
        let samples: Vec<f32> = (0..44_100 * 2)
            .map(|i| {
                let t = (i / 2) as f32 / 44_100.0;
                0.5 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect();
        let wave = Waveform::new(samples, format);

        let converter = FormatConverter::new(SampleRate::DEVICE);
        let sample = converter.convert(&wave).unwrap();

        assert_eq!(sample.sample_rate, SampleRate::DEVICE);
        assert_eq!(sample.frames(), 16_000);
        assert!((sample.duration_ms() - 1000.0).abs() < 1.0);
    }

    #[test]
    fn convert_empty_waveform_is_valid() {
        let wave = Waveform::empty(AudioFormat::new(SampleRate::new(44_100), 2, 16));
        let converter = FormatConverter::new(SampleRate::DEVICE);
        let sample = converter.convert(&wave).unwrap();
        assert!(sample.is_empty());
    }
}
