//! Loudness normalization
//!
//! Applies a uniform gain so the waveform's integrated loudness lands on the
//! configured target. The gain in dB is simply `target − measured`.
//!
//! Clipping policy: samples pushed outside [-1.0, 1.0] by the gain are
//! hard-clipped at full scale. The same rule applies to every input, which
//! keeps the stage deterministic.

use crate::error::{LoudnessError, Result};
use coinbox_core::{LoudnessMeter, Waveform};
use tracing::debug;

/// Loudness normalizer for the preparation pipeline
///
/// # Example
///
/// ```ignore
/// use coinbox_loudness::{Ebur128Meter, LoudnessNormalizer};
///
/// let normalizer = LoudnessNormalizer::new(-16.0);
/// let normalized = normalizer.normalize(waveform, &Ebur128Meter::new())?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoudnessNormalizer {
    /// Target integrated loudness in LUFS
    target_lufs: f64,
}

impl LoudnessNormalizer {
    /// Create a normalizer for the given target loudness
    pub fn new(target_lufs: f64) -> Self {
        Self { target_lufs }
    }

    /// Get the target loudness in LUFS
    pub fn target_lufs(&self) -> f64 {
        self.target_lufs
    }

    /// Measure the waveform with `meter` and apply the corrective gain.
    ///
    /// Silent or too-short material has no defined integrated loudness; such
    /// waveforms pass through unchanged (zero gain) rather than failing, so
    /// an all-silence source still produces a valid output file.
    pub fn normalize(&self, wave: Waveform, meter: &dyn LoudnessMeter) -> Result<Waveform> {
        let sample_rate = wave.format.sample_rate.as_hz();
        let channels = u32::from(wave.format.channels);

        let measured = meter
            .integrated_lufs(&wave.samples, sample_rate, channels)
            .map_err(|e| LoudnessError::AnalysisError(e.to_string()))?;

        let Some(measured_lufs) = measured else {
            debug!("loudness undefined (silent input), skipping gain");
            return Ok(wave);
        };

        let gain_db = self.target_lufs - measured_lufs;
        let mut wave = wave;
        let clipped = apply_gain_db(&mut wave.samples, gain_db);

        debug!(
            measured_lufs,
            gain_db, clipped, "applied loudness correction"
        );

        Ok(wave)
    }
}

/// Apply a gain in dB to normalized float samples, hard-clipping at ±1.0.
///
/// Returns the number of samples that hit the clip rail.
pub fn apply_gain_db(samples: &mut [f32], gain_db: f64) -> usize {
    let linear = 10.0_f64.powf(gain_db / 20.0) as f32;
    let mut clipped = 0usize;

    for sample in samples.iter_mut() {
        let scaled = *sample * linear;
        if scaled.abs() > 1.0 {
            clipped += 1;
        }
        *sample = scaled.clamp(-1.0, 1.0);
    }

    clipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Ebur128Meter;
    use coinbox_core::{AudioFormat, SampleRate, Waveform};

    fn sine_wave(amplitude: f32, sample_rate: u32, secs: usize) -> Waveform {
        let samples: Vec<f32> = (0..sample_rate as usize * secs)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * 1000.0 * t).sin()
            })
            .collect();
        Waveform::new(samples, AudioFormat::new(SampleRate::new(sample_rate), 1, 16))
    }

    #[test]
    fn gain_in_db_scales_linearly() {
        let mut samples = vec![0.1_f32, -0.1];
        apply_gain_db(&mut samples, 20.0); // +20 dB = x10
        assert!((samples[0] - 1.0).abs() < 1e-4);
        assert!((samples[1] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn gain_hard_clips_at_full_scale() {
        let mut samples = vec![0.9_f32, -0.9, 0.01];
        let clipped = apply_gain_db(&mut samples, 6.0); // ~x2
        assert_eq!(clipped, 2);
        assert_eq!(samples[0], 1.0);
        assert_eq!(samples[1], -1.0);
        assert!(samples[2] < 1.0);
    }

    #[test]
    fn normalize_reaches_target_loudness() {
        let meter = Ebur128Meter::new();
        let normalizer = LoudnessNormalizer::new(-23.0);

        let wave = sine_wave(0.05, 44_100, 3); // quiet, about -26 dBFS peak
        let normalized = normalizer.normalize(wave, &meter).unwrap();

        let info = meter.measure(&normalized).unwrap();
        let lufs = info.integrated_lufs.unwrap();
        assert!(
            (lufs - (-23.0)).abs() < 0.5,
            "expected -23 LUFS after normalization, got {lufs:.2}"
        );
    }

    #[test]
    fn silent_input_passes_through_unchanged() {
        let meter = Ebur128Meter::new();
        let normalizer = LoudnessNormalizer::new(-16.0);

        let format = AudioFormat::new(SampleRate::new(44_100), 1, 16);
        let wave = Waveform::new(vec![0.0; 44_100], format);
        let out = normalizer.normalize(wave, &meter).unwrap();

        assert_eq!(out.samples.len(), 44_100);
        assert!(out.samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let meter = Ebur128Meter::new();
        let normalizer = LoudnessNormalizer::new(-16.0);

        let wave = Waveform::empty(AudioFormat::new(SampleRate::new(44_100), 1, 16));
        let out = normalizer.normalize(wave, &meter).unwrap();
        assert!(out.is_empty());
    }
}
