//! Single-pole high-pass filter
//!
//! Removes sub-audible rumble and DC offset before loudness measurement.
//! Low-frequency energy inflates the integrated loudness reading, so this
//! filter must run before the normalizer.
//!
//! First-order RC high-pass, applied per channel with zero initial state:
//!
//! ```text
//! alpha = RC / (RC + dt),  RC = 1 / (2*pi*cutoff)
//! y[n]  = alpha * (y[n-1] + x[n] - x[n-1])
//! ```
//!
//! Attenuation is monotonic below the cutoff (-6 dB/octave).

use coinbox_core::Waveform;

/// Single-pole high-pass filter
#[derive(Debug, Clone, Copy)]
pub struct HighPassFilter {
    /// Cutoff frequency in Hz
    cutoff_hz: f64,
}

impl HighPassFilter {
    /// Create a filter with the given cutoff frequency
    pub fn new(cutoff_hz: f64) -> Self {
        Self { cutoff_hz }
    }

    /// Get the cutoff frequency in Hz
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }

    /// Apply the filter, returning a new waveform with the same format.
    ///
    /// Channels are filtered independently; an empty waveform passes
    /// through unchanged.
    pub fn apply(&self, wave: &Waveform) -> Waveform {
        if wave.is_empty() || self.cutoff_hz <= 0.0 {
            return wave.clone();
        }

        let channels = wave.format.channels as usize;
        let dt = 1.0 / f64::from(wave.format.sample_rate.as_hz());
        let rc = 1.0 / (2.0 * std::f64::consts::PI * self.cutoff_hz);
        let alpha = (rc / (rc + dt)) as f32;

        let mut output = vec![0.0_f32; wave.samples.len()];

        for ch in 0..channels {
            let mut prev_in = 0.0_f32;
            let mut prev_out = 0.0_f32;

            let mut idx = ch;
            while idx < wave.samples.len() {
                let x = wave.samples[idx];
                let y = alpha * (prev_out + x - prev_in);
                output[idx] = y;
                prev_in = x;
                prev_out = y;
                idx += channels;
            }
        }

        Waveform::new(output, wave.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbox_core::{AudioFormat, SampleRate, Waveform};

    fn sine(frequency: f32, sample_rate: u32, secs: usize) -> Vec<f32> {
        (0..sample_rate as usize * secs)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                0.5 * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn attenuates_below_cutoff_more_than_above() {
        let filter = HighPassFilter::new(1000.0);
        let format = AudioFormat::new(SampleRate::new(44_100), 1, 16);

        // Half the cutoff frequency vs twice the cutoff frequency
        let low = filter.apply(&Waveform::new(sine(500.0, 44_100, 1), format));
        let high = filter.apply(&Waveform::new(sine(2000.0, 44_100, 1), format));

        let low_rms = rms(&low.samples);
        let high_rms = rms(&high.samples);

        assert!(
            low_rms < high_rms * 0.7,
            "expected materially more attenuation at 500 Hz ({low_rms}) than 2 kHz ({high_rms})"
        );
    }

    #[test]
    fn removes_dc_offset() {
        let filter = HighPassFilter::new(1000.0);
        let format = AudioFormat::new(SampleRate::new(16_000), 1, 16);
        let wave = Waveform::new(vec![0.5; 16_000], format);

        let filtered = filter.apply(&wave);
        // After the initial transient the constant offset decays to zero
        let tail_rms = rms(&filtered.samples[8_000..]);
        assert!(tail_rms < 1e-3, "DC should decay, tail RMS {tail_rms}");
    }

    #[test]
    fn stereo_channels_filtered_independently() {
        let filter = HighPassFilter::new(1000.0);
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);

        // Left channel sine, right channel silence, interleaved
        let mono = sine(2000.0, 44_100, 1);
        let mut interleaved = Vec::with_capacity(mono.len() * 2);
        for s in &mono {
            interleaved.push(*s);
            interleaved.push(0.0);
        }

        let filtered = filter.apply(&Waveform::new(interleaved, format));
        let right: Vec<f32> = filtered.samples.iter().skip(1).step_by(2).copied().collect();
        assert!(right.iter().all(|&s| s == 0.0), "silent channel must stay silent");
    }

    #[test]
    fn empty_waveform_passes_through() {
        let filter = HighPassFilter::new(1000.0);
        let wave = Waveform::empty(AudioFormat::new(SampleRate::new(44_100), 1, 16));
        assert!(filter.apply(&wave).is_empty());
    }
}
