//! Offline band-limited resampling
//!
//! Whole-buffer sample rate conversion using rubato's sinc resampler.
//! The sinc kernel provides the anti-aliasing required when downsampling
//! (rubato scales the filter cutoff by the ratio for ratios below 1).
//!
//! The resampler is fed in fixed-size chunks; the tail is flushed with
//! partial processing, the filter delay is skipped, and the output is
//! truncated to the expected frame count so the result is deterministic
//! and free of padding artifacts.

use crate::error::{AudioError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Chunk size the resampler is configured with
const CHUNK_FRAMES: usize = 1024;

fn sinc_params() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Resample a mono buffer from `input_rate` to `output_rate`.
///
/// Returns a buffer of exactly `round(input.len() * output_rate / input_rate)`
/// frames. Equal rates and empty input pass through unchanged.
pub fn resample_mono(input: &[f32], input_rate: u32, output_rate: u32) -> Result<Vec<f32>> {
    if input_rate == 0 || output_rate == 0 {
        return Err(AudioError::ResampleError(format!(
            "invalid sample rates: {} -> {}",
            input_rate, output_rate
        )));
    }
    if input.is_empty() || input_rate == output_rate {
        return Ok(input.to_vec());
    }

    let ratio = f64::from(output_rate) / f64::from(input_rate);
    let expected_frames = (input.len() as f64 * ratio).round() as usize;

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 2.0, sinc_params(), CHUNK_FRAMES, 1).map_err(|e| {
            AudioError::ResampleError(format!("SincFixedIn creation failed: {}", e))
        })?;

    let delay = resampler.output_delay();
    let mut output: Vec<f32> = Vec::with_capacity(delay + expected_frames);

    // Feed complete chunks
    let mut pos = 0;
    while pos + CHUNK_FRAMES <= input.len() {
        let chunk = vec![input[pos..pos + CHUNK_FRAMES].to_vec()];
        let frames = resampler
            .process(&chunk, None)
            .map_err(|e| AudioError::ResampleError(format!("resampling failed: {}", e)))?;
        output.extend_from_slice(&frames[0]);
        pos += CHUNK_FRAMES;
    }

    // Flush the remainder with partial processing
    if pos < input.len() {
        let tail = vec![input[pos..].to_vec()];
        let frames = resampler
            .process_partial(Some(&tail), None)
            .map_err(|e| AudioError::ResampleError(format!("flush failed: {}", e)))?;
        output.extend_from_slice(&frames[0]);
    }

    // Drain the filter until the delayed samples have come through
    while output.len() < delay + expected_frames {
        let frames = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| AudioError::ResampleError(format!("drain failed: {}", e)))?;
        if frames[0].is_empty() {
            break;
        }
        output.extend_from_slice(&frames[0]);
    }

    // Skip the filter delay and pin the output length
    let start = delay.min(output.len());
    let mut trimmed: Vec<f32> = output.split_off(start);
    trimmed.truncate(expected_frames);

    // Short drains can come up a few frames shy of the expected count
    while trimmed.len() < expected_frames {
        trimmed.push(0.0);
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        (0..(sample_rate as f32 * secs) as usize)
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
    fn output_length_matches_ratio() {
        let input = sine(440.0, 44_100, 1.0);
        let output = resample_mono(&input, 44_100, 16_000).unwrap();
        assert_eq!(output.len(), 16_000);
    }

    #[test]
    fn equal_rates_pass_through() {
        let input = sine(440.0, 16_000, 0.5);
        let output = resample_mono(&input, 16_000, 16_000).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(resample_mono(&[], 44_100, 16_000).unwrap().is_empty());
    }

    #[test]
    fn preserves_signal_level() {
        // A 1 kHz tone is well below the 8 kHz Nyquist of the output rate
        // and must survive downsampling at roughly the same RMS.
        let input = sine(1000.0, 44_100, 2.0);
        let output = resample_mono(&input, 44_100, 16_000).unwrap();

        let in_rms = rms(&input);
        let out_rms = rms(&output);
        assert!(
            (in_rms - out_rms).abs() / in_rms < 0.05,
            "RMS drifted: {in_rms} -> {out_rms}"
        );
    }

    #[test]
    fn deterministic() {
        let input = sine(440.0, 48_000, 1.3);
        let a = resample_mono(&input, 48_000, 16_000).unwrap();
        let b = resample_mono(&input, 48_000, 16_000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(resample_mono(&[0.0; 16], 0, 16_000).is_err());
        assert!(resample_mono(&[0.0; 16], 44_100, 0).is_err());
    }
}
