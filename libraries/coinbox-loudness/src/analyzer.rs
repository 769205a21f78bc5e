//! EBU R128 loudness analysis
//!
//! Integrated loudness measurement using the ebur128 crate (K-weighted,
//! gated integration per ITU-R BS.1770). The meter is stateless: every
//! measurement runs over a complete waveform and is fully deterministic.

use crate::error::{LoudnessError, Result};
use coinbox_core::{LoudnessMeter, Waveform};
use ebur128::{EbuR128, Mode};
use std::fmt;

/// Loudness characteristics of a measured waveform
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessInfo {
    /// Integrated loudness in LUFS.
    ///
    /// `None` when loudness is undefined: silent material, or material too
    /// short for the gating blocks of the standard. Undefined loudness is a
    /// valid outcome for degenerate inputs, not an error.
    pub integrated_lufs: Option<f64>,

    /// Sample peak in dBFS (maximum sample value across channels)
    pub sample_peak_dbfs: f64,

    /// Duration of the analyzed audio in seconds
    pub duration_seconds: f64,

    /// Sample rate of the analyzed audio
    pub sample_rate: u32,

    /// Number of channels
    pub channels: u32,
}

impl fmt::Display for LoudnessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.integrated_lufs {
            Some(lufs) => write!(
                f,
                "Loudness: {:.1} LUFS, Sample Peak: {:.1} dBFS",
                lufs, self.sample_peak_dbfs
            ),
            None => write!(f, "Loudness: undefined (silent)"),
        }
    }
}

/// EBU R128 loudness meter
///
/// # Example
///
/// ```ignore
/// use coinbox_loudness::Ebur128Meter;
///
/// let meter = Ebur128Meter::new();
/// let info = meter.measure(&waveform)?;
/// if let Some(lufs) = info.integrated_lufs {
///     println!("Integrated loudness: {:.1} LUFS", lufs);
/// }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Ebur128Meter;

impl Ebur128Meter {
    /// Create a new meter
    pub fn new() -> Self {
        Self
    }

    /// Measure integrated loudness and sample peak of a complete waveform
    ///
    /// # Errors
    /// Returns an error if the rate or channel count is outside what the
    /// measurement backend supports, or if the sample count is not a
    /// multiple of the channel count.
    pub fn measure(&self, wave: &Waveform) -> Result<LoudnessInfo> {
        let sample_rate = wave.format.sample_rate.as_hz();
        let channels = u32::from(wave.format.channels);
        let integrated_lufs = self.run(&wave.samples, sample_rate, channels)?;

        let sample_peak_linear = wave
            .samples
            .iter()
            .fold(0.0_f32, |peak, s| peak.max(s.abs()));
        let sample_peak_dbfs = if sample_peak_linear > 0.0 {
            20.0 * f64::from(sample_peak_linear).log10()
        } else {
            f64::NEG_INFINITY
        };

        Ok(LoudnessInfo {
            integrated_lufs,
            sample_peak_dbfs,
            duration_seconds: wave.duration_secs(),
            sample_rate,
            channels,
        })
    }

    fn run(&self, samples: &[f32], sample_rate: u32, channels: u32) -> Result<Option<f64>> {
        if !(8000..=384_000).contains(&sample_rate) {
            return Err(LoudnessError::InvalidSampleRate(sample_rate));
        }
        if !(1..=8).contains(&channels) {
            return Err(LoudnessError::InvalidChannelCount(channels));
        }
        if samples.len() % channels as usize != 0 {
            return Err(LoudnessError::InvalidWaveform(format!(
                "sample count {} is not divisible by channel count {}",
                samples.len(),
                channels
            )));
        }
        if samples.is_empty() {
            return Ok(None);
        }

        let mut ebur128 = EbuR128::new(channels, sample_rate, Mode::I)?;
        ebur128.add_frames_f32(samples)?;

        let lufs = ebur128.loudness_global()?;

        // ebur128 reports -inf for silence and for material shorter than the
        // gating blocks of the standard.
        if lufs.is_finite() {
            Ok(Some(lufs))
        } else {
            Ok(None)
        }
    }
}

impl LoudnessMeter for Ebur128Meter {
    fn integrated_lufs(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: u32,
    ) -> coinbox_core::Result<Option<f64>> {
        self.run(samples, sample_rate, channels).map_err(Into::into)
    }
}
