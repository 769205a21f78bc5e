//! Pipeline orchestration
//!
//! Wires the stages together in the fixed order and tags failures with the
//! stage that caused them. One `Pipeline` value per conversion context; it
//! holds no mutable state between runs, so independent conversions (one per
//! device slot) can run on parallel threads without locking.

use crate::clamp::clamp_duration;
use crate::error::{PipelineError, Result, Stage};
use crate::silence::SilenceTrimmer;
use coinbox_audio::converter::downmix_to_mono;
use coinbox_audio::wav::encode_wav;
use coinbox_audio::{DeviceSample, FormatConverter, HighPassFilter, SymphoniaDecoder};
use coinbox_core::{AudioDecoder, AudioFormat, LoudnessMeter, PipelineConfig, Waveform};
use coinbox_loudness::{Ebur128Meter, LoudnessNormalizer};
use std::path::Path;
use tracing::info;

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct PreparedSample {
    /// Complete WAV file bytes, ready to upload or write out
    pub wav: Vec<u8>,
    /// The raw device PCM behind the WAV
    pub pcm: DeviceSample,
}

impl PreparedSample {
    /// Duration of the prepared sample in milliseconds
    pub fn duration_ms(&self) -> f64 {
        self.pcm.duration_ms()
    }
}

/// Sample preparation pipeline
///
/// # Example
///
/// ```ignore
/// use coinbox_pipeline::{Pipeline, PipelineConfig};
///
/// let mut pipeline = Pipeline::new(PipelineConfig::default());
/// let prepared = pipeline.convert_file("jingle.mp3".as_ref())?;
/// std::fs::write("slot1.wav", &prepared.wav)?;
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    decoder: Box<dyn AudioDecoder>,
    meter: Box<dyn LoudnessMeter>,
}

impl Pipeline {
    /// Create a pipeline with the default backends (Symphonia, ebur128)
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_backends(
            config,
            Box::new(SymphoniaDecoder::new()),
            Box::new(Ebur128Meter::new()),
        )
    }

    /// Create a pipeline with explicit decode/measurement backends
    pub fn with_backends(
        config: PipelineConfig,
        decoder: Box<dyn AudioDecoder>,
        meter: Box<dyn LoudnessMeter>,
    ) -> Self {
        Self {
            config,
            decoder,
            meter,
        }
    }

    /// Get the pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode `path` and run the full preparation pipeline over it.
    pub fn convert_file(&mut self, path: &Path) -> Result<PreparedSample> {
        let wave = self.decoder.decode(path).map_err(PipelineError::Decode)?;
        info!(
            path = %path.display(),
            sample_rate = wave.format.sample_rate.as_hz(),
            channels = wave.format.channels,
            duration_ms = wave.duration_ms(),
            "decoded input"
        );
        self.process(wave)
    }

    /// Run stages Trim → Clamp → Shape → Normalize → Convert → Encode over
    /// an already-decoded waveform.
    ///
    /// Each stage consumes the previous stage's waveform and produces a new
    /// one; no stage looks ahead or backtracks, and nothing here draws on
    /// randomness or the clock, so identical input and configuration yield
    /// byte-identical output.
    pub fn process(&self, wave: Waveform) -> Result<PreparedSample> {
        wave.validate()
            .map_err(|e| PipelineError::InvalidWaveform {
                stage: Stage::Trim,
                message: e.to_string(),
            })?;

        // 1. Trim leading/trailing silence
        let trimmer = SilenceTrimmer::new(self.config.silence_thresh_dbfs, self.config.chunk_ms);
        let wave = trimmer.trim(&wave);

        // 2. Clamp to the maximum duration
        let wave = clamp_duration(&wave, self.config.max_length_ms);

        // 3. High-pass to drop rumble before the loudness measurement
        let wave = HighPassFilter::new(self.config.cutoff_hz).apply(&wave);

        // 4. Downmix to mono before measuring: the meter sums channel
        // energies, so a duplicated-channel stereo signal reads ~3 dB above
        // the mono mix the device actually plays.
        let format = AudioFormat::new(wave.format.sample_rate, 1, wave.format.bits_per_sample);
        let wave = Waveform::new(downmix_to_mono(&wave), format);

        // 5. Loudness normalization at the source rate and bit depth
        let normalizer = LoudnessNormalizer::new(self.config.target_lufs);
        let wave = normalizer
            .normalize(wave, self.meter.as_ref())
            .map_err(PipelineError::Normalize)?;

        // 6. Resample and requantize (lossy; must come after the gain)
        let converter = FormatConverter::new(self.config.output_sample_rate);
        let pcm = converter.convert(&wave).map_err(PipelineError::Convert)?;

        // 7. Serialize; the full file is buffered so no partial output can
        // ever hit disk on cancellation.
        let wav = encode_wav(&pcm).map_err(PipelineError::Encode)?;

        info!(
            duration_ms = pcm.duration_ms(),
            wav_bytes = wav.len(),
            "prepared sample"
        );

        Ok(PreparedSample { wav, pcm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbox_core::{AudioFormat, SampleRate};

    fn tone_wave(amplitude: f32, secs: f32, rate: u32, channels: u16) -> Waveform {
        let frames = (rate as f32 * secs) as usize;
        let mut samples = Vec::with_capacity(frames * channels as usize);
        for i in 0..frames {
            let t = i as f32 / rate as f32;
            let s = amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin();
            for _ in 0..channels {
                samples.push(s);
            }
        }
        Waveform::new(samples, AudioFormat::new(SampleRate::new(rate), channels, 16))
    }

    #[test]
    fn output_meets_the_device_contract() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let prepared = pipeline.process(tone_wave(0.3, 2.0, 44_100, 2)).unwrap();

        let parsed = coinbox_audio::wav::read_wav_u8(&prepared.wav).unwrap();
        assert_eq!(parsed.sample_rate.as_hz(), 16_000);
        assert_eq!(parsed.pcm, prepared.pcm.pcm);
        assert!(prepared.duration_ms() <= 5_000.0);
    }

    #[test]
    fn invalid_interleaving_is_tagged_with_the_trim_stage() {
        let pipeline = Pipeline::new(PipelineConfig::default());
        let format = AudioFormat::new(SampleRate::new(44_100), 2, 16);
        // 7 samples cannot be 2-channel interleaved
        let err = pipeline
            .process(Waveform::new(vec![0.0; 7], format))
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Trim);
    }
}
