/// Audio decoder implementation using Symphonia
use crate::error::{AudioError, Result};
use coinbox_core::{AudioDecoder as AudioDecoderTrait, AudioFormat, SampleRate, Waveform};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Audio decoder using Symphonia
///
/// Supports: MP3, FLAC, OGG, WAV, AAC, M4A
///
/// The decoder loads the entire file into memory and produces a `Waveform`
/// with the file's native sample rate and channel count. Samples are
/// normalized to f32 in [-1.0, 1.0) using the full-scale value of the
/// source bit depth (symmetric scaling: divide by 2^(N-1), not 2^(N-1)-1).
#[derive(Debug, Default)]
pub struct SymphoniaDecoder;

impl SymphoniaDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    fn decode_file(path: &Path) -> Result<Waveform> {
        if !path.exists() {
            return Err(AudioError::FileNotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // A hint helps the format registry guess the container
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::Symphonia(format!("Failed to probe file: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| AudioError::DecodeError("No audio tracks found".to_string()))?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
        let channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2);
        // Lossy codecs do not declare a PCM bit depth; 16-bit is the
        // conventional full-scale reference in that case.
        let bits_per_sample = track.codec_params.bits_per_sample.unwrap_or(16) as u16;
        let track_id = track.id;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Symphonia(format!("Failed to create decoder: {}", e)))?;

        // Decode all packets and collect into a single interleaved buffer
        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(AudioError::DecodeError(format!(
                        "Error reading packet: {}",
                        e
                    )));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            let decoded = decoder
                .decode(&packet)
                .map_err(|e| AudioError::DecodeError(format!("Decode error: {}", e)))?;

            Self::append_interleaved(decoded, &mut samples);
        }

        debug!(
            path = %path.display(),
            sample_rate,
            channels,
            bits_per_sample,
            frames = samples.len() / channels as usize,
            "decoded audio file"
        );

        let format = AudioFormat::new(SampleRate::new(sample_rate), channels, bits_per_sample);
        Ok(Waveform::new(samples, format))
    }

    /// Append a decoded Symphonia buffer as interleaved normalized f32,
    /// preserving the native channel count.
    ///
    /// Signed integers use symmetric scaling (divide by 2^(N-1)) so the
    /// [-1.0, 1.0) range is symmetric; unsigned integers are re-centered
    /// around zero. Float sources are clamped, since decoded floats can
    /// carry inter-sample overshoot.
    fn append_interleaved(decoded: AudioBufferRef, out: &mut Vec<f32>) {
        match decoded {
            AudioBufferRef::F32(buf) => {
                Self::interleave(&buf, out, |s| s.clamp(-1.0, 1.0));
            }
            AudioBufferRef::F64(buf) => {
                Self::interleave(&buf, out, |s| (s as f32).clamp(-1.0, 1.0));
            }
            AudioBufferRef::S32(buf) => {
                Self::interleave(&buf, out, |s| s as f32 / 2_147_483_648.0);
            }
            AudioBufferRef::S24(buf) => {
                Self::interleave(&buf, out, |s| s.inner() as f32 / 8_388_608.0);
            }
            AudioBufferRef::S16(buf) => {
                Self::interleave(&buf, out, |s| f32::from(s) / 32_768.0);
            }
            AudioBufferRef::S8(buf) => {
                Self::interleave(&buf, out, |s| f32::from(s) / 128.0);
            }
            AudioBufferRef::U32(buf) => {
                Self::interleave(&buf, out, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0);
            }
            AudioBufferRef::U24(buf) => {
                Self::interleave(&buf, out, |s| (s.inner() as f32 / 16_777_215.0) * 2.0 - 1.0);
            }
            AudioBufferRef::U16(buf) => {
                Self::interleave(&buf, out, |s| (f32::from(s) / f32::from(u16::MAX)) * 2.0 - 1.0);
            }
            AudioBufferRef::U8(buf) => {
                Self::interleave(&buf, out, |s| (f32::from(s) / f32::from(u8::MAX)) * 2.0 - 1.0);
            }
        }
    }

    fn interleave<T, F>(
        buf: &symphonia::core::audio::AudioBuffer<T>,
        out: &mut Vec<f32>,
        normalize: F,
    ) where
        T: symphonia::core::sample::Sample + Copy,
        F: Fn(T) -> f32,
    {
        let channels = buf.spec().channels.count();
        let frames = buf.frames();
        out.reserve(frames * channels);

        for frame_idx in 0..frames {
            for ch in 0..channels {
                out.push(normalize(buf.chan(ch)[frame_idx]));
            }
        }
    }
}

impl AudioDecoderTrait for SymphoniaDecoder {
    fn decode(&mut self, path: &Path) -> coinbox_core::Result<Waveform> {
        Self::decode_file(path).map_err(Into::into)
    }

    fn supports_format(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            matches!(
                ext.to_lowercase().as_str(),
                "mp3" | "flac" | "ogg" | "wav" | "m4a" | "aac"
            )
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinbox_core::AudioDecoder;

    #[test]
    fn decoder_creation() {
        let decoder = SymphoniaDecoder::new();
        assert!(decoder.supports_format(Path::new("test.mp3")));
        assert!(decoder.supports_format(Path::new("test.WAV")));
        assert!(!decoder.supports_format(Path::new("test.txt")));
        assert!(!decoder.supports_format(Path::new("noextension")));
    }

    #[test]
    fn decode_nonexistent_file_returns_error() {
        let mut decoder = SymphoniaDecoder::new();
        let result = decoder.decode(Path::new("/nonexistent/file.mp3"));
        assert!(result.is_err());
    }

    #[test]
    fn decode_garbage_bytes_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_audio.mp3");
        std::fs::write(&path, b"this is not an audio container").unwrap();

        let mut decoder = SymphoniaDecoder::new();
        assert!(decoder.decode(&path).is_err());
    }
}
