//! Canonical 8-bit unsigned PCM WAV serialization
//!
//! The device firmware parses the output byte-for-byte, so the container is
//! the canonical RIFF/WAVE layout: a PCM `fmt ` chunk declaring 1 channel,
//! the device sample rate, 8 bits per sample, block align 1, followed by a
//! `data` chunk of one unsigned byte per sample (128 = silence).
//!
//! Encoding buffers the complete file in memory and writes it in one go, so
//! a cancelled or crashed conversion never leaves a partial file behind.

use crate::converter::DeviceSample;
use crate::error::{AudioError, Result};
use coinbox_core::SampleRate;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

fn wav_spec(sample_rate: SampleRate) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: sample_rate.as_hz(),
        bits_per_sample: 8,
        sample_format: SampleFormat::Int,
    }
}

/// Serialize a device sample as a complete WAV file in memory.
pub fn encode_wav(sample: &DeviceSample) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, wav_spec(sample.sample_rate))?;
        for &byte in &sample.pcm {
            // hound exposes 8-bit WAV samples as signed; the container
            // stores them offset by 128.
            writer.write_sample((i16::from(byte) - 128) as i8)?;
        }
        writer.finalize()?;
    }

    let bytes = cursor.into_inner();
    debug!(
        frames = sample.pcm.len(),
        file_bytes = bytes.len(),
        "encoded WAV"
    );
    Ok(bytes)
}

/// Serialize a device sample and write it to `path` in a single write.
pub fn write_wav_file(path: &Path, sample: &DeviceSample) -> Result<()> {
    let bytes = encode_wav(sample)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Parse WAV bytes, validating that they are exactly 8-bit unsigned PCM.
///
/// Returns the `data` chunk as a `DeviceSample`. Anything else is rejected
/// with an error naming the format actually found.
pub fn read_wav_u8(bytes: &[u8]) -> Result<DeviceSample> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AudioError::UnsupportedFormat(format!("invalid WAV file: {}", e)))?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 8 {
        return Err(AudioError::UnsupportedFormat(format!(
            "expected 8-bit unsigned PCM, found {}-bit {}",
            spec.bits_per_sample,
            match spec.sample_format {
                SampleFormat::Int => "PCM",
                SampleFormat::Float => "float",
            }
        )));
    }
    if spec.channels != 1 {
        return Err(AudioError::UnsupportedFormat(format!(
            "expected mono, found {} channels",
            spec.channels
        )));
    }

    let pcm = reader
        .samples::<i8>()
        .map(|s| s.map(|v| (i16::from(v) + 128) as u8))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|e| AudioError::UnsupportedFormat(format!("invalid WAV data: {}", e)))?;

    Ok(DeviceSample {
        pcm,
        sample_rate: SampleRate::new(spec.sample_rate),
    })
}
