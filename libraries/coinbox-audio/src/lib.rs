//! Audio I/O and signal processing primitives for the Coinbox pipeline
//!
//! This crate wraps the external audio facilities behind small, deterministic
//! building blocks:
//!
//! - `decoder`: Symphonia-based decoding of arbitrary containers into a
//!   `Waveform` with the file's native format
//! - `highpass`: single-pole high-pass filter (rumble/DC removal)
//! - `resampler`: offline band-limited sinc resampling via rubato
//! - `converter`: downmix to mono, resample to the device rate, and
//!   requantize to 8-bit unsigned PCM
//! - `wav`: canonical 8-bit unsigned PCM WAV serialization via hound

#![forbid(unsafe_code)]

pub mod converter;
pub mod decoder;
pub mod highpass;
pub mod resampler;
pub mod wav;

mod error;

pub use converter::{DeviceSample, FormatConverter};
pub use decoder::SymphoniaDecoder;
pub use error::{AudioError, Result};
pub use highpass::HighPassFilter;
