//! Coinbox sample preparation pipeline
//!
//! Converts an arbitrary input audio file into the fixed playback format the
//! Coinbox firmware reads straight from flash: mono, 16 kHz, 8-bit unsigned
//! PCM WAV, at most 5 seconds, loudness-normalized to the target LUFS.
//!
//! The pipeline is a strictly linear sequence of transforms:
//!
//! ```text
//! Loaded → Trimmed → Clamped → Shaped → Normalized → Converted → Encoded
//! ```
//!
//! Each stage is a pure function from one `Waveform` (+ config) to the next.
//! A failure at any stage aborts the conversion with an error naming the
//! failing stage. Running the pipeline twice over the same input bytes with
//! the same configuration produces byte-identical output.
//!
//! Ordering invariant: the mono downmix happens *before* the loudness
//! measurement, so the meter sees exactly the signal that gets normalized;
//! the lossy resample/requantize step comes *after* the gain, since
//! measuring afterwards would fold quantization noise into the reading.

#![forbid(unsafe_code)]

pub mod clamp;
pub mod header;
pub mod pipeline;
pub mod silence;

mod error;

pub use clamp::clamp_duration;
pub use coinbox_core::PipelineConfig;
pub use error::{PipelineError, Result, Stage};
pub use header::{generate_header, parse_header};
pub use pipeline::{Pipeline, PreparedSample};
pub use silence::SilenceTrimmer;
