//! Coinbox Core
//!
//! Platform-agnostic core types, traits, and error handling for the Coinbox
//! sample toolkit.
//!
//! This crate provides the foundational building blocks shared by the
//! preparation pipeline and the device client:
//! - **Domain Types**: `Waveform`, `AudioFormat`, `SampleRate`, `PipelineConfig`
//! - **Capability Traits**: `AudioDecoder`, `LoudnessMeter`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use coinbox_core::{AudioFormat, SampleRate, Waveform};
//!
//! // One second of stereo silence at CD quality
//! let format = AudioFormat::new(SampleRate::CD_QUALITY, 2, 16);
//! let wave = Waveform::new(vec![0.0; 88_200], format);
//! assert!((wave.duration_secs() - 1.0).abs() < 1e-9);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{CoreError, Result};
pub use traits::{AudioDecoder, LoudnessMeter};
pub use types::{AudioFormat, SampleRate, Waveform};
