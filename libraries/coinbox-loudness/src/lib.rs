//! Loudness analysis and normalization for the Coinbox pipeline
//!
//! This crate provides:
//! - EBU R128 integrated loudness measurement (K-weighted, gated, per
//!   ITU-R BS.1770) via the ebur128 crate
//! - Uniform gain normalization towards a target LUFS with a hard-clip
//!   policy at full scale
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐     ┌──────────────┐     ┌───────────────┐
//! │ Waveform │ ──► │ Ebur128Meter │ ──► │ LoudnessInfo  │
//! └──────────┘     └──────────────┘     └───────────────┘
//!                                              │
//!                                              ▼
//!                  ┌────────────────────────────────────┐
//!                  │ LoudnessNormalizer (gain = target  │
//!                  │ − measured, hard-clip at ±1.0)     │
//!                  └────────────────────────────────────┘
//! ```
//!
//! Loudness must always be measured and corrected **before** downsampling and
//! bit-depth reduction; those operations are lossy and would bias the
//! measurement.

#![forbid(unsafe_code)]

mod analyzer;
mod error;
mod normalizer;

pub use analyzer::{Ebur128Meter, LoudnessInfo};
pub use error::{LoudnessError, Result};
pub use normalizer::{apply_gain_db, LoudnessNormalizer};
