//! Error types for the preparation pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Decoding the input container
    Decode,
    /// Leading/trailing silence removal
    Trim,
    /// Duration clamping
    Clamp,
    /// High-pass filtering
    Shape,
    /// Loudness normalization
    Normalize,
    /// Downmix, resample, requantize
    Convert,
    /// WAV serialization
    Encode,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Decode => "decode",
            Self::Trim => "trim",
            Self::Clamp => "clamp",
            Self::Shape => "shape",
            Self::Normalize => "normalize",
            Self::Convert => "convert",
            Self::Encode => "encode",
        };
        f.write_str(name)
    }
}

/// A conversion failure, tagged with the stage that caused it
///
/// All errors are local to a single conversion attempt; the pipeline never
/// retries internally.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Unreadable or unsupported input
    #[error("decode stage failed: {0}")]
    Decode(#[source] coinbox_core::CoreError),

    /// A waveform violated a structural invariant on entry to a stage
    #[error("{stage} stage failed: {message}")]
    InvalidWaveform {
        /// Stage that detected the violation
        stage: Stage,
        /// What was violated
        message: String,
    },

    /// Loudness measurement or normalization failed
    #[error("normalize stage failed: {0}")]
    Normalize(#[source] coinbox_loudness::LoudnessError),

    /// Downmix/resample/requantize failed
    #[error("convert stage failed: {0}")]
    Convert(#[source] coinbox_audio::AudioError),

    /// WAV serialization failed (I/O only; content is valid by construction)
    #[error("encode stage failed: {0}")]
    Encode(#[source] coinbox_audio::AudioError),

    /// Header generation rejected its input
    #[error("header generation failed: {0}")]
    Header(String),
}

impl PipelineError {
    /// The stage this error occurred in
    pub fn stage(&self) -> Stage {
        match self {
            Self::Decode(_) => Stage::Decode,
            Self::InvalidWaveform { stage, .. } => *stage,
            Self::Normalize(_) => Stage::Normalize,
            Self::Convert(_) => Stage::Convert,
            Self::Encode(_) | Self::Header(_) => Stage::Encode,
        }
    }
}
