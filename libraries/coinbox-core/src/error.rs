/// Core error types for the Coinbox toolkit
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type shared across the Coinbox crates
#[derive(Error, Debug)]
pub enum CoreError {
    /// Audio decoding errors (unreadable or unsupported input)
    #[error("Decode error: {0}")]
    Decode(String),

    /// Loudness measurement errors
    #[error("Loudness error: {0}")]
    Loudness(String),

    /// A waveform violated a structural invariant
    #[error("Invalid waveform: {0}")]
    InvalidWaveform(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a loudness error
    pub fn loudness(msg: impl Into<String>) -> Self {
        Self::Loudness(msg.into())
    }

    /// Create an invalid-waveform error
    pub fn invalid_waveform(msg: impl Into<String>) -> Self {
        Self::InvalidWaveform(msg.into())
    }
}
