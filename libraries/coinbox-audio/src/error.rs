/// Audio-specific errors
use thiserror::Error;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
#[derive(Error, Debug)]
pub enum AudioError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Invalid audio buffer
    #[error("Invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// Resampling error
    #[error("Resampling failed: {0}")]
    ResampleError(String),

    /// WAV encoding error
    #[error("Encode error: {0}")]
    EncodeError(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Symphonia error
    #[error("Symphonia error: {0}")]
    Symphonia(String),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => Self::Io(e),
            other => Self::EncodeError(other.to_string()),
        }
    }
}

impl From<AudioError> for coinbox_core::CoreError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Io(e) => coinbox_core::CoreError::Io(e),
            other => coinbox_core::CoreError::decode(other.to_string()),
        }
    }
}
