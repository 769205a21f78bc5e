/// Capability traits for the Coinbox toolkit
///
/// Decoding and loudness measurement are external facilities; the pipeline
/// only depends on these traits so alternative backends can be substituted
/// without touching pipeline logic.
use crate::error::Result;
use crate::types::Waveform;
use std::path::Path;

/// Audio decoder capability
///
/// Implementers decode an audio file in any supported container/codec into a
/// `Waveform` carrying the file's native sample rate, channel count, and bit
/// depth. No partial or best-effort decode is attempted: an unparseable input
/// is an error.
pub trait AudioDecoder: Send {
    /// Decode an audio file from the given path (loads the entire file)
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or decoded
    fn decode(&mut self, path: &Path) -> Result<Waveform>;

    /// Check if the decoder supports the given file format
    fn supports_format(&self, path: &Path) -> bool;
}

/// Integrated loudness measurement capability
///
/// Implementers measure K-weighted, gated integrated loudness per
/// ITU-R BS.1770 / EBU R128 over normalized float samples.
pub trait LoudnessMeter {
    /// Measure integrated loudness in LUFS.
    ///
    /// `samples` are interleaved f32 in [-1.0, 1.0). Returns `Ok(None)` when
    /// loudness is undefined (silent or too-short material); that is a valid
    /// measurement outcome, not an error.
    ///
    /// # Errors
    /// Returns an error if the measurement backend rejects the input
    /// (invalid rate/channel count, interleaving mismatch).
    fn integrated_lufs(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: u32,
    ) -> Result<Option<f64>>;
}
