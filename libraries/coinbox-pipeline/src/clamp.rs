//! Duration clamping
//!
//! Truncates a waveform to the maximum duration by discarding trailing
//! samples. Short clips are never padded, and no fade is applied at the cut
//! point.

use coinbox_core::Waveform;
use tracing::debug;

/// Truncate `wave` to at most `max_ms` milliseconds.
pub fn clamp_duration(wave: &Waveform, max_ms: u32) -> Waveform {
    let channels = wave.format.channels as usize;
    let max_frames =
        (u64::from(wave.format.sample_rate.as_hz()) * u64::from(max_ms) / 1000) as usize;

    if wave.frames() <= max_frames {
        return wave.clone();
    }

    debug!(
        from_ms = wave.duration_ms(),
        to_ms = max_ms,
        "clamping duration"
    );

    Waveform::new(wave.samples[..max_frames * channels].to_vec(), wave.format)
}
