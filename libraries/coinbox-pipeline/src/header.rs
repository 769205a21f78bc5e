//! Firmware header generation
//!
//! Turns the pipeline's WAV output into a C header the firmware build embeds
//! as a compile-time array: the `data` chunk bytes as hexadecimal literals
//! plus a derived length constant. The transform is lossless and reversible;
//! `parse_header` is the inverse.
//!
//! The input is validated to be exactly 8-bit unsigned PCM. Anything else is
//! rejected with an error naming the format actually found.

use crate::error::{PipelineError, Result};
use coinbox_audio::wav::read_wav_u8;

/// Hex values emitted per row
const BYTES_PER_LINE: usize = 16;

/// Generate a C header embedding the WAV's data chunk bytes.
///
/// `array_name` becomes the array symbol; `<array_name>_len` carries the
/// length via `sizeof`, so a regenerated header can never disagree with its
/// own data.
pub fn generate_header(wav_bytes: &[u8], array_name: &str) -> Result<String> {
    let sample = read_wav_u8(wav_bytes).map_err(|e| PipelineError::Header(e.to_string()))?;
    let data = &sample.pcm;

    let mut header = String::new();
    header.push_str("//------------------------------------------------------------\n");
    header.push_str("//-----------   Generated by the coinbox toolkit   ------------\n");
    header.push_str("//\n");
    header.push_str(&format!("// Size : {} (0x{:X})\n", data.len(), data.len()));
    header.push_str("//------------------------------------------------------------\n");
    header.push_str(&format!("const unsigned char {}[] = {{\n", array_name));

    for (row_idx, row) in data.chunks(BYTES_PER_LINE).enumerate() {
        let hexes: Vec<String> = row.iter().map(|b| format!("0x{:02X}", b)).collect();
        let last_row = (row_idx + 1) * BYTES_PER_LINE >= data.len();
        let comma = if last_row { "" } else { "," };
        header.push_str(&format!("    {}{}\n", hexes.join(", "), comma));
    }

    header.push_str("};\n");
    header.push_str(&format!(
        "const unsigned int {}_len = sizeof({});\n",
        array_name, array_name
    ));

    Ok(header)
}

/// Decode the hex byte list of a generated header back into raw bytes.
pub fn parse_header(header: &str) -> Result<Vec<u8>> {
    let open = header
        .find('{')
        .ok_or_else(|| PipelineError::Header("no array body found".into()))?;
    let close = header[open..]
        .find('}')
        .map(|i| open + i)
        .ok_or_else(|| PipelineError::Header("unterminated array body".into()))?;

    header[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            let hex = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .ok_or_else(|| PipelineError::Header(format!("malformed byte literal: {token}")))?;
            u8::from_str_radix(hex, 16)
                .map_err(|e| PipelineError::Header(format!("malformed byte literal {token}: {e}")))
        })
        .collect()
}
