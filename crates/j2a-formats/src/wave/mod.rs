//! RIFF/WAVE output for embedded samples
//!
//! Samples are written as mono PCM. The bit depth is folded from the legacy
//! multiplier into 8 or 16 bits, and each payload byte is XORed with
//! `bytes_per_sample << 7` truncated to 8 bits. For 8-bit samples that turns
//! signed bytes into the unsigned form WAVE expects; for 16-bit samples the
//! mask truncates to zero and bytes pass through unchanged.

mod header;

pub use header::WaveHeader;

use crate::sample::Sample;
use binrw::BinWriterExt;
use binrw::io::Cursor;

/// Number of leading payload bytes dropped by the anti-pop trim
pub const ANTI_POP_TRIM: usize = 8;

/// Bytes per sample derived from the legacy multiplier (1 or 2)
///
/// Anything the header reports as 24-bit is folded into 8-bit.
pub const fn bytes_per_sample(multiplier: u16) -> u16 {
    (multiplier / 4) % 2 + 1
}

/// Leading bytes to drop from a payload to avoid an audible pop
///
/// The first 8 bytes are dropped when the first four are zero, the next four
/// are not all zero, and byte 7 or byte 8 is zero.
pub fn anti_pop_offset(data: &[u8]) -> usize {
    let Some(head) = data.get(..=ANTI_POP_TRIM) else {
        return 0;
    };

    let leading_silence = head[..4].iter().all(|&b| b == 0);
    let followed_by_signal = head[4..8].iter().any(|&b| b != 0);
    if leading_silence && followed_by_signal && (head[7] == 0 || head[8] == 0) {
        ANTI_POP_TRIM
    } else {
        0
    }
}

/// Transcode a sample into a complete RIFF/WAVE file
pub fn encode_wave(sample: &Sample) -> binrw::BinResult<Vec<u8>> {
    let bytes_per_sample = bytes_per_sample(sample.multiplier);
    let offset = anti_pop_offset(&sample.data);
    let payload = &sample.data[offset..];

    let header = WaveHeader::pcm_mono(sample.sample_rate, bytes_per_sample, payload.len() as u32);

    let mut cursor = Cursor::new(Vec::with_capacity(WaveHeader::SIZE + payload.len()));
    cursor.write_le(&header)?;

    let mask = (u32::from(bytes_per_sample) << 7) as u8;
    let mut out = cursor.into_inner();
    out.extend(payload.iter().map(|&b| b ^ mask));
    Ok(out)
}
