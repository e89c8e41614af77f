//! Canonical 44-byte WAVE header

use binrw::{BinRead, BinWrite};

/// RIFF/WAVE header with a single `fmt ` and `data` chunk
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct WaveHeader {
    /// `RIFF`
    #[br(assert(riff == *b"RIFF"))]
    pub riff: [u8; 4],
    /// Size of everything after this field
    pub riff_size: u32,
    /// `WAVE`
    #[br(assert(wave == *b"WAVE"))]
    pub wave: [u8; 4],
    /// `fmt `
    pub fmt: [u8; 4],
    /// Length of the format chunk body (16)
    pub fmt_size: u32,
    /// 1 for PCM
    pub format_tag: u16,
    /// Channel count
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Bytes per second
    pub byte_rate: u32,
    /// Bytes per sample frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// `data`
    pub data: [u8; 4],
    /// Payload length in bytes
    pub data_size: u32,
}

impl WaveHeader {
    /// Encoded size in bytes
    pub const SIZE: usize = 44;

    /// Header for mono PCM with `bytes_per_sample` bytes per sample
    ///
    /// The derived size fields wrap like the 32-bit fields they are stored in.
    pub fn pcm_mono(sample_rate: u32, bytes_per_sample: u16, data_size: u32) -> Self {
        Self {
            riff: *b"RIFF",
            riff_size: 36u32.wrapping_add(data_size),
            wave: *b"WAVE",
            fmt: *b"fmt ",
            fmt_size: 16,
            format_tag: 1,
            channels: 1,
            sample_rate,
            byte_rate: sample_rate.wrapping_mul(u32::from(bytes_per_sample)),
            block_align: bytes_per_sample,
            bits_per_sample: bytes_per_sample * 8,
            data: *b"data",
            data_size,
        }
    }
}
