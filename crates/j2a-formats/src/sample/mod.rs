//! Embedded audio samples
//!
//! Samples live in the fourth block of a set as a sequence of legacy
//! RIFF-like chunks. Two sub-formats exist, told apart by the format tag:
//! `ASFF` (1.20 era, always 8-bit) and `AS  ` (1.24 era, carries a bit-depth
//! multiplier). The chunk header layout is:
//!
//! ```text
//! i32 totalSize | "RIFF" | i32 chunkSize | format | "SAMP" | u32 sampSize
//! padding (40, or 28 for ASFF)
//! u16 multiplier (ASFF: 2 ignored bytes, multiplier 0)
//! 2 ignored bytes | u32 payloadSize (ignored) | 8 bytes padding
//! u32 sampleRate | payload | 4 bytes padding | alignment padding
//! ```

mod chunk;
mod error;

pub use chunk::{Sample, SampleFormat};
pub use error::{SampleError, SampleResult};

/// `RIFF` little-endian
pub const RIFF_MAGIC: u32 = 0x4646_4952;

/// `SAMP` little-endian
pub const SAMP_MAGIC: u32 = 0x504D_4153;

/// `ASFF` little-endian
pub const ASFF_TAG: u32 = 0x4646_5341;

/// `AS  ` little-endian
pub const AS_TAG: u32 = 0x2020_5341;
