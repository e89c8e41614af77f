//! Sample error types

use thiserror::Error;

/// Errors raised while parsing a legacy sample chunk
#[derive(Debug, Error)]
pub enum SampleError {
    /// The chunk does not start with `RIFF`
    #[error("invalid sample chunk magic: expected RIFF, got 0x{0:08X}")]
    InvalidRiffMagic(u32),

    /// The `SAMP` sub-chunk tag is missing
    #[error("invalid sample sub-chunk magic: expected SAMP, got 0x{0:08X}")]
    InvalidSampMagic(u32),

    /// Neither `ASFF` nor `AS  `
    #[error("unknown sample format tag 0x{0:08X}")]
    UnknownFormat(u32),

    /// Chunk size too small to hold the fixed sample header
    #[error("sample chunk size {0} is smaller than its header")]
    InvalidChunkSize(i32),
}

/// Result type for sample operations
pub type SampleResult<T> = Result<T, SampleError>;
