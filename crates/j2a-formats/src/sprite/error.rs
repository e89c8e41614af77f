//! Sprite container error types

use thiserror::Error;

/// Errors raised while building or parsing a sprite container
#[derive(Debug, Error)]
pub enum SpriteError {
    /// Format tag does not match
    #[error("invalid sprite signature: 0x{0:016X}")]
    InvalidSignature(u64),

    /// Version part of the version/flags word is not supported
    #[error("unsupported sprite container version: 0x{0:06X}")]
    UnsupportedVersion(u32),

    /// Only RGB and RGBA payloads exist
    #[error("invalid channel count: {0} (expected 3 or 4)")]
    InvalidChannels(u8),

    /// Pixel buffer size disagrees with the header
    #[error("pixel buffer holds {actual} bytes, header describes {expected}")]
    PixelCountMismatch {
        /// Bytes implied by the header
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Payload dimensions overflow
    #[error("sprite dimensions {width}x{height} are too large")]
    DimensionsTooLarge {
        /// Payload width
        width: u64,
        /// Payload height
        height: u64,
    },

    /// Payload ended before every pixel was decoded
    #[error("sprite payload truncated after {decoded} of {expected} pixels")]
    TruncatedPayload {
        /// Pixels decoded before the payload ran out
        decoded: usize,
        /// Pixels implied by the header
        expected: usize,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for sprite operations
pub type SpriteResult<T> = Result<T, SpriteError>;
