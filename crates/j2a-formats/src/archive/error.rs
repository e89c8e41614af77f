//! Archive error types

use thiserror::Error;

/// Structural errors that prevent an archive from being read at all
///
/// Truncated set data and bad per-set magic values are not errors: they are
/// logged and recorded on the [`Archive`](super::Archive) instead.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// File-type tag is not `ALIB`
    #[error("invalid archive magic: expected 0x42494C41, got 0x{0:08X}")]
    InvalidMagic(u32),

    /// Inner signature does not match
    #[error("invalid archive signature: expected 0x00BEBA00, got 0x{0:08X}")]
    InvalidSignature(u32),

    /// Secondary magic/version word does not match
    #[error("invalid archive version word: expected 0x18080200, got 0x{0:08X}")]
    InvalidVersionWord(u32),

    /// Negative set count in the header
    #[error("invalid set count: {0}")]
    InvalidSetCount(i32),

    /// The header length field disagrees with the directory that follows it
    #[error("header length mismatch: field says {declared} bytes, header occupies {actual}")]
    HeaderLengthMismatch {
        /// Value of the header length field
        declared: u32,
        /// Bytes actually occupied by the fixed header and set directory
        actual: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;
