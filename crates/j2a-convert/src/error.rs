//! Error types for the conversion pipeline

use j2a_formats::archive::ArchiveError;
use j2a_formats::sprite::SpriteError;
use std::path::PathBuf;
use thiserror::Error;

/// Conversion errors
///
/// Only failures that abort the whole conversion are reported here.
/// Problems with a single asset are logged and the asset is skipped.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The archive could not be parsed
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// The archive edition is not supported
    #[error("Unknown archive version (header length {header_len})")]
    UnknownVersion {
        /// Header length found in the archive
        header_len: u32,
    },

    /// The sink refused a file
    #[error("Cannot add file to output container: {path}")]
    SinkRejected {
        /// Path that was refused
        path: String,
    },

    /// A sprite container could not be encoded
    #[error("Sprite error: {0}")]
    Sprite(#[from] SpriteError),

    /// A wave file could not be encoded
    #[error("Wave encoding error: {0}")]
    Wave(#[from] binrw::Error),

    /// I/O error while reading the archive
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversions
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Mapping table errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// Failed to open the mapping file
    #[error("Failed to load mapping from {path}: {source}")]
    LoadFailed {
        /// Path that failed to load
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid JSON format
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The menu palette does not have 256 entries
    #[error("Menu palette must have 256 entries, found {0}")]
    InvalidPaletteLength(usize),

    /// The remap table does not have 256 entries
    #[error("Remap table must have 256 entries, found {0}")]
    InvalidRemapLength(usize),

    /// The same (set, id) pair appears twice
    #[error("Duplicate {kind} mapping for set {set}, id {id}")]
    DuplicateEntry {
        /// `animation` or `sample`
        kind: &'static str,
        /// Set index
        set: usize,
        /// Index within the set
        id: usize,
    },
}

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    /// Path does not point at what is expected
    #[error("Invalid path {path}: {reason}")]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ConvertError::UnknownVersion { header_len: 123 };
        assert_eq!(
            err.to_string(),
            "Unknown archive version (header length 123)"
        );

        let err = ConvertError::SinkRejected {
            path: "Animations/Jazz/idle.aura".to_string(),
        };
        assert!(err.to_string().contains("Animations/Jazz/idle.aura"));

        let err = MappingError::DuplicateEntry {
            kind: "sample",
            set: 3,
            id: 7,
        };
        assert_eq!(err.to_string(), "Duplicate sample mapping for set 3, id 7");
    }
}
