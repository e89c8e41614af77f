//! Archive edition detection

use std::fmt;
use tracing::{error, info};

/// Header length of the base game archive
pub const BASE_GAME_HEADER_LEN: u32 = 464;

/// Header length shared by the Secret Files and Christmas Chronicles archives
pub const SECRET_FILES_HEADER_LEN: u32 = 500;

/// Header length of the Holiday Hare '98 archive
pub const HOLIDAY_HARE_HEADER_LEN: u32 = 476;

/// Header length of plus-extension packs
pub const PLUS_EXTENSION_HEADER_LEN: u32 = 64;

/// Set index inspected by the Christmas Chronicles heuristic
pub const CHRISTMAS_PROBE_SET: usize = 65;

/// Animation count above which the probe set marks Christmas Chronicles
pub const CHRISTMAS_PROBE_MIN_ANIMS: u8 = 5;

/// Archive editions, told apart by the header length field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveVersion {
    /// Base game (464-byte header)
    BaseGame {
        /// Fewer sets than declared were present
        shareware: bool,
    },
    /// The Secret Files (500-byte header)
    SecretFiles,
    /// Christmas Chronicles (500-byte header, large set #65)
    ChristmasChronicles,
    /// Holiday Hare '98 (476-byte header)
    HolidayHare,
    /// Plus extension pack (64-byte header)
    PlusExtension,
    /// Unsupported or unrecognised archive
    Unknown,
}

impl ArchiveVersion {
    /// Detect the edition from the header length and parse observations
    ///
    /// The table is closed. Anything it does not name is [`Self::Unknown`],
    /// including the Secret Files demo (500-byte header, truncated stream)
    /// and plus-extension packs unless `allow_plus` is set.
    pub fn detect(
        header_len: u32,
        stream_complete: bool,
        seems_like_cc: bool,
        allow_plus: bool,
    ) -> Self {
        match header_len {
            BASE_GAME_HEADER_LEN => Self::BaseGame {
                shareware: !stream_complete,
            },
            SECRET_FILES_HEADER_LEN if !stream_complete => {
                error!("Detected The Secret Files demo, which is not supported");
                Self::Unknown
            }
            SECRET_FILES_HEADER_LEN if seems_like_cc => Self::ChristmasChronicles,
            SECRET_FILES_HEADER_LEN => Self::SecretFiles,
            HOLIDAY_HARE_HEADER_LEN => Self::HolidayHare,
            PLUS_EXTENSION_HEADER_LEN if allow_plus => Self::PlusExtension,
            _ => Self::Unknown,
        }
    }

    /// Detect and log the result
    pub fn detect_logged(
        header_len: u32,
        stream_complete: bool,
        seems_like_cc: bool,
        allow_plus: bool,
    ) -> Self {
        let version = Self::detect(header_len, stream_complete, seems_like_cc, allow_plus);
        if version.is_known() {
            info!("Detected {version}");
        } else {
            error!("Archive with header length {header_len} is not supported");
        }
        version
    }

    /// Whether the archive can be converted
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether this is the truncated shareware demo of the base game
    pub const fn is_shareware(self) -> bool {
        matches!(self, Self::BaseGame { shareware: true })
    }
}

impl fmt::Display for ArchiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseGame { shareware: false } => write!(f, "base game"),
            Self::BaseGame { shareware: true } => write!(f, "base game (shareware demo)"),
            Self::SecretFiles => write!(f, "The Secret Files"),
            Self::ChristmasChronicles => write!(f, "Christmas Chronicles"),
            Self::HolidayHare => write!(f, "Holiday Hare '98"),
            Self::PlusExtension => write!(f, "plus extension"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_game() {
        assert_eq!(
            ArchiveVersion::detect(464, true, false, false),
            ArchiveVersion::BaseGame { shareware: false }
        );
        assert_eq!(
            ArchiveVersion::detect(464, false, false, false),
            ArchiveVersion::BaseGame { shareware: true }
        );
        assert!(ArchiveVersion::detect(464, false, false, false).is_shareware());
    }

    #[test]
    fn test_secret_files_family() {
        assert_eq!(
            ArchiveVersion::detect(500, true, false, false),
            ArchiveVersion::SecretFiles
        );
        assert_eq!(
            ArchiveVersion::detect(500, true, true, false),
            ArchiveVersion::ChristmasChronicles
        );
        // Demo is rejected even when the probe set looks like CC
        assert_eq!(
            ArchiveVersion::detect(500, false, true, false),
            ArchiveVersion::Unknown
        );
        assert_eq!(
            ArchiveVersion::detect(500, false, false, true),
            ArchiveVersion::Unknown
        );
    }

    #[test]
    fn test_holiday_hare_ignores_flags() {
        for complete in [true, false] {
            for cc in [true, false] {
                assert_eq!(
                    ArchiveVersion::detect(476, complete, cc, false),
                    ArchiveVersion::HolidayHare
                );
            }
        }
    }

    #[test]
    fn test_plus_requires_opt_in() {
        assert_eq!(
            ArchiveVersion::detect(64, true, false, false),
            ArchiveVersion::Unknown
        );
        assert_eq!(
            ArchiveVersion::detect(64, true, false, true),
            ArchiveVersion::PlusExtension
        );
    }

    #[test]
    fn test_other_lengths_unknown() {
        for len in [0, 28, 63, 65, 463, 465, 477, 499, 501, u32::MAX] {
            let version = ArchiveVersion::detect(len, true, false, true);
            assert_eq!(version, ArchiveVersion::Unknown, "header length {len}");
            assert!(!version.is_known());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ArchiveVersion::HolidayHare.to_string(), "Holiday Hare '98");
        assert_eq!(
            ArchiveVersion::BaseGame { shareware: true }.to_string(),
            "base game (shareware demo)"
        );
    }
}
