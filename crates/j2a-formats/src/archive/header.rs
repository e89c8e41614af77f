//! Archive and set header structures

use binrw::{BinRead, BinWrite};

use super::error::{ArchiveError, ArchiveResult};

/// File-type tag, `ALIB` little-endian
pub const ARCHIVE_MAGIC: u32 = 0x4249_4C41;

/// Inner signature following the file-type tag
pub const ARCHIVE_SIGNATURE: u32 = 0x00BE_BA00;

/// Secondary magic/version word
pub const ARCHIVE_VERSION_WORD: u32 = 0x1808_0200;

/// Per-set magic, `ANIM` little-endian
pub const SET_MAGIC: u32 = 0x4D49_4E41;

/// Size of the fixed part of the archive header, before the set directory
pub const FIXED_HEADER_SIZE: u64 = 28;

/// Size of a set sub-header
pub const SET_HEADER_SIZE: u64 = 44;

/// Archive header (28 bytes + 4 bytes per set)
///
/// The header length field doubles as the edition discriminant, see
/// [`ArchiveVersion::detect`](super::ArchiveVersion::detect). File length,
/// checksum and set addresses are carried but not used: sets are read
/// sequentially because some distributions pad between them.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct ArchiveHeader {
    /// File-type tag, always [`ARCHIVE_MAGIC`]
    pub magic: u32,

    /// Inner signature, always [`ARCHIVE_SIGNATURE`]
    pub signature: u32,

    /// Length of the header including the set directory
    pub header_length: u32,

    /// Secondary magic, always [`ARCHIVE_VERSION_WORD`]
    pub version_word: u32,

    /// Total file length (ignored)
    pub file_length: u32,

    /// Checksum (ignored)
    pub checksum: u32,

    /// Number of sets declared by the directory
    pub set_count: i32,

    /// Set directory addresses (ignored)
    #[br(count = usize::try_from(set_count).unwrap_or(0))]
    pub set_addresses: Vec<u32>,
}

impl ArchiveHeader {
    /// Create a header for `set_count` sets with a consistent length field
    pub fn new(set_count: usize) -> Self {
        let set_addresses = vec![0; set_count];
        Self {
            magic: ARCHIVE_MAGIC,
            signature: ARCHIVE_SIGNATURE,
            header_length: Self::encoded_size(set_count) as u32,
            version_word: ARCHIVE_VERSION_WORD,
            file_length: 0,
            checksum: 0,
            set_count: set_count as i32,
            set_addresses,
        }
    }

    /// Bytes occupied by a header with `set_count` directory entries
    pub const fn encoded_size(set_count: usize) -> u64 {
        FIXED_HEADER_SIZE + 4 * set_count as u64
    }

    /// Number of sets declared, negative counts read as zero
    pub fn set_count(&self) -> usize {
        usize::try_from(self.set_count).unwrap_or(0)
    }

    /// Validate magic values and the header length field
    pub fn validate(&self) -> ArchiveResult<()> {
        if self.magic != ARCHIVE_MAGIC {
            return Err(ArchiveError::InvalidMagic(self.magic));
        }

        if self.signature != ARCHIVE_SIGNATURE {
            return Err(ArchiveError::InvalidSignature(self.signature));
        }

        if self.version_word != ARCHIVE_VERSION_WORD {
            return Err(ArchiveError::InvalidVersionWord(self.version_word));
        }

        if self.set_count < 0 {
            return Err(ArchiveError::InvalidSetCount(self.set_count));
        }

        let actual = Self::encoded_size(self.set_addresses.len());
        if u64::from(self.header_length) != actual {
            return Err(ArchiveError::HeaderLengthMismatch {
                declared: self.header_length,
                actual,
            });
        }

        Ok(())
    }
}

/// Lengths of one block as stored in the set sub-header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct BlockLengths {
    /// Stored length in the archive
    pub compressed: i32,
    /// Inflated length, 0 for blocks stored verbatim
    pub uncompressed: i32,
}

impl BlockLengths {
    /// Lengths of a block stored verbatim
    pub const fn raw(length: i32) -> Self {
        Self {
            compressed: length,
            uncompressed: 0,
        }
    }
}

/// Set sub-header (44 bytes)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct SetHeader {
    /// Set magic, [`SET_MAGIC`] for a usable set
    pub magic: u32,

    /// Number of animations in the set
    pub anim_count: u8,

    /// Number of samples in the set
    pub sample_count: u8,

    /// Total frame count (ignored)
    pub frame_count: u16,

    /// Cumulative sample index (ignored)
    pub cumulative_sample_index: u32,

    /// Animation info block
    pub info: BlockLengths,

    /// Frame geometry block
    pub frames: BlockLengths,

    /// Image data block
    pub images: BlockLengths,

    /// Sample data block
    pub samples: BlockLengths,
}

impl SetHeader {
    /// Whether the set carries the expected magic
    pub fn has_valid_magic(&self) -> bool {
        self.magic == SET_MAGIC
    }
}
