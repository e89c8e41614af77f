//! `.j2a` animation archive parsing
//!
//! An archive is a fixed header with a set directory, followed by the sets
//! themselves. All values are little-endian.
//!
//! ```text
//! u32 magic "ALIB" | u32 signature | u32 headerLen | u32 version word
//! u32 fileLen | u32 crc | i32 setCount | u32[setCount] setAddr
//! ```
//!
//! Each set starts with a 44-byte sub-header:
//!
//! ```text
//! u32 "ANIM" | u8 animCount | u8 sampleCount | u16 frameCount | u32 cumSampleIdx
//! i32 x 8 (compressed/uncompressed lengths of the info, frame, image and
//! sample blocks)
//! ```
//!
//! followed by the four [`Block`](crate::block::Block)s. Sets are read
//! sequentially rather than through the directory.
//!
//! The header length is the edition discriminant; see [`ArchiveVersion`].
//!
//! # Example
//!
//! ```
//! use j2a_formats::archive::{Archive, ArchiveBuilder, ArchiveVersion, SetBuilder};
//! use std::io::Cursor;
//!
//! let data = ArchiveBuilder::new()
//!     .set(SetBuilder::new())
//!     .declared_sets(109)
//!     .fill_declared_sets(true)
//!     .build()
//!     .expect("archive should build");
//!
//! let archive = Archive::read(&mut Cursor::new(data)).expect("archive should parse");
//! assert_eq!(archive.version(false), ArchiveVersion::BaseGame { shareware: false });
//! ```

mod animation;
mod builder;
mod error;
mod header;
mod parser;
mod version;

pub use animation::{AnimSet, Animation};
pub use builder::{ArchiveBuilder, SetBuilder};
pub use error::{ArchiveError, ArchiveResult};
pub use header::{
    ARCHIVE_MAGIC, ARCHIVE_SIGNATURE, ARCHIVE_VERSION_WORD, ArchiveHeader, BlockLengths,
    FIXED_HEADER_SIZE, SET_HEADER_SIZE, SET_MAGIC, SetHeader,
};
pub use parser::Archive;
pub use version::{
    ArchiveVersion, BASE_GAME_HEADER_LEN, CHRISTMAS_PROBE_MIN_ANIMS, CHRISTMAS_PROBE_SET,
    HOLIDAY_HARE_HEADER_LEN, PLUS_EXTENSION_HEADER_LEN, SECRET_FILES_HEADER_LEN,
};
