//! Sprite container format
//!
//! Converted animations are stored as a single atlas image with a small
//! header:
//!
//! ```text
//! u64 signature | u32 version | flags << 24 | u8 channels | u32 width | u32 height
//! [sprite extension] | pixel payload
//! ```
//!
//! The sprite extension (present when [`SpriteFlags::HAS_SPRITE`] is set)
//! carries the frame grid, frame count, frame duration and three anchor
//! points. `width`/`height` describe one cell; the payload covers the whole
//! grid and is compressed with [`encode_pixels`].
//!
//! # Example
//!
//! ```
//! use j2a_formats::sprite::{SpriteFile, SpriteFlags, SpriteHeader};
//!
//! let header = SpriteHeader::new(SpriteFlags::empty(), 4, 2, 1, None);
//! let sprite = SpriteFile::new(header, vec![10, 20, 30, 255, 10, 20, 30, 255]);
//! let data = sprite.build().expect("valid sprite");
//!
//! assert_eq!(SpriteFile::parse(&data).expect("valid sprite"), sprite);
//! ```

mod codec;
mod error;
mod file;
mod header;

pub use codec::{decode_pixels, encode_pixels};
pub use error::{SpriteError, SpriteResult};
pub use file::SpriteFile;
pub use header::{
    AnchorPoint, SpriteExtension, SpriteFlags, SpriteHeader, frame_duration,
};

/// Format tag of sprite containers
pub const SPRITE_SIGNATURE: u64 = 0xB8EF_8498_E2BF_BBEF;

/// Container version written by this crate
pub const SPRITE_VERSION: u32 = 0x0002_208F;
