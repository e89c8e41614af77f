//! Animation frames and their run-length pixel encoding
//!
//! Each frame's image entry in the image data block starts with two `u16`
//! words (width with the semi-transparency flag in bit 15, then height)
//! followed by an opcode stream:
//!
//! | Opcode | Meaning |
//! |---|---|
//! | `0x00..=0x7F` | skip `op` transparent pixels |
//! | `0x80` | skip to the end of the current row |
//! | `0x81..=0xFF` | copy the next `op & 0x7F` index bytes |
//!
//! A `0x80` that arrives exactly at the start of a row skips nothing unless
//! the opcode before it was also `0x80`. Without that rule a row filled to
//! its last pixel by a copy would blank the following row.

mod decode;
mod encode;

pub use decode::{DecodedFrame, decode_frame_pixels};
pub use encode::encode_frame_pixels;

/// Flag in the image entry's width word marking a semi-transparent frame
pub const DRAW_TRANSPARENT_FLAG: u16 = 0x8000;

/// Opcode that skips to the end of the current row
pub const OP_SKIP_LINE: u8 = 0x80;

/// Largest run a single skip or copy opcode can carry
pub const MAX_OP_RUN: usize = 0x7F;

/// Signed 2D offset or size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal component
    pub x: i16,
    /// Vertical component
    pub y: i16,
}

impl Point {
    /// Origin
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Whether both components are zero
    pub const fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// One decoded animation frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Image size in pixels
    pub size: Point,
    /// Collision anchor, relative to the image
    pub coldspot: Point,
    /// Positioning anchor, relative to the image
    pub hotspot: Point,
    /// Projectile origin, relative to the image
    pub gunspot: Point,
    /// Offset of the image entry in the set's image data block
    pub image_addr: i32,
    /// Offset of the mask entry (not decoded)
    pub mask_addr: i32,
    /// Frame is drawn semi-transparent
    pub draw_transparent: bool,
    /// Palette indices, `width * height` bytes in raster order
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Width in pixels, negative sizes read as zero
    pub fn width(&self) -> usize {
        usize::try_from(self.size.x).unwrap_or(0)
    }

    /// Height in pixels, negative sizes read as zero
    pub fn height(&self) -> usize {
        usize::try_from(self.size.y).unwrap_or(0)
    }

    /// Palette index at `(x, y)`, 0 outside the image
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x >= self.width() {
            return 0;
        }
        self.pixels.get(y * self.width() + x).copied().unwrap_or(0)
    }
}
