//! Block construction and typed reads

use flate2::read::DeflateDecoder;
use std::io::Read;
use tracing::warn;

/// Cursor value of a poisoned block
const POISONED: usize = usize::MAX;

/// Size of the stream header that precedes compressed block data
const STREAM_HEADER_SIZE: usize = 2;

/// Trimming applied by [`Block::read_string`]
///
/// The legacy format mixes both conventions, so the caller picks one per
/// field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringTrim {
    /// Cut the field at the first embedded null byte
    ToNull,
    /// Strip trailing null bytes and spaces
    Trailing,
}

/// Exclusively-owned byte buffer with a single forward-or-random cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    buffer: Vec<u8>,
    offset: usize,
}

impl Block {
    /// Read a block from the upstream archive stream
    ///
    /// When `uncompressed_length` is positive, `length` bytes are consumed:
    /// a two-byte stream header followed by `length - 2` bytes of raw
    /// deflate data that must inflate to exactly `uncompressed_length`
    /// bytes. A short or corrupt stream yields an empty block rather than a
    /// partial one.
    ///
    /// Otherwise `length` bytes are copied verbatim. Bytes missing from a
    /// truncated upstream are left zeroed.
    pub fn read_from<R: Read>(reader: &mut R, length: i32, uncompressed_length: i32) -> Self {
        let length = usize::try_from(length).unwrap_or(0);
        let mut source = read_up_to(reader, length);

        if uncompressed_length > 0 {
            let expected = uncompressed_length as usize;
            let compressed = source.get(STREAM_HEADER_SIZE..).unwrap_or_default();
            let buffer = inflate_exact(compressed, expected).unwrap_or_default();
            Self::from_bytes(buffer)
        } else {
            source.resize(length, 0);
            Self::from_bytes(source)
        }
    }

    /// Wrap an already materialised buffer
    pub fn from_bytes(buffer: Vec<u8>) -> Self {
        Self { buffer, offset: 0 }
    }

    /// Effective length of the block (0 for a failed inflate)
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the block holds no data
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Backing bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Current cursor position, `None` once poisoned
    pub fn position(&self) -> Option<usize> {
        (self.offset != POISONED).then_some(self.offset)
    }

    /// Whether a read has overrun the block
    pub fn is_poisoned(&self) -> bool {
        self.offset == POISONED
    }

    /// Move the cursor to an absolute offset
    pub fn seek_to(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Advance the cursor without reading
    pub fn discard(&mut self, count: usize) {
        self.offset = self.offset.saturating_add(count);
    }

    /// Read one byte as a boolean (non-zero is `true`)
    pub fn read_bool(&mut self) -> bool {
        self.read_u8() != 0
    }

    /// Read an unsigned byte
    pub fn read_u8(&mut self) -> u8 {
        self.take::<1>().map_or(0, |[b]| b)
    }

    /// Read a little-endian `i16`
    pub fn read_i16(&mut self) -> i16 {
        self.take().map_or(0, i16::from_le_bytes)
    }

    /// Read a little-endian `u16`
    pub fn read_u16(&mut self) -> u16 {
        self.take().map_or(0, u16::from_le_bytes)
    }

    /// Read a little-endian `i32`
    pub fn read_i32(&mut self) -> i32 {
        self.take().map_or(0, i32::from_le_bytes)
    }

    /// Read a little-endian `u32`
    pub fn read_u32(&mut self) -> u32 {
        self.take().map_or(0, u32::from_le_bytes)
    }

    /// Read a little-endian IEEE 754 `f32`
    pub fn read_f32(&mut self) -> f32 {
        self.take().map_or(0.0, f32::from_le_bytes)
    }

    /// Read a 16.16 fixed-point number stored as `i32`
    pub fn read_fixed_f32(&mut self) -> f32 {
        self.read_i32() as f32 / 65536.0
    }

    /// Read a variable-length integer made of 7-bit chunks
    ///
    /// The most significant chunk comes first; a set high bit means another
    /// chunk follows.
    pub fn read_uint_7bit(&mut self) -> i32 {
        let mut result = 0i32;

        while let Some([current]) = self.take::<1>() {
            result |= i32::from(current & 0x7F);
            if current < 0x80 {
                break;
            }
            result <<= 7;
        }

        result
    }

    /// Copy raw bytes into `dst`, returning how many were available
    ///
    /// If fewer than `dst.len()` bytes remain, the available ones are copied,
    /// the rest of `dst` is left untouched and the cursor is poisoned.
    pub fn read_raw_into(&mut self, dst: &mut [u8]) -> usize {
        let available = self.remaining().min(dst.len());
        if available > 0 {
            dst[..available].copy_from_slice(&self.buffer[self.offset..self.offset + available]);
        }

        if available < dst.len() {
            self.offset = POISONED;
        } else {
            self.offset += available;
        }

        available
    }

    /// Read `count` raw bytes; missing bytes are zero
    pub fn read_bytes(&mut self, count: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; count];
        self.read_raw_into(&mut bytes);
        bytes
    }

    /// Read a fixed-length string field
    ///
    /// The cursor always advances by the full field length.
    pub fn read_string(&mut self, length: usize, trim: StringTrim) -> String {
        let available = self.remaining().min(length);
        let field = &self.buffer[self.offset.min(self.buffer.len())..][..available];

        let text = match trim {
            StringTrim::ToNull => field
                .iter()
                .position(|&b| b == 0)
                .map_or(field, |end| &field[..end]),
            StringTrim::Trailing => {
                let end = field
                    .iter()
                    .rposition(|&b| b != 0 && b != b' ')
                    .map_or(0, |last| last + 1);
                &field[..end]
            }
        };
        let text = String::from_utf8_lossy(text).into_owned();

        if available < length {
            self.offset = POISONED;
        } else {
            self.offset += length;
        }

        text
    }

    /// Bytes left before the end of the block; zero once poisoned
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.offset)
    }

    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        if self.remaining() < N {
            self.offset = POISONED;
            return None;
        }

        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buffer[self.offset..self.offset + N]);
        self.offset += N;
        Some(bytes)
    }
}

fn read_up_to<R: Read>(reader: &mut R, length: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(length);
    if let Err(e) = reader.take(length as u64).read_to_end(&mut data) {
        warn!("Block read stopped after {} of {} bytes: {e}", data.len(), length);
    }
    data
}

fn inflate_exact(compressed: &[u8], expected: usize) -> Option<Vec<u8>> {
    let mut decoder = DeflateDecoder::new(compressed);
    let mut buffer = vec![0u8; expected];

    match decoder.read_exact(&mut buffer) {
        Ok(()) => Some(buffer),
        Err(e) => {
            warn!("Block inflate failed ({expected} bytes expected): {e}");
            None
        }
    }
}
