//! Archive builder for synthesising `.j2a` files
//!
//! Produces archives in the same layout the parser reads: a header with a
//! set directory, then for each set a sub-header and four blocks. Blocks are
//! either stored verbatim or deflate-compressed behind a two-byte stream
//! header.

use binrw::BinWriterExt;
use binrw::io::Cursor;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

use super::error::ArchiveResult;
use super::header::{ArchiveHeader, BlockLengths, SET_MAGIC, SetHeader};
use crate::frame::{Frame, encode_frame_pixels};
use crate::sample::Sample;

/// Stream header written in front of compressed blocks
const STREAM_HEADER: [u8; 2] = [0x78, 0xDA];

/// Mask address written for every frame
const NO_MASK: i32 = -1;

/// Builder for one set
#[derive(Debug, Clone)]
pub struct SetBuilder {
    magic: u32,
    animations: Vec<(u16, Vec<Frame>)>,
    samples: Vec<Sample>,
}

impl SetBuilder {
    /// Create an empty set with a valid magic
    pub fn new() -> Self {
        Self {
            magic: SET_MAGIC,
            animations: Vec::new(),
            samples: Vec::new(),
        }
    }

    /// Write an invalid magic so the parser skips this set
    #[must_use]
    pub fn with_bad_magic(mut self) -> Self {
        self.magic = !SET_MAGIC;
        self
    }

    /// Add an animation; frame geometry and pixels come from `frames`
    #[must_use]
    pub fn animation(mut self, frame_rate: u16, frames: Vec<Frame>) -> Self {
        self.animations.push((frame_rate, frames));
        self
    }

    /// Add a sample
    #[must_use]
    pub fn sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    fn blocks(&self) -> [Vec<u8>; 4] {
        let mut info = Vec::new();
        let mut frame_data = Vec::new();
        let mut image_data = Vec::new();

        for (frame_rate, frames) in &self.animations {
            info.extend_from_slice(&(frames.len() as u16).to_le_bytes());
            info.extend_from_slice(&frame_rate.to_le_bytes());
            info.extend_from_slice(&[0; 4]);

            for frame in frames {
                for value in [
                    frame.size.x,
                    frame.size.y,
                    frame.coldspot.x,
                    frame.coldspot.y,
                    frame.hotspot.x,
                    frame.hotspot.y,
                    frame.gunspot.x,
                    frame.gunspot.y,
                ] {
                    frame_data.extend_from_slice(&value.to_le_bytes());
                }
                frame_data.extend_from_slice(&(image_data.len() as i32).to_le_bytes());
                frame_data.extend_from_slice(&NO_MASK.to_le_bytes());

                image_data.extend(encode_frame_pixels(
                    frame.width() as u16,
                    frame.height() as u16,
                    frame.draw_transparent,
                    &frame.pixels,
                ));
            }
        }

        let sample_data = self.samples.iter().flat_map(|s| s.to_chunk(0)).collect();

        [info, frame_data, image_data, sample_data]
    }
}

impl Default for SetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a complete archive
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    sets: Vec<SetBuilder>,
    declared_sets: Option<usize>,
    fill_declared: bool,
    compress: bool,
}

impl ArchiveBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set
    #[must_use]
    pub fn set(mut self, set: SetBuilder) -> Self {
        self.sets.push(set);
        self
    }

    /// Declare `count` sets in the directory regardless of how many are added
    ///
    /// The header length follows the directory size, so 109 declared sets
    /// give the base game's 464-byte header. Missing sets are left out of
    /// the stream unless [`fill_declared_sets`](Self::fill_declared_sets) is
    /// set.
    #[must_use]
    pub fn declared_sets(mut self, count: usize) -> Self {
        self.declared_sets = Some(count);
        self
    }

    /// Pad the stream with empty sets up to the declared count
    #[must_use]
    pub fn fill_declared_sets(mut self, fill: bool) -> Self {
        self.fill_declared = fill;
        self
    }

    /// Deflate-compress every non-empty block
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Serialize the archive
    pub fn build(mut self) -> ArchiveResult<Vec<u8>> {
        let declared = self.declared_sets.unwrap_or(self.sets.len());
        if self.fill_declared {
            self.sets.resize_with(declared.max(self.sets.len()), SetBuilder::new);
        }

        let mut body = Vec::new();
        let mut set_offsets = Vec::with_capacity(self.sets.len());
        let header_size = ArchiveHeader::encoded_size(declared);

        for set in &self.sets {
            set_offsets.push((header_size + body.len() as u64) as u32);
            self.write_set(&mut body, set)?;
        }

        let mut header = ArchiveHeader::new(declared);
        header.file_length = (header_size + body.len() as u64) as u32;
        for (address, offset) in header.set_addresses.iter_mut().zip(set_offsets) {
            *address = offset;
        }

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&header)?;
        let mut data = cursor.into_inner();
        data.extend(body);
        Ok(data)
    }

    fn write_set(&self, out: &mut Vec<u8>, set: &SetBuilder) -> ArchiveResult<()> {
        let mut lengths = [BlockLengths::default(); 4];
        let mut payloads = Vec::with_capacity(4);

        for (slot, block) in lengths.iter_mut().zip(set.blocks()) {
            let (stored, block_lengths) = self.store_block(block)?;
            *slot = block_lengths;
            payloads.push(stored);
        }

        let header = SetHeader {
            magic: set.magic,
            anim_count: set.animations.len() as u8,
            sample_count: set.samples.len() as u8,
            frame_count: set.animations.iter().map(|(_, f)| f.len() as u16).sum(),
            cumulative_sample_index: 0,
            info: lengths[0],
            frames: lengths[1],
            images: lengths[2],
            samples: lengths[3],
        };

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&header)?;
        out.extend(cursor.into_inner());
        for payload in payloads {
            out.extend(payload);
        }
        Ok(())
    }

    fn store_block(&self, block: Vec<u8>) -> ArchiveResult<(Vec<u8>, BlockLengths)> {
        if !self.compress || block.is_empty() {
            let lengths = BlockLengths::raw(block.len() as i32);
            return Ok((block, lengths));
        }

        let mut encoder = DeflateEncoder::new(STREAM_HEADER.to_vec(), Compression::best());
        encoder.write_all(&block)?;
        let stored = encoder.finish()?;

        let lengths = BlockLengths {
            compressed: stored.len() as i32,
            uncompressed: block.len() as i32,
        };
        Ok((stored, lengths))
    }
}
