//! Sequential archive parsing

use binrw::BinReaderExt;
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, info, warn};

use super::animation::{AnimSet, Animation};
use super::error::ArchiveResult;
use super::header::{ArchiveHeader, BlockLengths, SET_HEADER_SIZE, SetHeader};
use super::version::{ArchiveVersion, CHRISTMAS_PROBE_MIN_ANIMS, CHRISTMAS_PROBE_SET};
use crate::block::Block;
use crate::sample::Sample;

/// A parsed animation archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// Archive header
    pub header: ArchiveHeader,
    /// Sets with a valid magic, in archive order
    pub sets: Vec<AnimSet>,
    /// Every declared set was present in the stream
    pub stream_complete: bool,
    /// The Christmas Chronicles probe set had more than 5 animations
    pub seems_like_cc: bool,
}

impl Archive {
    /// Parse an archive
    ///
    /// Structural header problems are errors. A stream that ends before the
    /// declared number of sets is not: parsing stops and
    /// [`stream_complete`](Self::stream_complete) is cleared. Sets with a bad
    /// magic are consumed and dropped.
    pub fn read<R: Read + Seek>(reader: &mut R) -> ArchiveResult<Self> {
        let stream_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let header: ArchiveHeader = reader.read_le()?;
        header.validate()?;

        let set_count = header.set_count();
        debug!(
            "Archive header: {} bytes, {} sets declared",
            header.header_length, set_count
        );

        let mut sets = Vec::with_capacity(set_count);
        let mut stream_complete = true;
        let mut seems_like_cc = false;

        for i in 0..set_count {
            let position = reader.stream_position()?;
            if position >= stream_size || stream_size - position < SET_HEADER_SIZE {
                stream_complete = false;
                warn!("Stream should contain {set_count} sets, but found {i} sets instead");
                break;
            }

            let set_header: SetHeader = reader.read_le()?;

            let info = read_block(reader, set_header.info);
            let frame_data = read_block(reader, set_header.frames);
            let image_data = read_block(reader, set_header.images);
            let sample_data = read_block(reader, set_header.samples);

            if !set_header.has_valid_magic() {
                debug!("Header for set {i} is incorrect (bad magic value), skipping");
                continue;
            }

            if i == CHRISTMAS_PROBE_SET && set_header.anim_count > CHRISTMAS_PROBE_MIN_ANIMS {
                seems_like_cc = true;
            }

            sets.push(AnimSet::read(
                i,
                set_header,
                info,
                frame_data,
                image_data,
                sample_data,
            ));
        }

        info!(
            "Read {} sets ({} animations, {} samples)",
            sets.len(),
            sets.iter().map(|s| s.animations.len()).sum::<usize>(),
            sets.iter().map(|s| s.samples.len()).sum::<usize>()
        );

        Ok(Self {
            header,
            sets,
            stream_complete,
            seems_like_cc,
        })
    }

    /// Header length, which identifies the edition
    pub fn header_len(&self) -> u32 {
        self.header.header_length
    }

    /// Detect the edition of this archive
    pub fn version(&self, allow_plus: bool) -> ArchiveVersion {
        ArchiveVersion::detect_logged(
            self.header.header_length,
            self.stream_complete,
            self.seems_like_cc,
            allow_plus,
        )
    }

    /// Every animation with the index of its set
    pub fn animations(&self) -> impl Iterator<Item = (usize, &Animation)> {
        self.sets
            .iter()
            .flat_map(|set| set.animations.iter().map(move |anim| (set.index, anim)))
    }

    /// Every sample with the index of its set
    pub fn samples(&self) -> impl Iterator<Item = (usize, &Sample)> {
        self.sets
            .iter()
            .flat_map(|set| set.samples.iter().map(move |sample| (set.index, sample)))
    }
}

fn read_block<R: Read>(reader: &mut R, lengths: BlockLengths) -> Block {
    Block::read_from(reader, lengths.compressed, lengths.uncompressed)
}
