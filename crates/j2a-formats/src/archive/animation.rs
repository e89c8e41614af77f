//! Animations, samples and the sets that own them

use tracing::{debug, warn};

use super::header::SetHeader;
use crate::block::Block;
use crate::frame::{Frame, Point, decode_frame_pixels};
use crate::sample::Sample;

/// Bytes of unused data after each animation's info record
const INFO_RECORD_PADDING: usize = 4;

/// One animation with its decoded frames and derived cell layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Animation {
    /// Index of the animation within its set
    pub index: usize,
    /// Legacy frame rate
    pub frame_rate: u16,
    /// Frames in playback order
    pub frames: Vec<Frame>,
    /// Largest negated hotspot over all frames, never negative
    pub normalized_hotspot: Point,
    /// Largest `size + hotspot` over all frames
    pub largest_offset: Point,
    /// Cell size that holds every frame once hotspots share an origin
    pub adjusted_size: Point,
}

impl Animation {
    /// Create an empty animation
    pub fn new(index: usize, frame_rate: u16) -> Self {
        Self {
            index,
            frame_rate,
            ..Self::default()
        }
    }

    /// Number of frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Append a frame and grow the layout fields to cover it
    ///
    /// The fields are accumulated frame by frame in 16-bit arithmetic, so a
    /// later frame can only grow them.
    pub fn push_frame(&mut self, frame: Frame) {
        let nh = &mut self.normalized_hotspot;
        nh.x = nh.x.max(frame.hotspot.x.wrapping_neg());
        nh.y = nh.y.max(frame.hotspot.y.wrapping_neg());

        let lo = &mut self.largest_offset;
        lo.x = lo.x.max(frame.size.x.wrapping_add(frame.hotspot.x));
        lo.y = lo.y.max(frame.size.y.wrapping_add(frame.hotspot.y));

        let adjusted = &mut self.adjusted_size;
        adjusted.x = adjusted.x.max(self.normalized_hotspot.x.wrapping_add(self.largest_offset.x));
        adjusted.y = adjusted.y.max(self.normalized_hotspot.y.wrapping_add(self.largest_offset.y));

        self.frames.push(frame);
    }

    /// Read one animation from the info, frame and image blocks of a set
    pub(crate) fn read(
        index: usize,
        info: &mut Block,
        frame_data: &mut Block,
        image_data: &mut Block,
    ) -> Self {
        let frame_count = info.read_u16();
        let frame_rate = info.read_u16();
        info.discard(INFO_RECORD_PADDING);

        let mut anim = Self::new(index, frame_rate);
        anim.frames.reserve(usize::from(frame_count));

        for _ in 0..frame_count {
            let mut frame = Frame {
                size: read_point(frame_data),
                coldspot: read_point(frame_data),
                hotspot: read_point(frame_data),
                gunspot: read_point(frame_data),
                image_addr: frame_data.read_i32(),
                mask_addr: frame_data.read_i32(),
                ..Frame::default()
            };

            let decoded =
                decode_frame_pixels(image_data, frame.image_addr, frame.width(), frame.height());
            frame.draw_transparent = decoded.draw_transparent;
            frame.pixels = decoded.pixels;

            anim.push_frame(frame);
        }

        anim
    }
}

fn read_point(block: &mut Block) -> Point {
    let x = block.read_i16();
    let y = block.read_i16();
    Point::new(x, y)
}

/// One resource group of the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimSet {
    /// Position of the set in the archive
    pub index: usize,
    /// Sub-header the set was read from
    pub header: SetHeader,
    /// Animations in set order
    pub animations: Vec<Animation>,
    /// Samples in set order
    pub samples: Vec<Sample>,
}

impl AnimSet {
    /// Decode the animations and samples of a set from its four blocks
    ///
    /// A rejected sample header ends sample parsing for this set; samples
    /// read before it are kept.
    pub(crate) fn read(
        index: usize,
        header: SetHeader,
        mut info: Block,
        mut frame_data: Block,
        mut image_data: Block,
        mut sample_data: Block,
    ) -> Self {
        let animations = (0..usize::from(header.anim_count))
            .map(|j| Animation::read(j, &mut info, &mut frame_data, &mut image_data))
            .collect();

        let mut samples = Vec::with_capacity(usize::from(header.sample_count));
        for j in 0..usize::from(header.sample_count) {
            match Sample::parse(&mut sample_data, index, j) {
                Ok(sample) => samples.push(sample),
                Err(e) => {
                    warn!("Sample {j} in set {index} has an invalid header, skipping the rest: {e}");
                    break;
                }
            }
        }

        if info.is_poisoned() || frame_data.is_poisoned() {
            debug!("Set {index} geometry was truncated, frames past the end are empty");
        }

        Self {
            index,
            header,
            animations,
            samples,
        }
    }
}
