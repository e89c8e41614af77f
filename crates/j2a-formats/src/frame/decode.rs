//! Frame opcode stream decoding

use super::{DRAW_TRANSPARENT_FLAG, OP_SKIP_LINE};
use crate::block::Block;

/// Pixels and flags recovered from one image entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFrame {
    /// Semi-transparency flag from the width word
    pub draw_transparent: bool,
    /// Palette indices, `width * height` bytes, 0 where nothing was copied
    pub pixels: Vec<u8>,
}

/// Decode the image entry at `image_addr` into `width * height` indices
///
/// Decoding stops when the pixel total is reached. It also stops when the
/// block is poisoned, leaving the remainder of the frame transparent, so a
/// truncated stream always terminates. Copies never write past the frame.
pub fn decode_frame_pixels(
    block: &mut Block,
    image_addr: i32,
    width: usize,
    height: usize,
) -> DecodedFrame {
    let total = width * height;
    let mut pixels = vec![0u8; total];

    let Ok(start) = usize::try_from(image_addr) else {
        return DecodedFrame {
            draw_transparent: false,
            pixels,
        };
    };

    block.seek_to(start);
    let width_word = block.read_u16();
    let _height_word = block.read_u16();
    let draw_transparent = width_word & DRAW_TRANSPARENT_FLAG != 0;

    let mut read = 0usize;
    let mut last_op_empty = true;

    while read < total {
        let op = block.read_u8();
        if block.is_poisoned() {
            break;
        }

        if op < OP_SKIP_LINE {
            read += usize::from(op);
        } else if op == OP_SKIP_LINE {
            let column = read % width;
            if column != 0 || last_op_empty {
                read += width - column;
            }
        } else {
            let count = usize::from(op & 0x7F);
            let end = (read + count).min(total);
            block.read_raw_into(&mut pixels[read..end]);
            block.discard(read + count - end);
            read += count;
        }

        last_op_empty = op == OP_SKIP_LINE;
    }

    DecodedFrame {
        draw_transparent,
        pixels,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(width_word: u16, ops: &[u8]) -> Block {
        let mut data = Vec::new();
        data.extend_from_slice(&width_word.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(ops);
        Block::from_bytes(data)
    }

    #[test]
    fn test_skip_and_copy() {
        let mut block = entry(3, &[0x01, 0x82, 5, 6, 0x83, 7, 8, 9]);
        let frame = decode_frame_pixels(&mut block, 0, 3, 2);
        assert_eq!(frame.pixels, vec![0, 5, 6, 7, 8, 9]);
        assert!(!frame.draw_transparent);
    }

    #[test]
    fn test_transparency_flag() {
        let mut block = entry(0x8000 | 2, &[0x82, 1, 2]);
        let frame = decode_frame_pixels(&mut block, 0, 2, 1);
        assert!(frame.draw_transparent);
        assert_eq!(frame.pixels, vec![1, 2]);
    }

    #[test]
    fn test_skip_line_mid_row() {
        // Row 0: one pixel then skip the rest; row 1: full copy
        let mut block = entry(3, &[0x81, 4, 0x80, 0x83, 1, 2, 3]);
        let frame = decode_frame_pixels(&mut block, 0, 3, 2);
        assert_eq!(frame.pixels, vec![4, 0, 0, 1, 2, 3]);
    }

    #[test]
    fn test_skip_line_after_full_row_copy_is_noop() {
        // Row 0 is filled by a copy; the 0x80 that follows lands on the start
        // of row 1 and must not blank it
        let mut block = entry(2, &[0x82, 1, 2, 0x80, 0x82, 3, 4]);
        let frame = decode_frame_pixels(&mut block, 0, 2, 2);
        assert_eq!(frame.pixels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_consecutive_skip_lines_blank_rows() {
        // First 0x80 at the very start blanks row 0, the second blanks row 1
        let mut block = entry(2, &[0x80, 0x80, 0x82, 7, 8]);
        let frame = decode_frame_pixels(&mut block, 0, 2, 3);
        assert_eq!(frame.pixels, vec![0, 0, 0, 0, 7, 8]);
    }

    #[test]
    fn test_skip_line_after_exact_skip_is_noop() {
        // A plain skip that ends exactly on the row boundary does not count
        // as a line skip either
        let mut block = entry(2, &[0x02, 0x80, 0x82, 5, 6]);
        let frame = decode_frame_pixels(&mut block, 0, 2, 2);
        assert_eq!(frame.pixels, vec![0, 0, 5, 6]);
    }

    #[test]
    fn test_entry_at_offset() {
        let mut data = vec![0xEE; 6];
        data.extend_from_slice(&[1, 0, 1, 0, 0x81, 9]);
        let mut block = Block::from_bytes(data);
        let frame = decode_frame_pixels(&mut block, 6, 1, 1);
        assert_eq!(frame.pixels, vec![9]);
    }

    #[test]
    fn test_truncated_stream_terminates() {
        let mut block = entry(4, &[0x84, 1, 2]);
        let frame = decode_frame_pixels(&mut block, 0, 4, 4);
        assert_eq!(frame.pixels.len(), 16);
        assert_eq!(&frame.pixels[..4], &[1, 2, 0, 0]);
        assert!(frame.pixels[4..].iter().all(|&p| p == 0));
        assert!(block.is_poisoned());
    }

    #[test]
    fn test_copy_past_frame_end_is_clamped() {
        let mut block = entry(2, &[0x84, 1, 2, 3, 4]);
        let frame = decode_frame_pixels(&mut block, 0, 2, 1);
        assert_eq!(frame.pixels, vec![1, 2]);
    }

    #[test]
    fn test_negative_address_gives_blank_frame() {
        let mut block = entry(2, &[0x82, 1, 2]);
        let frame = decode_frame_pixels(&mut block, -4, 2, 1);
        assert_eq!(frame.pixels, vec![0, 0]);
    }

    #[test]
    fn test_empty_frame_reads_nothing_past_header() {
        let mut block = entry(0, &[]);
        let frame = decode_frame_pixels(&mut block, 0, 0, 5);
        assert!(frame.pixels.is_empty());
        assert!(!block.is_poisoned());
    }
}
