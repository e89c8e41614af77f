//! Canonical frame encoding

use super::{DRAW_TRANSPARENT_FLAG, MAX_OP_RUN, OP_SKIP_LINE};

/// Encode a frame as a complete image entry (two header words and opcodes)
///
/// Each row is emitted as skips and copies up to its last opaque pixel,
/// followed by a `0x80` row terminator. Index 0 is transparent, as is
/// anything past the end of a short `pixels` slice.
pub fn encode_frame_pixels(
    width: u16,
    height: u16,
    draw_transparent: bool,
    pixels: &[u8],
) -> Vec<u8> {
    let w = usize::from(width);
    let h = usize::from(height);

    let width_word = (width & !DRAW_TRANSPARENT_FLAG)
        | if draw_transparent {
            DRAW_TRANSPARENT_FLAG
        } else {
            0
        };

    let mut out = Vec::with_capacity(4 + w * h + h);
    out.extend_from_slice(&width_word.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());

    if w == 0 {
        return out;
    }

    for y in 0..h {
        let row: Vec<u8> = (0..w)
            .map(|x| pixels.get(y * w + x).copied().unwrap_or(0))
            .collect();

        if let Some(last) = row.iter().rposition(|&p| p != 0) {
            encode_row(&mut out, &row[..=last]);
        }
        out.push(OP_SKIP_LINE);
    }

    out
}

fn encode_row(out: &mut Vec<u8>, row: &[u8]) {
    let mut x = 0;
    while x < row.len() {
        let transparent = row[x] == 0;
        let run = row[x..]
            .iter()
            .take(MAX_OP_RUN)
            .take_while(|&&p| (p == 0) == transparent)
            .count();

        if transparent {
            out.push(run as u8);
        } else {
            out.push(OP_SKIP_LINE | run as u8);
            out.extend_from_slice(&row[x..x + run]);
        }
        x += run;
    }
}
