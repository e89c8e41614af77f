//! Run/diff/index pixel codec
//!
//! A byte-oriented lossless codec over RGB(A) pixels in raster order. The
//! encoder keeps the previous pixel (seeded to opaque black), a run counter
//! and a 64-slot color cache indexed by `(r*3 + g*5 + b*7 + a*11) % 64`.
//!
//! | Tag | Layout |
//! |---|---|
//! | `00iiiiii` | cache index |
//! | `01rrggbb` | per-channel delta in `-2..=1`, biased by 2 |
//! | `10gggggg` `rrrrbbbb` | green delta in `-32..=31`, red/blue relative to green in `-8..=7` |
//! | `11llllll` | run of `l + 1` copies of the previous pixel (`l < 62`) |
//! | `0xFE` `r g b` | raw RGB |
//! | `0xFF` `r g b a` | raw RGBA |
//!
//! The stream has no end marker. With three channels the alpha component
//! stays 255 and raw RGBA is never emitted.

use super::error::{SpriteError, SpriteResult};

const OP_INDEX: u8 = 0x00;
const OP_DIFF: u8 = 0x40;
const OP_LUMA: u8 = 0x80;
const OP_RUN: u8 = 0xC0;
const OP_RGB: u8 = 0xFE;
const OP_RGBA: u8 = 0xFF;
const MASK_2: u8 = 0xC0;

/// Longest run a single run opcode can carry
const MAX_RUN: u8 = 62;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Rgba {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Rgba {
    const START: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    fn hash(self) -> usize {
        (usize::from(self.r) * 3
            + usize::from(self.g) * 5
            + usize::from(self.b) * 7
            + usize::from(self.a) * 11)
            % 64
    }

    fn read(chunk: &[u8], alpha: u8) -> Self {
        Self {
            r: chunk[0],
            g: chunk[1],
            b: chunk[2],
            a: chunk.get(3).copied().unwrap_or(alpha),
        }
    }
}

/// Encode `pixels` (`channels` bytes per pixel, 3 or 4) into a codec stream
///
/// A trailing partial pixel is ignored.
pub fn encode_pixels(pixels: &[u8], channels: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() / 2);
    let mut index = [Rgba::default(); 64];
    let mut prev = Rgba::START;
    let mut run = 0u8;

    let count = pixels.len() / channels;
    for (i, chunk) in pixels.chunks_exact(channels).enumerate() {
        let px = Rgba::read(chunk, prev.a);

        if px == prev {
            run += 1;
            if run == MAX_RUN || i + 1 == count {
                out.push(OP_RUN | (run - 1));
                run = 0;
            }
            continue;
        }

        if run > 0 {
            out.push(OP_RUN | (run - 1));
            run = 0;
        }

        let slot = px.hash();
        if index[slot] == px {
            out.push(OP_INDEX | slot as u8);
        } else {
            index[slot] = px;
            encode_literal(&mut out, px, prev);
        }

        prev = px;
    }

    out
}

fn encode_literal(out: &mut Vec<u8>, px: Rgba, prev: Rgba) {
    if px.a != prev.a {
        out.extend_from_slice(&[OP_RGBA, px.r, px.g, px.b, px.a]);
        return;
    }

    let vr = px.r.wrapping_sub(prev.r) as i8;
    let vg = px.g.wrapping_sub(prev.g) as i8;
    let vb = px.b.wrapping_sub(prev.b) as i8;
    let vg_r = vr.wrapping_sub(vg);
    let vg_b = vb.wrapping_sub(vg);

    let small = -2..=1;
    if small.contains(&vr) && small.contains(&vg) && small.contains(&vb) {
        out.push(OP_DIFF | ((vr + 2) as u8) << 4 | ((vg + 2) as u8) << 2 | (vb + 2) as u8);
    } else if (-8..=7).contains(&vg_r) && (-32..=31).contains(&vg) && (-8..=7).contains(&vg_b) {
        out.push(OP_LUMA | (vg + 32) as u8);
        out.push(((vg_r + 8) as u8) << 4 | (vg_b + 8) as u8);
    } else {
        out.extend_from_slice(&[OP_RGB, px.r, px.g, px.b]);
    }
}

/// Decode `pixel_count` pixels of `channels` bytes each from a codec stream
pub fn decode_pixels(data: &[u8], channels: usize, pixel_count: usize) -> SpriteResult<Vec<u8>> {
    let mut out = Vec::with_capacity(pixel_count * channels);
    let mut index = [Rgba::default(); 64];
    let mut px = Rgba::START;
    let mut bytes = data.iter().copied();
    let mut decoded = 0usize;

    let truncated = |decoded| SpriteError::TruncatedPayload {
        decoded,
        expected: pixel_count,
    };

    while decoded < pixel_count {
        let op = bytes.next().ok_or_else(|| truncated(decoded))?;
        let mut repeat = 1usize;

        match op {
            OP_RGB => {
                let mut raw = [0u8; 3];
                for byte in &mut raw {
                    *byte = bytes.next().ok_or_else(|| truncated(decoded))?;
                }
                px = Rgba { r: raw[0], g: raw[1], b: raw[2], a: px.a };
            }
            OP_RGBA => {
                let mut raw = [0u8; 4];
                for byte in &mut raw {
                    *byte = bytes.next().ok_or_else(|| truncated(decoded))?;
                }
                px = Rgba { r: raw[0], g: raw[1], b: raw[2], a: raw[3] };
            }
            _ => match op & MASK_2 {
                OP_INDEX => px = index[usize::from(op)],
                OP_DIFF => {
                    px.r = px.r.wrapping_add((op >> 4) & 0x03).wrapping_sub(2);
                    px.g = px.g.wrapping_add((op >> 2) & 0x03).wrapping_sub(2);
                    px.b = px.b.wrapping_add(op & 0x03).wrapping_sub(2);
                }
                OP_LUMA => {
                    let next = bytes.next().ok_or_else(|| truncated(decoded))?;
                    let vg = (op & 0x3F).wrapping_sub(32);
                    px.r = px.r.wrapping_add(vg.wrapping_sub(8).wrapping_add(next >> 4));
                    px.g = px.g.wrapping_add(vg);
                    px.b = px.b.wrapping_add(vg.wrapping_sub(8).wrapping_add(next & 0x0F));
                }
                _ => repeat = usize::from(op & 0x3F) + 1,
            },
        }

        index[px.hash()] = px;

        let repeat = repeat.min(pixel_count - decoded);
        for _ in 0..repeat {
            out.extend_from_slice(&[px.r, px.g, px.b, px.a][..channels]);
        }
        decoded += repeat;
    }

    Ok(out)
}
