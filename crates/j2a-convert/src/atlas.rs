//! Atlas assembly
//!
//! All frames of an animation are drawn into one RGBA image, one cell per
//! frame in row-major order. Every cell is the animation's adjusted size
//! plus a [`CELL_BORDER`] on each side, and each frame is placed so that the
//! hotspots of all frames land on the same cell position.

use j2a_formats::archive::Animation;
use j2a_formats::frame::Point;
use j2a_formats::sprite::{
    AnchorPoint, SpriteExtension, SpriteFile, SpriteFlags, SpriteHeader, frame_duration,
};

use crate::fixups::{Fixup, RemapTable};
use crate::layout::{CELL_BORDER, frame_configuration};
use crate::mapping::MappingEntry;
use crate::palette::{ColorResolver, PaletteKind};

/// Channels of an assembled atlas
pub const ATLAS_CHANNELS: u8 = 4;

/// Cell size and grid of an animation's atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    /// Cell width including borders
    pub cell_width: usize,
    /// Cell height including borders
    pub cell_height: usize,
    /// Cells per row
    pub columns: usize,
    /// Cell rows
    pub rows: usize,
}

impl AtlasLayout {
    /// Layout for `anim`
    pub fn for_animation(anim: &Animation) -> Self {
        let cell_width = usize::try_from(anim.adjusted_size.x).unwrap_or(0) + 2 * CELL_BORDER;
        let cell_height = usize::try_from(anim.adjusted_size.y).unwrap_or(0) + 2 * CELL_BORDER;
        let (columns, rows) = frame_configuration(anim.frame_count(), cell_width, cell_height);

        Self {
            cell_width,
            cell_height,
            columns,
            rows,
        }
    }

    /// Atlas width in pixels
    pub fn width(&self) -> usize {
        self.cell_width * self.columns
    }

    /// Atlas height in pixels
    pub fn height(&self) -> usize {
        self.cell_height * self.rows
    }

    /// Grid as stored in the sprite extension, if it fits
    pub fn grid(&self) -> Option<(u8, u8)> {
        Some((u8::try_from(self.columns).ok()?, u8::try_from(self.rows).ok()?))
    }
}

/// An assembled RGBA atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atlas {
    /// Cell size and grid
    pub layout: AtlasLayout,
    /// Hotspot shared by all cells, after hotspot fixups
    pub normalized_hotspot: Point,
    /// RGBA pixels, `layout.width() * layout.height() * 4` bytes
    pub pixels: Vec<u8>,
}

impl Atlas {
    /// RGBA value at `(x, y)` of the whole atlas
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.layout.width() {
            return None;
        }
        let at = (y * self.layout.width() + x) * 4;
        let rgba = self.pixels.get(at..at + 4)?;
        Some([rgba[0], rgba[1], rgba[2], rgba[3]])
    }

    /// Wrap the atlas in a sprite container
    ///
    /// Returns `None` if the grid or frame count cannot be stored in the
    /// sprite extension.
    pub fn into_sprite_file(self, anim: &Animation, entry: &MappingEntry) -> Option<SpriteFile> {
        let (columns, rows) = self.layout.grid()?;
        let frame_count = u16::try_from(anim.frame_count()).ok()?;

        let nh = self.normalized_hotspot;
        let (hotspot, coldspot, gunspot) = anim
            .frames
            .first()
            .map_or((Point::ZERO, Point::ZERO, Point::ZERO), |f| {
                (f.hotspot, f.coldspot, f.gunspot)
            });

        let border = CELL_BORDER as i32;
        let relative_to_hotspot = |spot: Point| {
            anchor(
                spot,
                i32::from(nh.x) + i32::from(hotspot.x) - i32::from(spot.x) + border,
                i32::from(nh.y) + i32::from(hotspot.y) - i32::from(spot.y) + border,
            )
        };

        let extension = SpriteExtension {
            columns,
            rows,
            frame_count,
            frame_duration: frame_duration(anim.frame_rate),
            hotspot: anchor(nh, i32::from(nh.x) + border, i32::from(nh.y) + border),
            coldspot: relative_to_hotspot(coldspot),
            gunspot: relative_to_hotspot(gunspot),
        };

        let flags = SpriteFlags::empty()
            .with_if(SpriteFlags::CUSTOM_PALETTE, entry.palette != PaletteKind::Sprite)
            .with_if(SpriteFlags::SKIP_NORMAL_MAP, entry.skip_normal_map);

        let header = SpriteHeader::new(
            flags,
            ATLAS_CHANNELS,
            self.layout.cell_width as u32,
            self.layout.cell_height as u32,
            Some(extension),
        );

        Some(SpriteFile::new(header, self.pixels))
    }
}

/// Anchor at `(x, y)`, absent when `source` is zero
fn anchor(source: Point, x: i32, y: i32) -> AnchorPoint {
    if source.is_zero() {
        AnchorPoint::ABSENT
    } else {
        AnchorPoint::new(x as u16, y as u16)
    }
}

/// Draws animations into atlases
#[derive(Debug, Clone, Copy)]
pub struct AtlasPainter<'a> {
    resolver: ColorResolver<'a>,
    toaster_remap: &'a RemapTable,
    fixup: Option<Fixup>,
}

impl<'a> AtlasPainter<'a> {
    /// Create a painter without fixups
    pub fn new(resolver: ColorResolver<'a>, toaster_remap: &'a RemapTable) -> Self {
        Self {
            resolver,
            toaster_remap,
            fixup: None,
        }
    }

    /// Apply `fixup` while painting
    #[must_use]
    pub fn with_fixup(mut self, fixup: Option<Fixup>) -> Self {
        self.fixup = fixup;
        self
    }

    /// Draw every frame of `anim`
    ///
    /// Pixels that would land outside the atlas are dropped.
    pub fn paint(&self, anim: &Animation, layout: AtlasLayout) -> Atlas {
        let width = layout.width();
        let height = layout.height();
        let mut pixels = vec![0u8; width * height * usize::from(ATLAS_CHANNELS)];

        let nh = anim.normalized_hotspot;
        let columns = layout.columns.max(1);

        for (j, frame) in anim.frames.iter().enumerate() {
            let origin_x = ((j % columns) * layout.cell_width) as i64
                + i64::from(nh.x)
                + i64::from(frame.hotspot.x)
                + CELL_BORDER as i64;
            let origin_y = ((j / columns) * layout.cell_height) as i64
                + i64::from(nh.y)
                + i64::from(frame.hotspot.y)
                + CELL_BORDER as i64;

            for y in 0..frame.height() {
                for x in 0..frame.width() {
                    let mut index = frame.pixel(x, y);
                    if let Some(fixup) = self.fixup {
                        index = fixup.remap_index(j, x, y, index, self.toaster_remap);
                    }

                    let (Ok(tx), Ok(ty)) = (
                        usize::try_from(origin_x + x as i64),
                        usize::try_from(origin_y + y as i64),
                    ) else {
                        continue;
                    };
                    if tx >= width || ty >= height {
                        continue;
                    }

                    let color = self.resolver.resolve(index, frame.draw_transparent);
                    let at = (ty * width + tx) * 4;
                    pixels[at..at + 4].copy_from_slice(&color.to_bytes());
                }
            }
        }

        let normalized_hotspot = self
            .fixup
            .and_then(Fixup::hotspot_override)
            .unwrap_or(nh);

        Atlas {
            layout,
            normalized_hotspot,
            pixels,
        }
    }
}
