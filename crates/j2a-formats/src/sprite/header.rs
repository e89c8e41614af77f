//! Sprite container header and sprite extension

use binrw::{BinRead, BinWrite};

use super::error::{SpriteError, SpriteResult};
use super::{SPRITE_SIGNATURE, SPRITE_VERSION};

/// Flags stored in the top byte of the version/flags word
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SpriteFlags(u8);

impl SpriteFlags {
    /// A palette other than the default sprite palette was baked in
    pub const CUSTOM_PALETTE: Self = Self(0x01);
    /// The runtime should not generate a normal map
    pub const SKIP_NORMAL_MAP: Self = Self(0x02);
    /// A sprite extension follows the header
    pub const HAS_SPRITE: Self = Self(0x80);

    /// No flags
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Check if all flags in `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set `other` when `condition` holds
    #[must_use]
    pub const fn with_if(self, other: Self, condition: bool) -> Self {
        if condition { Self(self.0 | other.0) } else { self }
    }
}

impl std::ops::BitOr for SpriteFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Optional anchor point, `(0xFFFF, 0xFFFF)` when absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite)]
#[brw(little)]
pub struct AnchorPoint {
    /// Horizontal position in the cell
    pub x: u16,
    /// Vertical position in the cell
    pub y: u16,
}

impl AnchorPoint {
    /// Sentinel for a missing anchor
    pub const ABSENT: Self = Self {
        x: u16::MAX,
        y: u16::MAX,
    };

    /// Create an anchor
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Whether this is the absent sentinel
    pub const fn is_absent(self) -> bool {
        self.x == u16::MAX && self.y == u16::MAX
    }
}

impl Default for AnchorPoint {
    fn default() -> Self {
        Self::ABSENT
    }
}

/// Frame grid and anchors of an animation atlas
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SpriteExtension {
    /// Cells per atlas row
    pub columns: u8,
    /// Cell rows in the atlas
    pub rows: u8,
    /// Number of frames
    pub frame_count: u16,
    /// Frame duration, see [`frame_duration`]
    pub frame_duration: u16,
    /// Normalised hotspot
    pub hotspot: AnchorPoint,
    /// Coldspot relative to the first frame's hotspot
    pub coldspot: AnchorPoint,
    /// Gunspot relative to the first frame's hotspot
    pub gunspot: AnchorPoint,
}

/// Frame duration stored for a legacy frame rate (0 when the rate is 0)
pub const fn frame_duration(frame_rate: u16) -> u16 {
    if frame_rate == 0 {
        0
    } else {
        (256 * 5 / frame_rate as u32) as u16
    }
}

/// Sprite container header
///
/// `width` and `height` describe one atlas cell. The pixel payload that
/// follows covers `width * columns` by `height * rows` pixels.
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct SpriteHeader {
    /// Format tag, [`SPRITE_SIGNATURE`]
    pub signature: u64,

    /// Container version in the low 24 bits, [`SpriteFlags`] in the top byte
    pub version_flags: u32,

    /// 3 (RGB) or 4 (RGBA)
    pub channels: u8,

    /// Cell width
    pub width: u32,

    /// Cell height
    pub height: u32,

    /// Present when [`SpriteFlags::HAS_SPRITE`] is set
    #[br(if(version_flags >> 24 & 0x80 != 0))]
    #[bw(if(*version_flags >> 24 & 0x80 != 0))]
    pub sprite: Option<SpriteExtension>,
}

impl SpriteHeader {
    /// Create a header, setting [`SpriteFlags::HAS_SPRITE`] to match `sprite`
    pub fn new(
        flags: SpriteFlags,
        channels: u8,
        width: u32,
        height: u32,
        sprite: Option<SpriteExtension>,
    ) -> Self {
        let flags = SpriteFlags::from_bits(flags.bits() & !SpriteFlags::HAS_SPRITE.bits())
            .with_if(SpriteFlags::HAS_SPRITE, sprite.is_some());

        Self {
            signature: SPRITE_SIGNATURE,
            version_flags: SPRITE_VERSION | (u32::from(flags.bits()) << 24),
            channels,
            width,
            height,
            sprite,
        }
    }

    /// Container version
    pub const fn version(&self) -> u32 {
        self.version_flags & 0x00FF_FFFF
    }

    /// Flags from the top byte of the version/flags word
    pub const fn flags(&self) -> SpriteFlags {
        SpriteFlags::from_bits((self.version_flags >> 24) as u8)
    }

    /// Grid size, 1x1 without a sprite extension
    pub fn grid(&self) -> (u32, u32) {
        self.sprite.as_ref().map_or((1, 1), |ext| {
            (u32::from(ext.columns), u32::from(ext.rows))
        })
    }

    /// Pixel dimensions of the payload
    pub fn payload_dimensions(&self) -> SpriteResult<(u32, u32)> {
        let (columns, rows) = self.grid();
        let width = u64::from(self.width) * u64::from(columns);
        let height = u64::from(self.height) * u64::from(rows);

        match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if u64::from(w) * u64::from(h) <= usize::MAX as u64 => Ok((w, h)),
            _ => Err(SpriteError::DimensionsTooLarge { width, height }),
        }
    }

    /// Validate tag, version and channel count
    pub fn validate(&self) -> SpriteResult<()> {
        if self.signature != SPRITE_SIGNATURE {
            return Err(SpriteError::InvalidSignature(self.signature));
        }

        if self.version() != SPRITE_VERSION {
            return Err(SpriteError::UnsupportedVersion(self.version()));
        }

        if !matches!(self.channels, 3 | 4) {
            return Err(SpriteError::InvalidChannels(self.channels));
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use binrw::io::Cursor;
    use binrw::{BinReaderExt, BinWriterExt};
    use pretty_assertions::assert_eq;

    fn extension() -> SpriteExtension {
        SpriteExtension {
            columns: 3,
            rows: 2,
            frame_count: 5,
            frame_duration: frame_duration(10),
            hotspot: AnchorPoint::new(12, 30),
            coldspot: AnchorPoint::ABSENT,
            gunspot: AnchorPoint::new(4, 5),
        }
    }

    #[test]
    fn test_frame_duration() {
        assert_eq!(frame_duration(0), 0);
        assert_eq!(frame_duration(1), 1280);
        assert_eq!(frame_duration(10), 128);
        assert_eq!(frame_duration(3), 426);
    }

    #[test]
    fn test_header_layout_with_extension() {
        let header = SpriteHeader::new(
            SpriteFlags::CUSTOM_PALETTE,
            4,
            20,
            30,
            Some(extension()),
        );
        assert!(header.flags().contains(SpriteFlags::HAS_SPRITE));
        assert!(header.flags().contains(SpriteFlags::CUSTOM_PALETTE));
        assert!(!header.flags().contains(SpriteFlags::SKIP_NORMAL_MAP));

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&header).expect("Test operation should succeed");
        let bytes = cursor.into_inner();

        assert_eq!(bytes.len(), 8 + 4 + 1 + 4 + 4 + 18);
        assert_eq!(&bytes[0..8], &[0xEF, 0xBB, 0xBF, 0xE2, 0x98, 0x84, 0xEF, 0xB8]);
        assert_eq!(&bytes[8..12], &0x8102_208Fu32.to_le_bytes());
        assert_eq!(bytes[12], 4);
        assert_eq!(&bytes[21..25], &[3, 2, 5, 0]);
        assert_eq!(&bytes[31..35], &[0xFF; 4]);

        let parsed: SpriteHeader = Cursor::new(bytes)
            .read_le()
            .expect("Test operation should succeed");
        assert_eq!(parsed, header);
        assert!(parsed.validate().is_ok());
        assert_eq!(
            parsed.payload_dimensions().expect("Test operation should succeed"),
            (60, 60)
        );
    }

    #[test]
    fn test_header_without_extension() {
        let header = SpriteHeader::new(SpriteFlags::HAS_SPRITE, 3, 7, 9, None);
        assert!(!header.flags().contains(SpriteFlags::HAS_SPRITE));

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&header).expect("Test operation should succeed");
        let bytes = cursor.into_inner();
        assert_eq!(bytes.len(), 21);

        let parsed: SpriteHeader = Cursor::new(bytes)
            .read_le()
            .expect("Test operation should succeed");
        assert_eq!(parsed.sprite, None);
        assert_eq!(parsed.grid(), (1, 1));
    }

    #[test]
    fn test_validation() {
        let mut header = SpriteHeader::new(SpriteFlags::empty(), 4, 1, 1, None);
        header.channels = 1;
        assert!(matches!(
            header.validate(),
            Err(SpriteError::InvalidChannels(1))
        ));

        let mut header = SpriteHeader::new(SpriteFlags::empty(), 4, 1, 1, None);
        header.signature = 0;
        assert!(matches!(
            header.validate(),
            Err(SpriteError::InvalidSignature(0))
        ));

        let mut header = SpriteHeader::new(SpriteFlags::empty(), 4, 1, 1, None);
        header.version_flags = 0x0001_0000;
        assert!(matches!(
            header.validate(),
            Err(SpriteError::UnsupportedVersion(0x0001_0000))
        ));
    }

    #[test]
    fn test_flag_helpers() {
        let flags = SpriteFlags::empty()
            .with_if(SpriteFlags::CUSTOM_PALETTE, false)
            .with_if(SpriteFlags::SKIP_NORMAL_MAP, true);
        assert_eq!(flags.bits(), 0x02);
        assert_eq!(
            (SpriteFlags::HAS_SPRITE | SpriteFlags::CUSTOM_PALETTE).bits(),
            0x81
        );
    }
}
