//! Complete sprite container files

use binrw::io::Cursor;
use binrw::{BinReaderExt, BinWriterExt};

use super::codec::{decode_pixels, encode_pixels};
use super::error::{SpriteError, SpriteResult};
use super::header::SpriteHeader;

/// A sprite container: header plus the raw pixel payload it describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFile {
    /// Container header
    pub header: SpriteHeader,
    /// `channels` bytes per pixel over the full payload dimensions
    pub pixels: Vec<u8>,
}

impl SpriteFile {
    /// Create a sprite container
    pub fn new(header: SpriteHeader, pixels: Vec<u8>) -> Self {
        Self { header, pixels }
    }

    /// Number of pixel bytes the header describes
    pub fn expected_len(&self) -> SpriteResult<usize> {
        let (width, height) = self.header.payload_dimensions()?;
        Ok(width as usize * height as usize * usize::from(self.header.channels))
    }

    /// Serialize the header and the encoded payload
    pub fn build(&self) -> SpriteResult<Vec<u8>> {
        self.header.validate()?;

        let expected = self.expected_len()?;
        if self.pixels.len() != expected {
            return Err(SpriteError::PixelCountMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_le(&self.header)?;

        let mut data = cursor.into_inner();
        data.extend(encode_pixels(
            &self.pixels,
            usize::from(self.header.channels),
        ));
        Ok(data)
    }

    /// Parse a container and decode its payload
    pub fn parse(data: &[u8]) -> SpriteResult<Self> {
        let mut cursor = Cursor::new(data);
        let header: SpriteHeader = cursor.read_le()?;
        header.validate()?;

        let (width, height) = header.payload_dimensions()?;
        let payload = &data[cursor.position() as usize..];
        let pixels = decode_pixels(
            payload,
            usize::from(header.channels),
            width as usize * height as usize,
        )?;

        Ok(Self { header, pixels })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::sprite::{AnchorPoint, SpriteExtension, SpriteFlags};
    use pretty_assertions::assert_eq;

    fn two_cell_sprite() -> SpriteFile {
        let header = SpriteHeader::new(
            SpriteFlags::SKIP_NORMAL_MAP,
            4,
            2,
            2,
            Some(SpriteExtension {
                columns: 2,
                rows: 1,
                frame_count: 2,
                frame_duration: 0,
                hotspot: AnchorPoint::new(3, 3),
                coldspot: AnchorPoint::ABSENT,
                gunspot: AnchorPoint::ABSENT,
            }),
        );
        let pixels = (0..4 * 2 * 4)
            .map(|i| if i % 4 == 3 { 255 } else { i as u8 * 7 })
            .collect();
        SpriteFile::new(header, pixels)
    }

    #[test]
    fn test_build_parse_symmetry() {
        let sprite = two_cell_sprite();
        let data = sprite.build().expect("Test operation should succeed");
        let parsed = SpriteFile::parse(&data).expect("Test operation should succeed");
        assert_eq!(parsed, sprite);
    }

    #[test]
    fn test_pixel_count_is_checked() {
        let mut sprite = two_cell_sprite();
        sprite.pixels.pop();
        assert!(matches!(
            sprite.build(),
            Err(SpriteError::PixelCountMismatch {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_signature() {
        let mut data = two_cell_sprite()
            .build()
            .expect("Test operation should succeed");
        data[0] ^= 0xFF;
        assert!(matches!(
            SpriteFile::parse(&data),
            Err(SpriteError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_parse_truncated_payload() {
        let data = two_cell_sprite()
            .build()
            .expect("Test operation should succeed");
        assert!(matches!(
            SpriteFile::parse(&data[..data.len() - 1]),
            Err(SpriteError::TruncatedPayload { .. })
        ));
    }
}
