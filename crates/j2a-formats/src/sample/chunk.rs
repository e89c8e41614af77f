//! Legacy sample chunk parsing and encoding

use super::error::{SampleError, SampleResult};
use super::{AS_TAG, ASFF_TAG, RIFF_MAGIC, SAMP_MAGIC};
use crate::block::Block;
use tracing::warn;

/// Fixed header overhead subtracted from the chunk size of `AS  ` samples
const CHUNK_OVERHEAD: i32 = 76;

/// Bytes the `ASFF` header is shorter than the `AS  ` header
const ASFF_SHORTFALL: i32 = 12;

/// Padding after the sub-chunk header in `AS  ` samples
const HEADER_PADDING: usize = 40;

/// Sample sub-format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// `ASFF`, version 1.20
    Asff,
    /// `AS  `, version 1.24
    As,
}

impl SampleFormat {
    /// Parse a format tag
    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            ASFF_TAG => Some(Self::Asff),
            AS_TAG => Some(Self::As),
            _ => None,
        }
    }

    /// Format tag as stored
    pub const fn tag(self) -> u32 {
        match self {
            Self::Asff => ASFF_TAG,
            Self::As => AS_TAG,
        }
    }

    const fn shortfall(self) -> i32 {
        match self {
            Self::Asff => ASFF_SHORTFALL,
            Self::As => 0,
        }
    }
}

/// One embedded audio sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Index of the sample within its set
    pub id: usize,
    /// Sub-format the sample was stored in
    pub format: SampleFormat,
    /// Bit-depth hint, always 0 for `ASFF`
    pub multiplier: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Raw payload bytes
    pub data: Vec<u8>,
}

impl Sample {
    /// Parse the next sample chunk from a sample data block
    ///
    /// On error the block cursor is left inside the rejected chunk, so the
    /// caller should stop reading samples from this block.
    pub fn parse(block: &mut Block, set: usize, id: usize) -> SampleResult<Self> {
        let total_size = block.read_i32();
        let riff = block.read_u32();
        let chunk_size = block.read_i32();
        let tag = block.read_u32();
        let samp = block.read_u32();
        let _samp_size = block.read_u32();

        if riff != RIFF_MAGIC {
            return Err(SampleError::InvalidRiffMagic(riff));
        }
        if samp != SAMP_MAGIC {
            return Err(SampleError::InvalidSampMagic(samp));
        }
        let format = SampleFormat::from_tag(tag).ok_or(SampleError::UnknownFormat(tag))?;

        block.discard(HEADER_PADDING - format.shortfall() as usize);
        let multiplier = match format {
            SampleFormat::Asff => {
                block.discard(2);
                0
            }
            SampleFormat::As => block.read_u16(),
        };
        block.discard(2);
        let _payload_size = block.read_u32();
        block.discard(8);
        let sample_rate = block.read_u32();

        let data_size = chunk_size - CHUNK_OVERHEAD + format.shortfall();
        let data_size =
            usize::try_from(data_size).map_err(|_| SampleError::InvalidChunkSize(chunk_size))?;
        // Copy only what the block holds; the cursor still ends up poisoned
        let available = block.remaining();
        if data_size > available {
            warn!(
                "Sample {id} in set {set} declares {data_size} bytes but only {available} remain, truncating"
            );
        }
        let data = block.read_bytes(data_size.min(available));
        block.discard(data_size.saturating_sub(available));
        block.discard(4);

        let padding = i64::from(total_size) - i64::from(chunk_size) - 12;
        if padding > 0 {
            warn!("Adjusting read offset of sample {id} in set {set} by {padding} bytes");
            block.discard(padding as usize);
        }

        Ok(Self {
            id,
            format,
            multiplier,
            sample_rate,
            data,
        })
    }

    /// Encode the sample as a legacy chunk followed by `padding` alignment bytes
    pub fn to_chunk(&self, padding: usize) -> Vec<u8> {
        let chunk_size = self.data.len() as i32 + CHUNK_OVERHEAD - self.format.shortfall();
        let total_size = chunk_size + 12 + padding as i32;

        let mut out = Vec::with_capacity(self.data.len() + 96 + padding);
        out.extend_from_slice(&total_size.to_le_bytes());
        out.extend_from_slice(&RIFF_MAGIC.to_le_bytes());
        out.extend_from_slice(&chunk_size.to_le_bytes());
        out.extend_from_slice(&self.format.tag().to_le_bytes());
        out.extend_from_slice(&SAMP_MAGIC.to_le_bytes());
        out.extend_from_slice(&(chunk_size - 12).to_le_bytes());
        out.resize(out.len() + HEADER_PADDING - self.format.shortfall() as usize, 0);
        match self.format {
            SampleFormat::Asff => out.extend_from_slice(&[0, 0]),
            SampleFormat::As => out.extend_from_slice(&self.multiplier.to_le_bytes()),
        }
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&[0; 8]);
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&[0; 4]);
        out.resize(out.len() + padding, 0);
        out
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample(format: SampleFormat, multiplier: u16, data: Vec<u8>) -> Sample {
        Sample {
            id: 0,
            format,
            multiplier,
            sample_rate: 22050,
            data,
        }
    }

    #[test]
    fn test_as_chunk_layout() {
        let chunk = sample(SampleFormat::As, 4, vec![1, 2, 3]).to_chunk(0);
        // 24 header + 40 padding + 16 + 4 rate + payload + 4 trailer
        assert_eq!(chunk.len(), 88 + 3);
        assert_eq!(&chunk[4..8], b"RIFF");
        assert_eq!(&chunk[8..12], &79i32.to_le_bytes());
        assert_eq!(&chunk[12..16], b"AS  ");
        assert_eq!(&chunk[16..20], b"SAMP");
        assert_eq!(&chunk[64..66], &4u16.to_le_bytes());
        assert_eq!(&chunk[80..84], &22050u32.to_le_bytes());
        assert_eq!(&chunk[84..87], &[1, 2, 3]);
    }

    #[test]
    fn test_parse_as() {
        let original = sample(SampleFormat::As, 8, (0..50).collect());
        let mut block = Block::from_bytes(original.to_chunk(0));
        let parsed = Sample::parse(&mut block, 0, 0).expect("Test operation should succeed");
        assert_eq!(parsed, original);
        assert_eq!(block.position(), Some(block.len()));
    }

    #[test]
    fn test_parse_asff_forces_zero_multiplier() {
        let mut chunk = sample(SampleFormat::Asff, 0, vec![9; 10]).to_chunk(0);
        // Garbage where the AS header would keep its multiplier
        chunk[52] = 0x20;
        chunk[53] = 0x40;
        let mut block = Block::from_bytes(chunk);
        let parsed = Sample::parse(&mut block, 0, 0).expect("Test operation should succeed");
        assert_eq!(parsed.format, SampleFormat::Asff);
        assert_eq!(parsed.multiplier, 0);
        assert_eq!(parsed.data, vec![9; 10]);
    }

    #[test]
    fn test_alignment_padding_is_skipped() {
        let first = sample(SampleFormat::As, 0, vec![1; 7]);
        let mut second = sample(SampleFormat::As, 4, vec![2; 5]);
        second.id = 1;

        let mut data = first.to_chunk(3);
        data.extend(second.to_chunk(0));
        let mut block = Block::from_bytes(data);

        assert_eq!(
            Sample::parse(&mut block, 0, 0).expect("Test operation should succeed"),
            first
        );
        assert_eq!(
            Sample::parse(&mut block, 0, 1).expect("Test operation should succeed"),
            second
        );
    }

    #[test]
    fn test_invalid_headers() {
        let mut chunk = sample(SampleFormat::As, 0, vec![]).to_chunk(0);
        chunk[4] = b'X';
        assert!(matches!(
            Sample::parse(&mut Block::from_bytes(chunk), 0, 0),
            Err(SampleError::InvalidRiffMagic(_))
        ));

        let mut chunk = sample(SampleFormat::As, 0, vec![]).to_chunk(0);
        chunk[16] = b'X';
        assert!(matches!(
            Sample::parse(&mut Block::from_bytes(chunk), 0, 0),
            Err(SampleError::InvalidSampMagic(_))
        ));

        let mut chunk = sample(SampleFormat::As, 0, vec![]).to_chunk(0);
        chunk[14] = b'X';
        assert!(matches!(
            Sample::parse(&mut Block::from_bytes(chunk), 0, 0),
            Err(SampleError::UnknownFormat(_))
        ));

        let mut chunk = sample(SampleFormat::As, 0, vec![]).to_chunk(0);
        chunk[8..12].copy_from_slice(&10i32.to_le_bytes());
        assert!(matches!(
            Sample::parse(&mut Block::from_bytes(chunk), 0, 0),
            Err(SampleError::InvalidChunkSize(10))
        ));
    }

    #[test]
    fn test_oversized_payload_is_truncated() {
        let mut chunk = sample(SampleFormat::As, 0, vec![7; 6]).to_chunk(0);
        // Claim a payload of almost 2 GiB
        chunk[8..12].copy_from_slice(&(i32::MAX - 8).to_le_bytes());
        let mut block = Block::from_bytes(chunk);

        let parsed = Sample::parse(&mut block, 0, 0).expect("Test operation should succeed");
        // The six payload bytes plus the four trailer bytes that follow them
        assert_eq!(parsed.data, vec![7, 7, 7, 7, 7, 7, 0, 0, 0, 0]);
        assert_eq!(block.remaining(), 0);
    }

    #[test]
    fn test_empty_block_is_rejected() {
        let mut block = Block::default();
        assert!(matches!(
            Sample::parse(&mut block, 0, 0),
            Err(SampleError::InvalidRiffMagic(0))
        ));
    }
}
