//! Archive blocks: decompressed (or raw) byte regions with a poisoning cursor
//!
//! Every set in a `.j2a` archive carries four blocks (info, frame geometry,
//! image data and sample data). Each one is either stored verbatim or
//! compressed with raw deflate behind a two-byte stream header.
//!
//! Reads never fail. A read that would run past the end of the block poisons
//! the cursor and returns a zero/false/empty default, and every later read
//! does the same. This lets a truncated archive decode to the end with
//! bounded, partially-wrong output instead of aborting half way through a
//! set.
//!
//! # Example
//!
//! ```
//! use j2a_formats::block::Block;
//!
//! let mut block = Block::from_bytes(vec![0x34, 0x12]);
//! assert_eq!(block.read_u16(), 0x1234);
//! assert!(!block.is_poisoned());
//!
//! // Past the end: default value, cursor poisoned for good
//! assert_eq!(block.read_u32(), 0);
//! assert!(block.is_poisoned());
//! assert_eq!(block.read_u8(), 0);
//! ```

mod reader;

pub use reader::{Block, StringTrim};
