//! Binary formats of legacy `.j2a` animation archives and their conversion
//! targets
//!
//! This crate holds the format code of the converter and nothing else: it
//! reads and writes bytes through `Read`/`Seek`/`Write` and never touches
//! the filesystem.
//!
//! # Modules
//!
//! - [`block`] - Deflate-compressed or raw byte regions with a poisoning cursor
//! - [`archive`] - Archive header, set parsing, edition detection and a builder
//! - [`frame`] - Frame geometry and the run-length pixel opcode stream
//! - [`sample`] - Legacy sample chunks
//! - [`wave`] - RIFF/WAVE output for samples
//! - [`sprite`] - Sprite container header and its run/diff/index pixel codec
//!
//! # Example
//!
//! ```
//! use j2a_formats::frame::{Point, Frame};
//! use j2a_formats::archive::{Archive, ArchiveBuilder, SetBuilder};
//! use std::io::Cursor;
//!
//! let frame = Frame {
//!     size: Point::new(2, 2),
//!     pixels: vec![1, 2, 3, 4],
//!     ..Frame::default()
//! };
//!
//! let data = ArchiveBuilder::new()
//!     .set(SetBuilder::new().animation(10, vec![frame]))
//!     .compress(true)
//!     .build()
//!     .expect("archive should build");
//!
//! let archive = Archive::read(&mut Cursor::new(data)).expect("archive should parse");
//! let (set, anim) = archive.animations().next().expect("one animation");
//! assert_eq!(set, 0);
//! assert_eq!(anim.frames[0].pixels, vec![1, 2, 3, 4]);
//! ```

#![warn(missing_docs)]

pub mod archive;
pub mod block;
pub mod frame;
pub mod sample;
pub mod sprite;
pub mod wave;
