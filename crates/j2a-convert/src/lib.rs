//! Batch converter for legacy `.j2a` animation archives
//!
//! Reads an archive with [`j2a_formats`], looks every animation and sample
//! up in an [`AssetMapping`] by detected edition, and writes the mapped ones to an
//! [`ArchiveSink`]:
//!
//! - animations become sprite containers at `Animations/<Category>/<Name>.aura`
//! - samples become PCM wave files at `Animations/<Category>/<Name>.wav`
//!
//! # Architecture
//!
//! - `mapping`: lookup trait and the JSON-backed table
//! - `sink`: output trait with directory and in-memory implementations
//! - `layout`: atlas grid selection
//! - `palette`: palette index to RGBA resolution
//! - `fixups`: per-asset corrections of legacy art defects
//! - `atlas`: atlas painting and sprite header construction
//! - `convert`: the conversion driver
//! - `config`: CLI and environment configuration
//!
//! # Example
//!
//! ```
//! use j2a_convert::{ConvertOptions, MappingEntry, MappingTable, MemorySink, convert_archive};
//! use j2a_formats::archive::{ArchiveBuilder, SetBuilder};
//! use j2a_formats::frame::{Frame, Point};
//! use std::io::Cursor;
//!
//! let frame = Frame {
//!     size: Point::new(2, 2),
//!     pixels: vec![7; 4],
//!     ..Frame::default()
//! };
//! let data = ArchiveBuilder::new()
//!     .set(SetBuilder::new().animation(10, vec![frame]))
//!     .declared_sets(109)
//!     .fill_declared_sets(true)
//!     .build()
//!     .expect("archive should build");
//!
//! let mapping = MappingTable::new().with_animation(0, 0, MappingEntry::new("Jazz", "idle"));
//! let mut sink = MemorySink::new();
//! let report = convert_archive(
//!     &mut Cursor::new(data),
//!     &mapping,
//!     &mut sink,
//!     &ConvertOptions::default(),
//! )
//! .expect("conversion should succeed");
//!
//! assert_eq!(report.animations_written, 1);
//! assert!(sink.get("Animations/Jazz/idle.aura").is_some());
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod atlas;
pub mod config;
pub mod convert;
pub mod error;
pub mod fixups;
pub mod layout;
pub mod mapping;
pub mod palette;
pub mod sink;

pub use atlas::{Atlas, AtlasLayout, AtlasPainter};
pub use config::ConvertConfig;
pub use convert::{ConversionReport, ConvertOptions, convert_archive};
pub use error::{ConfigError, ConvertError, ConvertResult, MappingError, MappingResult};
pub use fixups::{Fixup, RemapTable, find_fixup};
pub use mapping::{AssetMapping, MappingEdition, MappingEntry, MappingLookup, MappingTable};
pub use palette::{ColorResolver, Palette, PaletteKind, Rgba};
pub use sink::{ArchiveSink, DirectorySink, MemorySink};
