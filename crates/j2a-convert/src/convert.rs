//! Conversion driver
//!
//! Parses an archive, detects its edition and writes every mapped asset to
//! a sink: animations as sprite containers, samples as wave files. Assets
//! the mapping discards, or that cannot be represented, are skipped.

use j2a_formats::archive::{Animation, Archive, ArchiveVersion};
use j2a_formats::sample::Sample;
use j2a_formats::wave::encode_wave;
use std::io::{Read, Seek};
use tracing::{debug, info, warn};

use crate::atlas::{AtlasLayout, AtlasPainter};
use crate::error::{ConvertError, ConvertResult};
use crate::fixups::{RemapTable, find_fixup};
use crate::mapping::{AssetMapping, MappingEntry, MappingLookup};
use crate::palette::{ColorResolver, Palette};
use crate::sink::ArchiveSink;

/// Extension of converted animations
pub const SPRITE_EXTENSION: &str = "aura";

/// Extension of converted samples
pub const WAVE_EXTENSION: &str = "wav";

/// Library-level conversion options
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Accept archives of the plus extension
    pub allow_plus: bool,
    /// Palette for assets exported with the menu palette
    pub menu_palette: Palette,
    /// Remap table of the toaster powerup fixup
    pub toaster_remap: RemapTable,
}

impl ConvertOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept plus extension archives
    #[must_use]
    pub fn with_allow_plus(mut self, allow_plus: bool) -> Self {
        self.allow_plus = allow_plus;
        self
    }

    /// Use `palette` for menu-palette assets
    #[must_use]
    pub fn with_menu_palette(mut self, palette: Palette) -> Self {
        self.menu_palette = palette;
        self
    }

    /// Use `remap` for the toaster powerup fixup
    #[must_use]
    pub fn with_toaster_remap(mut self, remap: RemapTable) -> Self {
        self.toaster_remap = remap;
        self
    }
}

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    /// Detected edition
    pub version: ArchiveVersion,
    /// Sprite containers written
    pub animations_written: usize,
    /// Wave files written
    pub samples_written: usize,
    /// Assets that were not written
    pub skipped: usize,
    /// Paths handed to the sink, in write order
    pub files: Vec<String>,
}

impl ConversionReport {
    fn new(version: ArchiveVersion) -> Self {
        Self {
            version,
            animations_written: 0,
            samples_written: 0,
            skipped: 0,
            files: Vec::new(),
        }
    }
}

/// Convert an archive
///
/// Fails without writing anything if the archive cannot be parsed or its
/// edition is unknown. Fails part way if the sink rejects a file.
pub fn convert_archive<R, M, S>(
    reader: &mut R,
    mapping: &M,
    sink: &mut S,
    options: &ConvertOptions,
) -> ConvertResult<ConversionReport>
where
    R: Read + Seek,
    M: AssetMapping + ?Sized,
    S: ArchiveSink + ?Sized,
{
    let archive = Archive::read(reader)?;

    let version = archive.version(options.allow_plus);
    if !version.is_known() {
        return Err(ConvertError::UnknownVersion {
            header_len: archive.header_len(),
        });
    }

    let mut converter = Converter {
        mapping,
        sink,
        options,
        report: ConversionReport::new(version),
    };

    info!("Importing animations...");
    for (set, anim) in archive.animations() {
        converter.animation(set, anim)?;
    }

    info!("Importing audio samples...");
    for (set, sample) in archive.samples() {
        converter.sample(set, sample)?;
    }

    let report = converter.report;
    info!(
        "Converted {} animations and {} samples ({} skipped)",
        report.animations_written, report.samples_written, report.skipped
    );
    Ok(report)
}

struct Converter<'a, M: ?Sized, S: ?Sized> {
    mapping: &'a M,
    sink: &'a mut S,
    options: &'a ConvertOptions,
    report: ConversionReport,
}

impl<M: AssetMapping + ?Sized, S: ArchiveSink + ?Sized> Converter<'_, M, S> {
    fn animation(&mut self, set: usize, anim: &Animation) -> ConvertResult<()> {
        if anim.frame_count() == 0 {
            return Ok(());
        }

        let mapping = self.mapping;
        let MappingLookup::Export(entry) =
            mapping.animation(self.report.version, set, anim.index)
        else {
            self.report.skipped += 1;
            return Ok(());
        };

        if !has_name(entry, set, anim.index) {
            self.report.skipped += 1;
            return Ok(());
        }

        let layout = AtlasLayout::for_animation(anim);
        if layout.grid().is_none() {
            warn!(
                "Animation {set}:{} needs a {}x{} grid, which does not fit a sprite, skipping",
                anim.index, layout.columns, layout.rows
            );
            self.report.skipped += 1;
            return Ok(());
        }

        let fixup = find_fixup(&entry.category, &entry.name);
        if let Some(fixup) = fixup {
            info!("Applying {} to {set}:{}", fixup.description(), anim.index);
        }

        let resolver = ColorResolver::new(entry.palette, &self.options.menu_palette);
        let atlas = AtlasPainter::new(resolver, &self.options.toaster_remap)
            .with_fixup(fixup)
            .paint(anim, layout);

        let Some(sprite) = atlas.into_sprite_file(anim, entry) else {
            warn!("Animation {set}:{} cannot be stored as a sprite, skipping", anim.index);
            self.report.skipped += 1;
            return Ok(());
        };

        let path = entry.output_path(SPRITE_EXTENSION);
        self.write(path, &sprite.build()?)?;
        self.report.animations_written += 1;
        Ok(())
    }

    fn sample(&mut self, set: usize, sample: &Sample) -> ConvertResult<()> {
        let mapping = self.mapping;
        let MappingLookup::Export(entry) = mapping.sample(self.report.version, set, sample.id) else {
            self.report.skipped += 1;
            return Ok(());
        };

        if !has_name(entry, set, sample.id) {
            self.report.skipped += 1;
            return Ok(());
        }

        let path = entry.output_path(WAVE_EXTENSION);
        self.write(path, &encode_wave(sample)?)?;
        self.report.samples_written += 1;
        Ok(())
    }

    fn write(&mut self, path: String, data: &[u8]) -> ConvertResult<()> {
        if !self.sink.add_file(&path, data) {
            return Err(ConvertError::SinkRejected { path });
        }
        debug!("Added {path} ({} bytes)", data.len());
        self.report.files.push(path);
        Ok(())
    }
}

fn has_name(entry: &MappingEntry, set: usize, id: usize) -> bool {
    if entry.name.is_empty() {
        warn!(
            "Mapping for {set}:{id} in category \"{}\" has no name, skipping",
            entry.category
        );
        return false;
    }
    true
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mapping::MappingTable;
    use crate::sink::MemorySink;
    use j2a_formats::archive::{ArchiveBuilder, SetBuilder};
    use j2a_formats::frame::{Frame, Point};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn frame(fill: u8) -> Frame {
        Frame {
            size: Point::new(3, 3),
            pixels: vec![fill; 9],
            ..Frame::default()
        }
    }

    fn archive() -> Vec<u8> {
        ArchiveBuilder::new()
            .set(
                SetBuilder::new()
                    .animation(10, vec![frame(1)])
                    .animation(10, vec![])
                    .animation(10, vec![frame(2)]),
            )
            .declared_sets(109)
            .fill_declared_sets(true)
            .build()
            .expect("Test operation should succeed")
    }

    #[test]
    fn test_only_mapped_animations_are_written() {
        let mapping = MappingTable::new()
            .with_animation(0, 0, MappingEntry::new("Jazz", "idle"))
            .with_animation(0, 1, MappingEntry::new("Jazz", "empty"))
            .with_animation(0, 2, MappingEntry::new("Discard", "gone"));

        let mut sink = MemorySink::new();
        let report = convert_archive(
            &mut Cursor::new(archive()),
            &mapping,
            &mut sink,
            &ConvertOptions::default(),
        )
        .expect("Test operation should succeed");

        assert_eq!(report.version, ArchiveVersion::BaseGame { shareware: false });
        assert_eq!(report.animations_written, 1);
        assert_eq!(report.files, vec!["Animations/Jazz/idle.aura".to_string()]);
        // The discarded animation; the frameless one is not counted
        assert_eq!(report.skipped, 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_empty_name_is_skipped() {
        let mapping = MappingTable::new().with_animation(0, 0, MappingEntry::new("Jazz", ""));

        let mut sink = MemorySink::new();
        let report = convert_archive(
            &mut Cursor::new(archive()),
            &mapping,
            &mut sink,
            &ConvertOptions::default(),
        )
        .expect("Test operation should succeed");

        assert_eq!(report.animations_written, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_rejection_aborts() {
        let mapping = MappingTable::new()
            .with_animation(0, 0, MappingEntry::new("Jazz", "idle"))
            .with_animation(0, 2, MappingEntry::new("Jazz", "run"));

        let mut sink = MemorySink::with_capacity_limit(1);
        let err = convert_archive(
            &mut Cursor::new(archive()),
            &mapping,
            &mut sink,
            &ConvertOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            ConvertError::SinkRejected { ref path } if path == "Animations/Jazz/run.aura"
        ));
    }

    #[test]
    fn test_unknown_version_writes_nothing() {
        let data = ArchiveBuilder::new()
            .set(SetBuilder::new().animation(10, vec![frame(1)]))
            .declared_sets(12)
            .build()
            .expect("Test operation should succeed");
        let mapping = MappingTable::new().with_animation(0, 0, MappingEntry::new("Jazz", "idle"));

        let mut sink = MemorySink::new();
        let err = convert_archive(
            &mut Cursor::new(data),
            &mapping,
            &mut sink,
            &ConvertOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, ConvertError::UnknownVersion { header_len: 76 }));
        assert!(sink.is_empty());
    }
}
