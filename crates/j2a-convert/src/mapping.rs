//! Legacy `(set, index)` to asset descriptor mapping
//!
//! The converter only needs a read-only lookup service, modelled by the
//! [`AssetMapping`] trait. Set layouts differ between editions, so every
//! lookup carries the detected [`ArchiveVersion`]. [`MappingTable`] is a
//! JSON-backed implementation:
//!
//! ```json
//! {
//!   "animations": [
//!     { "set": 0, "id": 0, "category": "Jazz", "name": "idle", "palette": "sprite" }
//!   ],
//!   "samples": [
//!     { "set": 0, "id": 0, "category": "Common", "name": "explosion" }
//!   ],
//!   "editions": {
//!     "secret_files": {
//!       "animations": [
//!         { "set": 0, "id": 0, "category": "Lori", "name": "idle" }
//!       ]
//!     }
//!   },
//!   "menu_palette": [[0, 0, 0, 0], [255, 255, 255, 255], "..."],
//!   "toaster_remap": [0, 1, 2, "..."]
//! }
//! ```
//!
//! The top-level `animations` and `samples` apply to every edition. An entry
//! in the section of the detected edition replaces the top-level entry for
//! the same `(set, id)`, including with a `Discard` entry.
//!
//! `menu_palette` and `toaster_remap` are optional; when present they must
//! have 256 entries each.

use j2a_formats::archive::ArchiveVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{MappingError, MappingResult};
use crate::fixups::RemapTable;
use crate::palette::{Palette, PaletteKind, Rgba};

/// Category that marks an asset as not exported
pub const DISCARD_CATEGORY: &str = "Discard";

/// Export descriptor of one asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Output directory below `Animations/`
    pub category: String,

    /// Output file stem
    pub name: String,

    /// Palette mode of the exported sprite
    #[serde(default)]
    pub palette: PaletteKind,

    /// The runtime should not generate a normal map for this sprite
    #[serde(default)]
    pub skip_normal_map: bool,
}

impl MappingEntry {
    /// Create an entry with the sprite palette
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            palette: PaletteKind::Sprite,
            skip_normal_map: false,
        }
    }

    /// Set the palette mode
    #[must_use]
    pub fn with_palette(mut self, palette: PaletteKind) -> Self {
        self.palette = palette;
        self
    }

    /// Set the skip-normal-map flag
    #[must_use]
    pub fn with_skip_normal_map(mut self, skip: bool) -> Self {
        self.skip_normal_map = skip;
        self
    }

    /// Whether this entry uses the discard sentinel
    pub fn is_discard(&self) -> bool {
        self.category == DISCARD_CATEGORY
    }

    /// Output path with the given extension
    pub fn output_path(&self, extension: &str) -> String {
        format!("Animations/{}/{}.{extension}", self.category, self.name)
    }
}

/// Result of a mapping lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingLookup<'a> {
    /// Export the asset with this descriptor
    Export(&'a MappingEntry),
    /// Do not export the asset
    Discard,
}

impl<'a> MappingLookup<'a> {
    /// Lookup result for an optional entry, honouring the discard sentinel
    pub fn from_entry(entry: Option<&'a MappingEntry>) -> Self {
        match entry {
            Some(entry) if !entry.is_discard() => Self::Export(entry),
            _ => Self::Discard,
        }
    }
}

/// Read-only mapping from legacy indices to export descriptors
pub trait AssetMapping {
    /// Descriptor of animation `anim` in set `set` of a `version` archive
    fn animation(&self, version: ArchiveVersion, set: usize, anim: usize) -> MappingLookup<'_>;

    /// Descriptor of sample `sample` in set `set` of a `version` archive
    fn sample(&self, version: ArchiveVersion, set: usize, sample: usize) -> MappingLookup<'_>;
}

/// Key of an edition-specific section of a [`MappingTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingEdition {
    /// Full base game
    BaseGame,
    /// Shareware demo of the base game
    Shareware,
    /// The Secret Files
    SecretFiles,
    /// Christmas Chronicles
    ChristmasChronicles,
    /// Holiday Hare '98
    HolidayHare,
    /// Plus extension pack
    PlusExtension,
}

impl MappingEdition {
    /// Section key of a detected edition, `None` for unknown archives
    pub const fn from_version(version: ArchiveVersion) -> Option<Self> {
        match version {
            ArchiveVersion::BaseGame { shareware: false } => Some(Self::BaseGame),
            ArchiveVersion::BaseGame { shareware: true } => Some(Self::Shareware),
            ArchiveVersion::SecretFiles => Some(Self::SecretFiles),
            ArchiveVersion::ChristmasChronicles => Some(Self::ChristmasChronicles),
            ArchiveVersion::HolidayHare => Some(Self::HolidayHare),
            ArchiveVersion::PlusExtension => Some(Self::PlusExtension),
            ArchiveVersion::Unknown => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MappingRecord {
    set: usize,
    id: usize,
    #[serde(flatten)]
    entry: MappingEntry,
}

#[derive(Debug, Default, Deserialize)]
struct SectionFile {
    #[serde(default)]
    animations: Vec<MappingRecord>,
    #[serde(default)]
    samples: Vec<MappingRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct MappingFile {
    #[serde(flatten)]
    common: SectionFile,
    #[serde(default)]
    editions: HashMap<MappingEdition, SectionFile>,
    #[serde(default)]
    menu_palette: Option<Vec<Rgba>>,
    #[serde(default)]
    toaster_remap: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default)]
struct MappingSection {
    animations: HashMap<(usize, usize), MappingEntry>,
    samples: HashMap<(usize, usize), MappingEntry>,
}

impl MappingSection {
    fn from_file(file: SectionFile) -> MappingResult<Self> {
        let mut section = Self::default();
        insert_records(&mut section.animations, file.animations, "animation")?;
        insert_records(&mut section.samples, file.samples, "sample")?;
        Ok(section)
    }
}

fn insert_records(
    entries: &mut HashMap<(usize, usize), MappingEntry>,
    records: Vec<MappingRecord>,
    kind: &'static str,
) -> MappingResult<()> {
    for record in records {
        if entries.contains_key(&(record.set, record.id)) {
            return Err(MappingError::DuplicateEntry {
                kind,
                set: record.set,
                id: record.id,
            });
        }
        entries.insert((record.set, record.id), record.entry);
    }
    Ok(())
}

/// In-memory mapping table, optionally loaded from JSON
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    common: MappingSection,
    editions: HashMap<MappingEdition, MappingSection>,
    menu_palette: Option<Palette>,
    toaster_remap: Option<RemapTable>,
}

impl MappingTable {
    /// Create an empty table; every lookup discards
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON file
    pub fn from_file(path: &Path) -> MappingResult<Self> {
        let file = File::open(path).map_err(|source| MappingError::LoadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(BufReader::new(file))
    }

    /// Load a table from a JSON reader
    pub fn from_reader<R: Read>(reader: R) -> MappingResult<Self> {
        let file: MappingFile = serde_json::from_reader(reader)?;
        Self::from_mapping_file(file)
    }

    /// Load a table from a JSON string
    pub fn from_json_str(json: &str) -> MappingResult<Self> {
        let file: MappingFile = serde_json::from_str(json)?;
        Self::from_mapping_file(file)
    }

    fn from_mapping_file(file: MappingFile) -> MappingResult<Self> {
        let mut table = Self::new();

        table.common = MappingSection::from_file(file.common)?;
        for (edition, section) in file.editions {
            table
                .editions
                .insert(edition, MappingSection::from_file(section)?);
        }

        table.menu_palette = file.menu_palette.map(Palette::from_colors).transpose()?;
        table.toaster_remap = file
            .toaster_remap
            .map(RemapTable::from_indices)
            .transpose()?;

        Ok(table)
    }

    /// Insert or replace an animation descriptor shared by every edition
    pub fn insert_animation(&mut self, set: usize, anim: usize, entry: MappingEntry) {
        self.common.animations.insert((set, anim), entry);
    }

    /// Insert or replace a sample descriptor shared by every edition
    pub fn insert_sample(&mut self, set: usize, sample: usize, entry: MappingEntry) {
        self.common.samples.insert((set, sample), entry);
    }

    /// Insert or replace an animation descriptor of one edition
    pub fn insert_edition_animation(
        &mut self,
        edition: MappingEdition,
        set: usize,
        anim: usize,
        entry: MappingEntry,
    ) {
        self.editions
            .entry(edition)
            .or_default()
            .animations
            .insert((set, anim), entry);
    }

    /// Insert or replace a sample descriptor of one edition
    pub fn insert_edition_sample(
        &mut self,
        edition: MappingEdition,
        set: usize,
        sample: usize,
        entry: MappingEntry,
    ) {
        self.editions
            .entry(edition)
            .or_default()
            .samples
            .insert((set, sample), entry);
    }

    /// Add an animation descriptor shared by every edition
    #[must_use]
    pub fn with_animation(mut self, set: usize, anim: usize, entry: MappingEntry) -> Self {
        self.insert_animation(set, anim, entry);
        self
    }

    /// Add a sample descriptor shared by every edition
    #[must_use]
    pub fn with_sample(mut self, set: usize, sample: usize, entry: MappingEntry) -> Self {
        self.insert_sample(set, sample, entry);
        self
    }

    /// Add an animation descriptor of one edition
    #[must_use]
    pub fn with_edition_animation(
        mut self,
        edition: MappingEdition,
        set: usize,
        anim: usize,
        entry: MappingEntry,
    ) -> Self {
        self.insert_edition_animation(edition, set, anim, entry);
        self
    }

    /// Add a sample descriptor of one edition
    #[must_use]
    pub fn with_edition_sample(
        mut self,
        edition: MappingEdition,
        set: usize,
        sample: usize,
        entry: MappingEntry,
    ) -> Self {
        self.insert_edition_sample(edition, set, sample, entry);
        self
    }

    /// Number of animation descriptors in all sections, discard entries included
    pub fn animation_count(&self) -> usize {
        self.sections().map(|section| section.animations.len()).sum()
    }

    /// Number of sample descriptors in all sections, discard entries included
    pub fn sample_count(&self) -> usize {
        self.sections().map(|section| section.samples.len()).sum()
    }

    /// Editions with a section of their own
    pub fn editions(&self) -> impl Iterator<Item = MappingEdition> + '_ {
        self.editions.keys().copied()
    }

    fn sections(&self) -> impl Iterator<Item = &MappingSection> {
        std::iter::once(&self.common).chain(self.editions.values())
    }

    fn edition_section(&self, version: ArchiveVersion) -> Option<&MappingSection> {
        MappingEdition::from_version(version).and_then(|edition| self.editions.get(&edition))
    }

    /// Menu palette carried by the mapping file
    pub fn menu_palette(&self) -> Option<&Palette> {
        self.menu_palette.as_ref()
    }

    /// Toaster powerup remap table carried by the mapping file
    pub fn toaster_remap(&self) -> Option<&RemapTable> {
        self.toaster_remap.as_ref()
    }
}

impl AssetMapping for MappingTable {
    fn animation(&self, version: ArchiveVersion, set: usize, anim: usize) -> MappingLookup<'_> {
        let key = (set, anim);
        let entry = self
            .edition_section(version)
            .and_then(|section| section.animations.get(&key))
            .or_else(|| self.common.animations.get(&key));
        MappingLookup::from_entry(entry)
    }

    fn sample(&self, version: ArchiveVersion, set: usize, sample: usize) -> MappingLookup<'_> {
        let key = (set, sample);
        let entry = self
            .edition_section(version)
            .and_then(|section| section.samples.get(&key))
            .or_else(|| self.common.samples.get(&key));
        MappingLookup::from_entry(entry)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const BASE: ArchiveVersion = ArchiveVersion::BaseGame { shareware: false };
    use tempfile::NamedTempFile;

    const TABLE_JSON: &str = r#"{
        "animations": [
            { "set": 0, "id": 0, "category": "Jazz", "name": "idle" },
            { "set": 0, "id": 1, "category": "Discard", "name": "unused" },
            { "set": 2, "id": 5, "category": "UI", "name": "logo",
              "palette": "menu", "skip_normal_map": true }
        ],
        "samples": [
            { "set": 1, "id": 3, "category": "Common", "name": "explosion" }
        ]
    }"#;

    #[test]
    fn test_lookup_resolves_entries() {
        let table = MappingTable::from_json_str(TABLE_JSON).expect("Test operation should succeed");
        assert_eq!(table.animation_count(), 3);
        assert_eq!(table.sample_count(), 1);

        let MappingLookup::Export(entry) = table.animation(BASE, 2, 5) else {
            panic!("expected an exported entry");
        };
        assert_eq!(
            entry,
            &MappingEntry::new("UI", "logo")
                .with_palette(PaletteKind::Menu)
                .with_skip_normal_map(true)
        );
        assert_eq!(entry.output_path("aura"), "Animations/UI/logo.aura");

        let MappingLookup::Export(entry) = table.sample(BASE, 1, 3) else {
            panic!("expected an exported entry");
        };
        assert_eq!(entry.output_path("wav"), "Animations/Common/explosion.wav");
    }

    #[test]
    fn test_discard_for_missing_and_sentinel() {
        let table = MappingTable::from_json_str(TABLE_JSON).expect("Test operation should succeed");
        assert_eq!(table.animation(BASE, 0, 1), MappingLookup::Discard);
        assert_eq!(table.animation(BASE, 9, 9), MappingLookup::Discard);
        assert_eq!(table.sample(BASE, 0, 0), MappingLookup::Discard);
        assert_eq!(MappingTable::new().animation(BASE, 0, 0), MappingLookup::Discard);
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let json = r#"{ "samples": [
            { "set": 1, "id": 1, "category": "A", "name": "a" },
            { "set": 1, "id": 1, "category": "B", "name": "b" }
        ] }"#;
        let err = MappingTable::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            MappingError::DuplicateEntry {
                kind: "sample",
                set: 1,
                id: 1
            }
        ));
    }

    #[test]
    fn test_edition_sections_override_common_entries() {
        let json = r#"{
            "animations": [
                { "set": 0, "id": 0, "category": "Jazz", "name": "idle" },
                { "set": 0, "id": 1, "category": "Jazz", "name": "run" }
            ],
            "editions": {
                "secret_files": {
                    "animations": [
                        { "set": 0, "id": 0, "category": "Lori", "name": "idle" }
                    ]
                },
                "shareware": {
                    "animations": [
                        { "set": 0, "id": 1, "category": "Discard", "name": "run" }
                    ]
                }
            }
        }"#;
        let table = MappingTable::from_json_str(json).expect("Test operation should succeed");
        assert_eq!(table.animation_count(), 4);

        let path = |version: ArchiveVersion| match table.animation(version, 0, 0) {
            MappingLookup::Export(entry) => entry.output_path("aura"),
            MappingLookup::Discard => panic!("expected an exported entry"),
        };
        assert_eq!(path(BASE), "Animations/Jazz/idle.aura");
        assert_eq!(path(ArchiveVersion::SecretFiles), "Animations/Lori/idle.aura");
        assert_eq!(path(ArchiveVersion::HolidayHare), "Animations/Jazz/idle.aura");

        let shareware = ArchiveVersion::BaseGame { shareware: true };
        assert_eq!(table.animation(shareware, 0, 1), MappingLookup::Discard);
        assert!(matches!(table.animation(BASE, 0, 1), MappingLookup::Export(_)));
    }

    #[test]
    fn test_edition_builders() {
        let table = MappingTable::new()
            .with_sample(1, 2, MappingEntry::new("Common", "boom"))
            .with_edition_sample(
                MappingEdition::HolidayHare,
                1,
                2,
                MappingEntry::new("Xmas", "bells"),
            );

        let MappingLookup::Export(entry) = table.sample(ArchiveVersion::HolidayHare, 1, 2) else {
            panic!("expected an exported entry");
        };
        assert_eq!(entry.name, "bells");
        assert_eq!(table.editions().collect::<Vec<_>>(), vec![MappingEdition::HolidayHare]);
        assert_eq!(MappingEdition::from_version(ArchiveVersion::Unknown), None);
    }

    #[test]
    fn test_duplicate_entries_in_edition_rejected() {
        let json = r#"{ "editions": { "holiday_hare": { "animations": [
            { "set": 3, "id": 0, "category": "A", "name": "a" },
            { "set": 3, "id": 0, "category": "B", "name": "b" }
        ] } } }"#;
        let err = MappingTable::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            MappingError::DuplicateEntry {
                kind: "animation",
                set: 3,
                id: 0
            }
        ));
    }

    #[test]
    fn test_color_tables() {
        let colors: Vec<[u8; 4]> = (0..=255u8).map(|i| [i, 0, 0, 255]).collect();
        let remap: Vec<u8> = (0..=255u8).rev().collect();
        let json = serde_json::json!({
            "menu_palette": colors,
            "toaster_remap": remap,
        })
        .to_string();

        let table = MappingTable::from_json_str(&json).expect("Test operation should succeed");
        let palette = table.menu_palette().expect("Test operation should succeed");
        assert_eq!(palette.color(7), Rgba::new(7, 0, 0, 255));
        let remap = table.toaster_remap().expect("Test operation should succeed");
        assert_eq!(remap.remap(0), 255);

        let err = MappingTable::from_json_str(r#"{ "toaster_remap": [1, 2, 3] }"#).unwrap_err();
        assert!(matches!(err, MappingError::InvalidRemapLength(3)));

        assert!(MappingTable::from_json_str("{}")
            .expect("Test operation should succeed")
            .menu_palette()
            .is_none());
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(TABLE_JSON.as_bytes()).unwrap();

        let table = MappingTable::from_file(temp_file.path()).unwrap();
        assert!(matches!(table.animation(BASE, 0, 0), MappingLookup::Export(_)));
    }

    #[test]
    fn test_from_file_errors() {
        let err = MappingTable::from_file(Path::new("/nonexistent/mapping.json")).unwrap_err();
        assert!(matches!(err, MappingError::LoadFailed { .. }));

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"{ not json").unwrap();
        let err = MappingTable::from_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, MappingError::InvalidJson(_)));
    }
}
