//! Per-asset corrections for defects baked into the legacy art
//!
//! Fixups are selected by exact `(category, name)` match against
//! [`FIXUP_RULES`]; the first matching rule wins. Pixel fixups rewrite a
//! palette index before it is resolved to a color. The hotspot fixup
//! replaces the animation's normalised hotspot after its pixels have been
//! placed, so it moves the anchors but not the image.

use j2a_formats::frame::Point;

use crate::error::{MappingError, MappingResult};
use crate::palette::PALETTE_SIZE;

/// A legacy defect correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fixup {
    /// Remaps the powerup's body colors through [`RemapTable`]
    ToasterPowerUp,
    /// Index 128 is a stray background color
    Vine,
    /// Indices 68 to 70 are stray pixels on the first frame
    FlyCarrot,
    /// The first frame has a weapon flare drawn in
    PlayerFlare,
    /// The climbing animations have a misplaced hotspot
    LoriLiftHotspot,
}

impl Fixup {
    /// Name used in log messages
    pub const fn description(self) -> &'static str {
        match self {
            Self::ToasterPowerUp => "\"Toaster PowerUp\" palette fix",
            Self::Vine => "\"Vine\" palette fix",
            Self::FlyCarrot => "\"Fly Carrot\" image fix",
            Self::PlayerFlare => "\"Player Flare\" image fix",
            Self::LoriLiftHotspot => "\"Lori\" hotspot fix",
        }
    }

    /// Rewrite the index at `(x, y)` of frame `frame_index`
    pub fn remap_index(
        self,
        frame_index: usize,
        x: usize,
        y: usize,
        index: u8,
        toaster_remap: &RemapTable,
    ) -> u8 {
        match self {
            Self::ToasterPowerUp => {
                let in_region = ((3..=15).contains(&x) && (4..=20).contains(&y))
                    || ((2..=15).contains(&x) && (7..=19).contains(&y));
                if in_region {
                    toaster_remap.remap(index)
                } else {
                    index
                }
            }
            Self::Vine if index == 128 => 0,
            Self::FlyCarrot if frame_index == 0 && (68..=70).contains(&index) => 0,
            Self::PlayerFlare
                if frame_index == 0 && y < 14 && (index == 15 || (40..=42).contains(&index)) =>
            {
                0
            }
            _ => index,
        }
    }

    /// Whether this fixup touches pixels
    pub const fn rewrites_pixels(self) -> bool {
        !matches!(self, Self::LoriLiftHotspot)
    }

    /// Replacement normalised hotspot, applied after pixel placement
    pub const fn hotspot_override(self) -> Option<Point> {
        match self {
            Self::LoriLiftHotspot => Some(Point::new(20, 4)),
            _ => None,
        }
    }
}

/// Assets a fixup applies to
#[derive(Debug, Clone, Copy)]
pub struct FixupRule {
    /// Accepted categories
    pub categories: &'static [&'static str],
    /// Accepted names
    pub names: &'static [&'static str],
    /// Fixup to apply
    pub fixup: Fixup,
}

impl FixupRule {
    /// Exact match on both category and name
    pub fn matches(&self, category: &str, name: &str) -> bool {
        self.categories.contains(&category) && self.names.contains(&name)
    }
}

/// Fixup rules in priority order
pub const FIXUP_RULES: &[FixupRule] = &[
    FixupRule {
        categories: &["Object"],
        names: &["powerup_upgrade_toaster"],
        fixup: Fixup::ToasterPowerUp,
    },
    FixupRule {
        categories: &["Object"],
        names: &["vine"],
        fixup: Fixup::Vine,
    },
    FixupRule {
        categories: &["Pickup"],
        names: &["carrot_fly"],
        fixup: Fixup::FlyCarrot,
    },
    FixupRule {
        categories: &["Jazz", "Spaz"],
        names: &["shoot_ver", "vine_shoot_up"],
        fixup: Fixup::PlayerFlare,
    },
    FixupRule {
        categories: &["Lori"],
        names: &["lift", "lift_start", "lift_end"],
        fixup: Fixup::LoriLiftHotspot,
    },
];

/// Find the fixup for an asset
pub fn find_fixup(category: &str, name: &str) -> Option<Fixup> {
    FIXUP_RULES
        .iter()
        .find(|rule| rule.matches(category, name))
        .map(|rule| rule.fixup)
}

/// A 256-entry index to index table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapTable {
    indices: Vec<u8>,
}

impl RemapTable {
    /// Table that maps every index to itself
    pub fn identity() -> Self {
        Self {
            indices: (0..=u8::MAX).collect(),
        }
    }

    /// Create a table from exactly 256 indices
    pub fn from_indices(indices: Vec<u8>) -> MappingResult<Self> {
        if indices.len() != PALETTE_SIZE {
            return Err(MappingError::InvalidRemapLength(indices.len()));
        }
        Ok(Self { indices })
    }

    /// Mapped index
    pub fn remap(&self, index: u8) -> u8 {
        self.indices.get(usize::from(index)).copied().unwrap_or(index)
    }
}

impl Default for RemapTable {
    fn default() -> Self {
        Self::identity()
    }
}
