//! Palette index to RGBA resolution
//!
//! Sprites are exported in one of two modes, chosen per asset by its
//! mapping entry:
//!
//! - [`PaletteKind::Sprite`] keeps the palette index in the red, green and
//!   blue channels so the runtime can apply the level palette later.
//! - [`PaletteKind::Menu`] bakes colors from the 256-entry menu palette.
//!
//! Index 0 is always fully transparent. Frames flagged as semi-transparent
//! get [`SEMI_TRANSPARENT_ALPHA`], scaled by the palette's own alpha in menu
//! mode.

use serde::{Deserialize, Serialize};

use crate::error::{MappingError, MappingResult};

/// Alpha of semi-transparent frames
pub const SEMI_TRANSPARENT_ALPHA: u8 = 140;

/// Number of entries in a palette or remap table
pub const PALETTE_SIZE: usize = 256;

/// Which palette an asset is exported with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteKind {
    /// Indices are kept, the runtime applies the palette
    #[default]
    Sprite,
    /// Colors are baked from the menu palette
    Menu,
}

/// One RGBA color, serialized as `[r, g, b, a]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channels in RGBA order
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(color: Rgba) -> Self {
        color.to_bytes()
    }
}

/// A 256-entry color table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Create a palette from exactly 256 colors
    pub fn from_colors(colors: Vec<Rgba>) -> MappingResult<Self> {
        if colors.len() != PALETTE_SIZE {
            return Err(MappingError::InvalidPaletteLength(colors.len()));
        }
        Ok(Self { colors })
    }

    /// Built-in menu palette used when the mapping file does not carry one
    ///
    /// Index 0 is transparent, every other index is an opaque gray of the
    /// same intensity.
    pub fn grayscale() -> Self {
        let colors = (0..=u8::MAX)
            .map(|i| if i == 0 { Rgba::TRANSPARENT } else { Rgba::new(i, i, i, 255) })
            .collect();
        Self { colors }
    }

    /// Color at `index`
    pub fn color(&self, index: u8) -> Rgba {
        self.colors
            .get(usize::from(index))
            .copied()
            .unwrap_or(Rgba::TRANSPARENT)
    }

    /// All colors in index order
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// Resolves palette indices of one asset to RGBA
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    kind: PaletteKind,
    menu_palette: &'a Palette,
}

impl<'a> ColorResolver<'a> {
    /// Create a resolver for assets exported with `kind`
    pub fn new(kind: PaletteKind, menu_palette: &'a Palette) -> Self {
        Self { kind, menu_palette }
    }

    /// Palette mode of this resolver
    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    /// Resolve one index of a frame
    pub fn resolve(&self, index: u8, draw_transparent: bool) -> Rgba {
        match self.kind {
            PaletteKind::Sprite => {
                let alpha = if index == 0 {
                    0
                } else if draw_transparent {
                    SEMI_TRANSPARENT_ALPHA
                } else {
                    u8::MAX
                };
                Rgba::new(index, index, index, alpha)
            }
            PaletteKind::Menu => {
                let src = self.menu_palette.color(index);
                let alpha = if index == 0 {
                    0
                } else if draw_transparent {
                    (u32::from(SEMI_TRANSPARENT_ALPHA) * u32::from(src.a) / 255) as u8
                } else {
                    src.a
                };
                Rgba::new(src.r, src.g, src.b, alpha)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn menu_palette() -> Palette {
        let colors = (0..=u8::MAX)
            .map(|i| Rgba::new(i, 255 - i, i / 2, if i < 128 { 255 } else { 102 }))
            .collect();
        Palette::from_colors(colors).expect("Test operation should succeed")
    }

    #[test]
    fn test_identity_mode() {
        let palette = Palette::default();
        let resolver = ColorResolver::new(PaletteKind::Sprite, &palette);

        assert_eq!(resolver.resolve(0, false), Rgba::new(0, 0, 0, 0));
        assert_eq!(resolver.resolve(0, true), Rgba::new(0, 0, 0, 0));
        assert_eq!(resolver.resolve(37, false), Rgba::new(37, 37, 37, 255));
        assert_eq!(resolver.resolve(37, true), Rgba::new(37, 37, 37, 140));
    }

    #[test]
    fn test_menu_mode_alpha() {
        let palette = menu_palette();
        let resolver = ColorResolver::new(PaletteKind::Menu, &palette);

        assert_eq!(resolver.resolve(0, false), Rgba::new(0, 255, 0, 0));
        assert_eq!(resolver.resolve(10, false), Rgba::new(10, 245, 5, 255));
        assert_eq!(resolver.resolve(10, true), Rgba::new(10, 245, 5, 140));
        assert_eq!(resolver.resolve(200, false).a, 102);
        // 140 * 102 / 255
        assert_eq!(resolver.resolve(200, true).a, 56);
    }

    #[test]
    fn test_palette_length_is_checked() {
        let err = Palette::from_colors(vec![Rgba::TRANSPARENT; 16]).unwrap_err();
        assert!(matches!(err, MappingError::InvalidPaletteLength(16)));
    }

    #[test]
    fn test_grayscale_palette() {
        let palette = Palette::grayscale();
        assert_eq!(palette.colors().len(), PALETTE_SIZE);
        assert_eq!(palette.color(0), Rgba::TRANSPARENT);
        assert_eq!(palette.color(255), Rgba::new(255, 255, 255, 255));
    }

    #[test]
    fn test_rgba_serializes_as_array() {
        let json = serde_json::to_string(&Rgba::new(1, 2, 3, 4))
            .expect("Test operation should succeed");
        assert_eq!(json, "[1,2,3,4]");

        let color: Rgba =
            serde_json::from_str("[9,8,7,6]").expect("Test operation should succeed");
        assert_eq!(color, Rgba::new(9, 8, 7, 6));

        let kind: PaletteKind =
            serde_json::from_str("\"menu\"").expect("Test operation should succeed");
        assert_eq!(kind, PaletteKind::Menu);
    }
}
