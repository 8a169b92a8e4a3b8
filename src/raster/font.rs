//! Monospace glyph rasters from Noto Sans Mono.
//!
//! Glyphs come pre-rasterized at a few fixed line heights, each pixel an
//! intensity from 0 (background) to 255 (full ink).

use noto_sans_mono_bitmap::{get_raster, FontWeight, RasterHeight, RasterizedChar};

/// Line heights the font ships, largest first.
pub const LINE_HEIGHTS: [u16; 4] = [32, 24, 20, 16];

/// Height used for coverage queries. Every height covers the same characters.
const COVERAGE_HEIGHT: u16 = 16;

fn raster_height(px: u16) -> RasterHeight {
    match px {
        32.. => RasterHeight::Size32,
        24..=31 => RasterHeight::Size24,
        20..=23 => RasterHeight::Size20,
        _ => RasterHeight::Size16,
    }
}

/// Noto Sans Mono in one weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonoFont {
    bold: bool,
}

impl MonoFont {
    /// The bold or regular face.
    pub const fn new(bold: bool) -> Self {
        Self { bold }
    }

    fn weight(self) -> FontWeight {
        if self.bold {
            FontWeight::Bold
        } else {
            FontWeight::Regular
        }
    }

    /// The raster for `ch` at line height `px` (snapped down to a shipped height).
    pub fn glyph(&self, ch: char, px: u16) -> Option<RasterizedChar> {
        get_raster(ch, self.weight(), raster_height(px))
    }

    /// Whether `ch` has a glyph.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.glyph(ch, COVERAGE_HEIGHT).is_some()
    }

    /// The first character of `text` without a glyph.
    pub fn first_missing(&self, text: &str) -> Option<char> {
        text.chars().find(|&c| !self.has_glyph(c))
    }

    /// Horizontal advance per character at line height `px`.
    pub fn advance(&self, px: u16) -> u16 {
        self.glyph('M', px)
            .and_then(|g| u16::try_from(g.width()).ok())
            .unwrap_or(px)
    }

    /// Line heights usable for a nominal font size, largest first.
    ///
    /// Sizes below the smallest shipped height still get that height.
    pub fn heights_for(size_px: u16) -> impl Iterator<Item = u16> {
        let smallest = LINE_HEIGHTS[LINE_HEIGHTS.len() - 1];
        let cap = size_px.max(smallest);
        LINE_HEIGHTS.into_iter().filter(move |&h| h <= cap)
    }
}

impl Default for MonoFont {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covers_challenge_alphabet() {
        let font = MonoFont::default();
        assert_eq!(font.first_missing("ABCDEFGHJKLMNPQRSTUVWXYZ23456789"), None);
        assert_eq!(font.first_missing("kx9p2?"), None);
        assert_eq!(font.first_missing("K\u{2603}9"), Some('\u{2603}'));
    }

    #[test]
    fn test_glyph_matches_line_height() {
        let font = MonoFont::default();
        for h in LINE_HEIGHTS {
            let g = font.glyph('A', h).unwrap();
            assert_eq!(g.height(), usize::from(h));
            assert_eq!(usize::from(font.advance(h)), g.width());
        }
    }

    #[test]
    fn test_space_is_blank() {
        let g = MonoFont::default().glyph(' ', 24).unwrap();
        assert!(g.raster().iter().all(|row| row.iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_bold_has_more_ink() {
        let ink = |bold: bool| -> u32 {
            MonoFont::new(bold)
                .glyph('K', 32)
                .unwrap()
                .raster()
                .iter()
                .flat_map(|row| row.iter())
                .map(|&v| u32::from(v))
                .sum()
        };
        assert!(ink(true) > ink(false));
    }

    #[test]
    fn test_heights_for_size() {
        assert_eq!(MonoFont::heights_for(40).collect::<Vec<_>>(), [32, 24, 20, 16]);
        assert_eq!(MonoFont::heights_for(20).collect::<Vec<_>>(), [20, 16]);
        assert_eq!(MonoFont::heights_for(8).collect::<Vec<_>>(), [16]);
    }
}
