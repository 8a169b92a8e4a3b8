//! `ShareGrid` and `SharePair`: the two encoded shares of one mask.

use super::pattern::{SharePattern, SubPixels};
use crate::raster::BinaryMask;

/// A W×H grid of share patterns, row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShareGrid {
    patterns: Vec<SharePattern>,
    width: u16,
    height: u16,
}

impl ShareGrid {
    pub(crate) fn from_patterns(width: u16, height: u16, patterns: Vec<SharePattern>) -> Self {
        debug_assert_eq!(patterns.len(), usize::from(width) * usize::from(height));
        Self {
            patterns,
            width,
            height,
        }
    }

    /// Grid width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The pattern at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<SharePattern> {
        if x < self.width && y < self.height {
            Some(self.patterns[usize::from(y) * usize::from(self.width) + usize::from(x)])
        } else {
            None
        }
    }

    /// Row-major view of all patterns.
    #[inline]
    pub fn patterns(&self) -> &[SharePattern] {
        &self.patterns
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[SharePattern]> {
        self.patterns.chunks(usize::from(self.width))
    }

    /// Number of cells holding [`SharePattern::P1`].
    pub fn p1_count(&self) -> usize {
        self.patterns.iter().filter(|p| **p == SharePattern::P1).count()
    }
}

impl std::fmt::Debug for ShareGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShareGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("p1", &self.p1_count())
            .finish()
    }
}

/// The two shares of one challenge.
///
/// Only [`ShareEncoder`](super::ShareEncoder) builds pairs, so for every
/// cell the shares are complementary where the mask is set and identical
/// where it is clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePair {
    first: ShareGrid,
    second: ShareGrid,
}

impl SharePair {
    pub(crate) const fn new(first: ShareGrid, second: ShareGrid) -> Self {
        Self { first, second }
    }

    /// Share shown on even frames.
    #[inline]
    pub const fn first(&self) -> &ShareGrid {
        &self.first
    }

    /// Share shown on odd frames.
    #[inline]
    pub const fn second(&self) -> &ShareGrid {
        &self.second
    }

    /// Grid size as `(width, height)`.
    #[inline]
    pub const fn size(&self) -> (u16, u16) {
        (self.first.width, self.first.height)
    }

    /// Sub-pixels set by stacking both shares at (x, y).
    pub fn stacked(&self, x: u16, y: u16) -> Option<SubPixels> {
        Some(self.first.get(x, y)?.sub_pixels() | self.second.get(x, y)?.sub_pixels())
    }

    /// Recover the mask: a cell is foreground where the shares differ.
    pub fn reconstruct(&self) -> BinaryMask {
        let (width, height) = self.size();
        let bits = self
            .first
            .patterns
            .iter()
            .zip(&self.second.patterns)
            .map(|(a, b)| a != b)
            .collect();
        BinaryMask::from_bits(width, height, bits)
    }

    /// Whether the pair encodes `mask` correctly in every cell.
    pub fn encodes(&self, mask: &BinaryMask) -> bool {
        if self.size() != (mask.width(), mask.height()) {
            return false;
        }
        self.first
            .patterns
            .iter()
            .zip(&self.second.patterns)
            .zip(mask.bits())
            .all(|((a, b), &fg)| {
                let xor = a.sub_pixels() ^ b.sub_pixels();
                if fg {
                    xor == SubPixels::all()
                } else {
                    xor.is_empty()
                }
            })
    }
}
