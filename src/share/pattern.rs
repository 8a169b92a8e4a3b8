//! Sub-pixel patterns: the two complementary 2×2 blocks every share cell uses.
//!
//! ```text
//!   P0        P1
//! ┌───┬───┐ ┌───┬───┐
//! │   │ ■ │ │ ■ │   │
//! ├───┼───┤ ├───┼───┤
//! │ ■ │   │ │   │ ■ │
//! └───┴───┘ └───┴───┘
//! ```
//!
//! `P0 ^ P1` sets all four sub-pixels; each pattern alone sets exactly two.

use bitflags::bitflags;

/// Sub-pixels per mask cell along each axis.
pub const SUBPIXEL: u16 = 2;

bitflags! {
    /// The four sub-pixels of a 2×2 block.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SubPixels: u8 {
        /// Row 0, column 0
        const TOP_LEFT = 0b0001;
        /// Row 0, column 1
        const TOP_RIGHT = 0b0010;
        /// Row 1, column 0
        const BOTTOM_LEFT = 0b0100;
        /// Row 1, column 1
        const BOTTOM_RIGHT = 0b1000;
    }
}

impl std::fmt::Debug for SubPixels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl SubPixels {
    /// The flag for (col, row) inside the block, or empty out of range.
    #[inline]
    pub const fn at(col: u16, row: u16) -> Self {
        match (col, row) {
            (0, 0) => Self::TOP_LEFT,
            (1, 0) => Self::TOP_RIGHT,
            (0, 1) => Self::BOTTOM_LEFT,
            (1, 1) => Self::BOTTOM_RIGHT,
            _ => Self::empty(),
        }
    }

    /// Whether the sub-pixel at (col, row) is set.
    #[inline]
    pub const fn is_set(self, col: u16, row: u16) -> bool {
        let flag = Self::at(col, row);
        !flag.is_empty() && self.contains(flag)
    }
}

/// One of the two complementary share patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SharePattern {
    /// Anti-diagonal: top-right and bottom-left.
    P0 = 0,
    /// Diagonal: top-left and bottom-right.
    P1 = 1,
}

impl SharePattern {
    /// Pattern selected by a random bit; only the low bit is used.
    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        if bit & 1 == 0 {
            Self::P0
        } else {
            Self::P1
        }
    }

    /// The selecting bit.
    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// The other pattern.
    #[inline]
    #[must_use]
    pub const fn complement(self) -> Self {
        match self {
            Self::P0 => Self::P1,
            Self::P1 => Self::P0,
        }
    }

    /// The sub-pixels this pattern sets.
    #[inline]
    pub const fn sub_pixels(self) -> SubPixels {
        match self {
            Self::P0 => SubPixels::TOP_RIGHT.union(SubPixels::BOTTOM_LEFT),
            Self::P1 => SubPixels::TOP_LEFT.union(SubPixels::BOTTOM_RIGHT),
        }
    }
}
