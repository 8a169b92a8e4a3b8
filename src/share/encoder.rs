//! `ShareEncoder`: (2,2) visual secret sharing over a binary mask.
//!
//! For each cell one independent random bit `b` is drawn:
//!
//! | mask | share 1      | share 2        |
//! |------|--------------|----------------|
//! | 1    | `pattern(b)` | `pattern(1-b)` |
//! | 0    | `pattern(b)` | `pattern(b)`   |
//!
//! Either share alone is a uniform coin flip per cell; only stacking them
//! reveals which cells differ.

use super::grid::{SharePair, ShareGrid};
use super::pattern::SharePattern;
use crate::raster::BinaryMask;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// A source of uniformly random bits for pattern selection.
pub trait BitSource {
    /// The next bit, `0` or `1`.
    fn next_bit(&mut self) -> u8;
}

impl<B: BitSource + ?Sized> BitSource for &mut B {
    fn next_bit(&mut self) -> u8 {
        (**self).next_bit()
    }
}

impl<B: BitSource + ?Sized> BitSource for Box<B> {
    fn next_bit(&mut self) -> u8 {
        (**self).next_bit()
    }
}

/// Adapts any [`RngCore`] into a [`BitSource`].
#[derive(Debug, Clone)]
pub struct RngBits<R>(pub R);

impl<R: RngCore> BitSource for RngBits<R> {
    #[inline]
    fn next_bit(&mut self) -> u8 {
        u8::from(self.0.gen::<bool>())
    }
}

impl RngBits<StdRng> {
    /// A general-purpose generator seeded from the OS.
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// A reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Replays a fixed bit sequence, cycling when exhausted.
///
/// Useful for asserting exact share contents.
#[derive(Debug, Clone)]
pub struct FixedBits {
    bits: Vec<u8>,
    pos: usize,
}

impl FixedBits {
    /// Replay `bits` in order. An empty sequence yields zeros.
    pub fn new(bits: impl Into<Vec<u8>>) -> Self {
        Self {
            bits: bits.into(),
            pos: 0,
        }
    }
}

impl BitSource for FixedBits {
    fn next_bit(&mut self) -> u8 {
        if self.bits.is_empty() {
            return 0;
        }
        let bit = self.bits[self.pos % self.bits.len()] & 1;
        self.pos += 1;
        bit
    }
}

/// Splits masks into share pairs using an injected bit source.
#[derive(Debug, Clone)]
pub struct ShareEncoder<B> {
    bits: B,
}

impl ShareEncoder<RngBits<StdRng>> {
    /// Encoder backed by an OS-seeded generator.
    pub fn from_entropy() -> Self {
        Self::new(RngBits::from_entropy())
    }
}

impl<B: BitSource> ShareEncoder<B> {
    /// Create an encoder drawing pattern bits from `bits`.
    pub const fn new(bits: B) -> Self {
        Self { bits }
    }

    /// Encode `mask` into two shares. Bits are drawn row-major, one per cell.
    pub fn encode(&mut self, mask: &BinaryMask) -> SharePair {
        let len = mask.len();
        let mut first = Vec::with_capacity(len);
        let mut second = Vec::with_capacity(len);

        for &foreground in mask.bits() {
            let pattern = SharePattern::from_bit(self.bits.next_bit());
            first.push(pattern);
            second.push(if foreground {
                pattern.complement()
            } else {
                pattern
            });
        }

        debug!(
            "Encoded {}x{} mask ({} foreground cells)",
            mask.width(),
            mask.height(),
            mask.foreground_count()
        );

        SharePair::new(
            ShareGrid::from_patterns(mask.width(), mask.height(), first),
            ShareGrid::from_patterns(mask.width(), mask.height(), second),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::SubPixels;

    fn checkerboard(width: u16, height: u16) -> BinaryMask {
        BinaryMask::from_fn(width, height, |x, y| (x + y) % 2 == 0).unwrap()
    }

    #[test]
    fn test_foreground_cell_bit_zero() {
        let mask = BinaryMask::from_rows(&[[1u8]]).unwrap();
        let pair = ShareEncoder::new(FixedBits::new([0u8])).encode(&mask);

        assert_eq!(pair.first().get(0, 0), Some(SharePattern::P0));
        assert_eq!(pair.second().get(0, 0), Some(SharePattern::P1));
        assert_eq!(pair.stacked(0, 0), Some(SubPixels::all()));
    }

    #[test]
    fn test_background_cell_bit_one() {
        let mask = BinaryMask::from_rows(&[[0u8]]).unwrap();
        let pair = ShareEncoder::new(FixedBits::new([1u8])).encode(&mask);

        assert_eq!(pair.first().get(0, 0), Some(SharePattern::P1));
        assert_eq!(pair.second().get(0, 0), Some(SharePattern::P1));
        let stacked = pair.stacked(0, 0).unwrap();
        assert_eq!(stacked, SharePattern::P1.sub_pixels());
        assert_ne!(stacked, SubPixels::all());
    }

    #[test]
    fn test_bits_consumed_row_major() {
        let mask = BinaryMask::from_rows(&[[0u8, 0], [0, 0]]).unwrap();
        let pair = ShareEncoder::new(FixedBits::new([0u8, 1, 1, 0])).encode(&mask);
        assert_eq!(
            pair.first().patterns(),
            &[SharePattern::P0, SharePattern::P1, SharePattern::P1, SharePattern::P0]
        );
    }

    #[test]
    fn test_invariant_holds_for_every_cell() {
        let mask = checkerboard(150, 60);
        let pair = ShareEncoder::new(RngBits::seeded(7)).encode(&mask);

        for y in 0..mask.height() {
            for x in 0..mask.width() {
                let a = pair.first().get(x, y).unwrap().sub_pixels();
                let b = pair.second().get(x, y).unwrap().sub_pixels();
                if mask.get(x, y).unwrap() {
                    assert_eq!(a ^ b, SubPixels::all(), "cell ({x}, {y})");
                } else {
                    assert_eq!(a, b, "cell ({x}, {y})");
                }
            }
        }
        assert!(pair.encodes(&mask));
        assert_eq!(pair.reconstruct(), mask);
    }

    #[test]
    fn test_single_share_is_unbiased() {
        // All-foreground and all-background masks must both give ~50% P1
        // in each share on its own.
        for foreground in [true, false] {
            let mask = BinaryMask::from_fn(100, 40, |_, _| foreground).unwrap();
            let pair = ShareEncoder::new(RngBits::seeded(42)).encode(&mask);
            for grid in [pair.first(), pair.second()] {
                let ratio = grid.p1_count() as f64 / mask.len() as f64;
                assert!((0.45..=0.55).contains(&ratio), "ratio {ratio} (fg={foreground})");
            }
        }
    }

    #[test]
    fn test_share_independent_of_mask_given_bits() {
        // With identical bits, share 1 is the same whatever the mask says.
        let text = checkerboard(40, 30);
        let blank = BinaryMask::from_fn(40, 30, |_, _| false).unwrap();
        let a = ShareEncoder::new(RngBits::seeded(9)).encode(&text);
        let b = ShareEncoder::new(RngBits::seeded(9)).encode(&blank);
        assert_eq!(a.first(), b.first());
        assert_ne!(a.second(), b.second());
    }

    #[test]
    fn test_encodes_detects_wrong_mask() {
        let mask = checkerboard(8, 8);
        let other = BinaryMask::from_fn(8, 8, |_, _| true).unwrap();
        let pair = ShareEncoder::new(RngBits::seeded(1)).encode(&mask);
        assert!(!pair.encodes(&other));
        assert!(!pair.encodes(&checkerboard(8, 9)));
    }

    #[test]
    fn test_fixed_bits_cycle() {
        let mut bits = FixedBits::new(vec![1u8, 0, 3]);
        let drawn: Vec<u8> = (0..6).map(|_| bits.next_bit()).collect();
        assert_eq!(drawn, [1, 0, 1, 1, 0, 1]);
        assert_eq!(FixedBits::new(Vec::<u8>::new()).next_bit(), 0);
    }
}
